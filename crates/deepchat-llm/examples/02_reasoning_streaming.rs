use anyhow::Result;
use deepchat_llm::{ChatRequest, Message, NormalizedCompletion, StreamEvent};
use futures::StreamExt;
use std::io::Write;

#[tokio::main]
async fn main() -> Result<()> {
    let client = deepchat_llm::provider::client()?;

    let request = ChatRequest::new("deepseek-r1", vec![Message::human("9.9和9.11谁大")]);

    println!("Streaming response with reasoning:\n");

    let mut stream = client.chat_stream(request).await?;
    let mut chunks = Vec::new();
    let mut answer = String::new();
    let mut answering = false;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        for event in chunk.events() {
            match event {
                StreamEvent::Reasoning { content } => print!("{}", content),
                StreamEvent::Message { content } => {
                    if !answering {
                        println!("\n\n{} answer {}\n", "=".repeat(20), "=".repeat(20));
                        answering = true;
                    }
                    print!("{}", content);
                    answer.push_str(&content);
                }
            }
            std::io::stdout().flush()?;
        }
        chunks.push(chunk);
    }

    let completion = NormalizedCompletion::from_stream(&chunks, &answer, "deepseek-r1");
    println!("\n\n{}", serde_json::to_string_pretty(&completion)?);

    deepchat_llm::provider::shutdown();
    Ok(())
}
