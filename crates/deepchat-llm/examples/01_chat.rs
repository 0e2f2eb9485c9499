use anyhow::Result;
use deepchat_llm::{ChatRequest, ClientFactory, Message, NormalizedCompletion, ProviderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ProviderConfig::from_env()?;
    let client = ClientFactory::create_chat_client(&config)?;

    let request = ChatRequest::new(
        "qwen-plus",
        vec![
            Message::system("Answer as: [Reasoning] <your thinking> [Final Answer] <answer>"),
            Message::human("What is the capital of France?"),
        ],
    );

    let response = client.chat(request).await?;
    let completion = NormalizedCompletion::from_complete(&response, &response.content());

    if let Some(reasoning) = &completion.reasoning {
        println!("Reasoning: {}", reasoning);
    }
    println!("Answer: {}", completion.content().unwrap_or_default());

    if let Some(usage) = completion.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    Ok(())
}
