use anyhow::Result;
use futures::StreamExt;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use deepchat_agent::{Channel, ConversationSession, TurnEvent, DEFAULT_MODEL};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
    let mut session = ConversationSession::builder()
        .client(deepchat_llm::provider::client()?)
        .model(model)
        .build()?;

    println!("Chatting with {} (type 'clear' to start over, 'quit' to exit)", session.model());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nYou: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        match input {
            "" => continue,
            "quit" => break,
            "clear" => {
                session.reset_to_system_prompt();
                println!("Conversation cleared.");
                continue;
            }
            _ => {}
        }

        if let Err(e) = run_turn(&mut session, input).await {
            println!("\nError: {:#}", e);
        }
    }

    deepchat_llm::provider::shutdown();
    Ok(())
}

async fn run_turn(session: &mut ConversationSession, input: &str) -> Result<()> {
    let mut turn = session.take_turn(input).await?;
    let mut answering = false;

    println!("\nThinking:");

    while let Some(event) = turn.next().await {
        match event? {
            TurnEvent::Fragment { channel: Channel::Reasoning, text } => print!("{}", text),
            TurnEvent::Fragment { channel: Channel::Answer, text } => {
                if !answering {
                    println!("\n\n{} Answer {}\n", "=".repeat(20), "=".repeat(20));
                    answering = true;
                }
                print!("{}", text);
            }
            TurnEvent::Summary { completion, .. } => {
                if let Some(usage) = completion.usage {
                    tracing::debug!(completion_tokens = usage.completion_tokens, "Turn finished");
                }
                println!();
            }
        }
        std::io::stdout().flush()?;
    }

    Ok(())
}
