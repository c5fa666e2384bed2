use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{BufRead, Write};
use tracing::error;
use ui_scout::agent::{ChatMessage, DiscoveryRunner, DiscoveryTools, GeminiClient};
use ui_scout::browser::{ChromeBrowser, DiscoverySession};
use ui_scout::core::Config;
use ui_scout::logging::{self, LogFormat};

#[derive(Parser)]
#[command(name = "ui-scout")]
#[command(about = "Browser-driven UI discovery agent", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Observe the target page and print the agent's JSON report
    Discover,
    /// Interactive chat with the model, no tools
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(LogFormat::detect(), cli.verbose);

    match cli.command.unwrap_or(Commands::Discover) {
        Commands::Discover => run_discover().await,
        Commands::Chat => run_chat().await,
    }
}

async fn run_discover() -> anyhow::Result<()> {
    let website_url =
        std::env::var("WEBSITE_URL").context("WEBSITE_URL environment variable not set")?;
    let api_key =
        std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY environment variable not set")?;

    let config = Config::default();
    let client = GeminiClient::new(&api_key, &config.agent);
    let max_turns = config.agent.max_turns;

    let session = DiscoverySession::new(ChromeBrowser::new(), config, website_url);
    let tools = DiscoveryTools::new(session);

    let mut runner = DiscoveryRunner::new(client, tools, max_turns);
    runner.run("Start exploration.").await?;

    Ok(())
}

async fn run_chat() -> anyhow::Result<()> {
    let api_key =
        std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY environment variable not set")?;

    let config = Config::default();
    let client = GeminiClient::new(&api_key, &config.agent);

    let mut messages = vec![ChatMessage::system("You are a helpful assistant.")];

    println!("ui-scout chat (/quit to exit)");
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        let _ = std::io::stdout().flush();

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "/quit" || input == "/exit" {
            break;
        }

        messages.push(ChatMessage::user(input));
        match client.chat(&messages, &[]).await {
            Ok(response) => {
                let reply = response.content.unwrap_or_default();
                println!("{}", reply);
                messages.push(ChatMessage::assistant(&reply));
            }
            Err(e) => {
                error!(error = %e, "chat request failed");
                messages.pop();
            }
        }
    }

    Ok(())
}
