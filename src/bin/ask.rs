use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pdfqa::chat::ChatService;
use pdfqa::config::{AppConfig, FallbackStrategy};
use pdfqa::models::ChatRequest;

#[derive(Parser, Debug)]
#[command(name = "ask")]
#[command(about = "Answer one question against the configured document")]
struct Cli {
    #[arg(long)]
    question: String,
    /// Overrides PDFQA_DOCUMENT.
    #[arg(long)]
    document: Option<PathBuf>,
    #[arg(long)]
    excerpt_chars: Option<NonZeroUsize>,
    #[arg(long)]
    fallback: Option<FallbackStrategy>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env();
    if let Some(document) = cli.document {
        config.document_path = document;
    }
    if let Some(excerpt_chars) = cli.excerpt_chars {
        config.excerpt_chars = excerpt_chars;
    }
    if let Some(fallback) = cli.fallback {
        config.fallback = fallback;
    }

    let chat = ChatService::from_config(&config)?;
    let answer = chat
        .answer(ChatRequest {
            question: cli.question,
        })
        .await?;

    println!("[{}] {}", answer.category, answer.source.as_str());
    println!("{}", answer.response);

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
