use anyhow::Result;
use tracing_subscriber::EnvFilter;

use pdfqa::chat::ChatService;
use pdfqa::{run_server, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env();
    let chat = ChatService::from_config(&config)?;

    run_server(config, chat).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
