use anyhow::Result;
use clap::Parser;
use papertrade::cli::Cli;
use papertrade::config::AppConfig;
use papertrade::{app, observability};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = AppConfig::load()?;
    observability::init_tracing(&cfg.observability)?;

    app::run(cli, cfg).await
}
