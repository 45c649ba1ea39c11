use anyhow::Result;
use clap::Parser;
use tracing::info;

mod auth;
mod caption;
mod config;
mod match_list;
mod models;
mod pipeline;
mod ranking;
mod render;
mod scorecard;
mod sponsors;

use config::Config;
use pipeline::Pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    info!("Building weekly performers for {}", config.club_name);

    let pipeline = Pipeline::from_config(config)?;
    pipeline.run().await?;

    info!("Done");
    Ok(())
}
