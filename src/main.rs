use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod error;
mod filter;
mod handlers;
mod openapi_tests;
mod repository;
mod router;
mod schemas;
mod store;
mod test_utils;

use cli::Cli;

/// Main entry point for the user account service.
#[tokio::main]
async fn main() -> Result<()> {
    // `.env` has to be loaded before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "useraccounts=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
