//! XRPL Token Feed - Main executable
//!
//! Runs one ingestion pass: resumes from the highest stored ledger index,
//! pages through the source account's history and stores every successful
//! payment of the configured token exactly once. Scheduling is left to cron
//! or a similar runner.
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use xrpl_token_feed::{IngestionInteractor, ServiceContainer, Settings};

/// Application entry point
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging with default level of "info"
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    info!("Starting XRPL Token Feed v{}", xrpl_token_feed::VERSION);

    let settings = Settings::load().context("Failed to load settings")?;

    // Setup database connection pool
    info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.max_connections)
        .connect(&settings.database_url)
        .await
        .context("Failed to create database connection pool")?;

    // Run database migrations
    info!("Running database migrations...");
    if let Err(e) = sqlx::migrate!("./migrations").run(&db_pool).await {
        error!("Failed to run migrations: {}", e);
        return Err(anyhow::Error::from(e));
    }
    info!("Migrations completed successfully");

    let db_pool = Arc::new(db_pool);
    let services =
        ServiceContainer::new(db_pool.clone(), settings).context("Failed to initialize services")?;

    info!(
        "Fetching transactions for account {}",
        services.settings().source_account()
    );
    let mut report = services.ingestion_interactor().run().await;

    db_pool.close().await;

    match report.error.take() {
        None => {
            info!("Ingestion finished: {}", report);
            Ok(())
        }
        Some(e) => {
            error!("Ingestion aborted: {} error=\"{}\"", report, e);
            Err(anyhow::Error::from(e).context(format!(
                "Ingestion aborted after {} processed record(s)",
                report.processed()
            )))
        }
    }
}
