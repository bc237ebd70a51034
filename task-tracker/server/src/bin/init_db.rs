//! One-shot bootstrap that creates the task schema and exits.

use task_tracker_server::{config::Config, database};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let config = Config::from_env()?;

    tracing::info!("Connecting to the database");
    let db = database::connect(&config).await?;

    if let Err(err) = database::ensure_schema(&db).await {
        tracing::error!("Failed to create tables, check DATABASE_URL: {}", err);
        return Err(err.into());
    }
    tracing::info!("Tables created");

    db.close().await?;
    Ok(())
}
