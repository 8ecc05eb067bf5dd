use dotenvy::dotenv;
use expense_buddy::{
    bot,
    config::{database, household},
    core::member,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the household configuration
    let config = household::load_default_config()
        .inspect_err(|e| error!("Failed to load household configuration: {e}"))?;
    info!(
        members = config.members.len(),
        categories = config.categories.len(),
        "Loaded household configuration"
    );

    // 4. Connect and create tables
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;
    info!("Database initialized successfully.");

    // 5. Seed members and categories
    member::seed_household(&db, &config)
        .await
        .inspect_err(|e| error!("Failed to seed household: {e}"))?;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {e}"))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, db, config.rules).await
}
