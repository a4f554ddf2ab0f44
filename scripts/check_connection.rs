//! Run with: cargo run --bin check_connection

use anyhow::Context;
use dbconnect::config::{database, logging};
use dbconnect::DatabaseConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init();

    let config = DatabaseConfig::from_env().context("Failed to load database configuration")?;

    println!("Connecting to MongoDB...");
    let db = database::connect(&config)
        .await
        .context("Database Connection error")?;
    println!("✓ Connected to database '{}'", db.name());

    println!("\nCollections:");
    let collections = db
        .list_collection_names()
        .await
        .context("Failed to list collections")?;
    if collections.is_empty() {
        println!("  (none)");
    }
    for name in collections {
        println!("  - {}", name);
    }

    println!("\n✓ Connection check complete!");
    Ok(())
}
