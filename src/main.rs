use dbconnect::config::{
    database::{self, DatabaseConfig, DatabaseError, FAILURE_EXIT_CODE},
    logging,
};
use mongodb::Database;

async fn bootstrap() -> Result<Database, DatabaseError> {
    let config = DatabaseConfig::from_env()?;
    database::connect(&config).await
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    let db = match bootstrap().await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Database Connection error: {}", e);
            std::process::exit(FAILURE_EXIT_CODE);
        }
    };

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }

    tracing::info!("Shutting down database client");
    db.client().clone().shutdown().await;
}
