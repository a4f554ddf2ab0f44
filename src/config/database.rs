use bson::doc;
use mongodb::{options::ClientOptions, Client, Database};
use std::{env, fmt};
use thiserror::Error;
use tokio::task::JoinHandle;
use validator::Validate;

const DEFAULT_DATABASE_NAME: &str = "dbconnect";

/// Exit status used by binaries when the database cannot be reached.
pub const FAILURE_EXIT_CODE: i32 = 1;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("DATABASE_URL must be set")]
    MissingUrl,
    #[error("Invalid database configuration: {0}")]
    InvalidConfig(#[from] validator::ValidationErrors),
    #[error("{0}")]
    Connection(#[from] mongodb::error::Error),
}

#[derive(Clone, Validate)]
pub struct DatabaseConfig {
    #[validate(length(min = 1, message = "connection string must not be empty"))]
    pub url: String,
    /// Used only when the connection string names no default database.
    #[validate(length(min = 1, max = 63))]
    pub database_name: String,
    #[validate(length(min = 1))]
    pub app_name: Option<String>,
}

// The connection string may carry credentials.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("database_name", &self.database_name)
            .field("app_name", &self.app_name)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            app_name: None,
        }
    }

    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn from_env() -> Result<Self, DatabaseError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatabaseError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = lookup("DATABASE_URL").ok_or(DatabaseError::MissingUrl)?;
        let mut config = Self::new(url);

        // `KEY=` in a `.env` file means unset.
        let optional = |key: &str| lookup(key).filter(|value| !value.is_empty());

        if let Some(name) = optional("DATABASE_NAME") {
            config.database_name = name;
        }
        config.app_name = optional("DATABASE_APP_NAME");

        Ok(config)
    }
}

/// Connects and waits for the server to answer a `ping` before handing back
/// the database. Building the client alone does not contact the server.
pub async fn connect(config: &DatabaseConfig) -> Result<Database, DatabaseError> {
    config.validate()?;

    tracing::debug!(database = %config.database_name, "Connecting to database");

    let mut options = ClientOptions::parse(config.url.as_str()).await?;
    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }
    let default_database = options.default_database.clone();

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await?;

    let db_name = default_database.unwrap_or_else(|| config.database_name.clone());
    let db = client.database(&db_name);

    tracing::info!(database = %db_name, "Database Connection established");

    Ok(db)
}

/// Runs [`connect`] as a background task. The caller may await the handle or
/// drop it.
pub fn spawn_connect(config: DatabaseConfig) -> JoinHandle<Result<Database, DatabaseError>> {
    tokio::spawn(async move { connect(&config).await })
}
