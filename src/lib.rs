pub mod config;

pub use config::database::{connect, spawn_connect, DatabaseConfig, DatabaseError};
