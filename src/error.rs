//! Startup and infrastructure errors.

use thiserror::Error;

/// Errors that stop the process from serving: binding the listener, loading
/// configuration, reaching the database or migrating its schema.
///
/// Per-request failures are not `Error`s. They are rendered as HTTP
/// responses, see [`AppError`](crate::blogs::AppError).
#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address `{addr}`: {source}")]
    Addr {
        addr: String,
        source: std::net::AddrParseError,
    },

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
