//! Application configuration.
//!
//! Sources, lowest priority first: built-in defaults, an optional TOML file
//! (`blogs.toml`, or the path in `BLOGS_CONFIG`), then environment variables
//! prefixed `BLOGS_` with `__` between sections, e.g.
//! `BLOGS_SERVER__PORT=8080` or `BLOGS_DATABASE__URL=postgres://…`.

use std::fmt;
use std::net::SocketAddr;

use serde::Deserialize;

use crate::error::Error;

/// Default config file, looked up without extension so `blogs.toml`,
/// `blogs.yaml` etc. are all accepted.
pub const DEFAULT_CONFIG_PATH: &str = "blogs";

/// Default request body cap: 1 MiB is far beyond any hand-written post.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub store: StoreConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Honour `_method` on POST requests so HTML forms can PUT and DELETE.
    pub method_override: bool,
    /// Largest request body accepted; bigger uploads get `413`.
    pub max_body_bytes: usize,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub backend: StoreBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` overrides it.
    pub filter: String,
}

impl Config {
    /// Loads from the file named by `BLOGS_CONFIG` (or [`DEFAULT_CONFIG_PATH`])
    /// plus the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("BLOGS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
        Self::load_from(&path)
    }

    /// Loads configuration from `config_path` (extension optional; a missing
    /// file is not an error).
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.method_override", true)?
            .set_default("server.max_body_bytes", DEFAULT_MAX_BODY_BYTES as i64)?
            .set_default("database.url", "postgres://localhost:5432/blog_app")?
            .set_default("database.max_connections", 5)?
            .set_default("database.connect_timeout_secs", 5)?
            .set_default("store.backend", "postgres")?
            .set_default("log.filter", "info")?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("BLOGS")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, Error> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse().map_err(|source| Error::Addr { addr, source })
    }
}
