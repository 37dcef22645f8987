//! Server configuration
//!
//! Layered sources, later entries win: built-in defaults, an optional
//! `config/default` file, then `DOCKET_`-prefixed environment variables
//! (`DOCKET_SERVER__PORT=8080`).

use config::{Config as ConfigSource, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub index: IndexConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Maximum request body size in bytes.
    pub max_request_body_size: usize,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the document search index, e.g. `http://localhost:9200`.
    pub url: String,
    /// Index holding the legal document corpus.
    pub index: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        // Best-effort .env loading; absence is not an error.
        dotenvy::dotenv().ok();

        ConfigSource::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.max_request_body_size", 1_048_576)?
            .set_default("server.cors_origins", Vec::<String>::new())?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 10)?
            .set_default("index.url", "http://localhost:9200")?
            .set_default("index.index", "docs_search")?
            .set_default("index.timeout_secs", 30)?
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("DOCKET").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.url.is_empty() {
            return Err("database.url must be set".to_string());
        }
        if self.index.url.is_empty() {
            return Err("index.url must be set".to_string());
        }
        if self.index.index.is_empty() {
            return Err("index.index must be set".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("database.max_connections must be at least 1".to_string());
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
