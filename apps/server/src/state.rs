//! Shared application state

use crate::config::Config;
use crate::search::{IndexClient, SearchEngine};
use crate::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

/// Process-wide state: configuration, the relational pool, and the search
/// engine. Cloned into every handler; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: PgPool,
    pub search: Arc<SearchEngine<IndexClient>>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.database.max_connections)
            .connect(&config.database.url)
            .await
            .map_err(crate::Error::Database)?;

        let search = SearchEngine::new(IndexClient::new(&config.index)?);

        Ok(Self {
            config: Arc::new(config),
            pool,
            search: Arc::new(search),
        })
    }
}
