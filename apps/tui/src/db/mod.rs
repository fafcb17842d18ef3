pub mod migrations;
pub mod models;
pub mod queries;
pub mod rest;
pub mod seed;
pub mod sqlite;
#[cfg(test)]
pub mod test_db;

use color_eyre::Result;
use market_core::{EditionFilter, EditionRow, Embed, MarketSource, PlaceRow, QueryError, RecordId};

pub use migrations::{create_database_pool, setup_database};
pub use rest::RestSource;
pub use seed::seed_sample_data;
pub use sqlite::SqliteSource;

use crate::config::BackendConfig;

/// The configured data source. A concrete enum keeps the loader futures
/// `Send`, so they can run on spawned tasks.
#[derive(Debug, Clone)]
pub enum Backend {
    Rest(RestSource),
    Sqlite(SqliteSource),
}

impl Backend {
    pub const fn describe(&self) -> &'static str {
        match self {
            Self::Rest(_) => "hosted",
            Self::Sqlite(_) => "sqlite",
        }
    }
}

/// Builds the backend named by the configuration, opening the local database
/// when one is configured.
pub async fn connect(config: &BackendConfig) -> Result<Backend> {
    match config {
        BackendConfig::Rest { url, anon_key } => {
            tracing::info!(%url, "using hosted backend");
            Ok(Backend::Rest(RestSource::new(url.clone(), anon_key.clone())))
        }
        BackendConfig::Sqlite { database_url } => {
            let pool = create_database_pool(database_url).await?;
            Ok(Backend::Sqlite(SqliteSource::new(pool)))
        }
    }
}

impl MarketSource for Backend {
    async fn editions(
        &self,
        filter: &EditionFilter,
        embed: Embed,
    ) -> Result<Vec<EditionRow>, QueryError> {
        match self {
            Self::Rest(source) => source.editions(filter, embed).await,
            Self::Sqlite(source) => source.editions(filter, embed).await,
        }
    }

    async fn edition_detail(&self, id: &RecordId) -> Result<Option<EditionRow>, QueryError> {
        match self {
            Self::Rest(source) => source.edition_detail(id).await,
            Self::Sqlite(source) => source.edition_detail(id).await,
        }
    }

    async fn active_places(&self) -> Result<Vec<PlaceRow>, QueryError> {
        match self {
            Self::Rest(source) => source.active_places().await,
            Self::Sqlite(source) => source.active_places().await,
        }
    }
}
