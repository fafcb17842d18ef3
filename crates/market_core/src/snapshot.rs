//! A [`MarketSource`] over a JSON export of the tables, used when no backend
//! is configured and in tests.

use serde::{Deserialize, Serialize};

use crate::error::QueryError;
use crate::model::{null_as_default, EditionRow, PlaceRow, RecordId};
use crate::query::{EditionFilter, Embed, EDITIONS_TABLE};
use crate::source::MarketSource;

/// Editions carry their embedded market and maker links, exactly as the
/// detail query returns them.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Snapshot {
    #[serde(default, deserialize_with = "null_as_default")]
    pub editions: Vec<EditionRow>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub places: Vec<PlaceRow>,
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    snapshot: Snapshot,
}

impl SnapshotSource {
    pub const fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn from_json(json: &str) -> Result<Self, QueryError> {
        serde_json::from_str(json)
            .map(Self::new)
            .map_err(|error| QueryError::decode(EDITIONS_TABLE, error))
    }
}

impl MarketSource for SnapshotSource {
    async fn editions(
        &self,
        filter: &EditionFilter,
        embed: Embed,
    ) -> Result<Vec<EditionRow>, QueryError> {
        let mut rows = filter.apply(&self.snapshot.editions);
        if embed == Embed::Market {
            for row in &mut rows {
                row.market_edition_makers.clear();
                row.location = None;
            }
        }
        Ok(rows)
    }

    async fn edition_detail(&self, id: &RecordId) -> Result<Option<EditionRow>, QueryError> {
        Ok(self
            .snapshot
            .editions
            .iter()
            .find(|row| &row.id == id)
            .cloned())
    }

    async fn active_places(&self) -> Result<Vec<PlaceRow>, QueryError> {
        Ok(self
            .snapshot
            .places
            .iter()
            .filter(|place| place.is_active)
            .cloned()
            .collect())
    }
}
