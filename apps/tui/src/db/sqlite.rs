use market_core::query::{EDITIONS_TABLE, PLACES_TABLE};
use market_core::{
    EditionFilter, EditionRow, Embed, MarketSource, PlaceRow, QueryError, RecordId,
};
use sqlx::SqlitePool;

use crate::db::queries::{
    select_active_places, select_edition, select_edition_makers, select_editions,
};

/// Market tables in a local SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    pool: SqlitePool,
}

impl SqliteSource {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

fn query_error(table: &str, error: sqlx::Error) -> QueryError {
    match error {
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) | sqlx::Error::ColumnNotFound(_) => {
            QueryError::decode(table, error)
        }
        other => QueryError::transport(table, other),
    }
}

impl MarketSource for SqliteSource {
    async fn editions(
        &self,
        filter: &EditionFilter,
        embed: Embed,
    ) -> Result<Vec<EditionRow>, QueryError> {
        let records = select_editions(&self.pool, filter)
            .await
            .map_err(|e| query_error(EDITIONS_TABLE, e))?;

        Ok(records
            .into_iter()
            .map(|record| {
                let mut row = record.into_row(Vec::new());
                if embed == Embed::Market {
                    row.location = None;
                }
                row
            })
            .collect())
    }

    async fn edition_detail(&self, id: &RecordId) -> Result<Option<EditionRow>, QueryError> {
        // Local ids are integers; anything else cannot exist here.
        let Ok(edition_id) = id.as_str().parse::<i64>() else {
            return Ok(None);
        };

        let Some(record) = select_edition(&self.pool, edition_id)
            .await
            .map_err(|e| query_error(EDITIONS_TABLE, e))?
        else {
            return Ok(None);
        };

        let makers = select_edition_makers(&self.pool, edition_id)
            .await
            .map_err(|e| query_error("market_edition_makers", e))?;
        Ok(Some(record.into_row(makers)))
    }

    async fn active_places(&self) -> Result<Vec<PlaceRow>, QueryError> {
        let places = select_active_places(&self.pool)
            .await
            .map_err(|e| query_error(PLACES_TABLE, e))?;
        Ok(places.into_iter().map(PlaceRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_db::{day, setup_test_db};
    use market_core::source::{load_active_editions, load_detail, load_list, load_map};
    use market_core::{DateWindow, UNKNOWN_MARKET};

    #[tokio::test]
    async fn map_markers_need_an_active_venue() -> Result<(), Box<dyn std::error::Error>> {
        let source = SqliteSource::new(setup_test_db().await?);
        let window = DateWindow::new(day("2024-12-01"), day("2025-02-28"));

        let markers = load_map(&source, window).await?;

        let names: Vec<&str> = markers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Winter Edition", "Month End"]);
        assert_eq!(markers[0].market_name, "Jean-Talon");
        assert!((markers[0].location.latitude - 45.5365).abs() < 1e-9);
        Ok(())
    }

    #[tokio::test]
    async fn list_uses_placeholder_for_missing_market() -> Result<(), Box<dyn std::error::Error>> {
        let source = SqliteSource::new(setup_test_db().await?);

        let editions = load_list(&source).await?;

        assert_eq!(editions.len(), 4);
        let orphan = editions
            .iter()
            .find(|e| e.edition_name == "Orphan Edition")
            .ok_or("orphan edition missing")?;
        assert_eq!(orphan.market_name, UNKNOWN_MARKET);
        Ok(())
    }

    #[tokio::test]
    async fn detail_carries_makers() -> Result<(), Box<dyn std::error::Error>> {
        let source = SqliteSource::new(setup_test_db().await?);

        let details = load_detail(&source, &RecordId::from(1))
            .await?
            .ok_or("edition 1 missing")?;

        assert_eq!(details.market_name, "Jean-Talon");
        assert_eq!(details.makers.len(), 2);
        let bee = details
            .makers
            .iter()
            .find(|m| m.name == "Bee Happy")
            .ok_or("maker missing")?;
        assert_eq!(
            bee.social_url().as_deref(),
            Some("https://instagram.com/beehappy")
        );
        Ok(())
    }

    #[tokio::test]
    async fn unknown_or_malformed_ids_are_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let source = SqliteSource::new(setup_test_db().await?);

        assert!(load_detail(&source, &RecordId::from(404)).await?.is_none());
        assert!(load_detail(&source, &RecordId::from("abc")).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn active_editions_parse_legacy_locations() -> Result<(), Box<dyn std::error::Error>> {
        let source = SqliteSource::new(setup_test_db().await?);

        let located = load_active_editions(&source, day("2025-01-01")).await?;

        assert_eq!(located.len(), 1);
        assert_eq!(located[0].edition.edition_name, "Winter Edition");
        Ok(())
    }
}
