//! The data access seam and the loaders each view runs through it.

use chrono::NaiveDate;

use crate::dates::DateWindow;
use crate::error::QueryError;
use crate::mapper::{
    locate_editions, map_markers, CalendarEvent, EditionSummary, LocatedEdition, MapMarker,
    MarketDetails,
};
use crate::model::{EditionRow, PlaceRow, RecordId};
use crate::query::{EditionFilter, Embed};

/// Read-only access to the market tables.
///
/// Implementations translate the filter into their own query language (or
/// apply it in memory) and return raw rows; mapping happens in the loaders
/// below.
#[allow(async_fn_in_trait)]
pub trait MarketSource {
    async fn editions(
        &self,
        filter: &EditionFilter,
        embed: Embed,
    ) -> Result<Vec<EditionRow>, QueryError>;

    /// One edition with its market and maker roster, if it exists.
    async fn edition_detail(&self, id: &RecordId) -> Result<Option<EditionRow>, QueryError>;

    async fn active_places(&self) -> Result<Vec<PlaceRow>, QueryError>;
}

pub async fn load_list<S: MarketSource>(source: &S) -> Result<Vec<EditionSummary>, QueryError> {
    let rows = source.editions(&EditionFilter::active(), Embed::Market).await?;
    Ok(rows.iter().map(EditionSummary::from_row).collect())
}

pub async fn load_calendar<S: MarketSource>(source: &S) -> Result<Vec<CalendarEvent>, QueryError> {
    let rows = source.editions(&EditionFilter::active(), Embed::Market).await?;
    Ok(rows
        .iter()
        .map(|row| CalendarEvent::from(&EditionSummary::from_row(row)))
        .collect())
}

/// Markers for active editions starting inside `window`.
pub async fn load_map<S: MarketSource>(
    source: &S,
    window: DateWindow,
) -> Result<Vec<MapMarker>, QueryError> {
    let places = source.active_places().await?;
    let rows = source
        .editions(&EditionFilter::starting_within(window), Embed::Market)
        .await?;
    let markers = map_markers(&rows, &places);
    tracing::debug!(
        editions = rows.len(),
        markers = markers.len(),
        from = %window.start(),
        to = %window.end(),
        "loaded map markers"
    );
    Ok(markers)
}

pub async fn load_detail<S: MarketSource>(
    source: &S,
    id: &RecordId,
) -> Result<Option<MarketDetails>, QueryError> {
    let row = source.edition_detail(id).await?;
    Ok(row.as_ref().map(MarketDetails::from_row))
}

/// Active editions that have not ended, placed through their `location`.
pub async fn load_active_editions<S: MarketSource>(
    source: &S,
    today: NaiveDate,
) -> Result<Vec<LocatedEdition>, QueryError> {
    let rows = source
        .editions(&EditionFilter::not_ended(today), Embed::AllColumns)
        .await?;
    Ok(locate_editions(&rows))
}
