use market_core::EditionFilter;
use sqlx::{query_as, query_scalar, QueryBuilder, Sqlite, SqlitePool};

use crate::db::models::{EditionRecord, MakerRecord, PlaceRecord};

const EDITION_SELECT: &str = "SELECT e.id, e.market_id, e.name, e.start_date, e.end_date, \
     e.is_active, e.place_id, e.location, \
     m.id AS joined_market_id, m.name AS market_name, m.description AS market_description \
     FROM market_editions e LEFT JOIN markets m ON m.id = e.market_id";

/// Retrieves editions matching `filter`, joined with their market.
///
/// Date bounds compare calendar days, so timestamps stored in the date
/// columns still match on the day they fall on.
pub async fn select_editions(
    pool: &SqlitePool,
    filter: &EditionFilter,
) -> Result<Vec<EditionRecord>, sqlx::Error> {
    let mut builder = QueryBuilder::<Sqlite>::new(EDITION_SELECT);
    builder.push(" WHERE 1 = 1");

    if filter.active_only {
        builder.push(" AND e.is_active = 1");
    }
    if let Some(window) = filter.starts_within {
        builder
            .push(" AND date(e.start_date) >= ")
            .push_bind(window.start().to_string())
            .push(" AND date(e.start_date) <= ")
            .push_bind(window.end().to_string());
    }
    if let Some(day) = filter.ends_on_or_after {
        builder
            .push(" AND date(e.end_date) >= ")
            .push_bind(day.to_string());
    }

    if filter.order_by_start {
        builder.push(" ORDER BY e.start_date ASC, e.id ASC");
    } else {
        builder.push(" ORDER BY e.id ASC");
    }

    builder
        .build_query_as::<EditionRecord>()
        .fetch_all(pool)
        .await
}

/// Retrieves a single edition by ID
pub async fn select_edition(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<EditionRecord>, sqlx::Error> {
    query_as::<_, EditionRecord>(&format!("{EDITION_SELECT} WHERE e.id = ? LIMIT 1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Makers registered for an edition, by name
pub async fn select_edition_makers(
    pool: &SqlitePool,
    edition_id: i64,
) -> Result<Vec<MakerRecord>, sqlx::Error> {
    query_as::<_, MakerRecord>(
        "SELECT mk.id, mk.name, mk.description, mk.website, mk.social_media
         FROM market_edition_makers link
         JOIN makers mk ON mk.id = link.maker_id
         WHERE link.market_edition_id = ?
         ORDER BY mk.name ASC",
    )
    .bind(edition_id)
    .fetch_all(pool)
    .await
}

pub async fn select_active_places(pool: &SqlitePool) -> Result<Vec<PlaceRecord>, sqlx::Error> {
    query_as::<_, PlaceRecord>(
        "SELECT id, name, is_active, latitude, longitude FROM places WHERE is_active = 1 ORDER BY id",
    )
    .fetch_all(pool)
    .await
}

pub async fn count_editions(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    query_scalar("SELECT COUNT(*) FROM market_editions")
        .fetch_one(pool)
        .await
}
