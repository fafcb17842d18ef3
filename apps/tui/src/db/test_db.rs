use chrono::NaiveDate;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::db::migrations::{
    insert_edition, insert_maker, insert_market, insert_place, link_maker, setup_database,
};
use crate::db::models::{NewEdition, NewMaker, NewMarket, NewPlace};

pub fn day(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap_or_default()
}

/// In-memory database with a fixed dataset around January 2025.
///
/// A single connection, since every `:memory:` connection is its own
/// database.
pub async fn setup_test_db() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    setup_database(&pool).await?;

    let jean_talon = insert_market(
        &pool,
        &NewMarket {
            name: "Jean-Talon".to_string(),
            description: Some("Open-air market in Little Italy".to_string()),
        },
    )
    .await?;
    let atwater = insert_market(
        &pool,
        &NewMarket {
            name: "Atwater".to_string(),
            description: None,
        },
    )
    .await?;

    let little_italy = insert_place(&pool, &place("Little Italy", 45.5365, -73.6147, true)).await?;
    let canal = insert_place(&pool, &place("Lachine Canal", 45.4797, -73.5776, true)).await?;
    let closed = insert_place(&pool, &place("Closed Hall", 45.51, -73.60, false)).await?;

    let bee_happy = insert_maker(
        &pool,
        &NewMaker {
            name: "Bee Happy".to_string(),
            description: Some("Raw honey".to_string()),
            website: None,
            social_media: Some("@beehappy".to_string()),
        },
    )
    .await?;
    let argile = insert_maker(
        &pool,
        &NewMaker {
            name: "Atelier Argile".to_string(),
            description: None,
            website: Some("https://argile.example".to_string()),
            social_media: None,
        },
    )
    .await?;
    insert_maker(
        &pool,
        &NewMaker {
            name: "Unlinked".to_string(),
            description: None,
            website: None,
            social_media: None,
        },
    )
    .await?;

    let winter = insert_edition(
        &pool,
        &NewEdition {
            location: Some("45.5365,-73.6147".to_string()),
            ..edition(Some(jean_talon), "Winter Edition", "2025-01-15", "2025-01-16", Some(little_italy))
        },
    )
    .await?;
    insert_edition(
        &pool,
        &edition(Some(atwater), "Month End", "2025-01-31", "2025-02-01", Some(canal)),
    )
    .await?;
    insert_edition(
        &pool,
        &edition(Some(jean_talon), "Holiday Market", "2024-12-20", "2024-12-23", Some(closed)),
    )
    .await?;
    insert_edition(
        &pool,
        &NewEdition {
            is_active: false,
            ..edition(Some(atwater), "Cancelled", "2025-01-20", "2025-01-20", Some(canal))
        },
    )
    .await?;
    insert_edition(
        &pool,
        &NewEdition {
            location: Some("not a location".to_string()),
            ..edition(None, "Orphan Edition", "2025-02-10", "2025-02-10", None)
        },
    )
    .await?;

    link_maker(&pool, winter, bee_happy).await?;
    link_maker(&pool, winter, argile).await?;

    Ok(pool)
}

fn place(name: &str, latitude: f64, longitude: f64, is_active: bool) -> NewPlace {
    NewPlace {
        name: name.to_string(),
        latitude,
        longitude,
        is_active,
    }
}

fn edition(
    market_id: Option<i64>,
    name: &str,
    start_date: &str,
    end_date: &str,
    place_id: Option<i64>,
) -> NewEdition {
    NewEdition {
        market_id,
        name: name.to_string(),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        is_active: true,
        place_id,
        location: None,
    }
}
