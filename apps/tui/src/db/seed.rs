use chrono::{Days, NaiveDate};
use sqlx::SqlitePool;

use crate::db::migrations::{
    insert_edition, insert_maker, insert_market, insert_place, link_maker,
};
use crate::db::models::{NewEdition, NewMaker, NewMarket, NewPlace};

struct SampleMarket {
    name: &'static str,
    description: &'static str,
    venue: &'static str,
    latitude: f64,
    longitude: f64,
    // (edition name, start offset in days, length in days)
    editions: &'static [(&'static str, i64, u64)],
}

const SAMPLE_MARKETS: &[SampleMarket] = &[
    SampleMarket {
        name: "Marché Jean-Talon",
        description: "Open-air farmers market in Little Italy",
        venue: "Place du Marché-du-Nord",
        latitude: 45.5365,
        longitude: -73.6147,
        editions: &[("Harvest Weekend", -40, 2), ("Maple Days", 3, 2), ("Night Market", 24, 1)],
    },
    SampleMarket {
        name: "Marché Atwater",
        description: "Art deco hall by the Lachine Canal",
        venue: "Atwater Hall",
        latitude: 45.4797,
        longitude: -73.5776,
        editions: &[("Canal Craft Fair", -9, 1), ("Winter Makers", 10, 3)],
    },
    SampleMarket {
        name: "Marché Maisonneuve",
        description: "Neighbourhood market in Hochelaga",
        venue: "Place Simon-Valois",
        latitude: 45.5535,
        longitude: -73.5405,
        editions: &[("Local Pantry", 0, 1), ("Spring Preview", 45, 2)],
    },
    SampleMarket {
        name: "Old Port Artisans",
        description: "Seasonal artisan stalls on the quays",
        venue: "Quai de l'Horloge",
        latitude: 45.5075,
        longitude: -73.5530,
        editions: &[("Quay Market", 17, 4)],
    },
];

const SAMPLE_MAKERS: &[(&str, &str, Option<&str>, Option<&str>)] = &[
    ("Bee Happy Apiary", "Raw honey and beeswax candles", None, Some("@beehappy")),
    (
        "Ferme des Quatre Temps",
        "Organic vegetables from the Eastern Townships",
        Some("https://fermequatretemps.example"),
        None,
    ),
    ("Atelier Argile", "Hand-thrown stoneware", None, Some("@atelier.argile")),
    ("Boulangerie du Coin", "Sourdough and viennoiseries", None, None),
];

fn offset(today: NaiveDate, days: i64) -> NaiveDate {
    let shifted = if days >= 0 {
        today.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        today.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.unwrap_or(today)
}

/// Fills an empty database with Montreal sample markets whose editions sit
/// around `today`, so every view has something to show. Returns the number of
/// editions written.
pub async fn seed_sample_data(pool: &SqlitePool, today: NaiveDate) -> Result<usize, sqlx::Error> {
    let mut maker_ids = Vec::with_capacity(SAMPLE_MAKERS.len());
    for (name, description, website, social_media) in SAMPLE_MAKERS {
        let id = insert_maker(
            pool,
            &NewMaker {
                name: (*name).to_string(),
                description: Some((*description).to_string()),
                website: website.map(str::to_string),
                social_media: social_media.map(str::to_string),
            },
        )
        .await?;
        maker_ids.push(id);
    }

    let mut written = 0;
    for (index, sample) in SAMPLE_MARKETS.iter().enumerate() {
        let market_id = insert_market(
            pool,
            &NewMarket {
                name: sample.name.to_string(),
                description: Some(sample.description.to_string()),
            },
        )
        .await?;
        let place_id = insert_place(
            pool,
            &NewPlace {
                name: sample.venue.to_string(),
                latitude: sample.latitude,
                longitude: sample.longitude,
                is_active: true,
            },
        )
        .await?;

        for &(name, start_offset, length) in sample.editions {
            let start = offset(today, start_offset);
            let end = start
                .checked_add_days(Days::new(length.saturating_sub(1)))
                .unwrap_or(start);
            let edition_id = insert_edition(
                pool,
                &NewEdition {
                    market_id: Some(market_id),
                    name: name.to_string(),
                    start_date: start.to_string(),
                    end_date: end.to_string(),
                    is_active: true,
                    place_id: Some(place_id),
                    location: Some(format!("{},{}", sample.latitude, sample.longitude)),
                },
            )
            .await?;

            // Rotate two makers per edition.
            for step in 0..2 {
                if let Some(maker_id) = maker_ids.get((index + written + step) % maker_ids.len()) {
                    link_maker(pool, edition_id, *maker_id).await?;
                }
            }
            written += 1;
        }
    }

    tracing::info!(editions = written, "seeded sample markets");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::setup_database;
    use crate::db::queries::count_editions;
    use crate::db::sqlite::SqliteSource;
    use market_core::dates::partition_by_start;
    use market_core::source::load_list;
    use sqlx::sqlite::SqlitePoolOptions;

    #[tokio::test]
    async fn seeded_data_has_upcoming_and_past_editions() -> Result<(), Box<dyn std::error::Error>>
    {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        setup_database(&pool).await?;
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).ok_or("bad date")?;

        let written = seed_sample_data(&pool, today).await?;
        assert_eq!(i64::try_from(written)?, count_editions(&pool).await?);

        let editions = load_list(&SqliteSource::new(pool)).await?;
        let split = partition_by_start(&editions, today, |e| e.starts_on());
        assert_eq!(split.past.len(), 2);
        assert_eq!(split.upcoming.len(), written - 2);
        Ok(())
    }

    #[test]
    fn negative_offsets_go_back_in_time() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap_or_default();
        assert_eq!(offset(today, -1), NaiveDate::from_ymd_opt(2025, 2, 28).unwrap_or_default());
        assert_eq!(offset(today, 0), today);
    }
}
