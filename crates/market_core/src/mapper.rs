//! Raw rows to view models.
//!
//! Every function here is total: any row the data layer can produce maps to a
//! valid view model. Missing markets fall back to [`UNKNOWN_MARKET`], missing
//! makers are skipped and unresolvable coordinates drop the row from map
//! output only.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::coords::{parse_location, Coordinates};
use crate::dates::parse_day;
use crate::model::{resolve_first, EditionRow, MakerRow, PlaceRow, RecordId};

pub const UNKNOWN_MARKET: &str = "Unknown Market";

/// Flat edition shape shared by the list and calendar views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditionSummary {
    pub id: RecordId,
    pub edition_name: String,
    pub market_name: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
}

impl EditionSummary {
    pub fn from_row(row: &EditionRow) -> Self {
        let (market_name, description) = market_fields(row);
        Self {
            id: row.id.clone(),
            edition_name: row.name.clone(),
            market_name,
            description,
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
            is_active: row.is_active,
        }
    }

    pub fn starts_on(&self) -> Option<NaiveDate> {
        parse_day(&self.start_date)
    }

    pub fn ends_on(&self) -> Option<NaiveDate> {
        parse_day(&self.end_date)
    }
}

/// Market name and description for a row, with the placeholder applied.
fn market_fields(row: &EditionRow) -> (String, Option<String>) {
    let market = row.market();
    let name = market
        .and_then(|market| non_empty(market.name.as_deref()))
        .unwrap_or(UNKNOWN_MARKET)
        .to_string();
    let description = market
        .and_then(|market| non_empty(market.description.as_deref()))
        .map(str::to_string);
    (name, description)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MakerView {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub social_media: Option<String>,
}

impl MakerView {
    pub fn from_row(row: &MakerRow) -> Self {
        Self {
            id: row.id.clone(),
            name: row.name.clone().unwrap_or_default(),
            description: non_empty(row.description.as_deref()).map(str::to_string),
            website: non_empty(row.website.as_deref()).map(str::to_string),
            social_media: non_empty(row.social_media.as_deref()).map(str::to_string),
        }
    }

    /// Instagram profile link for the social handle.
    pub fn social_url(&self) -> Option<String> {
        self.social_media
            .as_deref()
            .map(|handle| format!("https://instagram.com/{}", handle.replacen('@', "", 1)))
    }
}

/// Everything the detail modal shows for one edition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketDetails {
    pub id: RecordId,
    pub edition_name: String,
    pub market_name: String,
    pub description: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub makers: Vec<MakerView>,
}

impl MarketDetails {
    pub fn from_row(row: &EditionRow) -> Self {
        let (market_name, description) = market_fields(row);
        let makers = row
            .market_edition_makers
            .iter()
            .filter_map(|link| resolve_first(link.maker.as_ref()))
            .map(MakerView::from_row)
            .collect();

        Self {
            id: row.id.clone(),
            edition_name: row.name.clone(),
            market_name,
            description,
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
            makers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub id: RecordId,
    pub name: String,
    pub market_name: String,
    pub description: Option<String>,
    pub location: Coordinates,
    pub start_date: String,
    pub end_date: String,
}

impl MapMarker {
    pub fn new(row: &EditionRow, location: Coordinates) -> Self {
        let (market_name, description) = market_fields(row);
        Self {
            id: row.id.clone(),
            name: row.name.clone(),
            market_name,
            description,
            location,
            start_date: row.start_date.clone(),
            end_date: row.end_date.clone(),
        }
    }
}

/// Joins editions to their venues and keeps only those with usable
/// coordinates.
pub fn map_markers(editions: &[EditionRow], places: &[PlaceRow]) -> Vec<MapMarker> {
    let venues: HashMap<&RecordId, Coordinates> = places
        .iter()
        .filter_map(|place| Coordinates::from_place(place).map(|point| (&place.id, point)))
        .collect();

    editions
        .iter()
        .filter_map(|edition| {
            let location = edition
                .place_id
                .as_ref()
                .and_then(|place_id| venues.get(place_id).copied());
            if location.is_none() {
                tracing::debug!(edition = %edition.id, "no venue coordinates, skipping marker");
            }
            location.map(|location| MapMarker::new(edition, location))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventProps {
    pub market_name: String,
    pub edition_name: String,
    pub description: Option<String>,
}

/// Calendar widget event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub id: RecordId,
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "extendedProps")]
    pub extended_props: EventProps,
}

impl CalendarEvent {
    pub fn starts_on(&self) -> Option<NaiveDate> {
        parse_day(&self.start)
    }

    /// Last day the event covers; single-day when the end is missing or
    /// earlier than the start.
    pub fn ends_on(&self) -> Option<NaiveDate> {
        let start = self.starts_on()?;
        Some(parse_day(&self.end).map_or(start, |end| end.max(start)))
    }

    pub fn covers(&self, day: NaiveDate) -> bool {
        match (self.starts_on(), self.ends_on()) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => false,
        }
    }
}

impl From<&EditionSummary> for CalendarEvent {
    fn from(summary: &EditionSummary) -> Self {
        Self {
            id: summary.id.clone(),
            title: summary.edition_name.clone(),
            start: summary.start_date.clone(),
            end: summary.end_date.clone(),
            extended_props: EventProps {
                market_name: summary.market_name.clone(),
                edition_name: summary.edition_name.clone(),
                description: summary.description.clone(),
            },
        }
    }
}

/// An upcoming edition placed through its legacy `location` text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedEdition {
    pub edition: EditionSummary,
    pub coordinates: Coordinates,
}

pub fn locate_editions(rows: &[EditionRow]) -> Vec<LocatedEdition> {
    rows.iter()
        .filter_map(|row| {
            let coordinates = row.location.as_deref().and_then(parse_location)?;
            Some(LocatedEdition {
                edition: EditionSummary::from_row(row),
                coordinates,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MakerLink, MarketRef, Relation};
    use proptest::prelude::*;

    fn edition(id: i64, market: Option<Relation<MarketRef>>) -> EditionRow {
        EditionRow {
            id: RecordId::from(id),
            market_id: Some(RecordId::from(7)),
            name: "Winter Edition".to_string(),
            start_date: "2025-01-15".to_string(),
            end_date: "2025-01-17".to_string(),
            is_active: true,
            place_id: Some(RecordId::from("p1")),
            location: None,
            market,
            market_edition_makers: Vec::new(),
        }
    }

    fn atwater() -> MarketRef {
        MarketRef {
            name: Some("Atwater Market".to_string()),
            description: Some("Covered market by the canal".to_string()),
        }
    }

    fn place(id: &str, latitude: Option<f64>, longitude: Option<f64>) -> PlaceRow {
        PlaceRow {
            id: RecordId::from(id),
            name: None,
            is_active: true,
            latitude,
            longitude,
        }
    }

    #[test]
    fn missing_market_uses_placeholder() {
        for market in [None, Some(Relation::Many(Vec::new()))] {
            let summary = EditionSummary::from_row(&edition(1, market));
            assert_eq!(summary.market_name, UNKNOWN_MARKET);
            assert_eq!(summary.description, None);
        }
    }

    #[test]
    fn empty_market_name_uses_placeholder() {
        let market = MarketRef {
            name: Some(String::new()),
            description: Some(String::new()),
        };
        let summary = EditionSummary::from_row(&edition(1, Some(Relation::One(market))));

        assert_eq!(summary.market_name, UNKNOWN_MARKET);
        assert_eq!(summary.description, None);
    }

    #[test]
    fn array_and_object_markets_map_identically() {
        let one = EditionSummary::from_row(&edition(1, Some(Relation::One(atwater()))));
        let many = EditionSummary::from_row(&edition(1, Some(Relation::Many(vec![atwater()]))));

        assert_eq!(one, many);
        assert_eq!(one.market_name, "Atwater Market");
    }

    #[test]
    fn details_skip_null_makers() {
        let mut row = edition(3, Some(Relation::One(atwater())));
        row.market_edition_makers = vec![
            MakerLink {
                maker: Some(Relation::One(MakerRow {
                    id: RecordId::from(10),
                    name: Some("Bee Happy Honey".to_string()),
                    description: None,
                    website: Some("https://beehappy.example".to_string()),
                    social_media: Some("@beehappy".to_string()),
                })),
            },
            MakerLink { maker: None },
        ];

        let details = MarketDetails::from_row(&row);

        assert_eq!(details.makers.len(), 1);
        assert_eq!(details.makers[0].name, "Bee Happy Honey");
        assert_eq!(
            details.makers[0].social_url().as_deref(),
            Some("https://instagram.com/beehappy")
        );
    }

    #[test]
    fn markers_require_a_resolvable_venue() {
        let mut without_place = edition(2, None);
        without_place.place_id = None;
        let mut unknown_place = edition(3, None);
        unknown_place.place_id = Some(RecordId::from("missing"));
        let mut broken_place = edition(4, None);
        broken_place.place_id = Some(RecordId::from("broken"));

        let editions = vec![edition(1, None), without_place, unknown_place, broken_place];
        let places = vec![
            place("p1", Some(45.5), Some(-73.57)),
            place("broken", Some(45.5), None),
        ];

        let markers = map_markers(&editions, &places);

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, RecordId::from(1));
        assert_eq!(markers[0].market_name, UNKNOWN_MARKET);
        assert_eq!(markers[0].location, Coordinates::new(45.5, -73.57).unwrap());
    }

    #[test]
    fn calendar_event_carries_extended_props() {
        let summary = EditionSummary::from_row(&edition(5, Some(Relation::One(atwater()))));
        let event = CalendarEvent::from(&summary);

        assert_eq!(event.title, "Winter Edition");
        assert_eq!(event.extended_props.market_name, "Atwater Market");
        assert!(event.covers(parse_day("2025-01-16").unwrap()));
        assert!(!event.covers(parse_day("2025-01-18").unwrap()));

        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("extendedProps").is_some());
    }

    #[test]
    fn located_editions_drop_unparseable_locations() {
        let mut placed = edition(1, None);
        placed.location = Some("45.50,-73.57".to_string());
        let mut garbled = edition(2, None);
        garbled.location = Some("downtown".to_string());

        let located = locate_editions(&[placed, garbled, edition(3, None)]);

        assert_eq!(located.len(), 1);
        assert_eq!(located[0].coordinates, Coordinates::new(45.50, -73.57).unwrap());
    }

    proptest! {
        #[test]
        fn mapping_is_idempotent(
            name in proptest::option::of(".{0,12}"),
            description in proptest::option::of(".{0,12}"),
            as_array in any::<bool>(),
        ) {
            let market = MarketRef { name, description };
            let relation = if as_array {
                Relation::Many(vec![market])
            } else {
                Relation::One(market)
            };
            let row = edition(9, Some(relation));

            prop_assert_eq!(EditionSummary::from_row(&row), EditionSummary::from_row(&row));
            prop_assert_eq!(MarketDetails::from_row(&row), MarketDetails::from_row(&row));
            prop_assert!(!EditionSummary::from_row(&row).market_name.trim().is_empty());
        }
    }
}
