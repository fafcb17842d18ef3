//! Raw rows as the backend returns them.
//!
//! These types mirror the PostgREST responses for `market_editions`, `places`
//! and the embedded `markets` / `makers` relations. They are deliberately
//! permissive: every optional column has a default, an explicit `null` is
//! read the same as a missing key, and to-one embeds go through [`Relation`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Backend identifier. Rows carry either integer or UUID keys depending on the
/// table, so both JSON numbers and strings are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(value) => Self(value.to_string()),
            RawId::Text(value) => Self(value),
        })
    }
}

/// A to-one embed. Depending on how the foreign key is declared the backend
/// returns the related row either as an object or as a (usually one element)
/// array. A `null` embed is represented by the surrounding `Option`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Relation<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Relation<T> {
    /// First related row, if any.
    pub fn first(&self) -> Option<&T> {
        match self {
            Self::Many(rows) => rows.first(),
            Self::One(row) => Some(row),
        }
    }
}

/// Resolves an optional embed to its first row.
pub fn resolve_first<T>(relation: Option<&Relation<T>>) -> Option<&T> {
    relation.and_then(Relation::first)
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MarketRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MakerRow {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub social_media: Option<String>,
}

/// One row of the `market_edition_makers` association with its maker embedded.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct MakerLink {
    #[serde(default)]
    pub maker: Option<Relation<MakerRow>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct EditionRow {
    pub id: RecordId,
    #[serde(default)]
    pub market_id: Option<RecordId>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub start_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub end_date: String,
    #[serde(default = "active_by_default", deserialize_with = "null_as_active")]
    pub is_active: bool,
    #[serde(default)]
    pub place_id: Option<RecordId>,
    /// Legacy `"lat,lng"` column kept on older editions.
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub market: Option<Relation<MarketRef>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub market_edition_makers: Vec<MakerLink>,
}

// Selects that omit `is_active` are always filtered on it.
const fn active_by_default() -> bool {
    true
}

/// PostgREST sends `null` for empty columns rather than leaving them out.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_active<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or_else(active_by_default))
}

impl EditionRow {
    pub fn market(&self) -> Option<&MarketRef> {
        resolve_first(self.market.as_ref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlaceRow {
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "active_by_default", deserialize_with = "null_as_active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
}

/// Numeric columns may come back as JSON numbers or, for `numeric` types, as
/// strings. Anything unparseable becomes `None` instead of failing the row.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawNumber {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match Option::<RawNumber>::deserialize(deserializer)? {
        Some(RawNumber::Number(value)) => Some(value),
        Some(RawNumber::Text(text)) => text.trim().parse().ok(),
        Some(RawNumber::Other(_)) | None => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_id_accepts_numbers_and_strings() {
        let numeric: RecordId = serde_json::from_value(json!(42)).unwrap();
        let text: RecordId = serde_json::from_value(json!("b1c2")).unwrap();

        assert_eq!(numeric.as_str(), "42");
        assert_eq!(text.as_str(), "b1c2");
    }

    #[test]
    fn relation_resolves_object_and_array_shapes() {
        let object: EditionRow = serde_json::from_value(json!({
            "id": 1,
            "name": "Winter",
            "start_date": "2025-01-15",
            "end_date": "2025-01-16",
            "market": { "name": "Atwater", "description": null }
        }))
        .unwrap();
        let array: EditionRow = serde_json::from_value(json!({
            "id": 1,
            "name": "Winter",
            "start_date": "2025-01-15",
            "end_date": "2025-01-16",
            "market": [{ "name": "Atwater", "description": null }]
        }))
        .unwrap();

        assert_eq!(object.market().and_then(|m| m.name.as_deref()), Some("Atwater"));
        assert_eq!(array.market().and_then(|m| m.name.as_deref()), Some("Atwater"));
    }

    #[test]
    fn null_and_empty_relations_resolve_to_none() {
        let null_market: EditionRow = serde_json::from_value(json!({
            "id": 1, "name": "Winter", "start_date": "2025-01-15", "end_date": "2025-01-16",
            "market": null
        }))
        .unwrap();
        let empty_market: EditionRow = serde_json::from_value(json!({
            "id": 1, "name": "Winter", "start_date": "2025-01-15", "end_date": "2025-01-16",
            "market": []
        }))
        .unwrap();

        assert!(null_market.market().is_none());
        assert!(empty_market.market().is_none());
        assert!(null_market.is_active);
    }

    #[test]
    fn null_columns_read_as_missing() {
        let row: EditionRow = serde_json::from_value(json!({
            "id": 1, "name": null, "start_date": "2025-01-15", "end_date": null,
            "is_active": null, "market": null, "market_edition_makers": null
        }))
        .unwrap();
        let place: PlaceRow = serde_json::from_value(json!({
            "id": "p1", "is_active": null, "latitude": 45.5, "longitude": -73.6
        }))
        .unwrap();

        assert_eq!(row.name, "");
        assert_eq!(row.start_date, "2025-01-15");
        assert_eq!(row.end_date, "");
        assert!(row.is_active);
        assert!(row.market_edition_makers.is_empty());
        assert!(place.is_active);
    }

    #[test]
    fn place_coordinates_are_parsed_leniently() {
        let place: PlaceRow = serde_json::from_value(json!({
            "id": "p1", "is_active": true, "latitude": "45.5", "longitude": -73.6
        }))
        .unwrap();
        let broken: PlaceRow = serde_json::from_value(json!({
            "id": "p2", "latitude": "north", "longitude": null
        }))
        .unwrap();

        assert_eq!(place.latitude, Some(45.5));
        assert_eq!(place.longitude, Some(-73.6));
        assert_eq!(broken.latitude, None);
        assert_eq!(broken.longitude, None);
    }
}
