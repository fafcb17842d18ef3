use serde::Serialize;

use crate::model::PlaceRow;

/// A WGS84 point. Both components are always finite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        if latitude.is_finite() && longitude.is_finite() {
            Some(Self {
                latitude,
                longitude,
            })
        } else {
            None
        }
    }

    /// Reads the structured latitude/longitude columns of a venue.
    pub fn from_place(place: &PlaceRow) -> Option<Self> {
        Self::new(place.latitude?, place.longitude?)
    }
}

/// Parses the legacy `"lat,lng"` text encoding.
///
/// Returns `None` for anything other than exactly two finite numbers.
pub fn parse_location(text: &str) -> Option<Coordinates> {
    let mut parts = text.split(',');
    let latitude = parts.next()?.trim().parse::<f64>().ok()?;
    let longitude = parts.next()?.trim().parse::<f64>().ok()?;
    if parts.next().is_some() {
        return None;
    }

    let coordinates = Coordinates::new(latitude, longitude);
    if coordinates.is_none() {
        tracing::debug!(location = text, "dropping non-finite location");
    }
    coordinates
}
