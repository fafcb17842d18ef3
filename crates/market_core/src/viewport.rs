//! Map viewport constrained to the area the markets live in.

use serde::Serialize;

use crate::coords::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl GeoBounds {
    pub fn contains(&self, point: Coordinates) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }

    pub fn center(&self) -> Coordinates {
        Coordinates {
            latitude: (self.south + self.north) / 2.0,
            longitude: (self.west + self.east) / 2.0,
        }
    }
}

/// Greater Montreal.
pub const MARKET_BOUNDS: GeoBounds = GeoBounds {
    south: 45.3,
    west: -74.0,
    north: 45.7,
    east: -73.0,
};

pub const DEFAULT_CENTER: Coordinates = Coordinates {
    latitude: 45.5017,
    longitude: -73.5673,
};

pub const MIN_ZOOM: u8 = 11;
pub const MAX_ZOOM: u8 = 19;
pub const DEFAULT_ZOOM: u8 = 12;

// Tile columns visible across the view, and the latitude squash at ~45°N.
const TILES_ACROSS: f64 = 4.0;
const LATITUDE_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Viewport {
    center: Coordinates,
    zoom: u8,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(DEFAULT_CENTER, DEFAULT_ZOOM)
    }
}

impl Viewport {
    pub fn new(center: Coordinates, zoom: u8) -> Self {
        let zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        Self {
            center: clamp_center(center, zoom),
            zoom,
        }
    }

    pub const fn center(&self) -> Coordinates {
        self.center
    }

    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    /// Degrees of (latitude, longitude) covered at the current zoom.
    pub fn span(&self) -> (f64, f64) {
        span_at(self.zoom)
    }

    pub fn visible(&self) -> GeoBounds {
        let (lat_span, lng_span) = self.span();
        GeoBounds {
            south: self.center.latitude - lat_span / 2.0,
            west: self.center.longitude - lng_span / 2.0,
            north: self.center.latitude + lat_span / 2.0,
            east: self.center.longitude + lng_span / 2.0,
        }
    }

    pub fn zoom_in(self) -> Self {
        Self::new(self.center, self.zoom.saturating_add(1))
    }

    pub fn zoom_out(self) -> Self {
        Self::new(self.center, self.zoom.saturating_sub(1))
    }

    /// Pans by quarter views; positive steps go north and east.
    pub fn pan(self, north_steps: i32, east_steps: i32) -> Self {
        let (lat_span, lng_span) = self.span();
        let center = Coordinates {
            latitude: f64::from(north_steps).mul_add(lat_span / 4.0, self.center.latitude),
            longitude: f64::from(east_steps).mul_add(lng_span / 4.0, self.center.longitude),
        };
        Self::new(center, self.zoom)
    }

    /// Recentres on a point, keeping the zoom.
    pub fn center_on(self, point: Coordinates) -> Self {
        Self::new(point, self.zoom)
    }
}

fn span_at(zoom: u8) -> (f64, f64) {
    let lng_span = 360.0 / f64::from(1_u32 << zoom) * TILES_ACROSS;
    (lng_span * LATITUDE_RATIO, lng_span)
}

/// Keeps the visible area inside [`MARKET_BOUNDS`]; an axis wider than the
/// bounds is centred on them.
fn clamp_center(center: Coordinates, zoom: u8) -> Coordinates {
    let (lat_span, lng_span) = span_at(zoom);
    Coordinates {
        latitude: clamp_axis(
            center.latitude,
            MARKET_BOUNDS.south,
            MARKET_BOUNDS.north,
            lat_span,
        ),
        longitude: clamp_axis(
            center.longitude,
            MARKET_BOUNDS.west,
            MARKET_BOUNDS.east,
            lng_span,
        ),
    }
}

fn clamp_axis(value: f64, low: f64, high: f64, span: f64) -> f64 {
    let min = low + span / 2.0;
    let max = high - span / 2.0;
    if min > max {
        (low + high) / 2.0
    } else {
        value.clamp(min, max)
    }
}
