use market_core::{EditionRow, MakerLink, MakerRow, MarketRef, PlaceRow, RecordId, Relation};
use sqlx::FromRow;

/// An edition joined with its market. `joined_market_id` is null when the
/// market row is missing.
#[derive(Debug, FromRow, Clone)]
pub struct EditionRecord {
    pub id: i64,
    pub market_id: Option<i64>,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub place_id: Option<i64>,
    pub location: Option<String>,
    pub joined_market_id: Option<i64>,
    pub market_name: Option<String>,
    pub market_description: Option<String>,
}

impl EditionRecord {
    pub fn into_row(self, makers: Vec<MakerRecord>) -> EditionRow {
        let market = self.joined_market_id.map(|_| {
            Relation::One(MarketRef {
                name: self.market_name,
                description: self.market_description,
            })
        });

        EditionRow {
            id: RecordId::from(self.id),
            market_id: self.market_id.map(RecordId::from),
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            place_id: self.place_id.map(RecordId::from),
            location: self.location,
            market,
            market_edition_makers: makers.into_iter().map(MakerRecord::into_link).collect(),
        }
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct MakerRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub social_media: Option<String>,
}

impl MakerRecord {
    fn into_link(self) -> MakerLink {
        MakerLink {
            maker: Some(Relation::One(MakerRow {
                id: RecordId::from(self.id),
                name: Some(self.name),
                description: self.description,
                website: self.website,
                social_media: self.social_media,
            })),
        }
    }
}

#[derive(Debug, FromRow, Clone)]
pub struct PlaceRecord {
    pub id: i64,
    pub name: Option<String>,
    pub is_active: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<PlaceRecord> for PlaceRow {
    fn from(record: PlaceRecord) -> Self {
        Self {
            id: RecordId::from(record.id),
            name: record.name,
            is_active: record.is_active,
            latitude: record.latitude,
            longitude: record.longitude,
        }
    }
}

/// Parameters for creating a market
#[derive(Debug, Clone)]
pub struct NewMarket {
    pub name: String,
    pub description: Option<String>,
}

/// Parameters for creating a venue
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct NewMaker {
    pub name: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub social_media: Option<String>,
}

/// Parameters for creating an edition. Dates are `YYYY-MM-DD`.
#[derive(Debug, Clone)]
pub struct NewEdition {
    pub market_id: Option<i64>,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub is_active: bool,
    pub place_id: Option<i64>,
    pub location: Option<String>,
}
