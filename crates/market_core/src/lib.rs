//! Data shaping for Market Maker.
//!
//! Raw rows from the market tables come in through a [`MarketSource`], are
//! normalised into view models by the [`mapper`] functions and are held per
//! view in [`QuerySlot`]s. The single open-edition value lives in
//! [`Selection`].

pub mod cache;
pub mod calendar;
pub mod coords;
pub mod dates;
pub mod error;
pub mod fetch;
pub mod mapper;
pub mod model;
pub mod query;
pub mod routes;
pub mod selection;
pub mod snapshot;
pub mod source;
pub mod viewport;

pub use cache::{Load, QuerySlot, RequestTicket};
pub use coords::{parse_location, Coordinates};
pub use dates::{DateWindow, Partitioned};
pub use error::QueryError;
pub use fetch::{run_job, FetchJob, FetchOutcome};
pub use mapper::{
    CalendarEvent, EditionSummary, LocatedEdition, MakerView, MapMarker, MarketDetails,
    UNKNOWN_MARKET,
};
pub use model::{EditionRow, MakerLink, MakerRow, MarketRef, PlaceRow, RecordId, Relation};
pub use query::{EditionFilter, Embed, QueryKey, RestRequest};
pub use routes::Route;
pub use selection::{DetailPane, DetailTicket, Selection};
pub use snapshot::{Snapshot, SnapshotSource};
pub use source::MarketSource;
pub use viewport::Viewport;
