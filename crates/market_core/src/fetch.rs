//! Fetch work handed from a front-end's state to whatever runs its futures,
//! and the results that come back.

use crate::source::{load_calendar, load_detail, load_list, load_map};
use crate::{
    CalendarEvent, DateWindow, DetailTicket, EditionSummary, MapMarker, MarketDetails,
    MarketSource, QueryError, QueryKey, RequestTicket,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchJob {
    List(RequestTicket<QueryKey>),
    Calendar(RequestTicket<QueryKey>),
    Map {
        ticket: RequestTicket<QueryKey>,
        window: DateWindow,
    },
    Detail(DetailTicket),
}

#[derive(Debug)]
pub enum FetchOutcome {
    List(
        RequestTicket<QueryKey>,
        Result<Vec<EditionSummary>, QueryError>,
    ),
    Calendar(
        RequestTicket<QueryKey>,
        Result<Vec<CalendarEvent>, QueryError>,
    ),
    Map(RequestTicket<QueryKey>, Result<Vec<MapMarker>, QueryError>),
    Detail(DetailTicket, Result<Option<MarketDetails>, QueryError>),
}

/// Runs one job against `source`.
pub async fn run_job<S: MarketSource>(source: &S, job: FetchJob) -> FetchOutcome {
    match job {
        FetchJob::List(ticket) => FetchOutcome::List(ticket, load_list(source).await),
        FetchJob::Calendar(ticket) => FetchOutcome::Calendar(ticket, load_calendar(source).await),
        FetchJob::Map { ticket, window } => {
            FetchOutcome::Map(ticket, load_map(source, window).await)
        }
        FetchJob::Detail(ticket) => {
            let result = load_detail(source, ticket.id()).await;
            FetchOutcome::Detail(ticket, result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QuerySlot, RecordId, Selection, SnapshotSource};

    const SNAPSHOT: &str = r#"{
        "editions": [
            {"id": 7, "name": "Spring", "start_date": "2025-04-05", "end_date": "2025-04-06",
             "place_id": 1, "market": {"name": "Atwater"}}
        ]
    }"#;

    #[tokio::test]
    async fn outcomes_carry_their_tickets_back() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        let mut list: QuerySlot<QueryKey, Vec<EditionSummary>> = QuerySlot::new();
        let mut selection = Selection::new();

        let ticket = list.request(QueryKey::List).unwrap();
        let FetchOutcome::List(ticket, result) = run_job(&source, FetchJob::List(ticket)).await
        else {
            panic!("expected a list outcome");
        };
        assert!(list.resolve(ticket, result));
        assert_eq!(list.state().ready().unwrap()[0].market_name, "Atwater");

        let detail = selection.select(RecordId::from(7)).unwrap();
        let FetchOutcome::Detail(ticket, result) = run_job(&source, FetchJob::Detail(detail)).await
        else {
            panic!("expected a detail outcome");
        };
        assert!(selection.resolve(ticket, result));
        assert!(matches!(selection.pane(), crate::DetailPane::Ready(details) if details.edition_name == "Spring"));
    }
}
