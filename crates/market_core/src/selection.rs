//! The shared "which edition is open" value and the detail fetch it drives.
//!
//! There is exactly one writer: the navigation shell. Views call
//! [`Selection::select`] on click and the modal calls [`Selection::close`].
//! Every select bumps a generation; a detail result is only applied when it
//! carries the current generation, so the last selection always wins.

use crate::error::QueryError;
use crate::mapper::MarketDetails;
use crate::model::RecordId;

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPane {
    Hidden,
    Loading(RecordId),
    Ready(MarketDetails),
    NotFound(RecordId),
    Failed { id: RecordId, message: String },
}

/// Identifies one detail fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailTicket {
    id: RecordId,
    generation: u64,
}

impl DetailTicket {
    pub const fn id(&self) -> &RecordId {
        &self.id
    }
}

#[derive(Debug)]
pub struct Selection {
    current: Option<RecordId>,
    generation: u64,
    pane: DetailPane,
}

impl Default for Selection {
    fn default() -> Self {
        Self {
            current: None,
            generation: 0,
            pane: DetailPane::Hidden,
        }
    }
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn selected(&self) -> Option<&RecordId> {
        self.current.as_ref()
    }

    pub const fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub const fn pane(&self) -> &DetailPane {
        &self.pane
    }

    /// Opens `id`, replacing any current selection. Returns the fetch to run,
    /// or `None` when `id` is already open.
    pub fn select(&mut self, id: RecordId) -> Option<DetailTicket> {
        if self.current.as_ref() == Some(&id) && !matches!(self.pane, DetailPane::Failed { .. }) {
            return None;
        }

        self.generation += 1;
        self.current = Some(id.clone());
        self.pane = DetailPane::Loading(id.clone());
        tracing::debug!(edition = %id, generation = self.generation, "selected edition");

        Some(DetailTicket {
            id,
            generation: self.generation,
        })
    }

    /// Clears the selection. Returns `false` when nothing was open.
    pub fn close(&mut self) -> bool {
        if self.current.take().is_none() {
            return false;
        }
        self.generation += 1;
        self.pane = DetailPane::Hidden;
        true
    }

    /// Applies a finished fetch. Stale tickets are dropped and `false` is
    /// returned.
    pub fn resolve(
        &mut self,
        ticket: DetailTicket,
        result: Result<Option<MarketDetails>, QueryError>,
    ) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(edition = %ticket.id, "discarding stale detail result");
            return false;
        }

        self.pane = match result {
            Ok(Some(details)) => DetailPane::Ready(details),
            Ok(None) => DetailPane::NotFound(ticket.id),
            Err(error) => {
                tracing::warn!(edition = %ticket.id, %error, "detail fetch failed");
                DetailPane::Failed {
                    id: ticket.id,
                    message: error.to_string(),
                }
            }
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(id: &str) -> MarketDetails {
        MarketDetails {
            id: RecordId::from(id),
            edition_name: format!("Edition {id}"),
            market_name: "Jean-Talon".to_string(),
            description: None,
            start_date: "2025-01-15".to_string(),
            end_date: "2025-01-16".to_string(),
            makers: Vec::new(),
        }
    }

    #[test]
    fn last_selection_wins() {
        let mut selection = Selection::new();

        let first = selection.select(RecordId::from("A")).unwrap();
        let second = selection.select(RecordId::from("B")).unwrap();

        assert!(selection.resolve(second, Ok(Some(details("B")))));
        assert!(!selection.resolve(first, Ok(Some(details("A")))));

        assert_eq!(selection.pane(), &DetailPane::Ready(details("B")));
    }

    #[test]
    fn stale_result_arriving_first_keeps_loading() {
        let mut selection = Selection::new();

        let first = selection.select(RecordId::from("A")).unwrap();
        let second = selection.select(RecordId::from("B")).unwrap();

        assert!(!selection.resolve(first, Ok(Some(details("A")))));
        assert_eq!(selection.pane(), &DetailPane::Loading(RecordId::from("B")));

        assert!(selection.resolve(second, Ok(Some(details("B")))));
        assert_eq!(selection.selected(), Some(&RecordId::from("B")));
    }

    #[test]
    fn closing_discards_in_flight_fetch() {
        let mut selection = Selection::new();

        let ticket = selection.select(RecordId::from("A")).unwrap();
        assert!(selection.close());
        assert!(!selection.resolve(ticket, Ok(Some(details("A")))));

        assert_eq!(selection.pane(), &DetailPane::Hidden);
        assert!(!selection.is_open());
    }

    #[test]
    fn closing_when_nothing_is_open_is_a_no_op() {
        let mut selection = Selection::new();
        assert!(!selection.close());
        assert_eq!(selection.pane(), &DetailPane::Hidden);
    }

    #[test]
    fn reselecting_the_open_edition_does_not_refetch() {
        let mut selection = Selection::new();

        let ticket = selection.select(RecordId::from("A")).unwrap();
        assert!(selection.select(RecordId::from("A")).is_none());
        assert!(selection.resolve(ticket, Ok(None)));

        assert_eq!(selection.pane(), &DetailPane::NotFound(RecordId::from("A")));
    }

    #[test]
    fn failed_detail_can_be_selected_again() {
        let mut selection = Selection::new();

        let ticket = selection.select(RecordId::from("A")).unwrap();
        selection.resolve(ticket, Err(QueryError::transport("market_editions", "offline")));

        assert!(matches!(selection.pane(), DetailPane::Failed { .. }));
        assert!(selection.select(RecordId::from("A")).is_some());
    }
}
