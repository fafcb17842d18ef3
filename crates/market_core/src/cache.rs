//! Per-view query slots keyed by [`QueryKey`](crate::query::QueryKey)-like
//! values.
//!
//! A slot shows the state of its *current* key only. Asking again for a key
//! that is loading or already resolved starts no new request, a new key
//! supersedes the previous one, and results arriving for a superseded key are
//! cached but never shown.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::QueryError;

#[derive(Debug, Clone, PartialEq)]
pub enum Load<T> {
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Load<T> {
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Handed out when a slot needs a fetch; returned with the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket<K> {
    key: K,
}

impl<K> RequestTicket<K> {
    pub const fn key(&self) -> &K {
        &self.key
    }
}

#[derive(Debug)]
pub struct QuerySlot<K, T> {
    current: Option<K>,
    state: Load<T>,
    in_flight: HashSet<K>,
    resolved: HashMap<K, T>,
}

impl<K, T> Default for QuerySlot<K, T> {
    fn default() -> Self {
        Self {
            current: None,
            state: Load::Idle,
            in_flight: HashSet::new(),
            resolved: HashMap::new(),
        }
    }
}

impl<K, T> QuerySlot<K, T>
where
    K: Clone + Eq + Hash + std::fmt::Display,
    T: Clone,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &Load<T> {
        &self.state
    }

    pub const fn key(&self) -> Option<&K> {
        self.current.as_ref()
    }

    /// Makes `key` current. Returns a ticket only when a fetch must start.
    pub fn request(&mut self, key: K) -> Option<RequestTicket<K>> {
        let unchanged = self.current.as_ref() == Some(&key);
        if unchanged && matches!(self.state, Load::Loading | Load::Ready(_)) {
            return None;
        }

        self.current = Some(key.clone());
        if let Some(value) = self.resolved.get(&key) {
            tracing::debug!(%key, "serving query from cache");
            self.state = Load::Ready(value.clone());
            return None;
        }

        self.state = Load::Loading;
        if self.in_flight.contains(&key) {
            tracing::debug!(%key, "query already in flight");
            return None;
        }

        tracing::debug!(%key, "issuing query");
        self.in_flight.insert(key.clone());
        Some(RequestTicket { key })
    }

    /// Records a result. Returns whether the visible state changed.
    pub fn resolve(&mut self, ticket: RequestTicket<K>, result: Result<T, QueryError>) -> bool {
        let RequestTicket { key } = ticket;
        self.in_flight.remove(&key);
        let is_current = self.current.as_ref() == Some(&key);

        match result {
            Ok(value) => {
                if is_current {
                    self.state = Load::Ready(value.clone());
                }
                self.resolved.insert(key.clone(), value);
            }
            Err(error) => {
                tracing::warn!(%key, %error, "query failed");
                if is_current {
                    self.state = Load::Failed(error.to_string());
                }
            }
        }

        if !is_current {
            tracing::debug!(%key, "discarding result for superseded query");
        }
        is_current
    }

    /// Forgets cached results; the next request for any key refetches.
    pub fn invalidate(&mut self) {
        self.resolved.clear();
        if matches!(self.state, Load::Ready(_) | Load::Failed(_)) {
            self.state = Load::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure() -> QueryError {
        QueryError::rejected("market_editions", 500, "boom")
    }

    #[test]
    fn identical_requests_are_deduplicated() {
        let mut slot: QuerySlot<String, Vec<u32>> = QuerySlot::new();

        let ticket = slot.request("list".to_string());
        assert!(ticket.is_some());
        assert!(slot.request("list".to_string()).is_none());
        assert!(slot.state().is_loading());

        assert!(slot.resolve(ticket.unwrap(), Ok(vec![1, 2])));
        assert!(slot.request("list".to_string()).is_none());
        assert_eq!(slot.state().ready(), Some(&vec![1, 2]));
    }

    #[test]
    fn superseded_results_are_not_shown() {
        let mut slot: QuerySlot<String, Vec<u32>> = QuerySlot::new();

        let january = slot.request("jan".to_string()).unwrap();
        let february = slot.request("feb".to_string()).unwrap();

        assert!(!slot.resolve(january, Ok(vec![1])));
        assert!(slot.state().is_loading());

        assert!(slot.resolve(february, Ok(vec![2])));
        assert_eq!(slot.state().ready(), Some(&vec![2]));
    }

    #[test]
    fn returning_to_a_resolved_key_uses_the_cache() {
        let mut slot: QuerySlot<String, Vec<u32>> = QuerySlot::new();

        let january = slot.request("jan".to_string()).unwrap();
        slot.resolve(january, Ok(vec![1]));
        let february = slot.request("feb".to_string()).unwrap();
        slot.resolve(february, Ok(vec![2]));

        assert!(slot.request("jan".to_string()).is_none());
        assert_eq!(slot.state().ready(), Some(&vec![1]));
    }

    #[test]
    fn returning_to_an_in_flight_key_waits_for_it() {
        let mut slot: QuerySlot<String, Vec<u32>> = QuerySlot::new();

        let january = slot.request("jan".to_string()).unwrap();
        let _february = slot.request("feb".to_string()).unwrap();
        assert!(slot.request("jan".to_string()).is_none());

        assert!(slot.resolve(january, Ok(vec![1])));
        assert_eq!(slot.state().ready(), Some(&vec![1]));
    }

    #[test]
    fn failures_are_shown_but_not_cached() {
        let mut slot: QuerySlot<String, Vec<u32>> = QuerySlot::new();

        let ticket = slot.request("list".to_string()).unwrap();
        assert!(slot.resolve(ticket, Err(failure())));
        assert!(matches!(slot.state(), Load::Failed(message) if message.contains("boom")));

        assert!(slot.request("list".to_string()).is_some());
    }

    #[test]
    fn invalidate_forces_a_refetch() {
        let mut slot: QuerySlot<String, Vec<u32>> = QuerySlot::new();

        let ticket = slot.request("list".to_string()).unwrap();
        slot.resolve(ticket, Ok(vec![1]));
        slot.invalidate();

        assert_eq!(slot.state(), &Load::Idle);
        assert!(slot.request("list".to_string()).is_some());
    }
}
