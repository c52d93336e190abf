//! Remote-data view model with latest-wins fetch reconciliation.
//!
//! Each screen holds a [`RemoteCell`] per fetched collection. Issuing a
//! fetch hands out a generation-stamped ticket; only the ticket from the
//! most recently issued fetch may resolve the cell, so a stale response
//! arriving after a newer request is discarded instead of overwriting
//! newer state. Invalidating the cell (screen teardown) discards every
//! in-flight ticket.

use vibeloop_core::Error;

/// Lifecycle of a remotely fetched value: `idle → loading → ready | failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RemoteData<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> RemoteData<T> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn error(&self) -> Option<&String> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Proof of a specific issued fetch. Resolving with a superseded ticket
/// is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// A [`RemoteData`] slot guarded by a fetch generation counter.
#[derive(Debug)]
pub struct RemoteCell<T> {
    data: RemoteData<T>,
    generation: u64,
}

impl<T> Default for RemoteCell<T> {
    fn default() -> Self {
        Self {
            data: RemoteData::Idle,
            generation: 0,
        }
    }
}

impl<T> RemoteCell<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading` and obtain the ticket for this fetch. Any earlier
    /// in-flight fetch is superseded. Retry is just another `begin`.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        self.data = RemoteData::Loading;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch outcome. Returns `false` when the ticket was
    /// superseded and the response was discarded.
    pub fn resolve(&mut self, ticket: FetchTicket, outcome: Result<T, Error>) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding superseded fetch response"
            );
            return false;
        }
        self.data = match outcome {
            Ok(value) => RemoteData::Ready(value),
            Err(error) => RemoteData::Failed(error.to_string()),
        };
        true
    }

    /// Discard in-flight fetches and reset to `Idle` (screen teardown).
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.data = RemoteData::Idle;
    }

    #[must_use]
    pub const fn data(&self) -> &RemoteData<T> {
        &self.data
    }
}

impl<T: Clone> RemoteCell<T> {
    #[must_use]
    pub fn snapshot(&self) -> RemoteData<T> {
        self.data.clone()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn begin_enters_loading() {
        let mut cell = RemoteCell::<Vec<u32>>::new();
        assert_eq!(cell.data(), &RemoteData::Idle);
        cell.begin();
        assert!(cell.data().is_loading());
    }

    #[test]
    fn latest_issued_fetch_wins() {
        let mut cell = RemoteCell::new();
        let first = cell.begin();
        let second = cell.begin();

        // The second (most recent) request resolves first.
        assert!(cell.resolve(second, Ok(vec![2])));
        assert_eq!(cell.data(), &RemoteData::Ready(vec![2]));

        // The first response arrives late and is discarded.
        assert!(!cell.resolve(first, Ok(vec![1])));
        assert_eq!(cell.data(), &RemoteData::Ready(vec![2]));
    }

    #[test]
    fn stale_error_does_not_clobber_newer_result() {
        let mut cell = RemoteCell::new();
        let first = cell.begin();
        let second = cell.begin();

        assert!(cell.resolve(second, Ok(vec![9])));
        assert!(!cell.resolve(first, Err(Error::Api("boom".into()))));
        assert_eq!(cell.data(), &RemoteData::Ready(vec![9]));
    }

    #[test]
    fn failure_stores_message_and_retry_reloads() {
        let mut cell = RemoteCell::<Vec<u32>>::new();
        let ticket = cell.begin();
        assert!(cell.resolve(ticket, Err(Error::Api("HTTP 502".into()))));
        assert!(cell.data().error().is_some());

        let retry = cell.begin();
        assert!(cell.data().is_loading());
        assert!(cell.resolve(retry, Ok(vec![7])));
        assert_eq!(cell.data().ready(), Some(&vec![7]));
    }

    #[test]
    fn invalidate_discards_in_flight_responses() {
        let mut cell = RemoteCell::new();
        let ticket = cell.begin();
        cell.invalidate();

        assert!(!cell.resolve(ticket, Ok(vec![1])));
        assert_eq!(cell.data(), &RemoteData::Idle);
    }
}
