//! Pending-poll registry
//!
//! Poll answer events from the transport carry only the transport-assigned
//! poll identifier. This process-wide registry maps that identifier back to
//! the catalog poll and list position it was dispatched for.

use dashmap::DashMap;

use crate::poll::PollId;

/// Domain context a dispatched poll was sent under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPoll {
    pub poll_id: PollId,
    pub position: usize,
}

/// Registry of every poll dispatched by this process.
///
/// Entries are never evicted: transport poll identifiers are unique per
/// dispatch, and the per-entry footprint is small enough that unbounded
/// growth is an accepted tradeoff.
#[derive(Debug, Default)]
pub struct PendingPollRegistry {
    entries: DashMap<String, PendingPoll>,
}

impl PendingPollRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Record the domain context of a freshly dispatched poll.
    /// Re-registering the same transport id overwrites the old entry.
    pub fn register(
        &self,
        transport_poll_id: impl Into<String>,
        poll_id: PollId,
        position: usize,
    ) {
        self.entries
            .insert(transport_poll_id.into(), PendingPoll { poll_id, position });
    }

    /// Resolve an inbound answer event back to its domain context.
    ///
    /// `None` means the event references a poll this process never
    /// dispatched; callers drop such events silently.
    pub fn resolve(&self, transport_poll_id: &str) -> Option<PendingPoll> {
        self.entries
            .get(transport_poll_id)
            .map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
