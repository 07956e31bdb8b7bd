//! Subscription types for live store updates.

use crate::records::Record;
use crate::types::RecordKind;
use serde::{Deserialize, Serialize};

/// Configuration for a subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered events before dropping the subscriber.
    /// Default: 1000
    pub buffer_size: usize,

    /// Filter criteria.
    pub filter: SubscriptionFilter,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            buffer_size: 1000,
            filter: SubscriptionFilter::default(),
        }
    }
}

/// Filter criteria for subscriptions.
///
/// Reset events are delivered to every subscriber regardless of filter —
/// after a reset any cached view is stale no matter which kinds it tracked.
#[derive(Clone, Debug, Default)]
pub struct SubscriptionFilter {
    /// Restrict add/remove events to these kinds (None = all kinds).
    pub kinds: Option<Vec<RecordKind>>,
}

impl SubscriptionFilter {
    /// Subscribe to add/remove events for every kind.
    pub fn all() -> Self {
        Self::default()
    }

    /// Subscribe to add/remove events for specific kinds.
    pub fn kinds(kinds: Vec<RecordKind>) -> Self {
        Self { kinds: Some(kinds) }
    }

    pub(crate) fn matches(&self, kind: RecordKind) -> bool {
        match &self.kinds {
            Some(kinds) => kinds.contains(&kind),
            None => true,
        }
    }
}

/// Events emitted by subscriptions.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A record was added to the store.
    RecordAdded { record: RecordSummary },

    /// A record was removed from the store.
    RecordRemoved { record: RecordSummary },

    /// The store was reset; everything changed.
    Reset,

    /// Subscription was dropped.
    Dropped { reason: DropReason },
}

/// Why a subscription was dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver handle was dropped.
    Disconnected,
    /// Explicitly unsubscribed.
    Unsubscribed,
}

/// Summary of a record (for events, avoids cloning full bodies).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecordSummary {
    pub id: u64,
    pub kind: RecordKind,
    /// Display name, where the kind has one.
    pub name: Option<String>,
}

impl RecordSummary {
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id().0,
            kind: record.kind(),
            name: record.name().map(str::to_owned),
        }
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Handle to manage a subscription.
pub struct SubscriptionHandle {
    pub id: SubscriptionId,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StoreEvent>,
}

impl SubscriptionHandle {
    /// Receive the next event (blocking).
    pub fn recv(&self) -> Result<StoreEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}
