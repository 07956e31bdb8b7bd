//! Subscription manager for broadcasting store events.

use crate::records::Record;
use crossbeam_channel::{bounded, Sender};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::types::{
    DropReason, RecordSummary, StoreEvent, SubscriptionConfig, SubscriptionHandle, SubscriptionId,
};

/// Internal subscription state.
struct Subscription {
    config: SubscriptionConfig,
    sender: Sender<StoreEvent>,
}

impl Subscription {
    /// Try to send an event. Returns false if the buffer is full or the
    /// receiver is gone (subscriber will be dropped).
    fn try_send(&self, event: StoreEvent) -> bool {
        self.sender.try_send(event).is_ok()
    }

    fn matches_record(&self, record: &Record) -> bool {
        self.config.filter.matches(record.kind())
    }
}

/// Manages subscriptions and broadcasts events.
///
/// Delivery is inline in the mutating call, in registration order; there is
/// no background dispatch thread.
pub struct SubscriptionManager {
    /// Active subscriptions by ID.
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
    /// Counter for generating subscription IDs.
    next_id: AtomicU64,
}

impl SubscriptionManager {
    /// Create a new subscription manager.
    pub fn new() -> Self {
        Self {
            subscriptions: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a new subscription.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::SeqCst));
        let (sender, receiver) = bounded(config.buffer_size);

        self.subscriptions
            .write()
            .insert(id, Subscription { config, sender });

        SubscriptionHandle { id, receiver }
    }

    /// Unsubscribe and clean up.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subs = self.subscriptions.write();
        if let Some(sub) = subs.remove(&id) {
            // Best effort: tell the receiver why the channel is closing.
            let _ = sub.sender.try_send(StoreEvent::Dropped {
                reason: DropReason::Unsubscribed,
            });
        }
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.read().len()
    }

    // --- Broadcasting ---

    /// Broadcast a newly added record to matching subscriptions.
    pub fn broadcast_added(&self, record: &Record) {
        let event = StoreEvent::RecordAdded {
            record: RecordSummary::from_record(record),
        };
        self.broadcast(|sub| sub.matches_record(record), event);
    }

    /// Broadcast a removed record to matching subscriptions.
    pub fn broadcast_removed(&self, record: &Record) {
        let event = StoreEvent::RecordRemoved {
            record: RecordSummary::from_record(record),
        };
        self.broadcast(|sub| sub.matches_record(record), event);
    }

    /// Broadcast a store reset to every subscription.
    pub fn broadcast_reset(&self) {
        self.broadcast(|_| true, StoreEvent::Reset);
    }

    /// Internal broadcast helper. Drops subscribers that fail to receive.
    fn broadcast<F>(&self, filter: F, event: StoreEvent)
    where
        F: Fn(&Subscription) -> bool,
    {
        let mut to_remove = Vec::new();

        {
            let subs = self.subscriptions.read();
            for (id, sub) in subs.iter() {
                if filter(sub) && !sub.try_send(event.clone()) {
                    to_remove.push(*id);
                }
            }
        }

        if !to_remove.is_empty() {
            let mut subs = self.subscriptions.write();
            for id in to_remove {
                if let Some(sub) = subs.remove(&id) {
                    // Might fail if the buffer is still full, that's ok.
                    let _ = sub.sender.try_send(StoreEvent::Dropped {
                        reason: DropReason::BufferOverflow,
                    });
                }
            }
        }
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Entry, RecordBody};
    use crate::subscriptions::SubscriptionFilter;
    use crate::types::{RecordId, RecordKind};
    use std::time::Duration;

    fn make_entry(id: u64, name: &str) -> Record {
        Record::new(RecordId(id), RecordBody::Entry(Entry::new(name, RecordId(1))))
    }

    #[test]
    fn test_subscribe_unsubscribe() {
        let manager = SubscriptionManager::new();

        let handle = manager.subscribe(SubscriptionConfig::default());
        assert_eq!(manager.subscription_count(), 1);

        manager.unsubscribe(handle.id);
        assert_eq!(manager.subscription_count(), 0);
    }

    #[test]
    fn test_broadcast_to_matching_kind() {
        let manager = SubscriptionManager::new();

        let config = SubscriptionConfig {
            filter: SubscriptionFilter::kinds(vec![RecordKind::Entry]),
            ..Default::default()
        };
        let handle = manager.subscribe(config);

        manager.broadcast_added(&make_entry(5, "Dune"));

        let event = handle.recv_timeout(Duration::from_millis(100)).unwrap();
        match event {
            StoreEvent::RecordAdded { record } => {
                assert_eq!(record.id, 5);
                assert_eq!(record.kind, RecordKind::Entry);
                assert_eq!(record.name.as_deref(), Some("Dune"));
            }
            _ => panic!("Expected RecordAdded event, got {:?}", event),
        }
    }

    #[test]
    fn test_broadcast_filters_non_matching() {
        let manager = SubscriptionManager::new();

        let config = SubscriptionConfig {
            filter: SubscriptionFilter::kinds(vec![RecordKind::Collection]),
            ..Default::default()
        };
        let handle = manager.subscribe(config);

        manager.broadcast_added(&make_entry(5, "Dune"));

        let result = handle.recv_timeout(Duration::from_millis(50));
        assert!(result.is_err());
    }

    #[test]
    fn test_reset_reaches_every_subscriber() {
        let manager = SubscriptionManager::new();

        // Even a kind-filtered subscriber sees resets.
        let config = SubscriptionConfig {
            filter: SubscriptionFilter::kinds(vec![RecordKind::Collection]),
            ..Default::default()
        };
        let handle = manager.subscribe(config);

        manager.broadcast_reset();

        let event = handle.recv_timeout(Duration::from_millis(100)).unwrap();
        assert!(matches!(event, StoreEvent::Reset));
    }

    #[test]
    fn test_drop_slow_subscriber() {
        let manager = SubscriptionManager::new();
        let config = SubscriptionConfig {
            buffer_size: 2,
            filter: SubscriptionFilter::all(),
        };
        let _handle = manager.subscribe(config);

        for i in 0..10 {
            manager.broadcast_added(&make_entry(i, "flood"));
        }

        assert_eq!(manager.subscription_count(), 0);
    }
}
