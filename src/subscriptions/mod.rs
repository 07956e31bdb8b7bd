//! Change notification for store mutations.
//!
//! Subscribers receive an event for every successful add and delete and a
//! single event when the store is reset. Dispatch is synchronous: events are
//! delivered inline, before the mutating call returns.

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    DropReason, RecordSummary, StoreEvent, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId,
};
