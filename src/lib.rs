//! # mdat-store
//!
//! A schema-less, id-addressed record store — the engineering core of a
//! desktop cataloging tool. Models a hierarchy of database → collection →
//! grouping → entry → field, persisted through a custom binary format and
//! queried through relational-navigation operations that reconstruct
//! structure purely from id-valued reference fields.
//!
//! ## Core Concepts
//!
//! - **Records**: typed, id-identified entities (database, template,
//!   collection, grouping, entry, field)
//! - **Store**: the in-memory collection plus identity allocation and
//!   navigation queries
//! - **Codec**: the `.mdat` binary file format, invoked only at load/save
//! - **Subscriptions**: synchronous change notification for external
//!   presentation layers
//!
//! ## Example
//!
//! ```ignore
//! use mdat_store::{codec, Collection, Entry, Store, Template};
//!
//! let mut store = Store::new();
//! let template = store.add_template(Template::new("Books"));
//! let library = store.add_collection(Collection::new("Library", template));
//! store.add_entry(Entry::new("Dune", library));
//!
//! codec::save(&store, "library.mdat")?;
//! let reloaded = codec::load("library.mdat")?;
//! ```
//!
//! The store is single-threaded by design: mutation goes through
//! `&mut self` with no internal locking. Background saves need an external
//! mutual-exclusion boundary around the store.

pub mod codec;
pub mod error;
pub mod records;
pub mod store;
pub mod subscriptions;
pub mod types;

// Re-exports
pub use codec::{from_bytes, load, save, to_bytes};
pub use error::{Result, StoreError};
pub use records::{
    Collection, Database, Entry, EntryField, Grouping, GroupingCondition, GroupingEntryRef,
    Record, RecordBody, Template, TemplateColumn, TemplateField,
};
pub use store::Store;
pub use subscriptions::{
    DropReason, RecordSummary, StoreEvent, SubscriptionConfig, SubscriptionFilter,
    SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
pub use types::*;
