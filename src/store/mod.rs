//! In-memory store: ordered records, identity allocation, lifecycle
//! operations, and change notification.
//!
//! A store owns every record of one catalog project. All mutation goes
//! through `&mut self` methods that run to completion on the caller's
//! thread; there is no internal locking. Callers that save from a
//! background thread must wrap the store in their own mutual-exclusion
//! boundary (e.g. a `Mutex<Store>`) and hold it for the duration of the
//! encode.

mod navigation;

use crate::records::{
    Collection, Database, Entry, EntryField, Grouping, GroupingCondition, GroupingEntryRef,
    Record, RecordBody, Template, TemplateColumn, TemplateField,
};
use crate::subscriptions::{
    SubscriptionConfig, SubscriptionHandle, SubscriptionId, SubscriptionManager,
};
use crate::types::{RecordId, RecordKind};
use tracing::debug;

/// The in-memory collection of all records for one project.
///
/// Invariants:
/// - exactly one record of kind `Database` exists at all times;
/// - ids are pairwise distinct and never reused;
/// - foreign-key fields *should* reference existing ids of the right kind,
///   but this is not enforced — dangling references resolve to "not found"
///   at query time.
pub struct Store {
    /// Monotonically increasing id counter. Starts at 1; id 0 is reserved
    /// as the "no reference" value.
    next_id: u64,

    /// Records in insertion order. Order is preserved for iteration but
    /// carries no semantic meaning for queries.
    records: Vec<Record>,

    /// Change notification broadcast list.
    subscriptions: SubscriptionManager,
}

impl Store {
    /// Create an empty store with its auto-created database record.
    pub fn new() -> Self {
        let mut store = Self {
            next_id: 1,
            records: Vec::new(),
            subscriptions: SubscriptionManager::new(),
        };
        let id = store.allocate_id();
        store
            .records
            .push(Record::new(id, RecordBody::Database(Database::default())));
        store
    }

    /// Build a store from an existing record set (e.g. after a load).
    ///
    /// The id counter resumes one past the highest id present. A missing
    /// database record is restored with default values so the
    /// exactly-one-database invariant holds.
    pub fn from_records(records: Vec<Record>) -> Self {
        let max_id = records.iter().map(|r| r.id().0).max().unwrap_or(0);
        let mut store = Self {
            next_id: max_id + 1,
            records,
            subscriptions: SubscriptionManager::new(),
        };
        if !store
            .records
            .iter()
            .any(|r| r.kind() == RecordKind::Database)
        {
            let id = store.allocate_id();
            store
                .records
                .push(Record::new(id, RecordBody::Database(Database::default())));
        }
        store
    }

    /// Return the current counter value and advance it.
    pub fn allocate_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    /// The value the next allocation will return.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    // --- Add operations ---
    //
    // Each allocates an id, appends the record, notifies subscribers, and
    // returns the new id. None of them validate references.

    pub fn add_template(&mut self, template: Template) -> RecordId {
        self.insert(RecordBody::Template(template))
    }

    pub fn add_template_column(&mut self, column: TemplateColumn) -> RecordId {
        self.insert(RecordBody::TemplateColumn(column))
    }

    pub fn add_template_field(&mut self, field: TemplateField) -> RecordId {
        self.insert(RecordBody::TemplateField(field))
    }

    pub fn add_collection(&mut self, collection: Collection) -> RecordId {
        self.insert(RecordBody::Collection(collection))
    }

    pub fn add_grouping(&mut self, grouping: Grouping) -> RecordId {
        self.insert(RecordBody::Grouping(grouping))
    }

    pub fn add_grouping_entry_ref(&mut self, entry_ref: GroupingEntryRef) -> RecordId {
        self.insert(RecordBody::GroupingEntryRef(entry_ref))
    }

    pub fn add_entry(&mut self, entry: Entry) -> RecordId {
        self.insert(RecordBody::Entry(entry))
    }

    pub fn add_field(&mut self, field: EntryField) -> RecordId {
        self.insert(RecordBody::EntryField(field))
    }

    /// Append a letter-range condition to a grouping.
    ///
    /// Returns false if `grouping` does not resolve to a grouping record.
    pub fn add_grouping_condition(
        &mut self,
        grouping: RecordId,
        start_letter: &str,
        end_letter: &str,
    ) -> bool {
        match self
            .get_by_id_mut(grouping)
            .and_then(Record::as_grouping_mut)
        {
            Some(g) => {
                g.conditions
                    .push(GroupingCondition::letter_range(start_letter, end_letter));
                true
            }
            None => false,
        }
    }

    fn insert(&mut self, body: RecordBody) -> RecordId {
        let id = self.allocate_id();
        let record = Record::new(id, body);
        self.subscriptions.broadcast_added(&record);
        self.records.push(record);
        id
    }

    // --- Lookup ---

    pub fn get_by_id(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn get_by_id_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.records.iter_mut().find(|r| r.id() == id)
    }

    /// All records of a kind, in insertion order.
    pub fn get_by_kind(&self, kind: RecordKind) -> Vec<&Record> {
        self.records.iter().filter(|r| r.kind() == kind).collect()
    }

    /// Iterate every record in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The single database record.
    pub fn database(&self) -> &Record {
        self.records
            .iter()
            .find(|r| r.kind() == RecordKind::Database)
            .expect("store invariant: exactly one database record")
    }

    /// Mutable access to the single database record.
    pub fn database_mut(&mut self) -> &mut Record {
        self.records
            .iter_mut()
            .find(|r| r.kind() == RecordKind::Database)
            .expect("store invariant: exactly one database record")
    }

    // --- Removal ---

    /// Remove the record with the given id. Returns whether anything was
    /// removed.
    ///
    /// The database record is protected; deleting it would break the
    /// exactly-one-database invariant, so the call returns false.
    ///
    /// Removal does not cascade. Callers deleting an entry, collection,
    /// or grouping must delete its dependents themselves, leaf-first.
    pub fn delete(&mut self, id: RecordId) -> bool {
        let Some(pos) = self.records.iter().position(|r| r.id() == id) else {
            return false;
        };
        if self.records[pos].kind() == RecordKind::Database {
            return false;
        }
        let removed = self.records.remove(pos);
        self.subscriptions.broadcast_removed(&removed);
        true
    }

    /// Remove the given record by identity. Returns whether anything was
    /// removed.
    pub fn delete_record(&mut self, record: &Record) -> bool {
        self.delete(record.id())
    }

    /// Clear all records, reset the id counter, and re-create the default
    /// database record. Subscribers receive a single reset event.
    pub fn reset(&mut self) {
        self.records.clear();
        self.next_id = 1;
        let id = self.allocate_id();
        self.records
            .push(Record::new(id, RecordBody::Database(Database::default())));
        debug!(next_id = self.next_id, "store reset");
        self.subscriptions.broadcast_reset();
    }

    // --- Change notification ---

    /// Subscribe to change events. Events are delivered synchronously,
    /// inside the mutating call.
    pub fn subscribe(&self, config: SubscriptionConfig) -> SubscriptionHandle {
        self.subscriptions.subscribe(config)
    }

    /// Drop a subscription.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscriptions.unsubscribe(id)
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
