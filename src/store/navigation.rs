//! Relational navigation over the store.
//!
//! The store enforces no schema; structure exists only as id-valued
//! foreign-key fields. These queries reconstruct it on demand. Every query
//! validates the input record's kind and answers with the documented empty
//! result (`None` or an empty `Vec`) on a mismatch or a dangling reference
//! — never a panic, never an error.
//!
//! Each query is a full linear scan. At the scale of a personal catalog
//! (hundreds to low thousands of records) this is a deliberate simplicity
//! trade-off; callers needing repeated lookups should cache results.

use super::Store;
use crate::records::Record;
use crate::types::{RecordId, RecordKind};

impl Store {
    fn resolve(&self, id: RecordId, kind: RecordKind) -> Option<&Record> {
        self.get_by_id(id).filter(|r| r.kind() == kind)
    }

    // --- Template structure ---

    /// The template a collection renders through.
    pub fn template_of_collection(&self, collection: &Record) -> Option<&Record> {
        let c = collection.as_collection()?;
        self.resolve(c.template, RecordKind::Template)
    }

    /// All collections rendering through a template.
    pub fn collections_of_template(&self, template: &Record) -> Vec<&Record> {
        if template.as_template().is_none() {
            return Vec::new();
        }
        self.iter()
            .filter(|r| {
                r.as_collection()
                    .is_some_and(|c| c.template == template.id())
            })
            .collect()
    }

    /// The columns of a template, in insertion order.
    pub fn columns_of_template(&self, template: &Record) -> Vec<&Record> {
        if template.as_template().is_none() {
            return Vec::new();
        }
        self.iter()
            .filter(|r| {
                r.as_template_column()
                    .is_some_and(|c| c.template == template.id())
            })
            .collect()
    }

    /// The field definitions of one template column.
    pub fn fields_of_column(&self, column: &Record) -> Vec<&Record> {
        if column.as_template_column().is_none() {
            return Vec::new();
        }
        self.iter()
            .filter(|r| {
                r.as_template_field()
                    .is_some_and(|f| f.column == column.id())
            })
            .collect()
    }

    /// All field definitions of a template, across its columns.
    pub fn fields_of_template(&self, template: &Record) -> Vec<&Record> {
        let columns = self.columns_of_template(template);
        self.iter()
            .filter(|r| {
                r.as_template_field()
                    .is_some_and(|f| columns.iter().any(|c| c.id() == f.column))
            })
            .collect()
    }

    /// The template owning a column.
    pub fn template_of_column(&self, column: &Record) -> Option<&Record> {
        let c = column.as_template_column()?;
        self.resolve(c.template, RecordKind::Template)
    }

    /// The template owning a field definition (two hops, via its column).
    pub fn template_of_template_field(&self, field: &Record) -> Option<&Record> {
        let f = field.as_template_field()?;
        let column = self.resolve(f.column, RecordKind::TemplateColumn)?;
        self.template_of_column(column)
    }

    // --- Entries ---

    /// The entries of a collection, in insertion order.
    pub fn entries_of_collection(&self, collection: &Record) -> Vec<&Record> {
        if collection.as_collection().is_none() {
            return Vec::new();
        }
        self.iter()
            .filter(|r| r.as_entry().is_some_and(|e| e.collection == collection.id()))
            .collect()
    }

    /// The collection an entry belongs to.
    pub fn collection_of_entry(&self, entry: &Record) -> Option<&Record> {
        let e = entry.as_entry()?;
        self.resolve(e.collection, RecordKind::Collection)
    }

    /// The field values of an entry.
    pub fn fields_of_entry(&self, entry: &Record) -> Vec<&Record> {
        if entry.as_entry().is_none() {
            return Vec::new();
        }
        self.iter()
            .filter(|r| r.as_entry_field().is_some_and(|f| f.entry == entry.id()))
            .collect()
    }

    /// The entry a field value belongs to.
    pub fn entry_of_field(&self, field: &Record) -> Option<&Record> {
        let f = field.as_entry_field()?;
        self.resolve(f.entry, RecordKind::Entry)
    }

    /// The field definition a field value is for.
    pub fn template_field_of_field(&self, field: &Record) -> Option<&Record> {
        let f = field.as_entry_field()?;
        self.resolve(f.template_field, RecordKind::TemplateField)
    }

    /// The field value an entry holds for one field definition.
    pub fn field_of_entry_for(&self, entry: &Record, template_field: &Record) -> Option<&Record> {
        entry.as_entry()?;
        template_field.as_template_field()?;
        self.iter().find(|r| {
            r.as_entry_field()
                .is_some_and(|f| f.entry == entry.id() && f.template_field == template_field.id())
        })
    }

    // --- Groupings ---

    /// The groupings of a collection, in insertion order.
    pub fn groupings_of_collection(&self, collection: &Record) -> Vec<&Record> {
        if collection.as_collection().is_none() {
            return Vec::new();
        }
        self.iter()
            .filter(|r| {
                r.as_grouping()
                    .is_some_and(|g| g.collection == collection.id())
            })
            .collect()
    }

    /// The collection a grouping belongs to.
    pub fn collection_of_grouping(&self, grouping: &Record) -> Option<&Record> {
        let g = grouping.as_grouping()?;
        self.resolve(g.collection, RecordKind::Collection)
    }

    /// The membership refs of a grouping.
    pub fn entry_refs_of_grouping(&self, grouping: &Record) -> Vec<&Record> {
        if grouping.as_grouping().is_none() {
            return Vec::new();
        }
        self.iter()
            .filter(|r| {
                r.as_grouping_entry_ref()
                    .is_some_and(|er| er.grouping == grouping.id())
            })
            .collect()
    }

    /// The entries of a grouping, resolved through its refs. Refs whose
    /// entry no longer exists are skipped.
    pub fn entries_of_grouping(&self, grouping: &Record) -> Vec<&Record> {
        self.entry_refs_of_grouping(grouping)
            .into_iter()
            .filter_map(|r| {
                let er = r.as_grouping_entry_ref()?;
                self.resolve(er.entry, RecordKind::Entry)
            })
            .collect()
    }

    /// Every grouping membership ref pointing at an entry. The cascade a
    /// caller runs when deleting an entry starts here.
    pub fn refs_of_entry(&self, entry: &Record) -> Vec<&Record> {
        if entry.as_entry().is_none() {
            return Vec::new();
        }
        self.iter()
            .filter(|r| {
                r.as_grouping_entry_ref()
                    .is_some_and(|er| er.entry == entry.id())
            })
            .collect()
    }

    /// The grouping a membership ref belongs to.
    pub fn grouping_of_entry_ref(&self, entry_ref: &Record) -> Option<&Record> {
        let er = entry_ref.as_grouping_entry_ref()?;
        self.resolve(er.grouping, RecordKind::Grouping)
    }

    /// The entry a membership ref points at.
    pub fn entry_of_entry_ref(&self, entry_ref: &Record) -> Option<&Record> {
        let er = entry_ref.as_grouping_entry_ref()?;
        self.resolve(er.entry, RecordKind::Entry)
    }

    /// The auto-generated "all" grouping of a collection: the grouping
    /// named `all` with the lowest id. It is created by the application
    /// when the collection is created and holds every entry.
    pub fn default_grouping_of(&self, collection: &Record) -> Option<&Record> {
        self.groupings_of_collection(collection)
            .into_iter()
            .filter(|g| g.as_grouping().is_some_and(|g| g.name == "all"))
            .min_by_key(|g| g.id())
    }
}
