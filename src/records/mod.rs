//! Record model: one typed, id-addressed node in the catalog hierarchy.
//!
//! A [`Record`] pairs an immutable identity with a kind-specific body.
//! Parent/child relationships are never structural pointers; they are
//! [`RecordId`] fields resolved on demand by the store's navigation
//! queries, so a dangling reference degrades to "not found" instead of
//! invalidating the structure.

use crate::types::{ExtraImagePos, FieldDataType, FieldValue, RecordId, RecordKind, Rgb};
use serde::{Deserialize, Serialize};

/// Top-level settings for one catalog database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Database {
    pub name: String,
    pub def_use_edit_mode: bool,
    pub def_search_by_text: bool,
    pub def_cache_data: bool,
    pub description: String,
    pub image_background_enabled: bool,
    /// Background image path; rewritten by the codec's portability pass.
    pub image_url: String,
}

/// Layout template shared by collections.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub name: String,
    pub center_images: bool,
    pub two_columns: bool,
    pub num_extra_images: u8,
    pub extra_image_pos: ExtraImagePos,
    pub font_families: String,
    pub header_color: Rgb,
    pub content_color: Rgb,
}

impl Template {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            center_images: false,
            two_columns: false,
            num_extra_images: 0,
            extra_image_pos: ExtraImagePos::default(),
            font_families: String::new(),
            header_color: Rgb::default(),
            content_color: Rgb::default(),
        }
    }
}

/// One column of a template layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateColumn {
    pub is_first_column: bool,
    /// Owning template.
    pub template: RecordId,
}

impl TemplateColumn {
    pub fn new(template: RecordId, is_first_column: bool) -> Self {
        Self {
            is_first_column,
            template,
        }
    }
}

/// A field definition within a template column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TemplateField {
    pub name: String,
    /// Owning column.
    pub column: RecordId,
    pub data_type: FieldDataType,
    pub is_visible: bool,
    pub is_title_visible: bool,
    pub is_title_inline: bool,
    pub column_order: i32,
}

impl TemplateField {
    pub fn new(name: impl Into<String>, column: RecordId, data_type: FieldDataType) -> Self {
        Self {
            name: name.into(),
            column,
            data_type,
            is_visible: true,
            is_title_visible: true,
            is_title_inline: false,
            column_order: 0,
        }
    }
}

/// A collection of entries rendered through one template.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    pub description: String,
    /// Template the collection renders through.
    pub template: RecordId,
}

impl Collection {
    pub fn new(name: impl Into<String>, template: RecordId) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            template,
        }
    }
}

/// Letter-range grouping condition. `condition_type` 0 is the only defined
/// kind; the discriminant is reserved for future condition kinds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupingCondition {
    pub condition_type: u8,
    pub name1: String,
    pub name2: String,
    /// Template field the condition keys off, or [`RecordId::NONE`].
    pub field: RecordId,
}

impl GroupingCondition {
    /// The letter-range condition discriminant.
    pub const LETTER_RANGE: u8 = 0;

    pub fn letter_range(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            condition_type: Self::LETTER_RANGE,
            name1: start.into(),
            name2: end.into(),
            field: RecordId::NONE,
        }
    }
}

/// A named subset of a collection's entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    pub name: String,
    /// Owning collection.
    pub collection: RecordId,
    pub conditions: Vec<GroupingCondition>,
}

impl Grouping {
    pub fn new(name: impl Into<String>, collection: RecordId) -> Self {
        Self {
            name: name.into(),
            collection,
            conditions: Vec::new(),
        }
    }
}

/// Membership of an entry in a grouping.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupingEntryRef {
    pub grouping: RecordId,
    pub entry: RecordId,
}

impl GroupingEntryRef {
    pub fn new(grouping: RecordId, entry: RecordId) -> Self {
        Self { grouping, entry }
    }
}

/// One cataloged item.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    pub name: String,
    /// Owning collection.
    pub collection: RecordId,
}

impl Entry {
    pub fn new(name: impl Into<String>, collection: RecordId) -> Self {
        Self {
            name: name.into(),
            collection,
        }
    }
}

/// The value of one template field for one entry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntryField {
    pub entry: RecordId,
    pub template_field: RecordId,
    pub value: FieldValue,
}

impl EntryField {
    pub fn new(entry: RecordId, template_field: RecordId, value: FieldValue) -> Self {
        Self {
            entry,
            template_field,
            value,
        }
    }
}

/// Kind-specific body of a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RecordBody {
    Database(Database),
    Template(Template),
    TemplateField(TemplateField),
    TemplateColumn(TemplateColumn),
    Collection(Collection),
    Grouping(Grouping),
    GroupingEntryRef(GroupingEntryRef),
    Entry(Entry),
    EntryField(EntryField),
}

impl RecordBody {
    pub fn kind(&self) -> RecordKind {
        match self {
            RecordBody::Database(_) => RecordKind::Database,
            RecordBody::Template(_) => RecordKind::Template,
            RecordBody::TemplateField(_) => RecordKind::TemplateField,
            RecordBody::TemplateColumn(_) => RecordKind::TemplateColumn,
            RecordBody::Collection(_) => RecordKind::Collection,
            RecordBody::Grouping(_) => RecordKind::Grouping,
            RecordBody::GroupingEntryRef(_) => RecordKind::GroupingEntryRef,
            RecordBody::Entry(_) => RecordKind::Entry,
            RecordBody::EntryField(_) => RecordKind::EntryField,
        }
    }
}

/// A single record in the store.
///
/// Equality is identity equality: two records are equal iff their ids are.
/// Cloning yields an independent copy of the body with the same identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    pub body: RecordBody,
}

impl Record {
    /// Construct a record. The id is fixed for the record's lifetime.
    pub fn new(id: RecordId, body: RecordBody) -> Self {
        Self { id, body }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn kind(&self) -> RecordKind {
        self.body.kind()
    }

    /// Display name, where the kind has one.
    pub fn name(&self) -> Option<&str> {
        match &self.body {
            RecordBody::Database(d) => Some(&d.name),
            RecordBody::Template(t) => Some(&t.name),
            RecordBody::TemplateField(f) => Some(&f.name),
            RecordBody::Collection(c) => Some(&c.name),
            RecordBody::Grouping(g) => Some(&g.name),
            RecordBody::Entry(e) => Some(&e.name),
            RecordBody::TemplateColumn(_)
            | RecordBody::GroupingEntryRef(_)
            | RecordBody::EntryField(_) => None,
        }
    }

    pub fn as_database(&self) -> Option<&Database> {
        match &self.body {
            RecordBody::Database(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_database_mut(&mut self) -> Option<&mut Database> {
        match &mut self.body {
            RecordBody::Database(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_template(&self) -> Option<&Template> {
        match &self.body {
            RecordBody::Template(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_template_mut(&mut self) -> Option<&mut Template> {
        match &mut self.body {
            RecordBody::Template(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_template_field(&self) -> Option<&TemplateField> {
        match &self.body {
            RecordBody::TemplateField(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_template_field_mut(&mut self) -> Option<&mut TemplateField> {
        match &mut self.body {
            RecordBody::TemplateField(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_template_column(&self) -> Option<&TemplateColumn> {
        match &self.body {
            RecordBody::TemplateColumn(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_template_column_mut(&mut self) -> Option<&mut TemplateColumn> {
        match &mut self.body {
            RecordBody::TemplateColumn(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&Collection> {
        match &self.body {
            RecordBody::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_collection_mut(&mut self) -> Option<&mut Collection> {
        match &mut self.body {
            RecordBody::Collection(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_grouping(&self) -> Option<&Grouping> {
        match &self.body {
            RecordBody::Grouping(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_grouping_mut(&mut self) -> Option<&mut Grouping> {
        match &mut self.body {
            RecordBody::Grouping(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_grouping_entry_ref(&self) -> Option<&GroupingEntryRef> {
        match &self.body {
            RecordBody::GroupingEntryRef(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_entry(&self) -> Option<&Entry> {
        match &self.body {
            RecordBody::Entry(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_entry_mut(&mut self) -> Option<&mut Entry> {
        match &mut self.body {
            RecordBody::Entry(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_entry_field(&self) -> Option<&EntryField> {
        match &self.body {
            RecordBody::EntryField(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_entry_field_mut(&mut self) -> Option<&mut EntryField> {
        match &mut self.body {
            RecordBody::EntryField(f) => Some(f),
            _ => None,
        }
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Record {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_is_identity_only() {
        let a = Record::new(
            RecordId(1),
            RecordBody::Entry(Entry::new("Dune", RecordId(7))),
        );
        let b = Record::new(
            RecordId(1),
            RecordBody::Entry(Entry::new("Neuromancer", RecordId(9))),
        );
        let c = Record::new(
            RecordId(2),
            RecordBody::Entry(Entry::new("Dune", RecordId(7))),
        );

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_clone_is_independent() {
        let original = Record::new(
            RecordId(3),
            RecordBody::Entry(Entry::new("Dune", RecordId(7))),
        );
        let mut copy = original.clone();
        copy.as_entry_mut().unwrap().name = "Dune Messiah".into();

        assert_eq!(original.as_entry().unwrap().name, "Dune");
        assert_eq!(copy.as_entry().unwrap().name, "Dune Messiah");
        assert_eq!(original, copy); // same identity
    }

    #[test]
    fn test_kind_matches_body() {
        let record = Record::new(
            RecordId(1),
            RecordBody::Grouping(Grouping::new("all", RecordId(2))),
        );
        assert_eq!(record.kind(), RecordKind::Grouping);
        assert!(record.as_grouping().is_some());
        assert!(record.as_entry().is_none());
    }

    #[test]
    fn test_letter_range_condition() {
        let cond = GroupingCondition::letter_range("A", "M");
        assert_eq!(cond.condition_type, GroupingCondition::LETTER_RANGE);
        assert_eq!(cond.name1, "A");
        assert_eq!(cond.name2, "M");
        assert!(cond.field.is_none());
    }

    #[test]
    fn test_record_name() {
        let entry = Record::new(
            RecordId(1),
            RecordBody::Entry(Entry::new("Dune", RecordId(7))),
        );
        assert_eq!(entry.name(), Some("Dune"));

        let column = Record::new(
            RecordId(2),
            RecordBody::TemplateColumn(TemplateColumn::new(RecordId(1), true)),
        );
        assert_eq!(column.name(), None);
    }
}
