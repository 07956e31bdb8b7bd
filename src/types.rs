//! Core types for the record store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a record.
///
/// Ids are allocated by the store, never reused, and never mutated after
/// creation. Id 0 is never allocated and acts as a "no reference" value in
/// the few places a reference slot is unused.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct RecordId(pub u64);

impl RecordId {
    /// The reserved "no reference" id.
    pub const NONE: RecordId = RecordId(0);

    pub fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Type discriminant of a record, determining its field schema.
///
/// The numeric values are the on-disk kind bytes and must not change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum RecordKind {
    Database = 0,
    Template = 1,
    TemplateField = 2,
    TemplateColumn = 3,
    Collection = 4,
    Grouping = 5,
    GroupingEntryRef = 6,
    Entry = 7,
    EntryField = 8,
}

impl RecordKind {
    /// On-disk discriminant.
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decode an on-disk discriminant.
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(RecordKind::Database),
            1 => Some(RecordKind::Template),
            2 => Some(RecordKind::TemplateField),
            3 => Some(RecordKind::TemplateColumn),
            4 => Some(RecordKind::Collection),
            5 => Some(RecordKind::Grouping),
            6 => Some(RecordKind::GroupingEntryRef),
            7 => Some(RecordKind::Entry),
            8 => Some(RecordKind::EntryField),
            _ => None,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Database => "database",
            RecordKind::Template => "template",
            RecordKind::TemplateField => "template-field",
            RecordKind::TemplateColumn => "template-column",
            RecordKind::Collection => "collection",
            RecordKind::Grouping => "grouping",
            RecordKind::GroupingEntryRef => "grouping-entry-ref",
            RecordKind::Entry => "entry",
            RecordKind::EntryField => "entry-field",
        };
        write!(f, "{name}")
    }
}

/// Data type of a template field, fixing how entry field values for it are
/// encoded and rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(i32)]
pub enum FieldDataType {
    Text = 0,
    Memo = 1,
    Number = 2,
    Checkbox = 3,
    Date = 4,
    Currency = 5,
    Url = 6,
    Image = 7,
    Video = 8,
}

impl FieldDataType {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(FieldDataType::Text),
            1 => Some(FieldDataType::Memo),
            2 => Some(FieldDataType::Number),
            3 => Some(FieldDataType::Checkbox),
            4 => Some(FieldDataType::Date),
            5 => Some(FieldDataType::Currency),
            6 => Some(FieldDataType::Url),
            7 => Some(FieldDataType::Image),
            8 => Some(FieldDataType::Video),
            _ => None,
        }
    }

    /// Whether values of this type carry a file path that the codec must
    /// rewrite for portability.
    pub fn is_image_bearing(self) -> bool {
        matches!(self, FieldDataType::Image | FieldDataType::Video)
    }

    /// Short type name for diagnostics.
    pub fn type_name(self) -> &'static str {
        match self {
            FieldDataType::Text => "text",
            FieldDataType::Memo => "memo",
            FieldDataType::Number => "number",
            FieldDataType::Checkbox => "checkbox",
            FieldDataType::Date => "date",
            FieldDataType::Currency => "currency",
            FieldDataType::Url => "url",
            FieldDataType::Image => "image",
            FieldDataType::Video => "video",
        }
    }
}

/// Placement of extra images on a template layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[repr(i32)]
pub enum ExtraImagePos {
    #[default]
    Right = 0,
    Under = 1,
    Left = 2,
    Above = 3,
}

impl ExtraImagePos {
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(ExtraImagePos::Right),
            1 => Some(ExtraImagePos::Under),
            2 => Some(ExtraImagePos::Left),
            3 => Some(ExtraImagePos::Above),
            _ => None,
        }
    }
}

/// An RGB color as three channel bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A currency amount as the fixed string triple the catalog format uses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CurrencyValue {
    pub amount: String,
    pub code: String,
    pub symbol: String,
}

/// The value of an entry field.
///
/// Exactly one variant per [`FieldDataType`]; each has its own explicit
/// on-disk encoding (see the codec module). `Image` and `Video` hold file
/// paths and are subject to the codec's path-portability pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Memo(String),
    Number(i64),
    Checkbox(bool),
    /// Unix timestamp, seconds.
    Date(i64),
    Currency(CurrencyValue),
    Url(String),
    Image(String),
    Video(String),
}

impl FieldValue {
    /// The data type this value is shaped for.
    pub fn data_type(&self) -> FieldDataType {
        match self {
            FieldValue::Text(_) => FieldDataType::Text,
            FieldValue::Memo(_) => FieldDataType::Memo,
            FieldValue::Number(_) => FieldDataType::Number,
            FieldValue::Checkbox(_) => FieldDataType::Checkbox,
            FieldValue::Date(_) => FieldDataType::Date,
            FieldValue::Currency(_) => FieldDataType::Currency,
            FieldValue::Url(_) => FieldDataType::Url,
            FieldValue::Image(_) => FieldDataType::Image,
            FieldValue::Video(_) => FieldDataType::Video,
        }
    }

    /// An empty value of the given data type.
    pub fn empty(data_type: FieldDataType) -> Self {
        match data_type {
            FieldDataType::Text => FieldValue::Text(String::new()),
            FieldDataType::Memo => FieldValue::Memo(String::new()),
            FieldDataType::Number => FieldValue::Number(0),
            FieldDataType::Checkbox => FieldValue::Checkbox(false),
            FieldDataType::Date => FieldValue::Date(0),
            FieldDataType::Currency => FieldValue::Currency(CurrencyValue::default()),
            FieldDataType::Url => FieldValue::Url(String::new()),
            FieldDataType::Image => FieldValue::Image(String::new()),
            FieldDataType::Video => FieldValue::Video(String::new()),
        }
    }

    /// Short type name for diagnostics.
    pub fn type_name(&self) -> &'static str {
        self.data_type().type_name()
    }
}
