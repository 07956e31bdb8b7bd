//! Load path: decode a catalog file into a fresh store.
//!
//! Records are accumulated into a new list and the store is built only on
//! full success; a caller's existing store is never touched by a failed
//! load.

use super::Reader;
use crate::error::{Result, StoreError};
use crate::records::{
    Collection, Database, Entry, EntryField, Grouping, GroupingCondition, GroupingEntryRef,
    Record, RecordBody, Template, TemplateColumn, TemplateField,
};
use crate::store::Store;
use crate::types::{
    CurrencyValue, ExtraImagePos, FieldDataType, FieldValue, RecordId, RecordKind, Rgb,
};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Load a store from a file.
pub fn load(path: impl AsRef<Path>) -> Result<Store> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "catalog load failed");
            return Err(e.into());
        }
    };
    match from_bytes(&bytes) {
        Ok(store) => {
            debug!(path = %path.display(), records = store.len(), "catalog loaded");
            Ok(store)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "catalog load failed");
            Err(e)
        }
    }
}

/// Decode a store from an in-memory buffer.
pub fn from_bytes(bytes: &[u8]) -> Result<Store> {
    let mut reader = Reader::new(bytes);

    // Informational only; not validated against a supported-version list.
    let _version = reader.string()?;

    let mut records = Vec::new();
    while !reader.is_at_end() {
        records.push(decode_record(&mut reader)?);
    }
    Ok(Store::from_records(records))
}

fn decode_record(r: &mut Reader) -> Result<Record> {
    let kind_byte = r.u8()?;
    let kind = RecordKind::from_byte(kind_byte).ok_or_else(|| {
        StoreError::InvalidValue(format!("unknown record kind {kind_byte}"))
    })?;
    let id = RecordId(r.u64()?);

    let body = match kind {
        RecordKind::Database => RecordBody::Database(Database {
            name: r.string()?,
            def_use_edit_mode: r.bool()?,
            def_search_by_text: r.bool()?,
            def_cache_data: r.bool()?,
            description: r.string()?,
            image_background_enabled: r.bool()?,
            image_url: r.string()?,
        }),
        RecordKind::Template => RecordBody::Template(Template {
            name: r.string()?,
            center_images: r.bool()?,
            two_columns: r.bool()?,
            num_extra_images: r.u8()?,
            extra_image_pos: {
                let raw = r.i32()?;
                ExtraImagePos::from_i32(raw).ok_or_else(|| {
                    StoreError::InvalidValue(format!("unknown extra image position {raw}"))
                })?
            },
            font_families: r.string()?,
            header_color: Rgb::new(r.u8()?, r.u8()?, r.u8()?),
            content_color: Rgb::new(r.u8()?, r.u8()?, r.u8()?),
        }),
        RecordKind::TemplateField => RecordBody::TemplateField(TemplateField {
            name: r.string()?,
            column: RecordId(r.u64()?),
            data_type: {
                let raw = r.i32()?;
                FieldDataType::from_i32(raw).ok_or_else(|| {
                    StoreError::InvalidValue(format!("unknown field data type {raw}"))
                })?
            },
            is_visible: r.bool()?,
            is_title_visible: r.bool()?,
            is_title_inline: r.bool()?,
            column_order: r.i32()?,
        }),
        RecordKind::TemplateColumn => RecordBody::TemplateColumn(TemplateColumn {
            is_first_column: r.bool()?,
            template: RecordId(r.u64()?),
        }),
        RecordKind::Collection => RecordBody::Collection(Collection {
            name: r.string()?,
            description: r.string()?,
            template: RecordId(r.u64()?),
        }),
        RecordKind::Grouping => {
            let name = r.string()?;
            let collection = RecordId(r.u64()?);
            let count = r.u32()? as usize;
            let mut conditions = Vec::with_capacity(count.min(1024));
            for _ in 0..count {
                conditions.push(GroupingCondition {
                    condition_type: r.u8()?,
                    name1: r.string()?,
                    name2: r.string()?,
                    field: RecordId(r.u64()?),
                });
            }
            RecordBody::Grouping(Grouping {
                name,
                collection,
                conditions,
            })
        }
        RecordKind::GroupingEntryRef => RecordBody::GroupingEntryRef(GroupingEntryRef {
            grouping: RecordId(r.u64()?),
            entry: RecordId(r.u64()?),
        }),
        RecordKind::Entry => RecordBody::Entry(Entry {
            name: r.string()?,
            collection: RecordId(r.u64()?),
        }),
        RecordKind::EntryField => {
            let entry = RecordId(r.u64()?);
            let template_field = RecordId(r.u64()?);
            let len = r.i32()?;
            if len < 0 {
                return Err(StoreError::InvalidValue(format!(
                    "negative field data length {len}"
                )));
            }
            let blob = r.take(len as usize)?;
            let value = decode_field_value(blob)?;
            RecordBody::EntryField(EntryField {
                entry,
                template_field,
                value,
            })
        }
    };

    Ok(Record::new(id, body))
}

/// Decode a self-describing field value blob. The blob is fully present by
/// the time this runs, so any failure inside it — unknown tag, short
/// payload, trailing bytes — is an undecodable-value error, not truncation.
fn decode_field_value(blob: &[u8]) -> Result<FieldValue> {
    let mut r = Reader::new(blob);

    let undecodable = |e: StoreError| match e {
        StoreError::Truncated { .. } => {
            StoreError::InvalidValue("field data blob is shorter than its payload".into())
        }
        other => other,
    };

    let tag = r.u8().map_err(undecodable)?;
    let data_type = FieldDataType::from_i32(tag as i32)
        .ok_or_else(|| StoreError::InvalidValue(format!("unknown field data tag {tag}")))?;

    let value = match data_type {
        FieldDataType::Text => FieldValue::Text(r.string().map_err(undecodable)?),
        FieldDataType::Memo => FieldValue::Memo(r.string().map_err(undecodable)?),
        FieldDataType::Number => FieldValue::Number(r.i64().map_err(undecodable)?),
        FieldDataType::Checkbox => FieldValue::Checkbox(r.bool().map_err(undecodable)?),
        FieldDataType::Date => FieldValue::Date(r.i64().map_err(undecodable)?),
        FieldDataType::Currency => FieldValue::Currency(CurrencyValue {
            amount: r.string().map_err(undecodable)?,
            code: r.string().map_err(undecodable)?,
            symbol: r.string().map_err(undecodable)?,
        }),
        FieldDataType::Url => FieldValue::Url(r.string().map_err(undecodable)?),
        FieldDataType::Image => FieldValue::Image(r.string().map_err(undecodable)?),
        FieldDataType::Video => FieldValue::Video(r.string().map_err(undecodable)?),
    };

    if !r.is_at_end() {
        return Err(StoreError::InvalidValue(format!(
            "field data blob has {} trailing bytes",
            blob.len() - r.offset()
        )));
    }

    Ok(value)
}
