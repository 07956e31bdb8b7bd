//! Save path: encode a store into the catalog file layout.
//!
//! The whole stream is buffered in memory first; the destination is then
//! written through a temp file and an atomic rename, so a partial or
//! corrupt file is never observable.

use super::{put_bool, put_i32, put_i64, put_string, put_u32, put_u64, put_u8, FORMAT_VERSION};
use crate::error::{Result, StoreError};
use crate::records::{EntryField, Record, RecordBody};
use crate::store::Store;
use crate::types::FieldValue;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Save a store to a file.
///
/// The destination is either fully written or left untouched. Fails with
/// [`StoreError::FieldShapeMismatch`] if any entry field's value
/// contradicts the data type of its resolved field definition — the save
/// is all-or-nothing.
pub fn save(store: &Store, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let dest_dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    let buf = encode(store, dest_dir)?;

    let tmp = match path.file_name() {
        Some(name) => {
            let mut tmp_name = name.to_os_string();
            tmp_name.push(".tmp");
            path.with_file_name(tmp_name)
        }
        None => {
            return Err(
                io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name").into(),
            )
        }
    };

    if let Err(e) = fs::write(&tmp, &buf).and_then(|_| fs::rename(&tmp, path)) {
        warn!(path = %path.display(), error = %e, "catalog save failed");
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    debug!(path = %path.display(), records = store.len(), bytes = buf.len(), "catalog saved");
    Ok(())
}

/// Encode a store to an in-memory buffer.
///
/// No path-portability rewriting happens here; there is no destination
/// directory to be portable against.
pub fn to_bytes(store: &Store) -> Result<Vec<u8>> {
    encode(store, None)
}

fn encode(store: &Store, dest_dir: Option<&Path>) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    put_string(&mut buf, FORMAT_VERSION);
    for record in store.iter() {
        encode_record(&mut buf, record, store, dest_dir)?;
    }
    Ok(buf)
}

fn encode_record(
    buf: &mut Vec<u8>,
    record: &Record,
    store: &Store,
    dest_dir: Option<&Path>,
) -> Result<()> {
    put_u8(buf, record.kind().as_byte());
    put_u64(buf, record.id().0);

    match &record.body {
        RecordBody::Database(d) => {
            put_string(buf, &d.name);
            put_bool(buf, d.def_use_edit_mode);
            put_bool(buf, d.def_search_by_text);
            put_bool(buf, d.def_cache_data);
            put_string(buf, &d.description);
            put_bool(buf, d.image_background_enabled);
            put_string(buf, &make_portable(&d.image_url, dest_dir));
        }
        RecordBody::Template(t) => {
            put_string(buf, &t.name);
            put_bool(buf, t.center_images);
            put_bool(buf, t.two_columns);
            put_u8(buf, t.num_extra_images);
            put_i32(buf, t.extra_image_pos.as_i32());
            put_string(buf, &t.font_families);
            put_u8(buf, t.header_color.r);
            put_u8(buf, t.header_color.g);
            put_u8(buf, t.header_color.b);
            put_u8(buf, t.content_color.r);
            put_u8(buf, t.content_color.g);
            put_u8(buf, t.content_color.b);
        }
        RecordBody::TemplateField(f) => {
            put_string(buf, &f.name);
            put_u64(buf, f.column.0);
            put_i32(buf, f.data_type.as_i32());
            put_bool(buf, f.is_visible);
            put_bool(buf, f.is_title_visible);
            put_bool(buf, f.is_title_inline);
            put_i32(buf, f.column_order);
        }
        RecordBody::TemplateColumn(c) => {
            put_bool(buf, c.is_first_column);
            put_u64(buf, c.template.0);
        }
        RecordBody::Collection(c) => {
            put_string(buf, &c.name);
            put_string(buf, &c.description);
            put_u64(buf, c.template.0);
        }
        RecordBody::Grouping(g) => {
            put_string(buf, &g.name);
            put_u64(buf, g.collection.0);
            put_u32(buf, g.conditions.len() as u32);
            for cond in &g.conditions {
                put_u8(buf, cond.condition_type);
                put_string(buf, &cond.name1);
                put_string(buf, &cond.name2);
                put_u64(buf, cond.field.0);
            }
        }
        RecordBody::GroupingEntryRef(r) => {
            put_u64(buf, r.grouping.0);
            put_u64(buf, r.entry.0);
        }
        RecordBody::Entry(e) => {
            put_string(buf, &e.name);
            put_u64(buf, e.collection.0);
        }
        RecordBody::EntryField(f) => {
            encode_entry_field(buf, record.id().0, f, store, dest_dir)?;
        }
    }

    Ok(())
}

fn encode_entry_field(
    buf: &mut Vec<u8>,
    record_id: u64,
    field: &EntryField,
    store: &Store,
    dest_dir: Option<&Path>,
) -> Result<()> {
    put_u64(buf, field.entry.0);
    put_u64(buf, field.template_field.0);

    // A value whose shape contradicts its resolved field definition is a
    // prior mutation bug; the whole save aborts. A dangling definition
    // reference cannot be checked and the value is written as-is.
    if let Some(def) = store
        .get_by_id(field.template_field)
        .and_then(Record::as_template_field)
    {
        if def.data_type != field.value.data_type() {
            return Err(StoreError::FieldShapeMismatch {
                field: record_id,
                expected: def.data_type.type_name(),
                got: field.value.type_name(),
            });
        }
    }

    let blob = encode_field_value(&field.value, dest_dir);
    put_i32(buf, blob.len() as i32);
    buf.extend_from_slice(&blob);
    Ok(())
}

/// Encode a field value as a self-describing blob: one data-type tag byte,
/// then that type's payload.
pub(crate) fn encode_field_value(value: &FieldValue, dest_dir: Option<&Path>) -> Vec<u8> {
    let mut blob = Vec::new();
    put_u8(&mut blob, value.data_type().as_i32() as u8);
    match value {
        FieldValue::Text(s) | FieldValue::Memo(s) | FieldValue::Url(s) => {
            put_string(&mut blob, s);
        }
        FieldValue::Number(n) => put_i64(&mut blob, *n),
        FieldValue::Checkbox(b) => put_bool(&mut blob, *b),
        FieldValue::Date(d) => put_i64(&mut blob, *d),
        FieldValue::Currency(c) => {
            put_string(&mut blob, &c.amount);
            put_string(&mut blob, &c.code);
            put_string(&mut blob, &c.symbol);
        }
        FieldValue::Image(p) | FieldValue::Video(p) => {
            put_string(&mut blob, &make_portable(p, dest_dir));
        }
    }
    blob
}

/// Rewrite an absolute path that lives under the destination directory to
/// be relative to it; anything else is left as-is.
fn make_portable(path_str: &str, dest_dir: Option<&Path>) -> String {
    let Some(dir) = dest_dir else {
        return path_str.to_owned();
    };
    let path = Path::new(path_str);
    if path.is_absolute() {
        if let Ok(rel) = path.strip_prefix(dir) {
            return rel.to_string_lossy().into_owned();
        }
    }
    path_str.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Collection, Entry, EntryField, Template, TemplateColumn, TemplateField};
    use crate::types::{FieldDataType, RecordId};

    #[test]
    fn test_make_portable() {
        let dir = Path::new("/home/user/catalogs");

        // Absolute and under the destination: rewritten.
        assert_eq!(
            make_portable("/home/user/catalogs/covers/dune.png", Some(dir)),
            "covers/dune.png"
        );
        // Absolute elsewhere: untouched.
        assert_eq!(
            make_portable("/mnt/media/dune.png", Some(dir)),
            "/mnt/media/dune.png"
        );
        // Already relative: untouched.
        assert_eq!(
            make_portable("covers/dune.png", Some(dir)),
            "covers/dune.png"
        );
        // Empty: untouched.
        assert_eq!(make_portable("", Some(dir)), "");
        // No destination directory: untouched.
        assert_eq!(make_portable("/mnt/media/dune.png", None), "/mnt/media/dune.png");
    }

    fn store_with_field(value: FieldValue, data_type: FieldDataType) -> Store {
        let mut store = Store::new();
        let template = store.add_template(Template::new("Books"));
        let column = store.add_template_column(TemplateColumn::new(template, true));
        let def = store.add_template_field(TemplateField::new("Title", column, data_type));
        let collection = store.add_collection(Collection::new("Library", template));
        let entry = store.add_entry(Entry::new("Dune", collection));
        store.add_field(EntryField::new(entry, def, value));
        store
    }

    #[test]
    fn test_shape_mismatch_aborts_save() {
        // A number value against a text field definition.
        let store = store_with_field(FieldValue::Number(42), FieldDataType::Text);
        match to_bytes(&store) {
            Err(StoreError::FieldShapeMismatch { expected, got, .. }) => {
                assert_eq!(expected, "text");
                assert_eq!(got, "number");
            }
            other => panic!("expected shape mismatch, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_dangling_definition_is_tolerated() {
        let mut store = Store::new();
        let collection = store.add_collection(Collection::new("Library", RecordId::NONE));
        let entry = store.add_entry(Entry::new("Dune", collection));
        // The definition id resolves to nothing; the blob is written as-is.
        store.add_field(EntryField::new(
            entry,
            RecordId(9999),
            FieldValue::Text("Dune".into()),
        ));
        assert!(to_bytes(&store).is_ok());
    }
}
