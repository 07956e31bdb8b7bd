//! Round-trip coverage for the binary codec.

use mdat_store::{
    codec, Collection, CurrencyValue, Entry, EntryField, FieldDataType, FieldValue, Grouping,
    GroupingEntryRef, RecordBody, RecordId, Store, Template, TemplateColumn, TemplateField,
};
use proptest::prelude::*;
use std::collections::BTreeMap;
use tempfile::TempDir;

/// Observational equality: same set of (id, body) pairs, order-independent.
fn assert_same_records(a: &Store, b: &Store) {
    let map_a: BTreeMap<u64, &RecordBody> = a.iter().map(|r| (r.id().0, &r.body)).collect();
    let map_b: BTreeMap<u64, &RecordBody> = b.iter().map(|r| (r.id().0, &r.body)).collect();
    assert_eq!(map_a, map_b);
}

#[test]
fn test_empty_store_roundtrip() {
    let store = Store::new();
    let loaded = codec::from_bytes(&codec::to_bytes(&store).unwrap()).unwrap();
    assert_same_records(&store, &loaded);
    assert_eq!(loaded.next_id(), store.next_id());
}

#[test]
fn test_counter_monotonicity_after_load() {
    let mut store = Store::new();
    let collection = store.add_collection(Collection::new("Library", RecordId::NONE));
    store.add_entry(Entry::new("Dune", collection));

    let loaded = codec::from_bytes(&codec::to_bytes(&store).unwrap()).unwrap();

    let max_id = loaded.iter().map(|r| r.id().0).max().unwrap();
    assert_eq!(loaded.next_id(), max_id + 1);
}

// The scenario from the design notes: a minimal catalog whose single entry
// field holds an empty string.
#[test]
fn test_minimal_catalog_with_empty_field() {
    let mut store = Store::new();
    let template = store.add_template(Template::new("Books"));
    let column = store.add_template_column(TemplateColumn::new(template, true));
    let def = store.add_template_field(TemplateField::new("Title", column, FieldDataType::Text));
    let collection = store.add_collection(Collection::new("Library", template));
    let entry = store.add_entry(Entry::new("Dune", collection));
    let field = store.add_field(EntryField::new(entry, def, FieldValue::Text(String::new())));

    let loaded = codec::from_bytes(&codec::to_bytes(&store).unwrap()).unwrap();

    let e = loaded.get_by_id(entry).unwrap();
    assert_eq!(e.as_entry().unwrap().name, "Dune");
    let f = loaded.get_by_id(field).unwrap();
    assert_eq!(
        f.as_entry_field().unwrap().value,
        FieldValue::Text(String::new())
    );
}

#[test]
fn test_grouping_conditions_roundtrip() {
    let mut store = Store::new();
    let collection = store.add_collection(Collection::new("Library", RecordId::NONE));
    let grouping = store.add_grouping(Grouping::new("By letter", collection));
    store.add_grouping_condition(grouping, "A", "M");
    store.add_grouping_condition(grouping, "N", "Z");
    let entry = store.add_entry(Entry::new("Dune", collection));
    store.add_grouping_entry_ref(GroupingEntryRef::new(grouping, entry));

    let loaded = codec::from_bytes(&codec::to_bytes(&store).unwrap()).unwrap();
    assert_same_records(&store, &loaded);

    let g = loaded.get_by_id(grouping).unwrap().as_grouping().unwrap();
    assert_eq!(g.conditions.len(), 2);
    assert_eq!(g.conditions[1].name1, "N");
}

#[test]
fn test_path_portability_on_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cat.mdat");

    let mut store = Store::new();
    let template = store.add_template(Template::new("Books"));
    let column = store.add_template_column(TemplateColumn::new(template, true));
    let cover_def =
        store.add_template_field(TemplateField::new("Cover", column, FieldDataType::Image));
    let collection = store.add_collection(Collection::new("Library", template));
    let entry = store.add_entry(Entry::new("Dune", collection));

    // Inside the destination directory: rewritten to relative.
    let inside = dir.path().join("covers/dune.png");
    let inside_field = store.add_field(EntryField::new(
        entry,
        cover_def,
        FieldValue::Image(inside.to_string_lossy().into_owned()),
    ));
    // Outside: left alone.
    let outside_field = store.add_field(EntryField::new(
        entry,
        cover_def,
        FieldValue::Image("/somewhere/else/dune.png".into()),
    ));
    store.database_mut().as_database_mut().unwrap().image_url =
        dir.path().join("bg.jpg").to_string_lossy().into_owned();

    codec::save(&store, &path).unwrap();
    let loaded = codec::load(&path).unwrap();

    assert_eq!(
        loaded
            .get_by_id(inside_field)
            .unwrap()
            .as_entry_field()
            .unwrap()
            .value,
        FieldValue::Image("covers/dune.png".into())
    );
    assert_eq!(
        loaded
            .get_by_id(outside_field)
            .unwrap()
            .as_entry_field()
            .unwrap()
            .value,
        FieldValue::Image("/somewhere/else/dune.png".into())
    );
    assert_eq!(
        loaded.database().as_database().unwrap().image_url,
        "bg.jpg"
    );

    // The in-memory store being saved was not mutated by the pass.
    assert_eq!(
        store
            .get_by_id(inside_field)
            .unwrap()
            .as_entry_field()
            .unwrap()
            .value,
        FieldValue::Image(inside.to_string_lossy().into_owned())
    );
}

#[test]
fn test_template_layout_roundtrip() {
    let mut store = Store::new();
    let mut template = Template::new("Movies");
    template.center_images = true;
    template.two_columns = true;
    template.num_extra_images = 4;
    template.extra_image_pos = mdat_store::ExtraImagePos::Under;
    template.font_families = "Inter, serif".into();
    template.header_color = mdat_store::Rgb::new(10, 20, 30);
    template.content_color = mdat_store::Rgb::new(200, 210, 220);
    let id = store.add_template(template.clone());

    let loaded = codec::from_bytes(&codec::to_bytes(&store).unwrap()).unwrap();
    assert_eq!(loaded.get_by_id(id).unwrap().as_template().unwrap(), &template);
}

fn field_value_strategy() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        ".{0,40}".prop_map(FieldValue::Text),
        ".{0,200}".prop_map(FieldValue::Memo),
        any::<i64>().prop_map(FieldValue::Number),
        any::<bool>().prop_map(FieldValue::Checkbox),
        any::<i64>().prop_map(FieldValue::Date),
        ("[0-9]{1,6}\\.[0-9]{2}", "[A-Z]{3}", ".{0,2}").prop_map(|(amount, code, symbol)| {
            FieldValue::Currency(CurrencyValue {
                amount,
                code,
                symbol,
            })
        }),
        ".{0,60}".prop_map(FieldValue::Url),
        ".{0,60}".prop_map(FieldValue::Image),
        ".{0,60}".prop_map(FieldValue::Video),
    ]
}

proptest! {
    // Buffer round-trips (no destination directory) preserve every record
    // exactly, whatever the names and values look like.
    #[test]
    fn prop_roundtrip_preserves_records(
        entry_names in proptest::collection::vec(".{0,40}", 0..6),
        values in proptest::collection::vec(field_value_strategy(), 0..6),
    ) {
        let mut store = Store::new();
        let template = store.add_template(Template::new("T"));
        let column = store.add_template_column(TemplateColumn::new(template, true));
        let collection = store.add_collection(Collection::new("C", template));

        for name in &entry_names {
            store.add_entry(Entry::new(name.clone(), collection));
        }

        let host = store.add_entry(Entry::new("host", collection));
        for value in &values {
            let def = store.add_template_field(TemplateField::new(
                "f",
                column,
                value.data_type(),
            ));
            store.add_field(EntryField::new(host, def, value.clone()));
        }

        let bytes = codec::to_bytes(&store).unwrap();
        let loaded = codec::from_bytes(&bytes).unwrap();

        assert_same_records(&store, &loaded);
        prop_assert_eq!(loaded.next_id(), store.next_id());
    }
}
