use parquet::file::page_index::column_index::ColumnIndexMetaData;
use parquet::schema::types::ColumnPath;
use rstest::rstest;

use pageindex::core::PageIndexError;
use pageindex::store::{IndexLookup, IndexStore, create};
use pageindex::testutil::{
    CountingSource, Fault, column_index_reference, generate_parquet_bytes,
    offset_index_reference, read_metadata, without_offset_index, writer_properties,
};

const NUM_ROWS: usize = 1000;

fn paths(columns: &[&str]) -> Vec<ColumnPath> {
    columns.iter().map(|c| ColumnPath::from(*c)).collect()
}

fn assert_empty_store(store: &IndexStore<'_>, columns: &[&str]) {
    assert!(store.is_empty_store());
    for column in columns {
        let path = ColumnPath::from(*column);
        assert!(store.column_index(&path).is_none());
        assert_eq!(
            store.offset_index(&path).err(),
            Some(PageIndexError::MissingOffsetIndex(column.to_string()))
        );
    }
}

#[test]
fn test_projection_subset_scenario() {
    let data = generate_parquet_bytes(&["a", "b", "c"], NUM_ROWS, writer_properties());
    let meta = read_metadata(&data);
    let row_group = meta.row_group(0);
    let source = CountingSource::new(data);

    let store = create(&source, row_group, &paths(&["a", "c"]));
    assert!(!store.is_empty_store());
    let IndexStore::Loaded(loaded) = &store else {
        panic!("expected a loaded store");
    };
    assert_eq!(loaded.len(), 2);

    let b = ColumnPath::from("b");
    assert_eq!(
        store.offset_index(&b).err(),
        Some(PageIndexError::MissingOffsetIndex("b".to_string()))
    );
    assert!(store.column_index(&b).is_none());

    match store.column_index(&ColumnPath::from("a")) {
        Some(ColumnIndexMetaData::INT64(index)) => {
            assert_eq!(index.min_values()[0], 0);
            assert_eq!(index.max_values()[0], 99);
        }
        other => panic!("unexpected column index for a: {other:?}"),
    }
    // Column c holds row * 3.
    match store.column_index(&ColumnPath::from("c")) {
        Some(ColumnIndexMetaData::INT64(index)) => assert_eq!(index.max_values()[0], 297),
        other => panic!("unexpected column index for c: {other:?}"),
    }

    assert_eq!(source.reads_of(offset_index_reference(row_group, "b")), 0);
    assert_eq!(source.reads_of(column_index_reference(row_group, "b")), 0);
}

#[test]
fn test_unrequested_column_without_offset_index_is_not_validated() {
    let data = generate_parquet_bytes(&["a", "b", "c"], NUM_ROWS, writer_properties());
    let meta = read_metadata(&data);
    let row_group = without_offset_index(meta.row_group(0), "b");
    let source = CountingSource::new(data);

    let store = create(&source, &row_group, &paths(&["a", "c"]));
    assert!(!store.is_empty_store());
    assert!(store.offset_index(&ColumnPath::from("a")).is_ok());
    assert!(store.offset_index(&ColumnPath::from("c")).is_ok());
    assert!(store.offset_index(&ColumnPath::from("b")).is_err());
}

#[rstest]
#[case::read_error(Fault::Error)]
#[case::garbage(Fault::Garbage)]
#[case::short_read(Fault::Short)]
fn test_offset_index_failure_degrades_to_empty_store(#[case] fault: Fault) {
    let data = generate_parquet_bytes(&["a", "b", "c"], NUM_ROWS, writer_properties());
    let meta = read_metadata(&data);
    let row_group = meta.row_group(0);
    let source =
        CountingSource::new(data).with_fault(offset_index_reference(row_group, "a"), fault);

    let store = create(&source, row_group, &paths(&["a", "b", "c"]));
    assert_empty_store(&store, &["a", "b", "c", "unknown"]);
}

#[test]
fn test_requested_column_without_offset_index_degrades_to_empty_store() {
    let data = generate_parquet_bytes(&["a", "b", "c"], NUM_ROWS, writer_properties());
    let meta = read_metadata(&data);
    let row_group = without_offset_index(meta.row_group(0), "c");
    let source = CountingSource::new(data);

    let store = create(&source, &row_group, &paths(&["a", "c"]));
    assert_empty_store(&store, &["a", "b", "c"]);
}

#[rstest]
#[case::read_error(Fault::Error)]
#[case::garbage(Fault::Garbage)]
#[case::short_read(Fault::Short)]
fn test_column_index_failure_keeps_offset_index(#[case] fault: Fault) {
    let data = generate_parquet_bytes(&["a", "b"], NUM_ROWS, writer_properties());
    let meta = read_metadata(&data);
    let row_group = meta.row_group(0);
    let reference = column_index_reference(row_group, "a");
    let source = CountingSource::new(data).with_fault(reference, fault);

    let store = create(&source, row_group, &paths(&["a", "b"]));
    let a = ColumnPath::from("a");
    assert!(store.column_index(&a).is_none());
    assert!(store.column_index(&a).is_none());
    assert_eq!(source.reads_of(reference), 1);

    let locations = store.offset_index(&a).unwrap().page_locations();
    assert_eq!(locations.len(), 10);
    assert_eq!(locations[0].first_row_index, 0);
    assert_eq!(locations[1].first_row_index, 100);

    assert!(store.column_index(&ColumnPath::from("b")).is_some());
}

#[test]
fn test_column_index_fetched_lazily_and_once() {
    let data = generate_parquet_bytes(&["a", "b"], NUM_ROWS, writer_properties());
    let meta = read_metadata(&data);
    let row_group = meta.row_group(0);
    let source = CountingSource::new(data);

    let store = create(&source, row_group, &paths(&["a", "b"]));
    assert_eq!(source.reads(), 2);

    let a = ColumnPath::from("a");
    for _ in 0..5 {
        assert!(store.column_index(&a).is_some());
    }
    assert_eq!(source.reads(), 3);
    assert_eq!(source.reads_of(column_index_reference(row_group, "a")), 1);
    assert_eq!(source.reads_of(column_index_reference(row_group, "b")), 0);
}

#[test]
fn test_create_is_idempotent() {
    let data = generate_parquet_bytes(&["a", "b", "c"], NUM_ROWS, writer_properties());
    let meta = read_metadata(&data);
    let row_group = meta.row_group(0);
    let source = CountingSource::new(data);
    let projection = paths(&["a", "b"]);

    let first = create(&source, row_group, &projection);
    let second = create(&source, row_group, &projection);
    for column in ["a", "b", "c"] {
        let path = ColumnPath::from(column);
        assert_eq!(
            format!("{:?}", first.offset_index(&path)),
            format!("{:?}", second.offset_index(&path))
        );
        assert_eq!(
            format!("{:?}", first.column_index(&path)),
            format!("{:?}", second.column_index(&path))
        );
    }
}

#[test]
fn test_concurrent_lookups_read_each_column_index_once() {
    let data = generate_parquet_bytes(&["a", "b"], NUM_ROWS, writer_properties());
    let meta = read_metadata(&data);
    let row_group = meta.row_group(0);
    let source = CountingSource::new(data);
    let store = create(&source, row_group, &paths(&["a", "b"]));

    std::thread::scope(|s| {
        for i in 0..8 {
            let store = &store;
            s.spawn(move || {
                let column = if i % 2 == 0 { "a" } else { "b" };
                assert!(store.column_index(&ColumnPath::from(column)).is_some());
            });
        }
    });
    assert_eq!(source.reads_of(column_index_reference(row_group, "a")), 1);
    assert_eq!(source.reads_of(column_index_reference(row_group, "b")), 1);
}
