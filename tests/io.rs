use bytes::Bytes;
use parquet::file::metadata::ParquetMetaDataReader;
use tempfile::TempDir;

use pageindex::io::{
    DataSource, IndexReference, MmapSource, SourceReader, read_column_index, read_offset_index,
};
use pageindex::store::{IndexLookup, create};
use pageindex::testutil::{
    CountingSource, generate_parquet_bytes, read_metadata, writer_properties,
    writer_properties_without_column_index,
};

#[test]
fn test_references_present_for_page_statistics() {
    let data = generate_parquet_bytes(&["a"], 300, writer_properties());
    let meta = read_metadata(&data);
    let chunk = meta.row_group(0).column(0);

    let offset = IndexReference::offset_index(chunk).unwrap();
    let column = IndexReference::column_index(chunk).unwrap();
    assert!(offset.length > 0);
    assert!(column.length > 0);
    assert!(offset.offset + offset.length as u64 <= data.len() as u64);
    assert_ne!(offset.offset, column.offset);
}

#[test]
fn test_read_offset_index_single_read() {
    let data = generate_parquet_bytes(&["a"], 300, writer_properties());
    let meta = read_metadata(&data);
    let chunk = meta.row_group(0).column(0);
    let source = CountingSource::new(data);

    let index = read_offset_index(&source, chunk).unwrap().unwrap();
    assert_eq!(index.page_locations().len(), 3);
    assert_eq!(source.reads(), 1);
    assert_eq!(source.reads_of(IndexReference::offset_index(chunk).unwrap()), 1);
}

#[test]
fn test_read_column_index_absent_without_io() {
    let data = generate_parquet_bytes(&["a"], 300, writer_properties_without_column_index(&["a"]));
    let meta = read_metadata(&data);
    let chunk = meta.row_group(0).column(0);
    let source = CountingSource::new(data);

    assert!(IndexReference::column_index(chunk).is_none());
    assert!(read_column_index(&source, chunk).unwrap().is_none());
    assert_eq!(source.reads(), 0);
}

#[test]
fn test_source_reader_parses_footer() {
    let data = generate_parquet_bytes(&["a", "b"], 300, writer_properties());
    let metadata = ParquetMetaDataReader::new()
        .parse_and_finish(&SourceReader::new(&data))
        .unwrap();
    assert_eq!(metadata.num_row_groups(), 1);
    assert_eq!(metadata.row_group(0).num_columns(), 2);
}

#[test]
fn test_mmap_source_end_to_end() {
    let data = generate_parquet_bytes(&["a", "b"], 500, writer_properties());
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data.parquet");
    std::fs::write(&path, &data).unwrap();

    let source = MmapSource::open(&path).unwrap();
    assert_eq!(source.len(), data.len() as u64);
    let metadata = ParquetMetaDataReader::new()
        .parse_and_finish(&SourceReader::new(&source))
        .unwrap();

    let column = parquet::schema::types::ColumnPath::from("b");
    let store = create(&source, metadata.row_group(0), std::slice::from_ref(&column));
    assert_eq!(store.offset_index(&column).unwrap().page_locations().len(), 5);
    assert!(store.column_index(&column).is_some());
}

#[test]
fn test_bytes_source_matches_file_contents() {
    let data = Bytes::from_static(b"PAR1....PAR1");
    assert_eq!(data.read_fully(0, 4).unwrap(), Bytes::from_static(b"PAR1"));
}
