//! Test and benchmark utilities.
//!
//! This module is only available when the `testutil` feature is enabled.

use std::ops::Range;
use std::sync::Arc;
use std::sync::Mutex;

use arrow::array::{ArrayRef, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::file::metadata::{ParquetMetaData, ParquetMetaDataReader, RowGroupMetaData};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use parquet::schema::types::ColumnPath;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::core::PageIndexError;
use crate::io::{DataSource, IndexReference};

/// Rows per data page in generated files, so every column chunk spans several pages.
pub const ROWS_PER_PAGE: usize = 100;

/// Writer properties producing small pages with page-level statistics, so
/// both the column index and the offset index are written for every column.
pub fn writer_properties() -> WriterProperties {
    WriterProperties::builder()
        .set_data_page_row_count_limit(ROWS_PER_PAGE)
        .set_write_batch_size(ROWS_PER_PAGE)
        .set_statistics_enabled(EnabledStatistics::Page)
        .build()
}

/// Like [`writer_properties`], but the listed columns only get chunk-level
/// statistics, so no column index is written for them.
pub fn writer_properties_without_column_index(columns: &[&str]) -> WriterProperties {
    let mut builder = WriterProperties::builder()
        .set_data_page_row_count_limit(ROWS_PER_PAGE)
        .set_write_batch_size(ROWS_PER_PAGE)
        .set_statistics_enabled(EnabledStatistics::Page);
    for column in columns {
        builder = builder
            .set_column_statistics_enabled(ColumnPath::from(*column), EnabledStatistics::Chunk);
    }
    builder.build()
}

/// Generate an in-memory parquet file with one Int64 column per name and a
/// single row group. Column `i` holds `row * (i + 1)`, so page minimums and
/// maximums are predictable.
pub fn generate_parquet_bytes(columns: &[&str], num_rows: usize, props: WriterProperties) -> Bytes {
    let schema = Arc::new(Schema::new(
        columns
            .iter()
            .map(|name| Field::new(*name, DataType::Int64, false))
            .collect::<Vec<_>>(),
    ));
    let arrays: Vec<ArrayRef> = (0..columns.len())
        .map(|i| {
            let factor = i as i64 + 1;
            let arr: Int64Array = (0..num_rows as i64).map(|row| Some(row * factor)).collect();
            Arc::new(arr) as ArrayRef
        })
        .collect();
    let batch = RecordBatch::try_new(schema.clone(), arrays).unwrap();

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, schema, Some(props)).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    Bytes::from(buf)
}

/// Parse the footer of an in-memory parquet file without loading page indexes.
pub fn read_metadata(data: &Bytes) -> ParquetMetaData {
    ParquetMetaDataReader::new().parse_and_finish(data).unwrap()
}

/// Copy of `row_group` where `column` has no offset index reference.
pub fn without_offset_index(row_group: &RowGroupMetaData, column: &str) -> RowGroupMetaData {
    let columns = row_group
        .columns()
        .iter()
        .map(|chunk| {
            if chunk.column_path().string() == column {
                chunk
                    .clone()
                    .into_builder()
                    .set_offset_index_offset(None)
                    .set_offset_index_length(None)
                    .build()
                    .unwrap()
            } else {
                chunk.clone()
            }
        })
        .collect();
    RowGroupMetaData::builder(row_group.schema_descr_ptr())
        .set_num_rows(row_group.num_rows())
        .set_total_byte_size(row_group.total_byte_size())
        .set_column_metadata(columns)
        .build()
        .unwrap()
}

/// Offset index reference of `column` in `row_group`.
pub fn offset_index_reference(row_group: &RowGroupMetaData, column: &str) -> IndexReference {
    let chunk = row_group
        .columns()
        .iter()
        .find(|chunk| chunk.column_path().string() == column)
        .unwrap();
    IndexReference::offset_index(chunk).unwrap()
}

/// Column index reference of `column` in `row_group`.
pub fn column_index_reference(row_group: &RowGroupMetaData, column: &str) -> IndexReference {
    let chunk = row_group
        .columns()
        .iter()
        .find(|chunk| chunk.column_path().string() == column)
        .unwrap();
    IndexReference::column_index(chunk).unwrap()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    /// The read fails with an I/O error.
    Error,
    /// The read succeeds but returns bytes that do not decode.
    Garbage,
    /// The read succeeds but returns only the first half of the range.
    Short,
}

/// In-memory [`DataSource`] recording every read and injecting faults for
/// reads that overlap configured byte ranges.
#[derive(Debug)]
pub struct CountingSource {
    data: Bytes,
    faults: Vec<(Range<u64>, Fault)>,
    reads: Mutex<Vec<(u64, u32)>>,
}

impl CountingSource {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            faults: Vec::new(),
            reads: Mutex::new(Vec::new()),
        }
    }

    pub fn with_fault(mut self, reference: IndexReference, fault: Fault) -> Self {
        let start = reference.offset;
        self.faults
            .push((start..start + reference.length as u64, fault));
        self
    }

    /// Total number of `read_fully` calls so far.
    pub fn reads(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    /// Number of reads that covered exactly `reference`.
    pub fn reads_of(&self, reference: IndexReference) -> usize {
        self.reads
            .lock()
            .unwrap()
            .iter()
            .filter(|(offset, length)| *offset == reference.offset && *length == reference.length)
            .count()
    }

    fn fault_for(&self, offset: u64, length: u32) -> Option<Fault> {
        let end = offset + length as u64;
        self.faults
            .iter()
            .find(|(range, _)| range.start < end && offset < range.end)
            .map(|(_, fault)| *fault)
    }
}

impl DataSource for CountingSource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_fully(&self, offset: u64, length: u32) -> Result<Bytes, PageIndexError> {
        self.reads.lock().unwrap().push((offset, length));
        match self.fault_for(offset, length) {
            Some(Fault::Error) => Err(PageIndexError::IoError(format!(
                "injected failure reading {length} bytes at offset {offset}"
            ))),
            Some(Fault::Garbage) => Ok(Bytes::from(vec![0xFF; length as usize])),
            Some(Fault::Short) => {
                let full = self.data.read_fully(offset, length)?;
                Ok(full.slice(0..full.len() / 2))
            }
            None => self.data.read_fully(offset, length),
        }
    }
}

// Benchmark-specific utilities

/// Number of Int64 columns for benchmarks
pub const BENCH_NUM_COLUMNS: usize = 32;

/// RNG seed for deterministic projection generation
pub const BENCH_RNG_SEED: u64 = 42;

/// Generate column names for benchmarks: col_0, col_1, ..., col_31
pub fn bench_column_names() -> Vec<String> {
    (0..BENCH_NUM_COLUMNS)
        .map(|i| format!("col_{}", i))
        .collect()
}

/// Pick a deterministic random projection of `num_columns` benchmark columns.
pub fn bench_projection(num_columns: usize) -> Vec<ColumnPath> {
    let mut rng = StdRng::seed_from_u64(BENCH_RNG_SEED);
    let mut names = bench_column_names();
    names.shuffle(&mut rng);
    names
        .into_iter()
        .take(num_columns)
        .map(ColumnPath::from)
        .collect()
}
