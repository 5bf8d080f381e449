use std::slice;

use bytes::{Buf, Bytes};
use parquet::errors::{ParquetError, Result as ParquetResult};
use parquet::file::metadata::ColumnChunkMetaData;
use parquet::file::page_index::column_index::ColumnIndexMetaData;
use parquet::file::page_index::index_reader;
use parquet::file::page_index::offset_index::OffsetIndexMetaData;
use parquet::file::reader::{ChunkReader, Length};

use crate::core::PageIndexError;

use super::reference::IndexReference;
use super::source::DataSource;

/// Exposes a [`DataSource`] to the parquet crate's readers. Every
/// `get_bytes` call maps onto exactly one `read_fully`.
pub struct SourceReader<'a> {
    source: &'a dyn DataSource,
}

impl<'a> SourceReader<'a> {
    pub fn new(source: &'a dyn DataSource) -> Self {
        Self { source }
    }
}

fn to_u32(length: u64) -> ParquetResult<u32> {
    u32::try_from(length)
        .map_err(|_| ParquetError::General(format!("read of {length} bytes exceeds u32 range")))
}

impl Length for SourceReader<'_> {
    fn len(&self) -> u64 {
        self.source.len()
    }
}

impl ChunkReader for SourceReader<'_> {
    type T = bytes::buf::Reader<Bytes>;

    /// Buffers the whole remainder of the file in one read, so it fails when
    /// more than `u32::MAX` bytes remain after `start`. Only footer parsing
    /// goes through here; page index reads use `get_bytes`.
    fn get_read(&self, start: u64) -> ParquetResult<Self::T> {
        let len = self.source.len();
        if start > len {
            return Err(ParquetError::EOF(format!(
                "Expected to read at offset {start}, while file has length {len}"
            )));
        }
        Ok(self.get_bytes(start, (len - start) as usize)?.reader())
    }

    fn get_bytes(&self, start: u64, length: usize) -> ParquetResult<Bytes> {
        let length = to_u32(length as u64)?;
        let bytes = self
            .source
            .read_fully(start, length)
            .map_err(|e| ParquetError::External(Box::new(e)))?;
        // The index reader slices the buffer by reference length.
        if bytes.len() != length as usize {
            return Err(ParquetError::EOF(format!(
                "Expected {length} bytes at offset {start}, source returned {}",
                bytes.len()
            )));
        }
        Ok(bytes)
    }
}

/// Read and decode the offset index of one column chunk. `Ok(None)` when the
/// chunk has no offset index reference; no I/O happens in that case.
pub fn read_offset_index(
    source: &dyn DataSource,
    chunk: &ColumnChunkMetaData,
) -> Result<Option<OffsetIndexMetaData>, PageIndexError> {
    if IndexReference::offset_index(chunk).is_none() {
        return Ok(None);
    }
    #[allow(deprecated)]
    let indexes =
        index_reader::read_offset_indexes(&SourceReader::new(source), slice::from_ref(chunk))?;
    Ok(indexes.and_then(|indexes| indexes.into_iter().next()))
}

/// Read and decode the column index of one column chunk, using the chunk's
/// physical type. `Ok(None)` when the chunk has no column index reference.
pub fn read_column_index(
    source: &dyn DataSource,
    chunk: &ColumnChunkMetaData,
) -> Result<Option<ColumnIndexMetaData>, PageIndexError> {
    if IndexReference::column_index(chunk).is_none() {
        return Ok(None);
    }
    #[allow(deprecated)]
    let indexes =
        index_reader::read_columns_indexes(&SourceReader::new(source), slice::from_ref(chunk))?;
    Ok(indexes
        .and_then(|indexes| indexes.into_iter().next())
        .filter(|index| !matches!(index, ColumnIndexMetaData::NONE)))
}
