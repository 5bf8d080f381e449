use std::sync::OnceLock;

use log::debug;
use parquet::file::metadata::ColumnChunkMetaData;
use parquet::file::page_index::column_index::ColumnIndexMetaData;
use parquet::file::page_index::offset_index::OffsetIndexMetaData;
use parquet::schema::types::ColumnPath;

use crate::core::PageIndexError;
use crate::io::{DataSource, IndexReference, read_column_index, read_offset_index};

/// Page indexes of one column chunk. The offset index is read when the
/// handle is built; the column index is read on first access and the
/// outcome, present or absent, is kept for the lifetime of the handle.
pub struct ColumnIndexHandle<'a> {
    source: &'a dyn DataSource,
    chunk: &'a ColumnChunkMetaData,
    offset_index: OffsetIndexMetaData,
    column_index: OnceLock<Option<ColumnIndexMetaData>>,
}

impl<'a> ColumnIndexHandle<'a> {
    /// Read the offset index of `chunk`. A missing reference and a failed
    /// read or decode are both reported as
    /// [`PageIndexError::MissingOffsetIndex`].
    pub fn try_new(
        source: &'a dyn DataSource,
        chunk: &'a ColumnChunkMetaData,
    ) -> Result<Self, PageIndexError> {
        let column = chunk.column_path().string();
        let offset_index = match read_offset_index(source, chunk) {
            Ok(Some(index)) => index,
            Ok(None) => {
                debug!(column = column.as_str(); "no offset index written");
                return Err(PageIndexError::MissingOffsetIndex(column));
            }
            // A persistent I/O problem resurfaces when the data pages are read.
            Err(err) => {
                debug!(column = column.as_str(); "offset index unreadable: {err}");
                return Err(PageIndexError::MissingOffsetIndex(column));
            }
        };

        Ok(Self {
            source,
            chunk,
            offset_index,
            column_index: OnceLock::new(),
        })
    }

    pub fn path(&self) -> &ColumnPath {
        self.chunk.column_path()
    }

    pub fn offset_index(&self) -> &OffsetIndexMetaData {
        &self.offset_index
    }

    pub fn column_index(&self) -> Option<&ColumnIndexMetaData> {
        self.column_index
            .get_or_init(|| self.fetch_column_index())
            .as_ref()
    }

    fn fetch_column_index(&self) -> Option<ColumnIndexMetaData> {
        match read_column_index(self.source, self.chunk) {
            Ok(index) => index,
            Err(err) => {
                let column = self.path().string();
                let reference = IndexReference::column_index(self.chunk)
                    .map(|r| r.to_string())
                    .unwrap_or_default();
                debug!(
                    column = column.as_str(), reference = reference.as_str();
                    "column index unreadable, page statistics disabled: {err}"
                );
                None
            }
        }
    }
}
