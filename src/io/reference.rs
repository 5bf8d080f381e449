use std::fmt;

use parquet::file::metadata::ColumnChunkMetaData;

/// Location of a serialized page index inside the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexReference {
    pub offset: u64,
    pub length: u32,
}

impl IndexReference {
    /// Offset index reference of a column chunk, if one was written.
    pub fn offset_index(chunk: &ColumnChunkMetaData) -> Option<Self> {
        Self::from_parts(chunk.offset_index_offset(), chunk.offset_index_length())
    }

    /// Column index reference of a column chunk, if one was written.
    pub fn column_index(chunk: &ColumnChunkMetaData) -> Option<Self> {
        Self::from_parts(chunk.column_index_offset(), chunk.column_index_length())
    }

    // Negative values come from corrupt footers; they count as "not written".
    fn from_parts(offset: Option<i64>, length: Option<i32>) -> Option<Self> {
        let offset = u64::try_from(offset?).ok()?;
        let length = u32::try_from(length?).ok()?;
        Some(Self { offset, length })
    }
}

impl fmt::Display for IndexReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.offset, self.length)
    }
}
