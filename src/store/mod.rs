mod handle;
mod store;

pub use handle::ColumnIndexHandle;
pub use store::{
    ColumnIndexStore, EMPTY_INDEX_STORE, EmptyIndexStore, IndexStore, create, for_filtering,
};

use parquet::file::page_index::column_index::ColumnIndexMetaData;
use parquet::file::page_index::offset_index::OffsetIndexMetaData;
use parquet::schema::types::ColumnPath;

use crate::core::PageIndexError;

/// Page index lookups consumed by the filtering layer.
pub trait IndexLookup {
    /// Per-page statistics of `column`. `None` means "do not prune on this
    /// column"; it is never an error.
    fn column_index(&self, column: &ColumnPath) -> Option<&ColumnIndexMetaData>;

    /// Page locations of `column`. Fails with
    /// [`PageIndexError::MissingOffsetIndex`] when the column was not
    /// requested or when index filtering is unavailable for the row group.
    fn offset_index(&self, column: &ColumnPath) -> Result<&OffsetIndexMetaData, PageIndexError>;
}

/// Build a [`ColumnPath`] from its dot-separated form, e.g. `"a.b.c"`.
pub fn column_path(path: &str) -> ColumnPath {
    ColumnPath::new(path.split('.').map(String::from).collect())
}
