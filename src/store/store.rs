use ahash::{AHashMap, AHashSet};
use log::debug;
use parquet::file::metadata::RowGroupMetaData;
use parquet::file::page_index::column_index::ColumnIndexMetaData;
use parquet::file::page_index::offset_index::OffsetIndexMetaData;
use parquet::schema::types::ColumnPath;

use crate::conf::IndexConfig;
use crate::core::PageIndexError;
use crate::io::{DataSource, IndexReference};

use super::IndexLookup;
use super::handle::ColumnIndexHandle;

/// Shared fallback for row groups where index filtering is unavailable.
pub static EMPTY_INDEX_STORE: EmptyIndexStore = EmptyIndexStore;

/// Page indexes of the requested columns of one row group.
pub struct ColumnIndexStore<'a> {
    handles: AHashMap<ColumnPath, ColumnIndexHandle<'a>>,
}

enum IndexSlot<'s, 'a> {
    Resolved(&'s ColumnIndexHandle<'a>),
    /// Column outside the projection.
    Missing,
}

impl<'s> IndexSlot<'s, '_> {
    fn column_index(self) -> Option<&'s ColumnIndexMetaData> {
        match self {
            IndexSlot::Resolved(handle) => handle.column_index(),
            IndexSlot::Missing => None,
        }
    }

    fn offset_index(self) -> Option<&'s OffsetIndexMetaData> {
        match self {
            IndexSlot::Resolved(handle) => Some(handle.offset_index()),
            IndexSlot::Missing => None,
        }
    }
}

impl<'a> ColumnIndexStore<'a> {
    /// Build handles for the chunks of `row_group` whose path is in
    /// `projection`. Other chunks are never touched. Fails if any requested
    /// chunk lacks a readable offset index.
    pub fn try_new(
        source: &'a dyn DataSource,
        row_group: &'a RowGroupMetaData,
        projection: &[ColumnPath],
    ) -> Result<Self, PageIndexError> {
        let requested: AHashSet<&ColumnPath> = projection.iter().collect();
        let mut handles = AHashMap::with_capacity(requested.len());
        for chunk in row_group.columns() {
            let path = chunk.column_path();
            if requested.contains(path) {
                handles.insert(path.clone(), ColumnIndexHandle::try_new(source, chunk)?);
            }
        }
        Ok(Self { handles })
    }

    fn slot(&self, column: &ColumnPath) -> IndexSlot<'_, 'a> {
        match self.handles.get(column) {
            Some(handle) => IndexSlot::Resolved(handle),
            None => IndexSlot::Missing,
        }
    }

    pub fn handle(&self, column: &ColumnPath) -> Option<&ColumnIndexHandle<'a>> {
        self.handles.get(column)
    }

    /// Paths of the columns holding a handle, in no particular order.
    pub fn columns(&self) -> impl Iterator<Item = &ColumnPath> {
        self.handles.keys()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl IndexLookup for ColumnIndexStore<'_> {
    fn column_index(&self, column: &ColumnPath) -> Option<&ColumnIndexMetaData> {
        self.slot(column).column_index()
    }

    fn offset_index(&self, column: &ColumnPath) -> Result<&OffsetIndexMetaData, PageIndexError> {
        self.slot(column)
            .offset_index()
            .ok_or_else(|| PageIndexError::MissingOffsetIndex(column.string()))
    }
}

/// Store handed out when no requested column has a usable offset index.
/// Every offset index lookup fails and every column index is absent.
#[derive(Debug)]
pub struct EmptyIndexStore;

impl IndexLookup for EmptyIndexStore {
    fn column_index(&self, _column: &ColumnPath) -> Option<&ColumnIndexMetaData> {
        None
    }

    fn offset_index(&self, column: &ColumnPath) -> Result<&OffsetIndexMetaData, PageIndexError> {
        Err(PageIndexError::MissingOffsetIndex(column.string()))
    }
}

pub enum IndexStore<'a> {
    Loaded(ColumnIndexStore<'a>),
    Empty(&'static EmptyIndexStore),
}

impl IndexStore<'_> {
    /// True when index filtering is unavailable for the whole row group.
    pub fn is_empty_store(&self) -> bool {
        matches!(self, IndexStore::Empty(_))
    }
}

impl IndexLookup for IndexStore<'_> {
    fn column_index(&self, column: &ColumnPath) -> Option<&ColumnIndexMetaData> {
        match self {
            IndexStore::Loaded(store) => store.column_index(column),
            IndexStore::Empty(store) => store.column_index(column),
        }
    }

    fn offset_index(&self, column: &ColumnPath) -> Result<&OffsetIndexMetaData, PageIndexError> {
        match self {
            IndexStore::Loaded(store) => store.offset_index(column),
            IndexStore::Empty(store) => store.offset_index(column),
        }
    }
}

/// Build the index store for `projection` over one row group. Never fails:
/// if any requested column lacks a readable offset index the shared
/// [`EMPTY_INDEX_STORE`] is returned instead.
pub fn create<'a>(
    source: &'a dyn DataSource,
    row_group: &'a RowGroupMetaData,
    projection: &[ColumnPath],
) -> IndexStore<'a> {
    match ColumnIndexStore::try_new(source, row_group, projection) {
        Ok(store) => {
            debug!("Loaded offset indexes for {} columns", store.len());
            IndexStore::Loaded(store)
        }
        Err(err) => {
            debug!("Page index filtering disabled for row group: {err}");
            IndexStore::Empty(&EMPTY_INDEX_STORE)
        }
    }
}

/// Like [`create`], but returns `None` when page index filtering cannot
/// help: column indexes are disabled in `config`, nothing is projected, or
/// no chunk of the row group carries both page indexes.
pub fn for_filtering<'a>(
    source: &'a dyn DataSource,
    row_group: &'a RowGroupMetaData,
    projection: &[ColumnPath],
    config: &IndexConfig,
) -> Option<IndexStore<'a>> {
    if !config.use_column_index || projection.is_empty() {
        return None;
    }
    let has_page_index = row_group.columns().iter().any(|chunk| {
        IndexReference::column_index(chunk).is_some()
            && IndexReference::offset_index(chunk).is_some()
    });
    if !has_page_index {
        return None;
    }
    Some(create(source, row_group, projection))
}
