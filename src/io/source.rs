use std::fs::File;
use std::path::Path;

use bytes::Bytes;
use memmap2::Mmap;

use crate::core::PageIndexError;

/// Byte-range access to a file whose footer has already been parsed.
pub trait DataSource: Send + Sync {
    /// Total size of the underlying file in bytes.
    fn len(&self) -> u64;

    /// Read exactly `length` bytes starting at `offset`. A short read is an error.
    fn read_fully(&self, offset: u64, length: u32) -> Result<Bytes, PageIndexError>;
}

fn check_range(offset: u64, length: u32, len: u64) -> Result<std::ops::Range<usize>, PageIndexError> {
    let end = offset.checked_add(length as u64).ok_or_else(|| {
        PageIndexError::IoError(format!("range overflow: offset {offset} length {length}"))
    })?;
    if end > len {
        return Err(PageIndexError::IoError(format!(
            "read of {length} bytes at offset {offset} exceeds file length {len}"
        )));
    }
    Ok(offset as usize..end as usize)
}

impl DataSource for Bytes {
    fn len(&self) -> u64 {
        Bytes::len(self) as u64
    }

    fn read_fully(&self, offset: u64, length: u32) -> Result<Bytes, PageIndexError> {
        let range = check_range(offset, length, DataSource::len(self))?;
        Ok(self.slice(range))
    }
}

/// Read-only memory map of a local file. Reads are zero-copy slices of the map.
#[derive(Debug)]
pub struct MmapSource {
    data: Bytes,
}

impl MmapSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PageIndexError> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| PageIndexError::IoError(format!("opening {}: {e}", path.display())))?;
        // SAFETY: the file is opened read-only and we treat the mapping as immutable.
        let mmap = unsafe { Mmap::map(&file) }?;
        Ok(Self {
            data: Bytes::from_owner(mmap),
        })
    }
}

impl DataSource for MmapSource {
    fn len(&self) -> u64 {
        self.data.len() as u64
    }

    fn read_fully(&self, offset: u64, length: u32) -> Result<Bytes, PageIndexError> {
        self.data.read_fully(offset, length)
    }
}
