mod reader;
mod reference;
mod source;

pub use reader::{SourceReader, read_column_index, read_offset_index};
pub use reference::IndexReference;
pub use source::{DataSource, MmapSource};
