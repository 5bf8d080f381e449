use parquet::schema::types::ColumnPath;
use serde::{Deserialize, Serialize};

use crate::store::column_path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct IndexConfig {
    #[serde(default = "IndexConfig::default_use_column_index")]
    pub use_column_index: bool,
    /// Dot-separated column paths to load indexes for. Empty means every
    /// column of the row group.
    #[serde(default)]
    pub columns: Vec<String>,
}

impl IndexConfig {
    fn default_use_column_index() -> bool {
        true
    }

    pub fn column_paths(&self) -> Vec<ColumnPath> {
        self.columns.iter().map(|c| column_path(c)).collect()
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            use_column_index: Self::default_use_column_index(),
            columns: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_default() {
        let index = IndexConfig::default();
        assert!(index.use_column_index);
        assert!(index.columns.is_empty());
    }

    #[test]
    fn test_column_paths_split_on_dots() {
        let index = IndexConfig {
            use_column_index: true,
            columns: vec!["a".to_string(), "b.c".to_string()],
        };
        let paths = index.column_paths();
        assert_eq!(paths[0].parts(), &["a".to_string()]);
        assert_eq!(paths[1].parts(), &["b".to_string(), "c".to_string()]);
    }
}
