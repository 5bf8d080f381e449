use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PageIndexError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Parquet error: {0}")]
    ParquetError(String),
    #[error("Missing offset index for column {0}")]
    MissingOffsetIndex(String),
}

impl From<std::io::Error> for PageIndexError {
    fn from(err: std::io::Error) -> Self {
        PageIndexError::IoError(err.to_string())
    }
}

impl From<parquet::errors::ParquetError> for PageIndexError {
    fn from(err: parquet::errors::ParquetError) -> Self {
        PageIndexError::ParquetError(err.to_string())
    }
}
