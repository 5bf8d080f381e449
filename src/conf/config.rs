use std::path::Path;

use config::Config as CConfig;
use serde::{Deserialize, Serialize};

use crate::{
    conf::IndexConfig,
    core::PageIndexError::{self, ConfigParsingError},
};

const ENV_PREFIX: &str = "PAGEINDEX";

#[derive(Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
}

impl Config {
    pub fn from_str(toml_str: &str) -> Result<Config, PageIndexError> {
        let config = CConfig::builder()
            .add_source(config::File::from_str(toml_str, config::FileFormat::Toml))
            .build()
            .map_err(|e| ConfigParsingError(e.to_string()))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(e.to_string()))?;
        Ok(config)
    }

    /// Load a TOML file, then apply `PAGEINDEX_INDEX__USE_COLUMN_INDEX`-style
    /// environment overrides on top.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Config, PageIndexError> {
        let path = path.as_ref();
        let config = CConfig::builder()
            .add_source(config::File::from(path).format(config::FileFormat::Toml))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|e| ConfigParsingError(format!("{}: {e}", path.display())))?
            .try_deserialize::<Config>()
            .map_err(|e| ConfigParsingError(format!("{}: {e}", path.display())))?;
        Ok(config)
    }
}
