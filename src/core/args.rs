use std::path::PathBuf;

use clap::Parser;
use log::kv::{ToValue, Value};

/// Print the page indexes of a parquet file, one row group at a time.
#[derive(Parser, Debug, PartialEq)]
#[command(version, about)]
pub struct CliArgs {
    #[arg(short, long)]
    pub config: Option<String>,

    /// Dot-separated column path to inspect. Repeat for several columns.
    #[arg(long = "column")]
    pub columns: Vec<String>,

    pub file: PathBuf,
}

impl ToValue for CliArgs {
    fn to_value(&self) -> Value<'_> {
        Value::from_debug(self)
    }
}
