use anyhow::Context;
use clap::Parser;
use log::info;
use parquet::file::metadata::ParquetMetaDataReader;
use parquet::file::page_index::column_index::ColumnIndexMetaData;

use pageindex::conf::Config;
use pageindex::core::{CliArgs, setup_logging};
use pageindex::io::{MmapSource, SourceReader};
use pageindex::store::{IndexLookup, for_filtering};

fn physical_type(index: &ColumnIndexMetaData) -> &'static str {
    match index {
        ColumnIndexMetaData::INT32(_) => "int32",
        ColumnIndexMetaData::INT64(_) => "int64",
        ColumnIndexMetaData::FLOAT(_) => "float",
        ColumnIndexMetaData::DOUBLE(_) => "double",
        ColumnIndexMetaData::BYTE_ARRAY(_) => "byte_array",
        _ => "other",
    }
}

fn main() -> anyhow::Result<()> {
    setup_logging();
    let args = CliArgs::parse();
    info!(cli = args; "pageindex started.");

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if !args.columns.is_empty() {
        config.index.columns = args.columns.clone();
    }

    let source = MmapSource::open(&args.file)?;
    let metadata = ParquetMetaDataReader::new()
        .parse_and_finish(&SourceReader::new(&source))
        .with_context(|| format!("reading footer of {}", args.file.display()))?;

    for (idx, row_group) in metadata.row_groups().iter().enumerate() {
        let projection = if config.index.columns.is_empty() {
            row_group
                .columns()
                .iter()
                .map(|chunk| chunk.column_path().clone())
                .collect()
        } else {
            config.index.column_paths()
        };

        let Some(store) = for_filtering(&source, row_group, &projection, &config.index) else {
            info!("Row group {idx}: page index filtering not applicable");
            continue;
        };
        if store.is_empty_store() {
            info!("Row group {idx}: offset index missing, page index filtering unavailable");
            continue;
        }

        for path in &projection {
            let Ok(offset_index) = store.offset_index(path) else {
                info!("Row group {idx}: column {} not present", path.string());
                continue;
            };
            let stats = store
                .column_index(path)
                .map(physical_type)
                .unwrap_or("absent");
            info!(
                "Row group {idx}: column {}: {} pages, column index {stats}",
                path.string(),
                offset_index.page_locations().len()
            );
        }
    }

    Ok(())
}
