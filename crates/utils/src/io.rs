//! CSV partition I/O.

use std::{fs::File, path::Path};

use polars::prelude::*;
use tracing::debug;

use crate::UtilsError;

/// Read one partition table from a CSV file with a header row.
///
/// Date and datetime columns are parsed where polars recognises them.
///
/// # Errors
/// Returns `UtilsError::MissingFile` if the path does not exist, or a polars
/// error if the file cannot be parsed.
pub fn read_partition(path: &Path) -> Result<DataFrame, UtilsError> {
    if !path.exists() {
        return Err(UtilsError::MissingFile(path.display().to_string()));
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    debug!(path = %path.display(), rows = df.height(), columns = df.width(), "read partition");
    Ok(df)
}

/// Write one partition table to a CSV file, creating parent directories.
///
/// # Errors
/// Returns an I/O error if the file cannot be created, or a polars error if
/// serialisation fails.
pub fn write_partition(df: &mut DataFrame, path: &Path) -> Result<(), UtilsError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;

    debug!(path = %path.display(), rows = df.height(), "wrote partition");
    Ok(())
}
