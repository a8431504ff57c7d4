// src/file.rs

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::config::options::ExportOptions;
use crate::data::{MergedRecord, Region, Tabular, merged_headers};
use crate::error::{ChartError, Result};

/// Write typed rows to `<out_dir>/<stem>.<ext>` per ExportOptions.
/// Returns the final path written to.
pub fn export_table<T: Tabular>(export: &ExportOptions, stem: &str, items: &[T]) -> Result<PathBuf> {
    let headers = T::headers();
    write_file(
        &export.path_for(stem),
        export.include_headers.then_some(headers.as_slice()),
        items.iter().map(|i| i.to_record()),
        export.format.delim(),
    )
}

/// Merged records carry region-qualified headers, so they don't fit `Tabular`.
pub fn export_merged(
    export: &ExportOptions,
    stem: &str,
    source: &Region,
    target: &Region,
    records: &[MergedRecord],
) -> Result<PathBuf> {
    let headers = merged_headers(source, target);
    write_file(
        &export.path_for(stem),
        export.include_headers.then_some(headers.as_slice()),
        records.iter().map(|r| r.to_record()),
        export.format.delim(),
    )
}

fn write_file(
    path: &Path,
    headers: Option<&[String]>,
    records: impl IntoIterator<Item = Vec<String>>,
    delim: u8,
) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            ensure_directory(parent)?;
        }
    }
    // truncate/overwrite
    let mut wtr = csv::WriterBuilder::new().delimiter(delim).from_path(path)?;
    if let Some(h) = headers {
        wtr.write_record(h)?;
    }
    for r in records {
        wtr.write_record(&r)?;
    }
    wtr.flush()?;
    logd!("Wrote {}", path.display());
    Ok(path.to_path_buf())
}

pub fn ensure_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ChartError::Config(format!("Path exists but is not a directory: {}", dir.display())));
    }
    if !dir.exists() { fs::create_dir_all(dir)?; }
    Ok(())
}
