//! Catalog files: loading a CSV export into records and listing the
//! catalogs already on disk.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;
use tracing::{debug, warn};

/// One row of a catalog, fields in column order.
pub type Record = Vec<String>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a readable CSV file: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("{} has no header row", .0.display())]
    Empty(PathBuf),
}

/// A loaded catalog: the header row plus every data row beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Display name, the file name without its `.csv` extension.
    pub name: String,
    pub header: Record,
    pub rows: Vec<Record>,
}

impl Catalog {
    /// Build from raw records; the first one is the header.
    pub fn from_records(name: impl Into<String>, records: Vec<Record>) -> Option<Self> {
        let mut records = records.into_iter();
        let header = records.next()?;
        Some(Self {
            name: name.into(),
            header,
            rows: records.collect(),
        })
    }

    /// Parse the CSV file at `path`.
    ///
    /// Every row must have the header's width. A malformed row ends the
    /// read; rows before it are kept so a half-broken export is still
    /// browsable.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|source| CatalogError::Csv {
                path: path.to_path_buf(),
                source,
            })?;

        let mut records = Vec::new();
        for result in reader.records() {
            match result {
                Ok(record) => records.push(record.iter().map(str::to_string).collect()),
                Err(e) => {
                    warn!(
                        "stopped reading {} after {} records: {}",
                        path.display(),
                        records.len(),
                        e
                    );
                    break;
                }
            }
        }

        let catalog = Self::from_records(display_name(path), records)
            .ok_or_else(|| CatalogError::Empty(path.to_path_buf()))?;
        debug!(
            "loaded catalog {:?}: {} columns, {} rows",
            catalog.name,
            catalog.header.len(),
            catalog.rows.len()
        );
        Ok(catalog)
    }
}

fn display_name(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    name.strip_suffix(".csv").map(str::to_string).unwrap_or(name)
}

/// A catalog file found in the catalog directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: String,
    pub path: PathBuf,
    pub modified: Option<DateTime<Local>>,
}

impl CatalogEntry {
    /// Last-modified date shown as the catalog's date of creation.
    pub fn date_label(&self) -> String {
        self.modified
            .map(|m| m.format("%Y/%m/%d").to_string())
            .unwrap_or_default()
    }
}

/// List the files in `dir`, sorted by name. The directory is created if it
/// does not exist yet; entries that cannot be inspected are skipped.
pub fn list_catalogs(dir: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let io_err = |source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(io_err)?;
    let rd = std::fs::read_dir(dir).map_err(io_err)?;

    let mut entries: Vec<CatalogEntry> = rd
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();
            if !path.is_file() || path.extension().is_some_and(|e| e == "tmp") {
                return None;
            }
            let meta = entry.metadata().ok()?;
            Some(CatalogEntry {
                name: entry.file_name().to_string_lossy().to_string(),
                path,
                modified: meta.modified().ok().map(DateTime::<Local>::from),
            })
        })
        .collect();

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
}
