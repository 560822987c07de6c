//! JSON persistence for the stock and dock summaries.
//!
//! Saves go to a `.tmp` sibling first and are renamed into place, so an
//! interrupted save never leaves a truncated file behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::SummaryError;
use crate::model::{DockSummary, StockSummary};
use crate::Result;

pub fn load_stock(path: &Path) -> Result<StockSummary> {
    let summary: StockSummary = load_or_default(path)?;
    info!(path = %path.display(), commodities = summary.len(), "Loaded stock summary");
    Ok(summary)
}

pub fn save_stock(path: &Path, summary: &StockSummary) -> Result<()> {
    write_json(path, summary)?;
    info!(path = %path.display(), commodities = summary.len(), "Saved stock summary");
    Ok(())
}

pub fn load_docks(path: &Path) -> Result<DockSummary> {
    let summary: DockSummary = load_or_default(path)?;
    info!(path = %path.display(), stations = summary.len(), "Loaded dock summary");
    Ok(summary)
}

pub fn save_docks(path: &Path, summary: &DockSummary) -> Result<()> {
    write_json(path, summary)?;
    info!(path = %path.display(), stations = summary.len(), "Saved dock summary");
    Ok(())
}

/// A missing file is an empty summary; anything else unreadable is an error.
fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "No summary file yet, starting empty");
            return Ok(T::default());
        }
        Err(source) => {
            return Err(SummaryError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| SummaryError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| SummaryError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SummaryError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let tmp = tmp_path(path);
    fs::write(&tmp, &json).map_err(|source| SummaryError::Io {
        path: tmp.clone(),
        source,
    })?;
    fs::rename(&tmp, path).map_err(|source| SummaryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
