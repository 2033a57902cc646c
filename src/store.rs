//! # Sensor Store
//!
//! Persists the user's selected sensor id across restarts: a single JSON
//! file holding one integer, `-1` meaning "none" (the encoding the watch
//! app used in its preference store).
//!
//! - Reads degrade gracefully: missing or corrupt file → no selection.
//! - Writes go through a temp file + rename so a crash mid-write cannot
//!   leave a torn file behind.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::SensorId;

const NONE_SENTINEL: i64 = -1;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("writing selection to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("encoding selection: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSelection {
    selected_sensor_id: i64,
}

/// File-backed selected-sensor reference.
pub struct SensorStore {
    path: PathBuf,
}

impl SensorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The persisted selection, or `None` when nothing was ever selected
    /// or the file is missing/corrupt.
    pub fn selected(&self) -> Option<SensorId> {
        let content = fs::read_to_string(&self.path).ok()?;
        let stored: StoredSelection = serde_json::from_str(&content).ok()?;
        if stored.selected_sensor_id == NONE_SENTINEL {
            None
        } else {
            Some(SensorId(stored.selected_sensor_id))
        }
    }

    /// Persist a selection (or clear it with `None`).
    pub fn set_selected(&self, id: Option<SensorId>) -> Result<(), StoreError> {
        let stored = StoredSelection {
            selected_sensor_id: id.map(|s| s.0).unwrap_or(NONE_SENTINEL),
        };
        let body = serde_json::to_string_pretty(&stored)?;

        let tmp = self.path.with_extension("json.tmp");
        write_atomic(&tmp, &self.path, &body).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

fn write_atomic(tmp: &Path, dest: &Path, body: &str) -> std::io::Result<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(tmp, body)?;
    fs::rename(tmp, dest)
}
