use std::{
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
    time::SystemTime,
};
use tracing::{debug, info};

use crate::dataset::{load_prepared, PreparedTable};
use crate::error::{ChartResult, DataLoadError};

/// Size and mtime of the source file; a change in either forces a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    len: u64,
    modified: Option<SystemTime>,
}

struct Cached {
    fingerprint: Fingerprint,
    table: Arc<PreparedTable>,
}

/// Holds the prepared table for one source file.
///
/// Owned by whoever drives the charts and handed to each `Router`; `get`
/// only re-reads the file when its fingerprint changed since the last load.
pub struct DatasetCache {
    path: PathBuf,
    slot: Mutex<Option<Cached>>,
}

impl DatasetCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            slot: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the prepared table, loading it on first use or after the source changed.
    pub fn get(&self) -> ChartResult<Arc<PreparedTable>> {
        let fingerprint = fingerprint(&self.path)?;
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(cached) = slot.as_ref() {
            if cached.fingerprint == fingerprint {
                debug!(path = %self.path.display(), "prepared table cache hit");
                return Ok(Arc::clone(&cached.table));
            }
            info!(path = %self.path.display(), "source changed, reloading");
        }

        let table = Arc::new(load_prepared(&self.path)?);
        *slot = Some(Cached {
            fingerprint,
            table: Arc::clone(&table),
        });
        Ok(table)
    }

    /// Drop the cached table; the next `get` reloads unconditionally.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(|e| e.into_inner());
        *slot = None;
    }
}

fn fingerprint(path: &Path) -> ChartResult<Fingerprint> {
    let meta = fs::metadata(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Fingerprint {
        len: meta.len(),
        modified: meta.modified().ok(),
    })
}
