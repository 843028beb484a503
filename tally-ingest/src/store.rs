//! In-memory cache of one transaction file.
//!
//! The cached load stays valid until the file's modification time or length
//! changes, or until `invalidate` is called.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

use crate::error::Result;
use crate::loader::{load_path, Loaded};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FileStamp {
    modified: Option<SystemTime>,
    len: u64,
}

impl FileStamp {
    fn read(path: &Path) -> Result<Self> {
        let meta = fs::metadata(path)?;
        Ok(Self {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug)]
struct Cached {
    stamp: FileStamp,
    loaded: Arc<Loaded>,
}

/// Owns the cached load of a single file path
#[derive(Debug)]
pub struct DatasetStore {
    path: PathBuf,
    cached: Option<Cached>,
}

impl DatasetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when the next `get` would reload from disk.
    pub fn is_stale(&self) -> Result<bool> {
        match &self.cached {
            None => Ok(true),
            Some(c) => Ok(FileStamp::read(&self.path)? != c.stamp),
        }
    }

    /// Current contents, reloading first if the file changed.
    pub fn get(&mut self) -> Result<Arc<Loaded>> {
        let stamp = FileStamp::read(&self.path)?;
        if let Some(c) = &self.cached {
            if c.stamp == stamp {
                return Ok(Arc::clone(&c.loaded));
            }
        }

        debug!(path = %self.path.display(), "reloading dataset");
        let loaded = Arc::new(load_path(&self.path)?);
        self.cached = Some(Cached {
            stamp,
            loaded: Arc::clone(&loaded),
        });
        Ok(loaded)
    }

    /// Drop the cached load; the next `get` reads the file again.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
