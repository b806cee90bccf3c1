use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use super::loader;
use super::model::Table;
use super::naming::secure_filename;
use crate::error::{DatasetError, Result};

/// Extension that marks a file in the root as a listable dataset.
pub const DATASET_EXTENSION: &str = "csv";

// ---------------------------------------------------------------------------
// DatasetStore – one directory, one file per dataset
// ---------------------------------------------------------------------------

/// Filesystem-backed dataset store rooted at a single directory.
///
/// Every lookup goes through [`secure_filename`], so names that sanitize to
/// the same string share one file: the most recent upload wins. Nothing is
/// cached; each [`load`](Self::load) re-reads the file.
#[derive(Debug, Clone)]
pub struct DatasetStore {
    root: PathBuf,
}

impl DatasetStore {
    /// Open a store at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!("dataset store opened at {}", root.display());
        Ok(DatasetStore { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a raw dataset name to its on-disk path under the root.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        Ok(self.root.join(stored_name(name)?))
    }

    /// Persist `content` under the sanitized `name`, replacing any existing
    /// dataset of that name. Returns the stored name.
    ///
    /// The bytes land in a temporary file inside the root first and are
    /// renamed into place, so concurrent readers never see a partial file.
    pub fn upload<R: Read>(&self, name: &str, mut content: R) -> Result<String> {
        let stored = stored_name(name)?;
        let target = self.root.join(&stored);

        let mut staging = NamedTempFile::new_in(&self.root)?;
        let written = io::copy(&mut content, staging.as_file_mut())?;
        staging.as_file().sync_all()?;
        staging
            .persist(&target)
            .map_err(|err| DatasetError::Io(err.error))?;

        info!("stored dataset {stored} ({written} bytes)");
        Ok(stored)
    }

    /// Names of every dataset file in the root, sorted.
    pub fn list_all(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(DATASET_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Parse the named dataset from disk.
    pub fn load(&self, name: &str) -> Result<Table> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Err(DatasetError::NotFound(format!("dataset '{name}'")));
        }
        loader::load_file(&path)
    }
}

fn stored_name(name: &str) -> Result<String> {
    if name.trim().is_empty() {
        return Err(DatasetError::InvalidInput("dataset name is empty".into()));
    }
    let stored = secure_filename(name);
    if stored.is_empty() {
        return Err(DatasetError::InvalidInput(format!(
            "dataset name '{name}' has no usable characters"
        )));
    }
    Ok(stored)
}
