//! Disk Tier Module
//!
//! Persistent store with one file per key, named by the key's digest.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

use crate::cache::key::disk_file_name;
use crate::error::Result;

static TRASH_COUNTER: AtomicU64 = AtomicU64::new(0);

// == Disk Tier ==
/// Key-addressed file store rooted at a dedicated directory.
///
/// Writes go to a temporary file in the same directory and are renamed over
/// the target, so readers never observe a partially written file.
#[derive(Debug, Clone)]
pub struct DiskTier {
    /// Directory holding one file per key
    root: PathBuf,
}

impl DiskTier {
    // == Constructor ==
    /// Opens the tier, creating its directory if needed.
    ///
    /// Creation failures are logged and retried on the next write.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        let tier = Self { root: root.into() };
        if let Err(err) = fs::create_dir_all(&tier.root) {
            debug!(
                dir = %tier.root.display(),
                error = %err,
                "failed to create cache directory"
            );
        }
        tier.sweep_trash();
        tier
    }

    /// Directory backing this tier.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the file for `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(disk_file_name(key))
    }

    // == Read ==
    /// Reads the stored bytes for `key`. Missing or unreadable files are `None`.
    pub fn read(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    debug!(
                        path = %path.display(),
                        error = %err,
                        "failed to read cache file"
                    );
                }
                None
            }
        }
    }

    // == Write ==
    /// Atomically replaces the file for `key` with `bytes`.
    pub fn write(&self, key: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root)?;

        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path_for(key)).map_err(|err| err.error)?;

        Ok(())
    }

    // == Remove ==
    /// Deletes the file for `key`, returning true if one was removed.
    pub fn remove(&self, key: &str) -> bool {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(err) => {
                if err.kind() != ErrorKind::NotFound {
                    debug!(
                        path = %path.display(),
                        error = %err,
                        "failed to remove cache file"
                    );
                }
                false
            }
        }
    }

    // == Clear ==
    /// Empties the tier.
    ///
    /// The directory is first renamed aside and an empty one created in its
    /// place, so concurrent readers see either the old tree or an empty one.
    /// The renamed tree is then deleted.
    pub fn clear(&self) -> Result<()> {
        let trash = self.trash_path();

        match fs::rename(&self.root, &trash) {
            Ok(()) => {
                fs::create_dir_all(&self.root)?;
                if let Err(err) = fs::remove_dir_all(&trash) {
                    debug!(
                        dir = %trash.display(),
                        error = %err,
                        "failed to delete cleared cache directory"
                    );
                }
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                fs::create_dir_all(&self.root)?;
            }
            Err(err) => {
                debug!(
                    dir = %self.root.display(),
                    error = %err,
                    "rename aside failed; deleting cache directory in place"
                );
                match fs::remove_dir_all(&self.root) {
                    Ok(()) => {}
                    Err(err) if err.kind() == ErrorKind::NotFound => {}
                    Err(err) => return Err(err.into()),
                }
                fs::create_dir_all(&self.root)?;
            }
        }

        self.sweep_trash();
        Ok(())
    }

    /// Deletes trees left behind by earlier clears whose cleanup failed.
    fn sweep_trash(&self) {
        let Some(parent) = self.root.parent() else {
            return;
        };
        let prefix = self.trash_prefix();
        let Ok(entries) = fs::read_dir(parent) else {
            return;
        };

        for entry in entries.filter_map(|entry| entry.ok()) {
            if !entry.file_name().to_string_lossy().starts_with(&prefix) {
                continue;
            }
            let path = entry.path();
            match fs::remove_dir_all(&path) {
                Ok(()) => debug!(dir = %path.display(), "removed stale cache trash"),
                Err(err) if err.kind() == ErrorKind::NotFound => {}
                Err(err) => debug!(
                    dir = %path.display(),
                    error = %err,
                    "failed to remove stale cache trash"
                ),
            }
        }
    }

    // == Usage ==
    /// Sums the sizes of all files under the tier's directory.
    pub fn usage_bytes(&self) -> u64 {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| entry.metadata().ok())
            .map(|meta| meta.len())
            .sum()
    }

    /// Number of files under the tier's directory.
    pub fn file_count(&self) -> usize {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .count()
    }

    /// `.<dir name>.trash-`, shared by every trash tree of this tier.
    fn trash_prefix(&self) -> String {
        let name = self
            .root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "cache".to_string());
        format!(".{name}.trash-")
    }

    fn trash_path(&self) -> PathBuf {
        let seq = TRASH_COUNTER.fetch_add(1, Ordering::Relaxed);
        let trash_name = format!("{}{}-{seq}", self.trash_prefix(), std::process::id());

        match self.root.parent() {
            Some(parent) => parent.join(trash_name),
            None => PathBuf::from(trash_name),
        }
    }
}
