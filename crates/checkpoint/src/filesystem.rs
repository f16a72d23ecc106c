//! Filesystem-based cursor storage implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::store::{CursorStore, StoredCursor};

/// Filesystem implementation of CursorStore trait.
///
/// Stores each slot as `{dir}/{name}.json`. Writes go to a temporary file
/// that is synced and then renamed over the slot file, so readers see either
/// the old or the new value. The directory is synced after the rename on
/// Unix; elsewhere a crash right after a write may bring back the previous
/// cursor.
pub struct FilesystemStore {
    dir: PathBuf,
}

impl FilesystemStore {
    /// Create a new FilesystemStore with the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, name: &str) -> Result<PathBuf> {
        validate_slot_name(name)?;
        Ok(self.dir.join(format!("{name}.json")))
    }
}

fn validate_slot_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        anyhow::bail!("Invalid cursor slot name: '{name}'");
    }
    Ok(())
}

#[async_trait]
impl CursorStore for FilesystemStore {
    async fn read_cursor(&self, name: &str) -> Result<Option<StoredCursor>> {
        let path = self.slot_path(name)?;
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cursor file {}", path.display()))?;
        let stored: StoredCursor = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse cursor file {}", path.display()))?;
        Ok(Some(stored))
    }

    async fn write_cursor(&self, name: &str, next_id: i64) -> Result<()> {
        let path = self.slot_path(name)?;
        std::fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create checkpoint directory {}", self.dir.display())
        })?;

        let stored = StoredCursor::new(name, next_id);
        let tmp_path = self.dir.join(format!("{name}.json.tmp"));
        if let Err(e) = replace_file(&tmp_path, &path, &stored) {
            // Best effort; a leftover temp file is overwritten by the next write
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e);
        }
        sync_dir(&self.dir)?;

        tracing::debug!("Stored cursor {name}={next_id} to {}", path.display());
        Ok(())
    }
}

fn replace_file(tmp_path: &Path, path: &Path, stored: &StoredCursor) -> Result<()> {
    let content = serde_json::to_string_pretty(stored)?;
    let mut file = std::fs::File::create(tmp_path)
        .with_context(|| format!("Failed to create cursor file {}", tmp_path.display()))?;
    file.write_all(content.as_bytes())
        .and_then(|_| file.sync_all())
        .with_context(|| format!("Failed to write cursor file {}", tmp_path.display()))?;
    drop(file);

    std::fs::rename(tmp_path, path)
        .with_context(|| format!("Failed to replace cursor file {}", path.display()))
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> Result<()> {
    std::fs::File::open(dir)
        .and_then(|d| d.sync_all())
        .with_context(|| format!("Failed to sync checkpoint directory {}", dir.display()))
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> Result<()> {
    Ok(())
}
