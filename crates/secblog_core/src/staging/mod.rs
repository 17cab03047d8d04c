//! Scoped on-disk staging for generated post content.
//!
//! A [`StagedDraft`] owns `<root>/<global_id>.txt` for its whole lifetime and
//! removes it when dropped, whether the publish succeeded or not.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    pub fn open(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn path_for(&self, global_id: &str) -> Result<PathBuf, AppError> {
        validate_key(global_id)?;
        Ok(self.root.join(format!("{global_id}.txt")))
    }

    /// True while a draft for `global_id` is staged.
    pub fn exists(&self, global_id: &str) -> bool {
        self.path_for(global_id).map(|p| p.exists()).unwrap_or(false)
    }

    fn ensure_dirs(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).map_err(|e| {
            AppError::new("STAGING_IO_FAILED", "Failed to create staging directory")
                .with_details(format!("path={}; err={}", self.root.display(), e))
        })
    }

    /// Start a fresh draft. Any leftover file for the same id is truncated.
    pub fn begin(&self, global_id: &str) -> Result<StagedDraft, AppError> {
        let path = self.path_for(global_id)?;
        self.ensure_dirs()?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|e| {
                AppError::new("STAGING_IO_FAILED", "Failed to create staging file")
                    .with_details(format!("path={}; err={}", path.display(), e))
            })?;
        tracing::debug!(path = %path.display(), "staging draft opened");
        Ok(StagedDraft {
            global_id: global_id.to_string(),
            path,
            file: Some(file),
            blocks: 0,
        })
    }
}

fn validate_key(global_id: &str) -> Result<(), AppError> {
    let ok = !global_id.is_empty()
        && global_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !ok {
        return Err(AppError::new(
            "INPUT_STAGING_KEY_INVALID",
            "Staging key must be non-empty ASCII alphanumerics, '-' or '_'",
        )
        .with_details(format!("global_id={global_id:?}")));
    }
    Ok(())
}

#[derive(Debug)]
pub struct StagedDraft {
    global_id: String,
    path: PathBuf,
    file: Option<File>,
    blocks: usize,
}

impl StagedDraft {
    pub fn global_id(&self) -> &str {
        &self.global_id
    }

    pub fn path(&self) -> &Path {
        self.path.as_path()
    }

    pub fn block_count(&self) -> usize {
        self.blocks
    }

    /// Append one block, newline-terminated.
    pub fn append_block(&mut self, block: &str) -> Result<(), AppError> {
        let file = self.file.as_mut().ok_or_else(|| {
            AppError::new("STAGING_IO_FAILED", "Staging file already closed")
                .with_details(format!("path={}", self.path.display()))
        })?;
        file.write_all(block.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .map_err(|e| {
                AppError::new("STAGING_IO_FAILED", "Failed to append to staging file")
                    .with_details(format!("path={}; err={}", self.path.display(), e))
            })?;
        self.blocks += 1;
        Ok(())
    }

    pub fn read_to_string(&mut self) -> Result<String, AppError> {
        if let Some(file) = self.file.as_mut() {
            file.flush().map_err(|e| {
                AppError::new("STAGING_IO_FAILED", "Failed to flush staging file")
                    .with_details(format!("path={}; err={}", self.path.display(), e))
            })?;
        }
        fs::read_to_string(&self.path).map_err(|e| {
            AppError::new("STAGING_IO_FAILED", "Failed to read staging file")
                .with_details(format!("path={}; err={}", self.path.display(), e))
        })
    }

    /// Hand the staged content to `deliver`, then release the file.
    pub fn deliver<T>(
        mut self,
        deliver: impl FnOnce(&str) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let content = self.read_to_string()?;
        deliver(&content)
    }
}

impl Drop for StagedDraft {
    fn drop(&mut self) {
        // Close before unlinking so removal also works on Windows.
        self.file.take();
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "staging draft released"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "failed to remove staging file"
            ),
        }
    }
}
