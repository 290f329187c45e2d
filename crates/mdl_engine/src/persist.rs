use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

use crate::filename::url_to_filename;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure output directory exists and accepts new files; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Writes whole files through a sibling temp file and a rename, so readers
/// never observe a half-written document.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;
        // Rename replaces a file another worker wrote in the meantime.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    Written(PathBuf),
    Skipped(PathBuf),
}

/// Stores converted pages under their URL-derived name. An existing file
/// marks the URL as done and is never read or rewritten.
pub struct MarkdownWriter {
    dir: PathBuf,
    files: AtomicFileWriter,
}

impl MarkdownWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self {
            files: AtomicFileWriter::new(dir.clone()),
            dir,
        }
    }

    pub fn target_path(&self, url: &str) -> PathBuf {
        self.dir.join(url_to_filename(url))
    }

    pub fn exists(&self, url: &str) -> bool {
        self.target_path(url).exists()
    }

    pub fn write(&self, url: &str, text: &str) -> Result<WriteOutcome, PersistError> {
        let target = self.target_path(url);
        if target.exists() {
            return Ok(WriteOutcome::Skipped(target));
        }
        let written = self.files.write(&url_to_filename(url), text)?;
        Ok(WriteOutcome::Written(written))
    }
}
