//! File Operations
//!
//! Whole-file reads and writes for the pipeline, plus the naming scheme of the
//! artifacts derived from a host file. Every stream is read once in full and
//! written once at the end; nothing is streamed.
//!
//! ## Artifact Naming
//!
//! Artifacts keep the host file's directory, stem and extension and insert a
//! suffix between stem and extension:
//!
//! - `photo.jpg` → `photo_Encoded.jpg` (degraded data)
//! - `photo.jpg` → `photo_Redundancy.jpg` (redundancy stream)
//! - `photo_Encoded.jpg` → `photo_Encoded_Decoded.jpg` (recovered data)

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail, ensure};
use tokio::fs;
use tracing::{debug, warn};

use crate::config::{DECODED_SUFFIX, ENCODED_SUFFIX, HASH_SUFFIX, REDUNDANCY_SUFFIX, SUFFIX_SEPARATOR};
use crate::error::Error;
use crate::types::ProcessorMode;

/// A file taking part in an encode or decode run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    path: PathBuf,

    /// Cached size, filled on first request.
    size: Option<u64>,
}

impl File {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), size: None }
    }

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file size, reading metadata only once.
    pub async fn size(&mut self) -> Result<u64> {
        if let Some(size) = self.size {
            return Ok(size);
        }

        let meta = fs::metadata(&self.path).await.with_context(|| format!("failed to get metadata: {}", self.path.display()))?;
        self.size = Some(meta.len());

        Ok(meta.len())
    }

    #[inline]
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    #[inline]
    pub fn is_dir(&self) -> bool {
        self.path.is_dir()
    }

    /// Path of the artifact carrying `suffix`, next to this file.
    pub fn artifact_path(&self, suffix: &str) -> PathBuf {
        let mut name = self.path.file_stem().unwrap_or_default().to_os_string();
        name.push(SUFFIX_SEPARATOR);
        name.push(suffix);

        if let Some(extension) = self.path.extension() {
            name.push(".");
            name.push(extension);
        }

        self.path.with_file_name(name)
    }

    /// Default output of running `mode` on this file.
    pub fn output_path(&self, mode: ProcessorMode) -> PathBuf {
        match mode {
            ProcessorMode::Encode => self.artifact_path(ENCODED_SUFFIX),
            ProcessorMode::Decode => self.artifact_path(DECODED_SUFFIX),
        }
    }

    pub async fn read(&self) -> Result<Vec<u8>> {
        let bytes = fs::read(&self.path).await.with_context(|| format!("failed to read file: {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "file read");

        Ok(bytes)
    }

    /// Writes `bytes`, replacing any previous content.
    pub async fn write(&self, bytes: &[u8]) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }

        fs::write(&self.path, bytes).await.with_context(|| format!("failed to write file: {}", self.path.display()))?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "file written");

        Ok(())
    }

    /// Checks that this is a readable, non-empty regular file.
    pub async fn validate(&mut self) -> Result<()> {
        ensure!(self.exists(), "file not found: {}", self.path.display());
        ensure!(!self.is_dir(), "path is a directory: {}", self.path.display());

        let size = self.size().await?;
        ensure!(size != 0, "file is empty: {}", self.path.display());

        Ok(())
    }
}

/// The files derived from one host file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    pub encoded: File,
    pub redundancy: File,
    pub decoded: File,
    pub hash: File,
}

impl Artifacts {
    pub fn new(host: &File) -> Self {
        let encoded = File::new(host.artifact_path(ENCODED_SUFFIX));
        let decoded = File::new(encoded.artifact_path(DECODED_SUFFIX));

        Self { redundancy: File::new(host.artifact_path(REDUNDANCY_SUFFIX)), hash: File::new(host.artifact_path(HASH_SUFFIX)), encoded, decoded }
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &File> {
        [&self.encoded, &self.redundancy, &self.decoded, &self.hash].into_iter()
    }

    /// Removes every artifact present on disk.
    ///
    /// Absent artifacts are skipped. Every other failure is collected and
    /// reported together after all removals were attempted.
    ///
    /// # Returns
    /// The paths that were removed
    pub async fn erase(&self) -> Result<Vec<PathBuf>> {
        let mut removed = Vec::new();
        let mut failed = Vec::new();

        for file in self.iter() {
            match fs::remove_file(file.path()).await {
                Ok(()) => removed.push(file.path().to_path_buf()),
                Err(e) if e.kind() == ErrorKind::NotFound => debug!(path = %file.path().display(), "artifact absent"),
                Err(e) => {
                    warn!(path = %file.path().display(), error = %e, "failed to erase artifact");
                    failed.push(file.path().to_path_buf());
                }
            }
        }

        if !failed.is_empty() {
            bail!(Error::Cleanup(failed));
        }

        Ok(removed)
    }
}
