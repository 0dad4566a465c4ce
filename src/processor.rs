//! High-level file encode, decode and cleanup operations.
//!
//! File I/O runs on the tokio runtime; the block stages run on the rayon pool
//! inside `spawn_blocking`, so the runtime threads never carry codec work.

use std::path::PathBuf;

use anyhow::{Context, Result, ensure};
use tokio::task;
use tracing::{info, warn};

use crate::degrade::Seed;
use crate::file::{Artifacts, File};
use crate::framing::Framing;
use crate::pipeline::Pipeline;
use crate::secret::SecretStream;
use crate::types::{Degradation, Processing, ProcessorMode};
use crate::ui::progress::Bar;

/// Summary of one finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub mode: ProcessorMode,
    pub level: Degradation,
    pub input_bytes: usize,
    pub blocks: usize,
    pub full_blocks: usize,
    pub remainder: usize,

    /// Hex seed of the degradation generator; set by encode.
    pub seed: Option<String>,

    /// Positions overwritten (encode) or symbols repaired (decode).
    pub symbols: usize,

    /// Files written, with their sizes.
    pub outputs: Vec<(PathBuf, usize)>,
}

/// Runs the block pipeline against files on disk.
pub struct Processor {
    level: Degradation,
    progress: bool,
}

impl Processor {
    #[inline]
    pub fn new(level: Degradation) -> Self {
        Self { level, progress: false }
    }

    /// Enables terminal progress bars.
    #[inline]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// Encodes `input`, degrades the encoded copy with bytes from `secret`
    /// and writes the degraded data and the redundancy stream.
    ///
    /// # Arguments
    /// * `input` - Host file
    /// * `secret` - Secret file supplying substitute bytes
    /// * `seed` - Degradation seed; a fresh one is drawn when `None`
    /// * `encoded` - Destination of the degraded data
    /// * `redundancy` - Destination of the redundancy stream
    pub async fn encode(&self, input: &File, secret: &File, seed: Option<Seed>, encoded: &File, redundancy: &File) -> Result<Report> {
        let data = input.read().await?;
        ensure!(!data.is_empty(), "cannot encode an empty file: {}", input.path().display());

        let secret_stream = SecretStream::from_vec(secret.read().await?);
        secret_stream.ensure_width(self.level.capacity()).with_context(|| format!("unusable secret file: {}", secret.path().display()))?;

        let seed = match seed {
            Some(seed) => seed,
            None => {
                let seed = Seed::random()?;
                info!(seed = %seed.to_hex(), "generated degradation seed");
                seed
            }
        };

        info!(input = %input.path().display(), degradation = %self.level, "ready to encode");

        let (level, progress) = (self.level, self.progress);
        let (stream, written) = task::spawn_blocking(move || -> Result<_> {
            let pipeline = Pipeline::new(level)?;
            let blocks = Framing::new(data.len(), level).block_count() as u64;

            let bar = progress_bar(progress, blocks, Processing::Encoding)?;
            let mut stream = pipeline.encode(&data, bar.as_ref())?;
            bar.iter().for_each(Bar::finish);

            let bar = progress_bar(progress, blocks, Processing::Degrading)?;
            let written = pipeline.degrade(&mut stream, &secret_stream, seed, bar.as_ref())?;
            bar.iter().for_each(Bar::finish);

            Ok((stream, written))
        })
        .await
        .context("encode worker panicked")??;

        encoded.write(&stream.data).await?;
        if let Err(e) = redundancy.write(&stream.redundancy).await {
            // Degraded data without its redundancy cannot be recovered.
            if let Err(cleanup) = tokio::fs::remove_file(encoded.path()).await {
                warn!(path = %encoded.path().display(), error = %cleanup, "failed to remove orphaned output");
            }
            return Err(e);
        }

        info!(encoded = %encoded.path().display(), redundancy = %redundancy.path().display(), "file encoded and degraded");

        Ok(Report {
            mode: ProcessorMode::Encode,
            level: self.level,
            input_bytes: stream.data.len(),
            blocks: stream.framing.block_count(),
            full_blocks: stream.framing.full_blocks(),
            remainder: stream.framing.remainder(),
            seed: Some(seed.to_hex()),
            symbols: written,
            outputs: vec![(encoded.path().to_path_buf(), stream.data.len()), (redundancy.path().to_path_buf(), stream.redundancy.len())],
        })
    }

    /// Recovers the original file from a degraded copy and its redundancy
    /// stream.
    ///
    /// The degradation level must be the one used at encode time.
    pub async fn decode(&self, input: &File, redundancy: &File, output: &File) -> Result<Report> {
        let data = input.read().await?;
        let parity = redundancy.read().await?;

        info!(input = %input.path().display(), degradation = %self.level, "ready to decode");

        let (level, progress) = (self.level, self.progress);
        let decoded = task::spawn_blocking(move || -> Result<_> {
            let pipeline = Pipeline::new(level)?;
            let bar = progress_bar(progress, Framing::new(data.len(), level).block_count() as u64, Processing::Decoding)?;

            let decoded = pipeline.decode(&data, &parity, bar.as_ref())?;
            bar.iter().for_each(Bar::finish);

            Ok(decoded)
        })
        .await
        .context("decode worker panicked")??;

        output.write(&decoded.data).await?;

        info!(output = %output.path().display(), "file decoded");

        Ok(Report {
            mode: ProcessorMode::Decode,
            level: self.level,
            input_bytes: decoded.data.len(),
            blocks: decoded.framing.block_count(),
            full_blocks: decoded.framing.full_blocks(),
            remainder: decoded.framing.remainder(),
            seed: None,
            symbols: decoded.corrected,
            outputs: vec![(output.path().to_path_buf(), decoded.data.len())],
        })
    }
}

/// Removes the encoded, redundancy, decoded and hash artifacts of `host`.
pub async fn clean(host: &File) -> Result<Vec<PathBuf>> {
    let removed = Artifacts::new(host).erase().await.with_context(|| format!("cleanup failed for {}", host.path().display()))?;
    info!(host = %host.path().display(), removed = removed.len(), "artifacts erased");

    Ok(removed)
}

fn progress_bar(enabled: bool, blocks: u64, processing: Processing) -> Result<Option<Bar>> {
    enabled.then(|| Bar::new(blocks, processing.label())).transpose()
}
