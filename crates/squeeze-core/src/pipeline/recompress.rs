//! The recompressor: decode, normalize, then walk the quality ladder until the
//! encoded image fits the byte budget.

use image::{Rgb, RgbImage};
use std::path::Path;
use std::time::Instant;

use crate::config::{CompressionConfig, WriteMode};
use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::types::{CompressionJob, CompressionReport};

use super::decode::{format_to_string, ImageDecoder};
use super::encode::encode_jpeg;
use super::ladder::search;
use super::normalize::normalize;

/// Recompresses single images to fit a size budget.
#[derive(Debug, Clone)]
pub struct Recompressor {
    decoder: ImageDecoder,
    background: Rgb<u8>,
    write_mode: WriteMode,
}

impl Default for Recompressor {
    fn default() -> Self {
        Self::new(Rgb([26, 10, 46]), WriteMode::Overwrite)
    }
}

impl Recompressor {
    pub fn new(background: Rgb<u8>, write_mode: WriteMode) -> Self {
        Self {
            decoder: ImageDecoder,
            background,
            write_mode,
        }
    }

    /// Build from the `[compression]` config section.
    pub fn from_config(config: &CompressionConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(Rgb(config.background_rgb()?), config.write_mode))
    }

    /// Run one job.
    ///
    /// On return `job.dest` holds a valid JPEG: the first attempt under budget,
    /// or the lowest-quality attempt when nothing fit.
    pub fn compress(&self, job: &CompressionJob) -> PipelineResult<CompressionReport> {
        let start = Instant::now();
        tracing::debug!("Compressing {:?} -> {:?}", job.source, job.dest);
        if job.ladder.is_empty() {
            return Err(empty_ladder(job));
        }

        let decoded = self.decoder.decode(&job.source)?;
        tracing::trace!(
            "  Decode: {:?} ({} {}x{}, {} bytes)",
            start.elapsed(),
            format_to_string(decoded.format),
            decoded.width,
            decoded.height,
            decoded.file_size
        );

        let flattened_alpha = decoded.image.color().has_alpha();
        let normalize_start = Instant::now();
        let rgb = normalize(decoded.image, self.background);
        tracing::trace!("  Normalize: {:?}", normalize_start.elapsed());

        if let Some(parent) = job.dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PipelineError::write(parent, e))?;
        }

        let search_start = Instant::now();
        let result = match self.write_mode {
            WriteMode::Overwrite => search(&job.ladder, job.max_size_bytes, |quality| {
                let bytes = self.encode(&rgb, quality, &job.source)?;
                std::fs::write(&job.dest, &bytes).map_err(|e| PipelineError::write(&job.dest, e))?;
                std::fs::metadata(&job.dest)
                    .map(|m| m.len())
                    .map_err(|e| PipelineError::write(&job.dest, e))
            })?,
            WriteMode::Buffered => {
                let mut last = Vec::new();
                let result = search(&job.ladder, job.max_size_bytes, |quality| {
                    last = self.encode(&rgb, quality, &job.source)?;
                    Ok::<_, PipelineError>(last.len() as u64)
                })?;
                if result.is_some() {
                    write_replacing(&job.dest, &last)?;
                }
                result
            }
        };
        tracing::trace!("  Search: {:?}", search_start.elapsed());

        let found = result.ok_or_else(|| empty_ladder(job))?;
        tracing::trace!("  Attempts: {} of {}", found.attempts, job.ladder.len());

        Ok(CompressionReport {
            source: job.source.clone(),
            dest: job.dest.clone(),
            width: decoded.width,
            height: decoded.height,
            flattened_alpha,
            max_size_bytes: job.max_size_bytes,
            attempts: found.attempts,
            outcome: found.outcome,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn encode(&self, rgb: &RgbImage, quality: u8, source: &Path) -> PipelineResult<Vec<u8>> {
        encode_jpeg(rgb, quality).map_err(|e| PipelineError::Encode {
            path: source.to_path_buf(),
            quality,
            message: e.to_string(),
        })
    }
}

fn empty_ladder(job: &CompressionJob) -> PipelineError {
    PipelineError::Encode {
        path: job.source.clone(),
        quality: job.ladder.start(),
        message: format!(
            "quality ladder is empty (start {} <= floor {})",
            job.ladder.start(),
            job.ladder.floor()
        ),
    }
}

/// Recompress `source` into `dest` under `max_size_bytes` with the default
/// ladder (95 down to 15 in steps of 5) and background.
pub fn compress(source: &Path, dest: &Path, max_size_bytes: u64) -> PipelineResult<CompressionReport> {
    Recompressor::default().compress(&CompressionJob::new(source, dest, max_size_bytes))
}

// Write beside the destination then rename, so readers never see a partial file.
fn write_replacing(dest: &Path, bytes: &[u8]) -> PipelineResult<()> {
    let mut tmp_name = dest.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".partial");
    let tmp = dest.with_file_name(tmp_name);

    std::fs::write(&tmp, bytes).map_err(|e| PipelineError::write(&tmp, e))?;
    std::fs::rename(&tmp, dest).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        PipelineError::write(dest, e)
    })
}
