use crate::Config;
use crate::watermark::{WatermarkError, Watermarker};
use ab_glyph::FontVec;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Reasons the watermark text is rejected before any image is touched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextError {
    #[error("watermark text is empty")]
    Empty,

    #[error("watermark text is still the placeholder prompt")]
    Placeholder,

    #[error("watermark text is {len} characters, the maximum is {max}")]
    TooLong { len: usize, max: usize },
}

/// Batch-fatal errors. None of the inputs are processed when any of these
/// occur.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("Invalid watermark text: {0}")]
    InvalidText(#[from] TextError),

    #[error("Cannot create output directory {path}: {source}")]
    OutputDirectoryUnwritable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Watermark font unavailable: {0}")]
    FontUnavailable(String),
}

/// One input path, one result, in input order.
#[derive(Debug)]
pub struct ImageRecord {
    pub input: PathBuf,
    pub result: Result<PathBuf, WatermarkError>,
}

/// Everything one batch run produced.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<ImageRecord>,
}

impl BatchOutcome {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn success_count(&self) -> usize {
        self.records.iter().filter(|r| r.result.is_ok()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.records.iter().filter(|r| r.result.is_err()).count()
    }

    /// Input paths that failed, in processing order.
    pub fn failed_paths(&self) -> Vec<&Path> {
        self.records
            .iter()
            .filter(|r| r.result.is_err())
            .map(|r| r.input.as_path())
            .collect()
    }
}

/// Reject empty text, the placeholder prompt, and over-length text.
/// Length is counted in characters, not bytes.
pub fn validate_text(text: &str, placeholder: &str, max_length: usize) -> Result<(), TextError> {
    if text.is_empty() {
        return Err(TextError::Empty);
    }
    if text == placeholder {
        return Err(TextError::Placeholder);
    }
    let len = text.chars().count();
    if len > max_length {
        return Err(TextError::TooLong {
            len,
            max: max_length,
        });
    }
    Ok(())
}

/// Watermark every path in order, collecting per-image failures instead of
/// aborting on them. Preconditions (text, output directory, font) are
/// checked before any image I/O; each failing precondition is batch-fatal.
pub async fn run_batch(
    paths: &[PathBuf],
    text: &str,
    config: &Config,
) -> Result<BatchOutcome, BatchError> {
    validate_text(
        text,
        &config.watermark.placeholder,
        config.watermark.max_text_length,
    )?;

    let output_dir = &config.output.directory;
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|source| BatchError::OutputDirectoryUnwritable {
            path: output_dir.clone(),
            source,
        })?;

    let font = load_font(config)?;
    let watermarker = Arc::new(Watermarker::new(font, output_dir.clone()));

    info!("Processing {} images", paths.len());
    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        // One image at a time: the blocking task is awaited before the next
        // is dispatched.
        let task_watermarker = Arc::clone(&watermarker);
        let task_path = path.clone();
        let task_text = text.to_string();
        let result = match tokio::task::spawn_blocking(move || {
            task_watermarker.watermark(&task_path, &task_text)
        })
        .await
        {
            Ok(result) => result,
            Err(join_error) => Err(WatermarkError::TaskFailed(join_error)),
        };

        match &result {
            Ok(output) => debug!("Watermarked {} -> {}", path.display(), output.display()),
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }

        records.push(ImageRecord {
            input: path.clone(),
            result,
        });
    }

    let outcome = BatchOutcome { records };
    if outcome.failure_count() > 0 {
        write_failure_log(&config.output.error_log, &outcome).await;
    }

    info!(
        "Batch complete: {} succeeded, {} failed",
        outcome.success_count(),
        outcome.failure_count()
    );
    Ok(outcome)
}

fn load_font(config: &Config) -> Result<FontVec, BatchError> {
    let font_path = crate::startup_checks::resolve_font_path(config)
        .ok_or_else(|| BatchError::FontUnavailable("no usable font file found".to_string()))?;
    let font_data = std::fs::read(&font_path)
        .map_err(|e| BatchError::FontUnavailable(format!("{}: {}", font_path.display(), e)))?;
    FontVec::try_from_vec(font_data).map_err(|_| {
        BatchError::FontUnavailable(format!("{} is not a valid font file", font_path.display()))
    })
}

/// One failed input path per line. Only written when at least one failure
/// occurred; a stale log from an earlier run is left alone otherwise.
async fn write_failure_log(log_path: &Path, outcome: &BatchOutcome) {
    let lines: Vec<String> = outcome
        .failed_paths()
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    if let Err(e) = tokio::fs::write(log_path, lines.join("\n")).await {
        error!("Failed to write failure log {}: {}", log_path.display(), e);
    }
}
