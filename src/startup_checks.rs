use crate::Config;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

/// Well-known DejaVu Sans locations probed when the configured font is absent.
const FONT_FALLBACK_PATHS: &[&str] = &[
    "static/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/Library/Fonts/DejaVuSans.ttf",
];

#[derive(Debug, Error)]
pub enum StartupCheckError {
    #[error("Watermark font not found in configured path or system locations")]
    FontFileMissing,

    #[error("Output path exists but is not a directory: {0}")]
    OutputPathNotADirectory(PathBuf),
}

/// Resolve the font file to use: the configured path when it exists,
/// otherwise the first fallback location that does.
pub fn resolve_font_path(config: &Config) -> Option<PathBuf> {
    if let Some(path) = &config.watermark.font_path {
        if path.exists() {
            return Some(path.clone());
        }
        warn!("Configured font {:?} does not exist, trying fallbacks", path);
    }

    FONT_FALLBACK_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

pub async fn perform_startup_checks(config: &Config) -> Result<(), Vec<StartupCheckError>> {
    let mut errors = Vec::new();

    info!("Performing startup checks...");

    match resolve_font_path(config) {
        Some(path) => info!("Watermark font found: {:?}", path),
        None => {
            warn!("No watermark font available");
            errors.push(StartupCheckError::FontFileMissing);
        }
    }

    let output_dir = &config.output.directory;
    match tokio::fs::metadata(output_dir).await {
        Ok(metadata) if !metadata.is_dir() => {
            errors.push(StartupCheckError::OutputPathNotADirectory(
                output_dir.clone(),
            ));
        }
        Ok(_) => info!("Output directory exists: {:?}", output_dir),
        Err(_) => info!(
            "Output directory {:?} does not exist yet, it will be created before processing",
            output_dir
        ),
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
