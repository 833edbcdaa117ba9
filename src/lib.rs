use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod batch;
pub mod selection;
pub mod startup_checks;
pub mod watermark;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub watermark: WatermarkConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub name: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Directory watermarked images are written to, created on demand.
    pub directory: PathBuf,
    /// Failure log, overwritten whenever a batch ends with at least one failure.
    pub error_log: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatermarkConfig {
    /// Font file for the watermark text. When unset or missing, well-known
    /// system locations of DejaVu Sans are probed instead.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    pub max_text_length: usize,
    pub placeholder: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: "keskonmark".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("output"),
            error_log: PathBuf::from("error_log.txt"),
        }
    }
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            max_text_length: 15,
            placeholder: "-> Type Here <-".to_string(),
        }
    }
}
