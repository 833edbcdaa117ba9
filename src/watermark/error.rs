use thiserror::Error;

/// Per-image failures. None of these abort a batch; the batch runner records
/// the input path and moves on.
#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("Unsupported image format (content is not JPEG or PNG)")]
    UnsupportedFormat,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Worker task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}
