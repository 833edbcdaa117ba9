// Watermark engine - content sniffing, text overlay rendering, PNG export
pub mod compose;
pub mod error;
pub mod formats;

pub use error::WatermarkError;
pub use formats::SourceFormat;

use ab_glyph::FontVec;
use image::ImageFormat;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Applies one watermark text to one image at a time. Owns the parsed font
/// for the lifetime of a batch so it is loaded exactly once.
pub struct Watermarker {
    font: FontVec,
    output_directory: PathBuf,
}

impl Watermarker {
    pub fn new(font: FontVec, output_directory: PathBuf) -> Self {
        Self {
            font,
            output_directory,
        }
    }

    /// Where the output for `image_path` will be written: the input's base
    /// name with the extension replaced by `.png`, inside the output
    /// directory. Collisions overwrite silently.
    pub fn output_path_for(&self, image_path: &Path) -> PathBuf {
        let stem = image_path.file_stem().unwrap_or_else(|| OsStr::new("image"));
        let mut file_name = stem.to_os_string();
        file_name.push(".png");
        self.output_directory.join(file_name)
    }

    /// Watermark a single image and write the result as PNG. The content is
    /// classified by magic bytes first; files that are not JPEG or PNG fail
    /// without anything being written.
    pub fn watermark(&self, image_path: &Path, text: &str) -> Result<PathBuf, WatermarkError> {
        let format = match formats::sniff_format(image_path)? {
            Some(format) => format,
            None => return Err(WatermarkError::UnsupportedFormat),
        };
        debug!("{:?} detected as {:?}", image_path, format);

        let base = image::open(image_path)?;
        let composited = compose::composite_watermark(&base, &self.font, text);

        let output_path = self.output_path_for(image_path);
        image::DynamicImage::ImageRgba8(composited)
            .save_with_format(&output_path, ImageFormat::Png)?;

        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    mod compose_tests;
    mod format_tests;
}
