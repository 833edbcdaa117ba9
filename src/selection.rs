use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Extensions accepted when expanding a directory. Content sniffing
/// re-validates every file before it is processed, so this is only a
/// coarse pre-filter.
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "png"];

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("Failed to read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        source: walkdir::Error,
    },
}

/// Expand files and directories into the ordered list of image paths for one
/// batch run. Directories are walked sorted and extension-filtered; files
/// named explicitly are passed through untouched.
pub fn collect_image_paths(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, SelectionError> {
    let mut selected = Vec::new();

    for input in inputs {
        if input.is_dir() {
            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry.map_err(|source| SelectionError::DirectoryUnreadable {
                    path: input.clone(),
                    source,
                })?;
                if entry.file_type().is_file() && has_image_extension(entry.path()) {
                    selected.push(entry.into_path());
                }
            }
        } else {
            selected.push(input.clone());
        }
    }

    debug!("Selected {} files from {} inputs", selected.len(), inputs.len());
    Ok(selected)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}
