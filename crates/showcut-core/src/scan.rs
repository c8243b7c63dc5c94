// crates/showcut-core/src/scan.rs
//
// Source-directory scan used by the front-end to resolve which file a run
// should process. The worker never calls this.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Extensions the scan reports, lower-case, without the dot.
pub const SUPPORTED_EXTENSIONS: [&str; 9] =
    ["mp4", "avi", "mov", "mkv", "png", "jpg", "jpeg", "bmp", "webp"];

/// Extensions decoded as a single still frame.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "webp"];

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("not a directory: {0}")]
    InvalidDirectory(PathBuf),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn lower_ext(path: &Path) -> Option<String> {
    path.extension().map(|e| e.to_string_lossy().to_ascii_lowercase())
}

/// Whether `path` names a still image rather than a video.
pub fn is_image_path(path: &Path) -> bool {
    lower_ext(path).is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.as_str()))
}

pub fn is_supported_path(path: &Path) -> bool {
    lower_ext(path).is_some_and(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
}

/// Regular files in `dir` (not recursive) with a supported extension,
/// sorted by file name.
pub fn scan_sources(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !dir.is_dir() {
        return Err(ScanError::InvalidDirectory(dir.to_path_buf()));
    }
    let mut found = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() && is_supported_path(&entry.path()) {
            found.push(entry.path());
        }
    }
    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(found)
}
