//! Output filename derivation and HTML artifact writing.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::errors::AppError;
use crate::models::resume::Resume;

/// Versioned artifact name: `<prefix>_<CODE>_v<NNN>.html`, version
/// zero-padded to three digits (wider versions keep all their digits).
pub fn versioned_filename(prefix: &str, code: &str, version: u32) -> String {
    format!("{prefix}_{code}_v{version:03}.html")
}

/// Ad-hoc artifact name: `<base>_v<timestamp>_<hash>.html`. These outputs
/// bypass the version store entirely; the random hash keeps successive runs
/// from clobbering each other.
pub fn adhoc_filename(resume: &Resume, timestamp: &str, hash: &str) -> String {
    format!("{}_v{timestamp}_{hash}.html", adhoc_base_name(resume))
}

/// Six random lowercase hex characters.
pub fn short_hash() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..6].to_string()
}

fn adhoc_base_name(resume: &Resume) -> String {
    let base = resume
        .basics
        .name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    if base.is_empty() {
        "resume".to_string()
    } else {
        base
    }
}

/// Writes an artifact under `dir`, creating the directory tree as needed.
/// Returns the full path of the written file.
pub fn write_artifact(dir: &Path, filename: &str, html: &str) -> Result<PathBuf, AppError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(filename);
    std::fs::write(&path, html)?;
    Ok(path)
}
