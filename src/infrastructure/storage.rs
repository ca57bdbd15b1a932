use crate::domain::chart::sanitize_file_component;
use crate::domain::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Create the output directory (and parents) when it does not exist yet.
pub fn ensure_output_dir(path: &Path) -> Result<PathBuf> {
    ensure_dir(path).map_err(|e| {
        AppError::IoError(format!(
            "Failed to create output directory {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(path.to_path_buf())
}

/// Base name used to prefix every artifact: the input file stem, made file-name safe.
pub fn base_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .filter(|stem| !stem.trim().is_empty())
        .map(|stem| sanitize_file_component(&stem))
        .unwrap_or_else(|| "dataset".to_string())
}

pub fn readme_path(output_dir: &Path, base_name: &str) -> PathBuf {
    output_dir.join(format!("{}_README.md", base_name))
}

/// Write a text artifact, replacing any previous version.
pub fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| AppError::IoError(format!("Failed to write {}: {}", path.display(), e)))
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
