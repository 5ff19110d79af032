use crate::selection::{FileSource, RawFile};
use crate::utils::mime::mime_from_path;
use glob::Pattern;
use ignore::Walk;
use std::path::{Path, PathBuf};

/// Collects candidate files from plain files and folders.
///
/// Folders are walked recursively, honoring `.gitignore`. When `pattern` is set only
/// files whose name matches it are collected; explicitly named files are always kept.
pub fn collect_candidates(paths: &[PathBuf], pattern: Option<&Pattern>) -> std::io::Result<Vec<RawFile>> {
    let mut candidates = Vec::new();

    for path in paths {
        if !path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} does not exist", path.display()),
            ));
        }
        if path.is_file() {
            candidates.push(raw_file(path)?);
            continue;
        }

        for entry in Walk::new(path) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable entry");
                    continue;
                }
            };

            let entry_path = entry.path();
            if !entry_path.is_file() || !matches_pattern(entry_path, pattern) {
                continue;
            }
            candidates.push(raw_file(entry_path)?);
        }
    }

    tracing::debug!(count = candidates.len(), "collected candidate files");
    Ok(candidates)
}

fn matches_pattern(path: &Path, pattern: Option<&Pattern>) -> bool {
    let Some(pattern) = pattern else {
        return true;
    };
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|name| pattern.matches(name))
        .unwrap_or(false)
}

fn raw_file(path: &Path) -> std::io::Result<RawFile> {
    let metadata = std::fs::metadata(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    Ok(RawFile {
        name,
        byte_size: metadata.len(),
        mime_type: mime_from_path(path).to_string(),
        source: FileSource::Path(path.to_path_buf()),
    })
}
