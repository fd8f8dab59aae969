//! Utilities for input path collection and size formatting.

use crate::{Result, error::MarisolError};
use std::path::PathBuf;

/// Expand multiple glob patterns into filesystem paths.
///
/// Accepts anything iterable with items that convert to `&str`, e.g.:
/// `&[&str]`, `Vec<String>`, or `Vec<&str>`.
///
/// Matches of each pattern are returned in the order `glob` yields them
/// (alphabetical), and patterns are expanded in the order given. A pattern
/// without wildcards that names a missing file is kept as-is so the loader
/// can report it.
///
/// Errors:
/// - Propagates `glob` parse errors.
/// - Propagates filesystem errors from glob iterator.
pub fn collect_paths_for_patterns<T>(patterns: T) -> Result<Vec<PathBuf>>
where
    T: IntoIterator,
    T::Item: AsRef<str>,
{
    let mut resolved_paths = Vec::new();

    for pattern in patterns.into_iter() {
        let pattern = pattern.as_ref();
        let paths = collect_paths_for_pattern(pattern)?;
        if paths.is_empty() && !has_wildcards(pattern) {
            resolved_paths.push(PathBuf::from(pattern));
        } else {
            resolved_paths.extend(paths);
        }
    }

    Ok(resolved_paths)
}

fn has_wildcards(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

fn collect_paths_for_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|err| MarisolError::Other {
        message: format!("Invalid pattern {pattern}: {err}"),
    })?;

    paths
        .map(|entry| {
            entry.map_err(|err| MarisolError::Other {
                message: err.to_string(),
            })
        })
        .collect()
}

/// Format file size as human-readable string.
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{size} bytes")
    }
}
