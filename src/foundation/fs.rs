use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::GrantResult;

/// Size of a regular file in bytes, or `None` when it does not exist.
pub fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path)
        .ok()
        .filter(|m| m.is_file())
        .map(|m| m.len())
}

/// Whole kibibytes, rounded down.
pub fn kib(bytes: u64) -> u64 {
    bytes / 1024
}

/// Whole mebibytes, rounded down.
pub fn mib(bytes: u64) -> u64 {
    bytes / 1024 / 1024
}

/// Last `max_chars` characters of `s`.
///
/// Slices on a char boundary so multi-byte diagnostics from external tools never panic.
pub fn tail_chars(s: &str, max_chars: usize) -> &str {
    let count = s.chars().count();
    if count <= max_chars {
        return s;
    }
    let skip = count - max_chars;
    match s.char_indices().nth(skip) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> GrantResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
