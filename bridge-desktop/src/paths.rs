//! Search-path resolution for dotfiles.

use std::path::{Path, PathBuf};

/// Expand a leading `~` and any `$VAR` / `${VAR}` references.
///
/// Unset variables are left in place, matching shell `expandvars` behaviour.
pub fn expand_path(raw: &str) -> PathBuf {
    let expanded =
        shellexpand::full_with_context_no_errors(
            raw,
            || dirs::home_dir().map(|p| p.to_string_lossy().into_owned()),
            |name| std::env::var(name).ok());
    PathBuf::from(expanded.into_owned())
}

/// Return the first `<dir>/<filename>` in `search_path` that exists as a file.
pub fn find_in_search_path(search_path: &[String], filename: &str) -> Option<PathBuf> {
    search_path
        .iter()
        .map(|dir| expand_path(dir).join(filename))
        .find(|candidate| is_readable_file(candidate))
}

fn is_readable_file(path: &Path) -> bool {
    std::fs::File::open(path)
        .and_then(|f| f.metadata())
        .map(|m| m.is_file())
        .unwrap_or(false)
}
