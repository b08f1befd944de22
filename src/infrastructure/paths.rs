//! Filesystem locations.

use std::path::PathBuf;

/// Directory name under the platform data directory.
const APP_DIR: &str = "geoform";

/// Returns the default data directory for logs.
///
/// `$XDG_DATA_HOME/geoform` if set, else `~/.local/share/geoform`, else a
/// `geoform` directory under the system temp directory when no home is known.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    std::env::var_os("XDG_DATA_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| home_dir().map(|home| home.join(".local").join("share")))
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a tilde, and all paths when no home is known, are returned
/// as given.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().map_or_else(|| PathBuf::from(path), |home| home.join(rest)),
        None => PathBuf::from(path),
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
