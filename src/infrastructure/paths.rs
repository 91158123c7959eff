//! Data directory resolution.
//!
//! Preferences, history and traces live in one directory, chosen as:
//!
//! 1. `Config::data_dir` when set (a leading `~` is expanded)
//! 2. `$XDG_DATA_HOME/devsearch`
//! 3. `$HOME/.local/share/devsearch`
//! 4. `./.devsearch` when no home directory is known

use crate::Config;
use std::path::{Path, PathBuf};

pub const APP_DIR: &str = "devsearch";
pub const PREFERENCES_FILE: &str = "preferences.json";

/// Returns the data directory for `config`, reading the environment.
#[must_use]
pub fn data_dir(config: &Config) -> PathBuf {
    resolve_data_dir(
        config.data_dir.as_deref(),
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from).as_deref(),
        std::env::var_os("HOME").map(PathBuf::from).as_deref(),
    )
}

/// Pure form of [`data_dir`].
#[must_use]
pub fn resolve_data_dir(configured: Option<&str>, xdg_data_home: Option<&Path>, home: Option<&Path>) -> PathBuf {
    if let Some(dir) = configured.map(str::trim).filter(|d| !d.is_empty()) {
        return expand_tilde(dir, home);
    }
    if let Some(xdg) = xdg_data_home.filter(|p| p.is_absolute()) {
        return xdg.join(APP_DIR);
    }
    match home {
        Some(home) => home.join(".local").join("share").join(APP_DIR),
        None => PathBuf::from(format!(".{APP_DIR}")),
    }
}

/// Expands a leading `~` against `home`. Paths are returned unchanged when
/// no home directory is known.
///
/// ```
/// use devsearch::infrastructure::expand_tilde;
/// use std::path::{Path, PathBuf};
///
/// let home = Some(Path::new("/home/dev"));
/// assert_eq!(expand_tilde("~/notes", home), PathBuf::from("/home/dev/notes"));
/// assert_eq!(expand_tilde("~", home), PathBuf::from("/home/dev"));
/// assert_eq!(expand_tilde("/var/lib", home), PathBuf::from("/var/lib"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

#[must_use]
pub fn preferences_file(config: &Config) -> PathBuf {
    data_dir(config).join(PREFERENCES_FILE)
}

#[must_use]
pub fn trace_file(config: &Config) -> PathBuf {
    data_dir(config).join(crate::observability::TRACE_FILE_NAME)
}
