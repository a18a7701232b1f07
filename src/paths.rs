//! Platform application-data locations for the standalone program.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use camino::Utf8PathBuf;

pub const APP_NAME: &str = "safe-recursive-mkdir";

/// Directory that holds the program's log files.
///
/// Linux: `$XDG_STATE_HOME/<app>` (falls back to the local data dir).
/// macOS: `~/Library/Logs/<app>`. Windows: `%LOCALAPPDATA%\<app>\Log`.
pub fn log_dir() -> Result<Utf8PathBuf> {
    let dir = platform_log_dir().ok_or_else(|| anyhow!("unable to determine a log directory"))?;
    to_utf8(dir)
}

/// Directory searched for `config.toml`.
pub fn config_dir() -> Result<Utf8PathBuf> {
    let dir = dirs::config_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or_else(|| anyhow!("unable to determine a config directory"))?;
    to_utf8(dir)
}

#[cfg(target_os = "macos")]
fn platform_log_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join("Library").join("Logs").join(APP_NAME))
}

#[cfg(windows)]
fn platform_log_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|dir| dir.join(APP_NAME).join("Log"))
}

#[cfg(not(any(target_os = "macos", windows)))]
fn platform_log_dir() -> Option<PathBuf> {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .map(|dir| dir.join(APP_NAME))
}

fn to_utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path)
        .map_err(|path| anyhow!("{} is not valid UTF-8", path.display()))
}
