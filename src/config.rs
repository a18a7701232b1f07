use std::fs;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::logger::Level;
use crate::paths;

pub const CONFIG_ENV: &str = "SAFE_RECURSIVE_MKDIR_CONFIG";
pub const LOG_DIR_ENV: &str = "SAFE_RECURSIVE_MKDIR_LOG_DIR";
pub const LOGGER_ENV: &str = "SAFE_RECURSIVE_MKDIR_LOGGER";

const DEFAULT_LOG_FILE: &str = "debug.log";
const DEFAULT_LOGGER: &str = "file";

/// Optional `config.toml` document. Every key may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub logger: Option<String>,
    pub level: Option<Level>,
    pub log_dir: Option<Utf8PathBuf>,
    pub log_file: Option<String>,
}

/// Effective settings after defaults and environment overrides.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Settings {
    /// Logger name, validated when the logger is installed.
    pub logger: String,
    pub level: Level,
    /// `None` means the platform log directory.
    pub log_dir: Option<Utf8PathBuf>,
    pub log_file: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self::resolve(FileConfig::default(), |_| None)
    }
}

impl Settings {
    /// Load the config file (if any) and apply process environment overrides.
    pub fn load() -> Result<Self> {
        let file = match config_path() {
            Some(path) if path.exists() => load_from_path(&path)?,
            _ => FileConfig::default(),
        };
        Ok(Self::resolve(file, |key| std::env::var(key).ok()))
    }

    /// Defaults plus process environment overrides, ignoring any config file.
    pub fn from_env() -> Self {
        Self::resolve(FileConfig::default(), |key| std::env::var(key).ok())
    }

    pub fn resolve(file: FileConfig, env: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        Self {
            logger: non_empty(LOGGER_ENV)
                .or(file.logger)
                .unwrap_or_else(|| DEFAULT_LOGGER.to_owned()),
            level: file.level.unwrap_or(Level::Debug),
            log_dir: non_empty(LOG_DIR_ENV).map(Utf8PathBuf::from).or(file.log_dir),
            log_file: file
                .log_file
                .unwrap_or_else(|| DEFAULT_LOG_FILE.to_owned()),
        }
    }

    /// Log directory to create before logging starts.
    pub fn resolved_log_dir(&self) -> Result<Utf8PathBuf> {
        match &self.log_dir {
            Some(dir) => Ok(dir.clone()),
            None => paths::log_dir(),
        }
    }
}

fn config_path() -> Option<Utf8PathBuf> {
    if let Some(explicit) = std::env::var(CONFIG_ENV).ok().filter(|v| !v.is_empty()) {
        return Some(Utf8PathBuf::from(explicit));
    }
    paths::config_dir().ok().map(|dir| dir.join("config.toml"))
}

pub fn load_from_path(path: &Utf8Path) -> Result<FileConfig> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading config {}", path))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir() -> Utf8PathBuf {
        let mut dir = std::env::temp_dir();
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        dir.push(format!("safe-mkdir-config-test-{ts}"));
        Utf8PathBuf::from_path_buf(dir).unwrap()
    }

    #[test]
    fn defaults_without_file_or_env() {
        let settings = Settings::default();
        assert_eq!(settings.logger, "file");
        assert_eq!(settings.level, Level::Debug);
        assert_eq!(settings.log_dir, None);
        assert_eq!(settings.log_file, "debug.log");
    }

    #[test]
    fn parses_config_file() {
        let root = unique_temp_dir();
        fs::create_dir_all(root.as_std_path()).unwrap();
        let path = root.join("config.toml");
        fs::write(
            path.as_std_path(),
            r#"logger = "all"
level = "info"
log_dir = "/tmp/mkdir-logs"
log_file = "run.log"
"#,
        )
        .unwrap();

        let file = load_from_path(&path).unwrap();
        let settings = Settings::resolve(file, |_| None);
        assert_eq!(settings.logger, "all");
        assert_eq!(settings.level, Level::Info);
        assert_eq!(settings.log_dir, Some(Utf8PathBuf::from("/tmp/mkdir-logs")));
        assert_eq!(settings.log_file, "run.log");

        let _ = fs::remove_dir_all(root.as_std_path());
    }

    #[test]
    fn level_accepts_mixed_case_and_aliases() {
        let file: FileConfig = toml::from_str("level = \"WARNING\"\n").unwrap();
        assert_eq!(file.level, Some(Level::Warn));
        let file: FileConfig = toml::from_str("level = \" Debug\"\n").unwrap();
        assert_eq!(file.level, Some(Level::Debug));

        let err = toml::from_str::<FileConfig>("level = \"loud\"\n").unwrap_err();
        assert!(err.to_string().contains("unknown log level"));
    }

    #[test]
    fn rejects_unknown_keys() {
        let root = unique_temp_dir();
        fs::create_dir_all(root.as_std_path()).unwrap();
        let path = root.join("config.toml");
        fs::write(path.as_std_path(), "mode = 0o755\n").unwrap();

        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parsing config"));

        let _ = fs::remove_dir_all(root.as_std_path());
    }

    #[test]
    fn env_overrides_file_values() {
        let file = FileConfig {
            logger: Some("file".to_owned()),
            log_dir: Some(Utf8PathBuf::from("/from/file")),
            ..FileConfig::default()
        };
        let env: HashMap<&str, &str> =
            HashMap::from([(LOGGER_ENV, "tracing"), (LOG_DIR_ENV, "/from/env")]);

        let settings = Settings::resolve(file, |key| env.get(key).map(|v| v.to_string()));
        assert_eq!(settings.logger, "tracing");
        assert_eq!(settings.log_dir, Some(Utf8PathBuf::from("/from/env")));
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let settings = Settings::resolve(FileConfig::default(), |_| Some("  ".to_owned()));
        assert_eq!(settings.logger, "file");
        assert_eq!(settings.log_dir, None);
    }
}
