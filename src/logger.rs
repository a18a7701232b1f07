use std::fs::{File, OpenOptions};
use std::io::Write as _;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::outcome::Failure;

/// Severity of a [`LogEntry`]. Ordered from least to most verbose.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Level {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl FromStr for Level {
    type Err = Failure;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(Level::Error),
            "warn" | "warning" => Ok(Level::Warn),
            "info" => Ok(Level::Info),
            "debug" => Ok(Level::Debug),
            "trace" => Ok(Level::Trace),
            other => Err(Failure::validation(format!("unknown log level `{}`", other))),
        }
    }
}

impl TryFrom<String> for Level {
    type Error = Failure;

    fn try_from(raw: String) -> std::result::Result<Self, <Level as TryFrom<String>>::Error> {
        raw.parse()
    }
}

/// One structured log record emitted by the ensurer or the runner.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub process: String,
    pub module: String,
    pub file: String,
    pub function: String,
    pub level: Level,
    pub message: String,
}

/// Where log entries go. Implementations must tolerate being shared.
pub trait Logger: Send + Sync {
    fn log(&self, entry: &LogEntry);
}

/// Drops every entry.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopLogger;

impl Logger for NoopLogger {
    fn log(&self, _entry: &LogEntry) {}
}

pub fn noop() -> Arc<dyn Logger> {
    Arc::new(NoopLogger)
}

/// Forwards entries to `tracing` events at the matching level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, entry: &LogEntry) {
        macro_rules! emit {
            ($event:ident) => {
                tracing::$event!(
                    process = %entry.process,
                    module = %entry.module,
                    file = %entry.file,
                    function = %entry.function,
                    "{}",
                    entry.message
                )
            };
        }

        match entry.level {
            Level::Error => emit!(error),
            Level::Warn => emit!(warn),
            Level::Info => emit!(info),
            Level::Debug => emit!(debug),
            Level::Trace => emit!(trace),
        }
    }
}

#[derive(Serialize)]
struct FileRecord<'a> {
    timestamp: String,
    #[serde(flatten)]
    entry: &'a LogEntry,
}

/// Appends one JSON object per line to a log file.
#[derive(Debug)]
pub struct JsonFileLogger {
    path: Utf8PathBuf,
    max_level: Level,
    file: Mutex<File>,
}

impl JsonFileLogger {
    pub fn open(path: &Utf8Path, max_level: Level) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {}", path))?;
        Ok(Self {
            path: path.to_owned(),
            max_level,
            file: Mutex::new(file),
        })
    }

    fn write_entry(&self, entry: &LogEntry) -> Result<()> {
        let record = FileRecord {
            timestamp: chrono::Local::now().to_rfc3339(),
            entry,
        };
        let mut line = serde_json::to_string(&record).context("serializing log entry")?;
        line.push('\n');

        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow::anyhow!("log file lock poisoned"))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("writing {}", self.path))
    }
}

impl Logger for JsonFileLogger {
    fn log(&self, entry: &LogEntry) {
        if entry.level > self.max_level {
            return;
        }
        if let Err(err) = self.write_entry(entry) {
            tracing::warn!("dropping log entry: {:#}", err);
        }
    }
}

/// Sends every entry to each wrapped logger in turn.
#[derive(Default)]
pub struct FanoutLogger {
    loggers: Vec<Arc<dyn Logger>>,
}

impl FanoutLogger {
    pub fn new(loggers: Vec<Arc<dyn Logger>>) -> Self {
        Self { loggers }
    }
}

impl Logger for FanoutLogger {
    fn log(&self, entry: &LogEntry) {
        for logger in &self.loggers {
            logger.log(entry);
        }
    }
}

/// Keeps entries in memory; handy for embedders that want to inspect them.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemoryLogger {
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, entry: &LogEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry.clone());
        }
    }
}

/// Loggers that can be selected by name from configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggerKind {
    None,
    Tracing,
    File,
    All,
}

impl LoggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggerKind::None => "none",
            LoggerKind::Tracing => "tracing",
            LoggerKind::File => "file",
            LoggerKind::All => "all",
        }
    }

    /// Build the logger. `file` and `all` need a sink.
    pub fn build(&self, sink: Option<&FileSink>) -> Result<Arc<dyn Logger>> {
        let file_logger = || -> Result<Arc<dyn Logger>> {
            let Some(sink) = sink else {
                bail!("logger `{}` needs a log file", self.as_str());
            };
            Ok(Arc::new(JsonFileLogger::open(&sink.path, sink.max_level)?))
        };

        match self {
            LoggerKind::None => Ok(noop()),
            LoggerKind::Tracing => Ok(Arc::new(TracingLogger)),
            LoggerKind::File => file_logger(),
            LoggerKind::All => {
                let console: Arc<dyn Logger> = Arc::new(TracingLogger);
                Ok(Arc::new(FanoutLogger::new(vec![console, file_logger()?])))
            }
        }
    }
}

impl FromStr for LoggerKind {
    type Err = Failure;

    fn from_str(raw: &str) -> std::result::Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" | "noop" => Ok(LoggerKind::None),
            "tracing" => Ok(LoggerKind::Tracing),
            "file" => Ok(LoggerKind::File),
            "all" => Ok(LoggerKind::All),
            other => Err(Failure::validation(format!(
                "param \"logger\" is not a known logger: `{}` (expected none, tracing, file or all)",
                other
            ))),
        }
    }
}

/// Target of the file logger.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FileSink {
    pub path: Utf8PathBuf,
    pub max_level: Level,
}
