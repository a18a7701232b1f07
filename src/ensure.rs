use std::ffi::OsStr;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use camino::Utf8Path;

use crate::logger::{self, FileSink, Level, LogEntry, Logger, LoggerKind};
use crate::outcome::{ErrorKind, Failure, Outcome};

/// Ensures directories exist, creating missing ancestors along the way.
///
/// Every call is independent: one attempt at `fs::create_dir_all`, no
/// retries, and the outcome is reported back to the caller. Progress goes to
/// the injected [`Logger`], which defaults to a no-op.
#[derive(Clone)]
pub struct DirectoryEnsurer {
    process: String,
    logger: Arc<dyn Logger>,
}

impl Default for DirectoryEnsurer {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryEnsurer {
    pub fn new() -> Self {
        Self {
            process: default_process_name(),
            logger: logger::noop(),
        }
    }

    pub fn with_logger(logger: Arc<dyn Logger>) -> Self {
        Self {
            logger,
            ..Self::new()
        }
    }

    /// Override the `process` field stamped on every log entry.
    pub fn with_process_name(mut self, process: impl Into<String>) -> Self {
        self.process = process.into();
        self
    }

    pub fn process_name(&self) -> &str {
        &self.process
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }

    /// Replace the logger. `None` resets to the no-op logger.
    pub fn set_logger(&mut self, logger: Option<Arc<dyn Logger>>) -> Outcome {
        self.logger = logger.unwrap_or_else(logger::noop);
        Ok(())
    }

    /// Select a stock logger by name. Unknown names leave the current logger
    /// in place.
    pub fn set_logger_named(&mut self, name: &str, sink: Option<&FileSink>) -> Outcome {
        let kind: LoggerKind = name.parse()?;
        let built = kind
            .build(sink)
            .map_err(|err| Failure::filesystem(format!("{:#}", err)))?;
        self.set_logger(Some(built))
    }

    /// Ensure `path` is a directory. `None`, empty and non-UTF-8 paths are
    /// rejected before the filesystem is touched.
    pub fn ensure_directory(&self, path: Option<&OsStr>) -> Outcome {
        const FUNCTION: &str = "ensure_directory";

        self.log(FUNCTION, Level::Debug, format!("received: {:?}", path));

        let outcome = match validate(path) {
            Ok(path) => self.create(path),
            Err(failure) => Err(failure),
        };

        if let Err(failure) = &outcome {
            if failure.kind == ErrorKind::Filesystem {
                self.log(FUNCTION, Level::Error, failure.message.clone());
            }
        }

        self.log(FUNCTION, Level::Debug, format!("returned: {:?}", outcome));
        outcome
    }

    pub fn ensure(&self, path: impl AsRef<OsStr>) -> Outcome {
        self.ensure_directory(Some(path.as_ref()))
    }

    fn create(&self, path: &Utf8Path) -> Outcome {
        fs::create_dir_all(path)
            .with_context(|| format!("creating directory {}", path))
            .map_err(|err| Failure::filesystem(format!("{:#}", err)))
    }

    fn log(&self, function: &str, level: Level, message: String) {
        self.logger.log(&LogEntry {
            process: self.process.clone(),
            module: module_path!().to_owned(),
            file: file!().to_owned(),
            function: function.to_owned(),
            level,
            message,
        });
    }
}

fn validate(path: Option<&OsStr>) -> Outcome<&Utf8Path> {
    let Some(raw) = path else {
        return Err(Failure::validation(
            "param \"path\" is either missing or not a string",
        ));
    };
    let path = Utf8Path::from_path(Path::new(raw)).ok_or_else(|| {
        Failure::validation(format!(
            "param \"path\" is either missing or not a string: {:?}",
            raw
        ))
    })?;
    if path.as_str().is_empty() {
        return Err(Failure::validation("param \"path\" is empty"));
    }
    Ok(path)
}

fn default_process_name() -> String {
    std::env::args_os()
        .next()
        .and_then(|arg0| {
            Path::new(&arg0)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned())
}
