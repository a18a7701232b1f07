use std::process::ExitCode;

use anyhow::Result;
use safe_recursive_mkdir::config::Settings;
use safe_recursive_mkdir::logger::{FileSink, Level, LogEntry};
use safe_recursive_mkdir::paths::APP_NAME;
use safe_recursive_mkdir::{DirectoryEnsurer, driver};

use crate::cli::Cli;

const FUNCTION: &str = "run";

pub fn run(cli: Cli) -> Result<ExitCode> {
    let settings = Settings::load().unwrap_or_else(|err| {
        tracing::warn!("ignoring config file: {:#}", err);
        Settings::from_env()
    });
    let mut ensurer = DirectoryEnsurer::new().with_process_name(APP_NAME);
    install_logger(&mut ensurer, &settings);

    log(&ensurer, Level::Debug, "Start of execution block.".to_owned());

    let report = driver::ensure_all(&ensurer, &cli.paths);
    let status = report.exit_code();
    if let Err(failure) = report.into_outcome() {
        eprintln!("{}", failure);
        log(&ensurer, Level::Error, format!("{:?}", failure));
    }

    log(&ensurer, Level::Debug, "End of execution block.".to_owned());
    Ok(exit_code(status))
}

/// Create the log directory with a silent ensurer, then switch to the
/// configured logger. Logging problems never stop the run.
fn install_logger(ensurer: &mut DirectoryEnsurer, settings: &Settings) {
    let sink = match settings.resolved_log_dir() {
        Ok(dir) => match ensurer.ensure(&dir) {
            Ok(()) => Some(FileSink {
                path: dir.join(&settings.log_file),
                max_level: settings.level,
            }),
            Err(failure) => {
                tracing::warn!("file logging disabled: {}", failure);
                None
            }
        },
        Err(err) => {
            tracing::warn!("file logging disabled: {:#}", err);
            None
        }
    };

    if let Err(failure) = ensurer.set_logger_named(&settings.logger, sink.as_ref()) {
        tracing::warn!("structured logging disabled: {}", failure);
    }
}

fn log(ensurer: &DirectoryEnsurer, level: Level, message: String) {
    ensurer.logger().log(&LogEntry {
        process: ensurer.process_name().to_owned(),
        module: module_path!().to_owned(),
        file: file!().to_owned(),
        function: FUNCTION.to_owned(),
        level,
        message,
    });
}

/// Map a status to the process exit code. Negative statuses wrap the way the
/// OS reports them (`-8` becomes `248`).
fn exit_code(status: i32) -> ExitCode {
    ExitCode::from(status as u8)
}
