//! Create directories together with any missing parents, tolerating
//! directories that already exist, and report failures as typed outcomes.
//!
//! Embedders inject their own [`Logger`]; [`logger::MemoryLogger`] keeps the
//! entries around for inspection:
//!
//! ```
//! use std::sync::Arc;
//!
//! use safe_recursive_mkdir::logger::MemoryLogger;
//! use safe_recursive_mkdir::{DirectoryEnsurer, ErrorKind, Level};
//!
//! let memory = Arc::new(MemoryLogger::default());
//! let ensurer = DirectoryEnsurer::with_logger(memory.clone());
//!
//! let failure = ensurer.ensure_directory(None).unwrap_err();
//! assert_eq!(failure.kind, ErrorKind::Validation);
//!
//! let entries = memory.entries();
//! assert_eq!(entries.len(), 2);
//! assert!(entries.iter().all(|entry| entry.level == Level::Debug));
//! ```

pub mod config;
pub mod driver;
pub mod ensure;
pub mod logger;
pub mod logging;
pub mod outcome;
pub mod paths;

pub use ensure::DirectoryEnsurer;
pub use logger::{Level, LogEntry, Logger};
pub use outcome::{ErrorKind, Failure, Outcome};
