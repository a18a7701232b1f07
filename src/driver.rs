use std::ffi::{OsStr, OsString};
use std::fmt::Write as _;

use crate::ensure::DirectoryEnsurer;
use crate::outcome::{ErrorKind, Failure, Outcome};

/// One failed path from a batch.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PathFailure {
    pub index: usize,
    pub path: OsString,
    pub failure: Failure,
}

/// Aggregated result of [`ensure_all`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Report {
    pub attempted: usize,
    pub failures: Vec<PathFailure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// `0` when every path succeeded, the aggregate code otherwise.
    pub fn exit_code(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            ErrorKind::Aggregate.code()
        }
    }

    /// One ` index <i>: ensure_directory(<path>) returned <code>, "<msg>" |`
    /// segment per failure, in input order.
    pub fn aggregate_message(&self) -> String {
        let mut out = String::new();
        for failed in &self.failures {
            let _ = write!(
                out,
                " index {}: ensure_directory({}) returned {}, \"{}\" |",
                failed.index,
                failed.path.to_string_lossy(),
                failed.failure.code(),
                failed.failure.message
            );
        }
        out
    }

    pub fn into_outcome(self) -> Outcome {
        if self.is_success() {
            Ok(())
        } else {
            Err(Failure::new(ErrorKind::Aggregate, self.aggregate_message()))
        }
    }
}

/// Ensure every path in order. Failures are collected, never fatal.
pub fn ensure_all<P: AsRef<OsStr>>(ensurer: &DirectoryEnsurer, paths: &[P]) -> Report {
    let mut report = Report::default();
    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        report.attempted += 1;
        if let Err(failure) = ensurer.ensure(path) {
            report.failures.push(PathFailure {
                index,
                path: path.to_owned(),
                failure,
            });
        }
    }
    report
}
