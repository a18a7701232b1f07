use std::fmt;

/// Result of a single ensurer or driver call. Success carries no payload.
pub type Outcome<T = ()> = std::result::Result<T, Failure>;

/// Failure categories, each with the integer status code callers expect.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    /// Bad or missing argument; nothing was touched.
    Validation,
    /// The directory-creation primitive failed.
    Filesystem,
    /// At least one path in a batch failed.
    Aggregate,
}

impl ErrorKind {
    pub fn code(&self) -> i32 {
        match self {
            ErrorKind::Validation => -2,
            ErrorKind::Filesystem => -4,
            ErrorKind::Aggregate => -8,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Filesystem => "filesystem",
            ErrorKind::Aggregate => "aggregate",
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Failure {
    pub kind: ErrorKind,
    pub message: String,
}

impl Failure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn filesystem(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Filesystem, message)
    }

    pub fn code(&self) -> i32 {
        self.kind.code()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error ({}): {}", self.kind.as_str(), self.code(), self.message)
    }
}

impl std::error::Error for Failure {}

/// Integer status of an outcome: `0` on success, the kind's code otherwise.
pub fn status_code<T>(outcome: &Outcome<T>) -> i32 {
    match outcome {
        Ok(_) => 0,
        Err(failure) => failure.code(),
    }
}
