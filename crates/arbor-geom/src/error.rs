/// Errors produced by geometry helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An anchor name did not match any known anchor.
    UnknownAnchor(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAnchor(s) => write!(f, "unknown anchor: {s}"),
        }
    }
}

impl std::error::Error for Error {}

/// Result alias for geometry operations.
pub type Result<T> = std::result::Result<T, Error>;
