use std::fmt;

/// Result alias used throughout the coordinator.
pub type CResult<T> = Result<T, Error>;

/// Errors returned by the timestamp coordinator.
///
/// `Invalid`/`NotFound`/`NotSupported` map directly onto the `INVAL`,
/// `NOTFOUND` and `NOTSUP` kinds of the external interface; `Internal` and
/// `Parse` are for bugs and malformed input that don't fit those three.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Malformed input, an ordering violation, or a call made in the wrong
    /// transaction state.
    Invalid(String),
    /// A query for a timestamp whose presence flag is not yet set.
    NotFound(String),
    /// The timestamp subsystem is disabled.
    NotSupported(&'static str),
    /// Failed to parse a hex timestamp literal.
    Parse(String),
    /// Anything else; should not normally surface to a caller.
    Internal(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Invalid(msg) => write!(f, "{msg}"),
            Error::NotFound(msg) => write!(f, "{msg}"),
            Error::NotSupported(msg) => write!(f, "{msg}"),
            Error::Parse(msg) => write!(f, "{msg}"),
            Error::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// `true` if this error came from [`Error::NotFound`], matching the
    /// `WT_NOTFOUND` kind used to distinguish "no such timestamp yet" from
    /// an actual validation failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}

pub(crate) fn invalid(msg: impl Into<String>) -> Error {
    Error::Invalid(msg.into())
}

pub(crate) fn not_found(msg: impl Into<String>) -> Error {
    Error::NotFound(msg.into())
}

pub(crate) fn not_supported(msg: &'static str) -> Error {
    Error::NotSupported(msg)
}
