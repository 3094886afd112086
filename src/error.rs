//! Per-request error taxonomy.
//!
//! Every failure a connection can hit while serving one request is a
//! [`ServeError`]. `ConnectionClosed` ends the connection silently; every
//! other variant is answered with the status returned by
//! [`ServeError::status`].

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::http::parser::ParseError;
use crate::http::response::StatusCode;

#[derive(Debug)]
pub enum ServeError {
    /// Peer closed the socket, or a read on it failed.
    ConnectionClosed,
    /// Request line or header block could not be parsed.
    Malformed(ParseError),
    /// Target escaped the document root or the writable directory.
    PathRejected { target: String },
    /// A contained path could not be opened, written, or removed.
    ResourceUnavailable { path: PathBuf, source: io::Error },
    /// No header terminator within the configured limit.
    HeaderTooLarge { limit: usize },
    /// Declared body exceeds the configured limit.
    BodyTooLarge { declared: usize, limit: usize },
}

impl ServeError {
    pub fn unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ServeError::ResourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Response status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::ConnectionClosed => StatusCode::BadRequest,
            ServeError::Malformed(_) => StatusCode::BadRequest,
            ServeError::PathRejected { .. } => StatusCode::Forbidden,
            ServeError::ResourceUnavailable { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => StatusCode::NotFound,
                io::ErrorKind::PermissionDenied => StatusCode::Forbidden,
                _ => StatusCode::InternalServerError,
            },
            ServeError::HeaderTooLarge { .. } => StatusCode::BadRequest,
            ServeError::BodyTooLarge { .. } => StatusCode::PayloadTooLarge,
        }
    }

    /// Whether the request's extent on the wire is unknown after this error,
    /// so the connection cannot be reused.
    pub fn breaks_framing(&self) -> bool {
        matches!(
            self,
            ServeError::ConnectionClosed
                | ServeError::HeaderTooLarge { .. }
                | ServeError::BodyTooLarge { .. }
                | ServeError::Malformed(ParseError::InvalidContentLength)
        )
    }
}

impl fmt::Display for ServeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServeError::ConnectionClosed => write!(f, "connection closed by peer"),
            ServeError::Malformed(e) => write!(f, "malformed request: {}", e),
            ServeError::PathRejected { target } => {
                write!(f, "path '{}' escapes the permitted directory", target)
            }
            ServeError::ResourceUnavailable { path, source } => {
                write!(f, "cannot access '{}': {}", path.display(), source)
            }
            ServeError::HeaderTooLarge { limit } => {
                write!(f, "header block exceeds {} bytes", limit)
            }
            ServeError::BodyTooLarge { declared, limit } => {
                write!(f, "declared body of {} bytes exceeds {} bytes", declared, limit)
            }
        }
    }
}

impl std::error::Error for ServeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServeError::ResourceUnavailable { source, .. } => Some(source),
            ServeError::Malformed(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ParseError> for ServeError {
    fn from(e: ParseError) -> Self {
        ServeError::Malformed(e)
    }
}
