//! Error types for dubbo-telnet.

use std::io;
use std::num::ParseIntError;
use std::time::Duration;

use thiserror::Error;

/// Main error type for console operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Socket-level errors (connect, read, write).
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The console answered but the content could not be interpreted.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Invalid configuration handed to the client builder.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A failure wrapped with the console operation that produced it.
    #[error("{operation}: {source}")]
    Command {
        operation: &'static str,
        #[source]
        source: Box<Error>,
    },
}

/// Coarse classification of an [`Error`], for callers that need to branch
/// on what went wrong rather than on message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The console could not be reached.
    Connect,
    /// The console did not answer within the read timeout.
    Timeout,
    /// The connection failed while writing or reading.
    Transport,
    /// The console answered with content that could not be parsed.
    Parse,
    /// The client was configured incorrectly.
    Config,
}

impl Error {
    /// Wrap this error with the name of the failing operation.
    pub fn context(self, operation: &'static str) -> Self {
        Error::Command {
            operation,
            source: Box::new(self),
        }
    }

    /// Classify the error, looking through any operation context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport(e) => e.kind(),
            Error::Parse(_) => ErrorKind::Parse,
            Error::InvalidConfig { .. } => ErrorKind::Config,
            Error::Command { source, .. } => source.kind(),
        }
    }

    /// The operation message attached by the client, if any.
    pub fn operation(&self) -> Option<&'static str> {
        match self {
            Error::Command { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// Check if this is a read timeout.
    pub fn is_timeout(&self) -> bool {
        self.kind() == ErrorKind::Timeout
    }
}

/// Transport layer errors (TCP connection to the console).
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failed to connect to host
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// Connect did not complete in time
    #[error("Connection to {host}:{port} timed out after {timeout:?}")]
    ConnectTimeout {
        host: String,
        port: u16,
        timeout: Duration,
    },

    /// No data arrived within the read timeout
    #[error("Read timed out after {0:?}")]
    ReadTimeout(Duration),

    /// The session was already closed
    #[error("Session closed")]
    Closed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl TransportError {
    fn kind(&self) -> ErrorKind {
        match self {
            TransportError::ConnectionFailed { .. } | TransportError::ConnectTimeout { .. } => {
                ErrorKind::Connect
            }
            TransportError::ReadTimeout(_) => ErrorKind::Timeout,
            TransportError::Closed | TransportError::Io(_) => ErrorKind::Transport,
        }
    }
}

/// Errors interpreting console output.
#[derive(Error, Debug)]
pub enum ParseError {
    /// The timing marker was present but its value or unit was missing
    #[error("Malformed elapsed marker in '{line}'")]
    MissingElapsed { line: String },

    /// The timing value was not an integer
    #[error("Invalid elapsed value '{value}': {source}")]
    InvalidElapsed {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Result type alias using dubbo-telnet's Error.
pub type Result<T> = std::result::Result<T, Error>;
