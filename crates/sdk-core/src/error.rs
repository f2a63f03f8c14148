/// Error types for the job server client
use crate::config::ConfigError;
use thiserror::Error;

/// Boxed cause carried by transport failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Coarse classification of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller supplied an empty or missing required parameter
    InvalidArgument,

    /// Connection or I/O failure below HTTP
    Transport,

    /// Server answered with a non-success status
    ServerError,

    /// Response body did not match the shape the operation requires
    ParseError,
}

/// Main error type for client operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Rejected before any request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The request never produced an HTTP response
    #[error("Transport failure: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Non-success status that no operation special-cases
    #[error("Job server {url} responded {status}: {body}")]
    ServerError {
        status: u16,
        url: String,
        body: String,
    },

    /// Malformed or unexpected response body
    #[error("Failed to parse response: {message}")]
    ParseError {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

/// Type alias for client results
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Create a new invalid-argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a transport error with an underlying cause
    pub fn transport(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a server error from a status code and raw body
    pub fn server_error(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::ServerError {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Create a parse error without an underlying decoder error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::ParseError {
            message: message.into(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::ServerError { .. } => ErrorKind::ServerError,
            Self::ParseError { .. } => ErrorKind::ParseError,
        }
    }

    /// HTTP status of a server error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ServerError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_server_error(&self) -> bool {
        self.kind() == ErrorKind::ServerError
    }

    pub fn is_parse_error(&self) -> bool {
        self.kind() == ErrorKind::ParseError
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else {
            err.to_string()
        };
        Self::transport(message, err)
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<ConfigError> for ClientError {
    fn from(err: ConfigError) -> Self {
        Self::InvalidArgument(err.to_string())
    }
}
