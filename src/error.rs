/// Crate level result alias
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Crate level error enum
#[derive(Debug)]
pub enum Error {
    /// Settings are missing or cannot be parsed
    Config(String),

    /// Inbound request carries a content type that isn't JSON
    UnsupportedMediaType(String),

    /// Occurs when an event cannot be parsed or serialized
    SerdeJson(serde_json::Error),

    /// Inbound request body couldn't be read
    BodyRead(String),

    /// Event is missing attributes required for managed delivery
    InvalidEvent(String),

    /// Outbound HTTP transport error
    Http(reqwest::Error),

    /// Destination answered with a non-successful status code
    Rejected {
        /// HTTP status code returned by the destination
        status_code: u16,
    },

    /// Managed delivery gave up
    RetriesExhausted {
        /// Number of attempts made
        attempts: u32,

        /// Failure of the last attempt
        last: Box<Error>,
    },

    /// I/O error
    Io(std::io::Error),
}

impl Error {
    /// Whether the error happened while handing the event to the destination
    pub fn is_delivery(&self) -> bool {
        matches!(
            self,
            Self::InvalidEvent(_)
                | Self::Http(_)
                | Self::Rejected { .. }
                | Self::RetriesExhausted { .. }
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SerdeJson(e) => Some(e),
            Self::Http(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::RetriesExhausted { last, .. } => Some(last.as_ref()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(message) => write!(f, "invalid configuration: {}", message),
            Self::UnsupportedMediaType(content_type) => {
                write!(f, "Content-Type header {} is not supported", content_type)
            }
            Self::SerdeJson(e) => write!(f, "{}", e),
            Self::BodyRead(message) => write!(f, "can't read body: {}", message),
            Self::InvalidEvent(message) => write!(f, "invalid event: {}", message),
            Self::Http(e) => write!(f, "{}", e),
            Self::Rejected { status_code } => {
                write!(f, "destination responded with status {}", status_code)
            }
            Self::RetriesExhausted { attempts, last } => {
                write!(f, "gave up after {} attempts: {}", attempts, last)
            }
            Self::Io(e) => write!(f, "{}", e),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::SerdeJson(error)
    }
}

impl From<reqwest::Error> for Error {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}
