use std::fmt;

/// Everything that can go wrong while talking to the race server or
/// driving a race session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Server answered with a non-2xx status
    Http { status: u16, url: String },
    /// Request never produced a response (network down, no window, ...)
    Transport(String),
    /// Response body was not the JSON we expected
    Decode(String),
    /// Poll returned a status the client does not know how to handle
    InvalidRaceStatus(String),
    PollLimitReached { attempts: u32 },
    Cancelled,
    /// A session was started before the user picked a track or racer
    MissingSelection(&'static str),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Http { status, url } => write!(f, "HTTP error: {} ({})", status, url),
            ApiError::Transport(msg) => write!(f, "Request failed: {}", msg),
            ApiError::Decode(msg) => write!(f, "Unexpected response body: {}", msg),
            ApiError::InvalidRaceStatus(status) => {
                write!(f, "race status is invalid: {}", status)
            }
            ApiError::PollLimitReached { attempts } => write!(
                f,
                "Race did not finish after {} status checks, giving up",
                attempts
            ),
            ApiError::Cancelled => write!(f, "Race session was cancelled"),
            ApiError::MissingSelection(what) => write!(f, "Please select a {} first", what),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Decode(err.to_string())
    }
}
