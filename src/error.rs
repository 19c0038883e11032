use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport not initialized; call initialize() first")]
    NotInitialized,

    /// Joining the room failed. The underlying cause is logged, not carried.
    #[error("Failed to start transport")]
    TransportStart,

    #[error("Call session error: {0}")]
    Call(String),

    #[error("Failed to parse or serialize JSON: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("The call session closed before the operation completed")]
    ConnectionClosed,
}

impl Error {
    pub fn call(message: impl Into<String>) -> Self {
        Self::Call(message.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
