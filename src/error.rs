use thiserror::Error;

/// Failures of the task channel and its surroundings.
///
/// Business outcomes (missing id, duplicate id, short payment) are never
/// errors; they travel inside [`crate::outcome::TaskOutcome`]. This enum only
/// covers the cases where a task could not be delivered or answered at all.
#[derive(Error, Debug)]
pub enum MarketError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("codec error: {0}")]
    CodecError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("connection closed before a response arrived")]
    ConnectionClosed,
    #[error("engine reported an error: {0}")]
    RemoteError(String),
}

pub type Result<T> = std::result::Result<T, MarketError>;
