//! Error types.
//!
//! The simulation itself never fails; only loading and saving tuning data can.

/// Errors that can occur when reading or parsing tuning data.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to read a tuning file from disk.
    #[error("failed to read tuning file: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to parse tuning JSON.
    #[error("failed to parse tuning: {0}")]
    Parse(#[source] serde_json::Error),

    /// Failed to serialize tuning to JSON.
    #[error("failed to serialize tuning: {0}")]
    Serialize(#[source] serde_json::Error),
}
