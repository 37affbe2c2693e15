//! Codec error types.

use thiserror::Error;

/// Failure to move a chart definition between memory and its encodings.
///
/// Both directions report through the same variant per format; a definition
/// that is structurally wrong but well-formed decodes fine here and is left
/// to validation.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The JSON text does not describe a chart definition (syntax error,
    /// missing `name`/`root`, unknown state kind, ...).
    #[error("Chart definition JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    /// The binary table is truncated or its body does not match the
    /// definition layout.
    #[error("Chart definition table is unreadable: {0}")]
    Binary(#[from] bincode::Error),

    /// The binary table was written by an incompatible encoder.
    #[error("Chart definition table has encoding version {found}, expected {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },
}
