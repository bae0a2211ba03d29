//! Crate-level error for session operations.

use thiserror::Error;

use crate::config::ConfigError;
use crate::decode::DecodeError;
use crate::encode::EncodeError;
use crate::transform::ExtractionError;

/// Any failure surfaced by a [`crate::CropSession`].
#[derive(Debug, Error)]
pub enum CropError {
    /// The source could not be read. Fatal to the session.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// No usable crop yet. Retry after the next interaction.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The result could not be encoded. Preview state is unchanged.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl CropError {
    /// True when the caller can simply wait for a valid snapshot and retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, CropError::Extraction(_))
    }
}
