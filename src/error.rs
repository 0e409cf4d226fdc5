//! Error taxonomy shared by every component of the core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An unknown playlist or track id was referenced
    #[error("Not found: {0}")]
    NotFound(String),

    /// An id was inserted twice into the catalog
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Transport or collaborator failure, including timeouts and non-2xx responses
    #[error("Remote error: {0}")]
    Remote(String),

    /// Two masks of different lengths were combined
    #[error("Mask length mismatch: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },
}

impl CoreError {
    /// Worth retrying by the user without touching local state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Remote(_))
    }

    /// Local state disagrees with the remote; the catalog should be re-synced.
    pub fn needs_resync(&self) -> bool {
        matches!(self, CoreError::NotFound(_) | CoreError::Conflict(_))
    }
}

impl From<rspotify::ClientError> for CoreError {
    fn from(err: rspotify::ClientError) -> Self {
        CoreError::Remote(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
