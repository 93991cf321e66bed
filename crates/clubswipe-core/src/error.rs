use thiserror::Error;

/// Errors returned by registry, rehearsal and payment operations.
///
/// Every variant is recoverable: the operation that produced it has left the
/// dataset exactly as it was, so the caller can re-prompt and try again.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClubError {
    #[error("Name already taken: {0}")]
    DuplicateName(String),

    #[error("Not in registry: {0}")]
    NotFound(String),

    #[error("Not a valid section name: {0} (expected T1, T2, Bari, or Bass)")]
    InvalidSection(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

pub type Result<T> = std::result::Result<T, ClubError>;
