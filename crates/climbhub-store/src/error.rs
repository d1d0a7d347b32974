use thiserror::Error;

use climbhub_api::ApiError;

/// Errors produced by the store layer.
#[derive(Error, Debug)]
pub enum StoreError {
    /// List or comment retrieval from the backend failed. The previous
    /// in-memory collection is left untouched.
    #[error("Fetch failed: {0}")]
    Fetch(#[from] ApiError),

    /// The requested video id is not in the store.
    #[error("Video not found")]
    NotFound,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StoreError>;
