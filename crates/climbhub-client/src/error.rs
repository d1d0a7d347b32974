use thiserror::Error;

use climbhub_api::ApiError;
use climbhub_store::StoreError;

/// Rejections resolved entirely locally, before any network call.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// Comment text was empty after trimming.
    #[error("Comment text is empty")]
    EmptyComment,

    /// No user identity was supplied for the intent.
    #[error("No user identity")]
    MissingUser,
}

/// Typed failures surfaced to the rendering layer.
///
/// Remote-call variants are raised only after rollback has restored the
/// pre-intent state; the core classifies and rolls back, the view decides
/// presentation.
#[derive(Error, Debug)]
pub enum InteractionError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// The remote toggle-like call failed; the optimistic flip was
    /// reverted.
    #[error("Like toggle failed: {0}")]
    Like(#[source] ApiError),

    /// The remote add-comment call failed; nothing was shown (comments are
    /// never optimistically inserted).
    #[error("Comment post failed: {0}")]
    Comment(#[source] ApiError),

    /// The remote toggle-save call failed; the optimistic flip was
    /// reverted.
    #[error("Save toggle failed: {0}")]
    Save(#[source] ApiError),

    /// A follow-up retrieval (comment re-fetch, profile refresh) failed.
    #[error("Fetch failed: {0}")]
    Fetch(#[source] ApiError),

    /// Store-level failure, e.g. the video left the collection mid-flight.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, InteractionError>;
