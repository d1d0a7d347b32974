//! The `VideoApi` trait: the backend's logical operations as seen by the
//! sync core.
//!
//! Implementations:
//! - [`HttpApi`](crate::HttpApi) - the real REST backend
//! - [`InMemoryApi`](crate::InMemoryApi) - scriptable double for tests

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use climbhub_shared::{Comment, Profile, UserId, Video, VideoId, VideoQuery};

use crate::error::Result;

/// Outcome of a toggle-like call.
///
/// `liked` is the server's post-toggle membership verdict for the acting
/// user and wins over the client's optimistic state on mismatch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: usize,
}

/// Outcome of a toggle-save call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SaveStatus {
    pub saved: bool,
}

/// Asynchronous interface to the ClimbHub backend.
///
/// Every method is a suspension point for the sync core; nothing else in
/// the core suspends. All user identity is passed explicitly so callers
/// can be tested in isolation.
#[async_trait]
pub trait VideoApi: Send + Sync {
    /// List videos for one of the four query shapes. Videos arrive without
    /// comments; hydration is the store's job.
    async fn list_videos(&self, query: &VideoQuery) -> Result<Vec<Video>>;

    /// Fetch the comment sequence for a video, server chronological order.
    async fn get_comments(&self, video: VideoId) -> Result<Vec<Comment>>;

    /// Flip `user`'s membership in the video's like set.
    async fn toggle_like(&self, video: VideoId, user: UserId) -> Result<LikeStatus>;

    /// Create a comment. The returned comment is server-populated,
    /// including denormalized author display data.
    async fn add_comment(&self, video: VideoId, author: UserId, text: &str) -> Result<Comment>;

    /// Flip whether `user` has saved the video to their profile.
    async fn toggle_save(&self, video: VideoId, user: UserId) -> Result<SaveStatus>;

    /// Fetch a user's profile, including the authoritative saved-video set.
    async fn get_profile(&self, user: UserId) -> Result<Profile>;
}
