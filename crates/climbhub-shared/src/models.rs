//! Entity models exchanged with the ClimbHub backend.
//!
//! Every struct derives `Serialize` and `Deserialize` so it can be handed
//! directly to the rendering layer as well as decoded from API responses.
//! Entities are created by server responses, mutated only through the store
//! and controller, and evicted when the owning view session ends.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{CommentId, GradingSystem, GymId, ProfileId, SkillLevel, UserId, VideoId};

// ---------------------------------------------------------------------------
// Denormalized references
// ---------------------------------------------------------------------------

/// Denormalized gym data carried on each video.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GymRef {
    pub id: GymId,
    pub name: String,
    pub location: String,
}

/// Denormalized author display data carried on videos and comments.
///
/// The backend populates `name` and `image`; the client never synthesizes
/// these fields (a comment echoed without them is re-fetched instead).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    pub profile_id: ProfileId,
    pub name: String,
    pub image: Option<String>,
}

// ---------------------------------------------------------------------------
// Video
// ---------------------------------------------------------------------------

/// A single uploaded climbing video with its social interaction state.
///
/// `likes` is the authoritative like set: a user appears at most once and
/// `likes.len()` is the like count. `comments` is append-only in server
/// chronological order; the client never reorders or deduplicates it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: VideoId,
    pub description: String,
    /// Grade within `grading_system`, e.g. "V4" or "Yellow".
    pub difficulty_level: String,
    pub grading_system: GradingSystem,
    pub gym: GymRef,
    pub author: AuthorRef,
    pub created_at: DateTime<Utc>,
    /// Opaque media reference; playback is the rendering layer's concern.
    pub video_url: String,
    pub likes: HashSet<UserId>,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

// ---------------------------------------------------------------------------
// Comment
// ---------------------------------------------------------------------------

/// A comment on a video. Created server-side; never edited or deleted by
/// this client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    /// Back-reference for lookup, not an ownership edge.
    pub video_id: VideoId,
    pub author: AuthorRef,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A climber profile with preferences and the saved-videos relation.
///
/// `saved_videos` is the single source of truth for save status; any
/// per-video "is saved" flag held elsewhere is a derived projection that
/// must be reconciled against this set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: ProfileId,
    pub user: AuthorRef,
    pub skill_level: SkillLevel,
    /// Favorite gyms, used for preference-ranked listings.
    pub gyms: HashSet<GymId>,
    pub saved_videos: HashSet<VideoId>,
}
