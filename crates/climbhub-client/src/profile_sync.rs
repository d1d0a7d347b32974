//! Reconciliation of the saved-videos relationship.
//!
//! Save status is sourced from the profile entity, not the video entity.
//! This adapter recomputes the per-video saved projection from the
//! authoritative `saved_videos` set. It never mutates the store; callers
//! merge the returned map themselves.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use climbhub_api::{ApiError, VideoApi};
use climbhub_shared::{Profile, UserId, Video, VideoId};

#[derive(Clone)]
pub struct ProfileSyncAdapter {
    api: Arc<dyn VideoApi>,
}

impl ProfileSyncAdapter {
    pub fn new(api: Arc<dyn VideoApi>) -> Self {
        Self { api }
    }

    /// Fetch the profile and map every known video id to its membership in
    /// the authoritative saved set. Pure function of server state.
    pub async fn refresh(
        &self,
        user: UserId,
        known: &[VideoId],
    ) -> Result<HashMap<VideoId, bool>, ApiError> {
        let profile = self.api.get_profile(user).await?;
        debug!(user = %user, saved = profile.saved_videos.len(), "saved set refreshed");
        Ok(known
            .iter()
            .map(|&id| (id, profile.saved_videos.contains(&id)))
            .collect())
    }

    /// Seed the saved projection for a freshly loaded video list without a
    /// toggle round trip.
    pub fn build_initial_map(profile: &Profile, videos: &[Video]) -> HashMap<VideoId, bool> {
        videos
            .iter()
            .map(|video| (video.id, profile.saved_videos.contains(&video.id)))
            .collect()
    }
}
