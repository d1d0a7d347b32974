//! The `ClimbClient` facade: one wired store + controller pair that views
//! receive by dependency passing instead of each re-implementing hydration
//! and optimistic-update logic.

use std::sync::Arc;

use tracing::info;

use climbhub_api::{ApiConfig, ApiError, HttpApi, VideoApi};
use climbhub_shared::{UserId, Video, VideoQuery};
use climbhub_store::VideoStore;

use crate::controller::InteractionController;
use crate::error::{InteractionError, Result};
use crate::profile_sync::ProfileSyncAdapter;

/// Everything a view needs: the read surface (store snapshots and events)
/// and the intent surface (the controller).
#[derive(Clone)]
pub struct ClimbClient {
    store: VideoStore,
    controller: InteractionController,
    api: Arc<dyn VideoApi>,
}

impl ClimbClient {
    pub fn new(api: Arc<dyn VideoApi>) -> Self {
        let store = VideoStore::new(api.clone());
        let controller = InteractionController::new(store.clone(), api.clone());
        Self {
            store,
            controller,
            api,
        }
    }

    /// Connect to a real backend described by `config`.
    pub fn connect(config: ApiConfig) -> std::result::Result<Self, ApiError> {
        info!(base_url = %config.base_url, "connecting to backend");
        Ok(Self::new(Arc::new(HttpApi::new(config)?)))
    }

    pub fn store(&self) -> &VideoStore {
        &self.store
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Start a view session: load and hydrate the requested listing and,
    /// when a user is signed in, seed the saved projection from their
    /// profile so no toggle round trip is needed to render bookmarks.
    pub async fn open_feed(
        &self,
        query: &VideoQuery,
        user: Option<UserId>,
    ) -> Result<Vec<Video>> {
        let videos = self.store.load(query).await?;

        if let Some(user) = user {
            let profile = self
                .api
                .get_profile(user)
                .await
                .map_err(InteractionError::Fetch)?;
            let map = ProfileSyncAdapter::build_initial_map(&profile, &videos);
            self.store.merge_saved(&map);
        }

        Ok(videos)
    }

    /// End the view session and evict the collection.
    pub fn close_feed(&self) {
        self.store.clear();
    }
}
