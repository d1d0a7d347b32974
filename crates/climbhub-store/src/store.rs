//! The in-memory video collection for the active view session.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::try_join_all;
use tracing::{debug, info};

use climbhub_api::VideoApi;
use climbhub_shared::{Comment, UserId, Video, VideoId, VideoQuery};

use crate::error::{Result, StoreError};
use crate::events::{EventBus, StoreEvent};

#[derive(Default)]
struct Inner {
    videos: HashMap<VideoId, Video>,
    /// Listing order as returned by the backend.
    order: Vec<VideoId>,
    /// Derived projection of the profile's saved-video set.
    saved: HashMap<VideoId, bool>,
}

/// Authoritative local copy of a video list.
///
/// Cheap to clone; all clones share the same collection and event bus.
/// Mutations are synchronous and atomic with respect to the event loop:
/// only [`load`](VideoStore::load) suspends, and it never holds the lock
/// across an await. Views must treat returned entities as read-only
/// snapshots and route every write through the interaction layer.
#[derive(Clone)]
pub struct VideoStore {
    inner: Arc<Mutex<Inner>>,
    api: Arc<dyn VideoApi>,
    events: Arc<EventBus>,
}

impl VideoStore {
    pub fn new(api: Arc<dyn VideoApi>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
            api,
            events: Arc::new(EventBus::new()),
        }
    }

    /// The bus views subscribe to for re-render notifications.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch a video list and hydrate each video's comments, then replace
    /// the collection with the result.
    ///
    /// Comment fetches fan out concurrently. If the listing or any comment
    /// fetch fails the whole load fails and the previous collection is left
    /// untouched; there is no partial hydration.
    pub async fn load(&self, query: &VideoQuery) -> Result<Vec<Video>> {
        let mut videos = self.api.list_videos(query).await?;
        debug!(count = videos.len(), "listing fetched, hydrating comments");

        let comments =
            try_join_all(videos.iter().map(|video| self.api.get_comments(video.id))).await?;
        for (video, comments) in videos.iter_mut().zip(comments) {
            video.comments = comments;
        }

        {
            let mut inner = self.lock();
            inner.order = videos.iter().map(|v| v.id).collect();
            inner.videos = videos.iter().map(|v| (v.id, v.clone())).collect();
            inner.saved.clear();
        }
        info!(count = videos.len(), "video collection loaded");
        self.events.emit(StoreEvent::Loaded {
            count: videos.len(),
        });
        Ok(videos)
    }

    /// Snapshot of one video, or `NotFound`.
    pub fn get(&self, id: VideoId) -> Result<Video> {
        self.lock().videos.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    /// Snapshot of the whole collection in listing order.
    pub fn videos(&self) -> Vec<Video> {
        let inner = self.lock();
        inner
            .order
            .iter()
            .filter_map(|id| inner.videos.get(id).cloned())
            .collect()
    }

    /// Ids of every currently-known video, in listing order.
    pub fn video_ids(&self) -> Vec<VideoId> {
        self.lock().order.clone()
    }

    /// Atomically swap the comment sequence for one video.
    ///
    /// Used after a confirmed add-comment round trip so the store reflects
    /// the server-populated sequence rather than a client-echoed comment.
    pub fn replace_comments(&self, id: VideoId, comments: Vec<Comment>) -> Result<()> {
        let comment_count = comments.len();
        {
            let mut inner = self.lock();
            let video = inner.videos.get_mut(&id).ok_or(StoreError::NotFound)?;
            video.comments = comments;
        }
        self.events.emit(StoreEvent::CommentsReplaced {
            video_id: id,
            comment_count,
        });
        Ok(())
    }

    /// Add or remove `user` from the video's like set.
    ///
    /// Idempotent: re-applying the current membership is a no-op and emits
    /// nothing.
    pub fn apply_like_delta(&self, id: VideoId, user: UserId, liked: bool) -> Result<()> {
        let changed_count = {
            let mut inner = self.lock();
            let video = inner.videos.get_mut(&id).ok_or(StoreError::NotFound)?;
            let changed = if liked {
                video.likes.insert(user)
            } else {
                video.likes.remove(&user)
            };
            changed.then_some(video.likes.len())
        };
        if let Some(like_count) = changed_count {
            debug!(video = %id, user = %user, liked, like_count, "like delta applied");
            self.events.emit(StoreEvent::LikesChanged {
                video_id: id,
                like_count,
            });
        }
        Ok(())
    }

    /// Whether `user` is currently in the video's like set.
    pub fn is_liked_by(&self, id: VideoId, user: UserId) -> Result<bool> {
        let inner = self.lock();
        let video = inner.videos.get(&id).ok_or(StoreError::NotFound)?;
        Ok(video.likes.contains(&user))
    }

    /// Authoritative like count: the size of the like set.
    pub fn like_count(&self, id: VideoId) -> Result<usize> {
        let inner = self.lock();
        let video = inner.videos.get(&id).ok_or(StoreError::NotFound)?;
        Ok(video.likes.len())
    }

    /// Current saved projection for a video. Unknown ids read as unsaved.
    pub fn is_saved(&self, id: VideoId) -> bool {
        self.lock().saved.get(&id).copied().unwrap_or(false)
    }

    /// Set the saved projection for one video, returning the prior value.
    pub fn set_saved(&self, id: VideoId, saved: bool) -> Result<bool> {
        let prior = {
            let mut inner = self.lock();
            if !inner.videos.contains_key(&id) {
                return Err(StoreError::NotFound);
            }
            inner.saved.insert(id, saved).unwrap_or(false)
        };
        if prior != saved {
            self.events.emit(StoreEvent::SavedChanged {
                video_id: id,
                saved,
            });
        }
        Ok(prior)
    }

    /// Merge an authoritative saved map (from the profile) into the
    /// projection. Entries for unknown videos are ignored; each real flip
    /// emits `SavedChanged`.
    pub fn merge_saved(&self, map: &HashMap<VideoId, bool>) {
        let mut flips = Vec::new();
        {
            let mut inner = self.lock();
            for (&id, &saved) in map {
                if !inner.videos.contains_key(&id) {
                    continue;
                }
                let prior = inner.saved.insert(id, saved).unwrap_or(false);
                if prior != saved {
                    flips.push((id, saved));
                }
            }
        }
        for (video_id, saved) in flips {
            self.events.emit(StoreEvent::SavedChanged { video_id, saved });
        }
    }

    /// Evict everything. Called when the owning view unmounts.
    pub fn clear(&self) {
        {
            let mut inner = self.lock();
            inner.videos.clear();
            inner.order.clear();
            inner.saved.clear();
        }
        self.events.emit(StoreEvent::Cleared);
    }
}
