//! In-memory [`VideoApi`] for testing.
//!
//! Behaves like a tiny backend: toggles really flip server-side state, and
//! added comments come back populated with the author's profile data. Each
//! operation can be switched to fail, and call counts are recorded so tests
//! can assert that local validation never reached the network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use climbhub_shared::{Comment, CommentId, Profile, UserId, Video, VideoId, VideoQuery};

use crate::client::{LikeStatus, SaveStatus, VideoApi};
use crate::error::{ApiError, Result};

#[derive(Debug, Default)]
struct FailureSwitches {
    list_videos: bool,
    get_comments: bool,
    toggle_like: bool,
    add_comment: bool,
    toggle_save: bool,
    get_profile: bool,
    /// Comment fetches failing for specific videos only, for partial
    /// hydration-failure tests.
    comments_for: Vec<VideoId>,
}

struct State {
    videos: Vec<Video>,
    comments: HashMap<VideoId, Vec<Comment>>,
    profiles: HashMap<UserId, Profile>,
    fail: FailureSwitches,
}

/// Per-operation call counters.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub list_videos: AtomicUsize,
    pub get_comments: AtomicUsize,
    pub toggle_like: AtomicUsize,
    pub add_comment: AtomicUsize,
    pub toggle_save: AtomicUsize,
    pub get_profile: AtomicUsize,
}

/// Scriptable in-memory backend double.
pub struct InMemoryApi {
    state: RwLock<State>,
    calls: CallCounts,
}

impl Default for InMemoryApi {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                videos: Vec::new(),
                comments: HashMap::new(),
                profiles: HashMap::new(),
                fail: FailureSwitches::default(),
            }),
            calls: CallCounts::default(),
        }
    }

    fn rejected<T>() -> Result<T> {
        Err(ApiError::Status {
            status: 500,
            message: "scripted failure".into(),
        })
    }

    fn lock(&self) -> std::sync::RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn seed_video(&self, video: Video) {
        let mut state = self.lock();
        state.comments.insert(video.id, video.comments.clone());
        state.videos.push(video);
    }

    pub fn seed_comment(&self, comment: Comment) {
        self.lock()
            .comments
            .entry(comment.video_id)
            .or_default()
            .push(comment);
    }

    pub fn seed_profile(&self, user: UserId, profile: Profile) {
        self.lock().profiles.insert(user, profile);
    }

    pub fn calls(&self) -> &CallCounts {
        &self.calls
    }

    /// Total across every operation; zero means nothing hit the "network".
    pub fn total_calls(&self) -> usize {
        let c = &self.calls;
        c.list_videos.load(Ordering::Relaxed)
            + c.get_comments.load(Ordering::Relaxed)
            + c.toggle_like.load(Ordering::Relaxed)
            + c.add_comment.load(Ordering::Relaxed)
            + c.toggle_save.load(Ordering::Relaxed)
            + c.get_profile.load(Ordering::Relaxed)
    }

    pub fn fail_list_videos(&self, fail: bool) {
        self.lock().fail.list_videos = fail;
    }

    pub fn fail_get_comments(&self, fail: bool) {
        self.lock().fail.get_comments = fail;
    }

    pub fn fail_comments_for(&self, video: VideoId) {
        self.lock().fail.comments_for.push(video);
    }

    pub fn fail_toggle_like(&self, fail: bool) {
        self.lock().fail.toggle_like = fail;
    }

    pub fn fail_add_comment(&self, fail: bool) {
        self.lock().fail.add_comment = fail;
    }

    pub fn fail_toggle_save(&self, fail: bool) {
        self.lock().fail.toggle_save = fail;
    }

    pub fn fail_get_profile(&self, fail: bool) {
        self.lock().fail.get_profile = fail;
    }

    fn author_for(state: &State, user: UserId) -> climbhub_shared::AuthorRef {
        state
            .profiles
            .get(&user)
            .map(|p| p.user.clone())
            .unwrap_or_else(|| climbhub_shared::AuthorRef {
                profile_id: climbhub_shared::ProfileId::new(),
                name: user.to_string(),
                image: None,
            })
    }
}

#[async_trait]
impl VideoApi for InMemoryApi {
    async fn list_videos(&self, query: &VideoQuery) -> Result<Vec<Video>> {
        self.calls.list_videos.fetch_add(1, Ordering::Relaxed);
        let state = self.lock();
        if state.fail.list_videos {
            return Self::rejected();
        }

        let mut videos: Vec<Video> = match query {
            VideoQuery::All => state.videos.clone(),
            VideoQuery::Gym(gym) => state
                .videos
                .iter()
                .filter(|v| v.gym.id == *gym)
                .cloned()
                .collect(),
            VideoQuery::Profile(profile) => state
                .videos
                .iter()
                .filter(|v| v.author.profile_id == *profile)
                .cloned()
                .collect(),
            VideoQuery::Preferences(user) => {
                let favorite_gyms = state
                    .profiles
                    .get(user)
                    .map(|p| p.gyms.clone())
                    .unwrap_or_default();
                let (mut preferred, other): (Vec<Video>, Vec<Video>) = state
                    .videos
                    .iter()
                    .cloned()
                    .partition(|v| favorite_gyms.contains(&v.gym.id));
                preferred.extend(other);
                preferred
            }
        };

        // Listings never carry comments; hydration is a separate call.
        for video in &mut videos {
            video.comments.clear();
        }
        Ok(videos)
    }

    async fn get_comments(&self, video: VideoId) -> Result<Vec<Comment>> {
        self.calls.get_comments.fetch_add(1, Ordering::Relaxed);
        let state = self.lock();
        if state.fail.get_comments || state.fail.comments_for.contains(&video) {
            return Self::rejected();
        }
        Ok(state.comments.get(&video).cloned().unwrap_or_default())
    }

    async fn toggle_like(&self, video: VideoId, user: UserId) -> Result<LikeStatus> {
        self.calls.toggle_like.fetch_add(1, Ordering::Relaxed);
        let mut state = self.lock();
        if state.fail.toggle_like {
            return Self::rejected();
        }
        let entry = state
            .videos
            .iter_mut()
            .find(|v| v.id == video)
            .ok_or(ApiError::Status {
                status: 404,
                message: "video not found".into(),
            })?;
        let liked = if entry.likes.remove(&user) {
            false
        } else {
            entry.likes.insert(user);
            true
        };
        Ok(LikeStatus {
            liked,
            like_count: entry.likes.len(),
        })
    }

    async fn add_comment(&self, video: VideoId, author: UserId, text: &str) -> Result<Comment> {
        self.calls.add_comment.fetch_add(1, Ordering::Relaxed);
        let mut state = self.lock();
        if state.fail.add_comment {
            return Self::rejected();
        }
        let comment = Comment {
            id: CommentId::new(),
            video_id: video,
            author: Self::author_for(&state, author),
            text: text.to_string(),
            created_at: Utc::now(),
        };
        state
            .comments
            .entry(video)
            .or_default()
            .push(comment.clone());
        Ok(comment)
    }

    async fn toggle_save(&self, video: VideoId, user: UserId) -> Result<SaveStatus> {
        self.calls.toggle_save.fetch_add(1, Ordering::Relaxed);
        let mut state = self.lock();
        if state.fail.toggle_save {
            return Self::rejected();
        }
        let profile = state.profiles.get_mut(&user).ok_or(ApiError::Status {
            status: 404,
            message: "profile not found".into(),
        })?;
        let saved = if profile.saved_videos.remove(&video) {
            false
        } else {
            profile.saved_videos.insert(video);
            true
        };
        Ok(SaveStatus { saved })
    }

    async fn get_profile(&self, user: UserId) -> Result<Profile> {
        self.calls.get_profile.fetch_add(1, Ordering::Relaxed);
        let state = self.lock();
        if state.fail.get_profile {
            return Self::rejected();
        }
        state.profiles.get(&user).cloned().ok_or(ApiError::Status {
            status: 404,
            message: "profile not found".into(),
        })
    }
}
