//! User intents: like, comment, save.
//!
//! Each intent runs a small per-intent state machine: Idle, then Pending
//! while an optimistic mutation is in the store and the remote call is in
//! flight, then Committed (state stands, reconciled to server truth) or
//! RolledBack (pre-intent state restored, typed error surfaced).
//!
//! There is no per-video mutex. Overlapping intents on the same video each
//! apply their result when their response arrives, so convergence is
//! last-settled-wins by response arrival order, not call order. That is the
//! documented guarantee: convergence, not linearizability.

use std::sync::Arc;

use tracing::{debug, warn};

use climbhub_api::VideoApi;
use climbhub_shared::{Comment, UserId, VideoId};
use climbhub_store::VideoStore;

use crate::error::{InteractionError, Result, ValidationError};
use crate::profile_sync::ProfileSyncAdapter;

/// Turns user intents into optimistic store mutations plus a confirmed or
/// rolled-back remote call.
///
/// All identity is explicit: every intent takes the acting user, and a
/// missing identity is rejected locally before anything reaches the
/// network.
#[derive(Clone)]
pub struct InteractionController {
    store: VideoStore,
    api: Arc<dyn VideoApi>,
    profiles: ProfileSyncAdapter,
}

impl InteractionController {
    pub fn new(store: VideoStore, api: Arc<dyn VideoApi>) -> Self {
        Self {
            store,
            profiles: ProfileSyncAdapter::new(api.clone()),
            api,
        }
    }

    pub fn profiles(&self) -> &ProfileSyncAdapter {
        &self.profiles
    }

    fn require_user(user: Option<UserId>) -> Result<UserId> {
        user.ok_or_else(|| ValidationError::MissingUser.into())
    }

    /// Flip the acting user's like on a video.
    ///
    /// The inverse membership is applied immediately; on success the store
    /// is reconciled to the server-reported direction (server truth wins on
    /// mismatch), on failure the original membership is restored exactly.
    /// Returns the final membership.
    pub async fn toggle_like(&self, video: VideoId, user: Option<UserId>) -> Result<bool> {
        let user = Self::require_user(user)?;
        let was_liked = self.store.is_liked_by(video, user)?;

        // Pending: optimistic flip.
        self.store.apply_like_delta(video, user, !was_liked)?;

        match self.api.toggle_like(video, user).await {
            Ok(status) => {
                // Committed. Applied at response arrival, which is what
                // serializes overlapping toggles.
                self.store.apply_like_delta(video, user, status.liked)?;
                debug!(video = %video, user = %user, liked = status.liked, "like committed");
                Ok(status.liked)
            }
            Err(e) => {
                // RolledBack: restore the pre-intent membership.
                self.store.apply_like_delta(video, user, was_liked)?;
                warn!(video = %video, user = %user, error = %e, "like rolled back");
                Err(InteractionError::Like(e))
            }
        }
    }

    /// Post a comment and pick up the server-populated comment sequence.
    ///
    /// Confirm-then-show: there is no optimistic insert, so a failed post
    /// never leaves a ghost comment. After a confirmed post the sequence is
    /// re-fetched and swapped wholesale; the server owns the denormalized
    /// author display data, so the client-echoed comment is not trusted.
    /// Returns the authoritative sequence.
    pub async fn add_comment(
        &self,
        video: VideoId,
        author: Option<UserId>,
        text: &str,
    ) -> Result<Vec<Comment>> {
        let author = Self::require_user(author)?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyComment.into());
        }

        self.api
            .add_comment(video, author, trimmed)
            .await
            .map_err(InteractionError::Comment)?;

        let comments = self
            .api
            .get_comments(video)
            .await
            .map_err(InteractionError::Fetch)?;
        self.store.replace_comments(video, comments.clone())?;
        debug!(video = %video, count = comments.len(), "comment sequence replaced");
        Ok(comments)
    }

    /// Flip whether the acting user has saved a video.
    ///
    /// The local saved projection is flipped immediately. On success the
    /// profile's authoritative saved set is refreshed and merged, silently
    /// correcting the optimistic flip if they disagree; on failure the flip
    /// is reverted. If the post-success refresh itself fails the flip
    /// stands (the toggle did succeed server-side) and a fetch failure is
    /// surfaced so the view can warn. Returns the final saved state.
    pub async fn toggle_save(&self, video: VideoId, user: Option<UserId>) -> Result<bool> {
        let user = Self::require_user(user)?;

        // Pending: optimistic flip.
        let prior = self.store.set_saved(video, !self.store.is_saved(video))?;

        match self.api.toggle_save(video, user).await {
            Ok(_) => {
                // Committed; the profile is the source of truth.
                let map = self
                    .profiles
                    .refresh(user, &self.store.video_ids())
                    .await
                    .map_err(InteractionError::Fetch)?;
                self.store.merge_saved(&map);
                Ok(self.store.is_saved(video))
            }
            Err(e) => {
                // RolledBack.
                self.store.set_saved(video, prior)?;
                warn!(video = %video, user = %user, error = %e, "save rolled back");
                Err(InteractionError::Save(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use climbhub_api::{ApiError, InMemoryApi, LikeStatus, SaveStatus};
    use climbhub_shared::{
        AuthorRef, GradingSystem, GymId, GymRef, Profile, ProfileId, SkillLevel, Video, VideoQuery,
    };
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    fn sample_video() -> Video {
        Video {
            id: VideoId::new(),
            description: "mantle finish".into(),
            difficulty_level: "V2".into(),
            grading_system: GradingSystem::VGrading,
            gym: GymRef {
                id: GymId::new(),
                name: "Rockreation".into(),
                location: "LA".into(),
            },
            author: AuthorRef {
                profile_id: ProfileId::new(),
                name: "dee".into(),
                image: None,
            },
            created_at: Utc::now(),
            video_url: "mem://v".into(),
            likes: HashSet::new(),
            comments: Vec::new(),
        }
    }

    fn profile_for(saved: HashSet<VideoId>) -> Profile {
        Profile {
            id: ProfileId::new(),
            user: AuthorRef {
                profile_id: ProfileId::new(),
                name: "dee".into(),
                image: Some("mem://avatar".into()),
            },
            skill_level: SkillLevel::Advanced,
            gyms: HashSet::new(),
            saved_videos: saved,
        }
    }

    /// (api, store loaded with one video, controller, that video's id, user)
    async fn harness() -> (Arc<InMemoryApi>, VideoStore, InteractionController, VideoId, UserId) {
        let api = Arc::new(InMemoryApi::new());
        let video = sample_video();
        let id = video.id;
        api.seed_video(video);

        let user = UserId::new();
        api.seed_profile(user, profile_for(HashSet::new()));

        let store = VideoStore::new(api.clone());
        store.load(&VideoQuery::All).await.unwrap();
        let controller = InteractionController::new(store.clone(), api.clone());
        (api, store, controller, id, user)
    }

    #[tokio::test]
    async fn successful_like_adds_membership() {
        // V1 with likes = []; toggle succeeds; final likes = [u1].
        let (_api, store, controller, video, user) = harness().await;

        let liked = controller.toggle_like(video, Some(user)).await.unwrap();
        assert!(liked);
        assert!(store.is_liked_by(video, user).unwrap());
        assert_eq!(store.like_count(video).unwrap(), 1);
    }

    #[tokio::test]
    async fn toggle_is_an_involution() {
        // After a successful toggle, membership iff not previously a member.
        let (_api, store, controller, video, user) = harness().await;

        controller.toggle_like(video, Some(user)).await.unwrap();
        let liked = controller.toggle_like(video, Some(user)).await.unwrap();
        assert!(!liked);
        assert!(!store.is_liked_by(video, user).unwrap());
        assert_eq!(store.like_count(video).unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_unlike_rolls_back_exactly() {
        // V1 with likes = [u1]; unlike rejected; rollback restores [u1].
        let (api, store, controller, video, user) = harness().await;
        controller.toggle_like(video, Some(user)).await.unwrap();

        api.fail_toggle_like(true);
        let err = controller.toggle_like(video, Some(user)).await.unwrap_err();
        assert!(matches!(err, InteractionError::Like(_)));
        assert!(store.is_liked_by(video, user).unwrap());
        assert_eq!(store.like_count(video).unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_like_rolls_back_exactly() {
        let (api, store, controller, video, user) = harness().await;

        api.fail_toggle_like(true);
        let err = controller.toggle_like(video, Some(user)).await.unwrap_err();
        assert!(matches!(err, InteractionError::Like(_)));
        assert!(!store.is_liked_by(video, user).unwrap());
        assert_eq!(store.like_count(video).unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_user_never_reaches_the_network() {
        let (api, _store, controller, video, _user) = harness().await;
        let before = api.total_calls();

        let like = controller.toggle_like(video, None).await.unwrap_err();
        let comment = controller.add_comment(video, None, "hi").await.unwrap_err();
        let save = controller.toggle_save(video, None).await.unwrap_err();

        for err in [like, comment, save] {
            assert!(matches!(
                err,
                InteractionError::Validation(ValidationError::MissingUser)
            ));
        }
        assert_eq!(api.total_calls(), before);
    }

    #[tokio::test]
    async fn empty_comment_text_never_reaches_the_network() {
        let (api, store, controller, video, user) = harness().await;
        let before = api.total_calls();

        for text in ["", "   ", "\n\t"] {
            let err = controller
                .add_comment(video, Some(user), text)
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                InteractionError::Validation(ValidationError::EmptyComment)
            ));
        }
        assert_eq!(api.total_calls(), before);
        assert!(store.get(video).unwrap().comments.is_empty());
    }

    #[tokio::test]
    async fn added_comment_matches_server_sequence() {
        let (api, store, controller, video, user) = harness().await;

        let comments = controller
            .add_comment(video, Some(user), "  nice send  ")
            .await
            .unwrap();

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].text, "nice send");
        // Author display data is server-populated, not client-echoed.
        assert_eq!(comments[0].author.name, "dee");
        assert_eq!(comments[0].author.image.as_deref(), Some("mem://avatar"));
        // The store holds exactly the server's sequence.
        assert_eq!(store.get(video).unwrap().comments, comments);
        assert_eq!(api.get_comments(video).await.unwrap(), comments);
    }

    #[tokio::test]
    async fn failed_comment_leaves_no_ghost() {
        let (api, store, controller, video, user) = harness().await;

        api.fail_add_comment(true);
        let err = controller
            .add_comment(video, Some(user), "dropped")
            .await
            .unwrap_err();
        assert!(matches!(err, InteractionError::Comment(_)));
        assert!(store.get(video).unwrap().comments.is_empty());
    }

    #[tokio::test]
    async fn successful_save_is_reconciled_with_the_profile() {
        let (api, store, controller, video, user) = harness().await;

        let saved = controller.toggle_save(video, Some(user)).await.unwrap();
        assert!(saved);
        assert!(store.is_saved(video));
        // The store's projection agrees with the authoritative set.
        let profile = api.get_profile(user).await.unwrap();
        assert_eq!(store.is_saved(video), profile.saved_videos.contains(&video));
    }

    #[tokio::test]
    async fn wrong_optimistic_flip_is_corrected_silently() {
        // The server already has the video saved but the local projection
        // was never seeded, so the optimistic flip goes the wrong way. The
        // authoritative set wins.
        let (api, store, controller, video, user) = harness().await;
        api.seed_profile(user, profile_for(HashSet::from([video])));

        let saved = controller.toggle_save(video, Some(user)).await.unwrap();
        let profile = api.get_profile(user).await.unwrap();
        assert_eq!(saved, profile.saved_videos.contains(&video));
        assert_eq!(store.is_saved(video), saved);
    }

    #[tokio::test]
    async fn failed_save_reverts_the_flip() {
        let (api, store, controller, video, user) = harness().await;

        api.fail_toggle_save(true);
        let err = controller.toggle_save(video, Some(user)).await.unwrap_err();
        assert!(matches!(err, InteractionError::Save(_)));
        assert!(!store.is_saved(video));
    }

    #[tokio::test]
    async fn double_save_converges_on_the_profile() {
        // Double-click: whatever the refresh reports is final, not the
        // second optimistic flip.
        let (api, store, controller, video, user) = harness().await;

        controller.toggle_save(video, Some(user)).await.unwrap();
        let saved = controller.toggle_save(video, Some(user)).await.unwrap();

        let profile = api.get_profile(user).await.unwrap();
        assert_eq!(saved, profile.saved_videos.contains(&video));
        assert_eq!(store.is_saved(video), saved);
        assert!(!saved);
    }

    #[tokio::test]
    async fn refresh_failure_after_save_keeps_the_flip() {
        let (api, store, controller, video, user) = harness().await;

        api.fail_get_profile(true);
        let err = controller.toggle_save(video, Some(user)).await.unwrap_err();
        assert!(matches!(err, InteractionError::Fetch(_)));
        // The toggle itself succeeded server-side, so the flip stands.
        assert!(store.is_saved(video));
    }

    /// Delegates everything except `toggle_like` to an [`InMemoryApi`];
    /// like responses resolve only when the test fires the matching gate,
    /// so completion order is fully scripted.
    struct GatedLikeApi {
        inner: InMemoryApi,
        gates: Mutex<VecDeque<oneshot::Receiver<std::result::Result<LikeStatus, ApiError>>>>,
    }

    impl GatedLikeApi {
        fn new(inner: InMemoryApi) -> Self {
            Self {
                inner,
                gates: Mutex::new(VecDeque::new()),
            }
        }

        fn gate(&self) -> oneshot::Sender<std::result::Result<LikeStatus, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.gates.lock().unwrap().push_back(rx);
            tx
        }
    }

    #[async_trait]
    impl VideoApi for GatedLikeApi {
        async fn list_videos(
            &self,
            query: &VideoQuery,
        ) -> std::result::Result<Vec<Video>, ApiError> {
            self.inner.list_videos(query).await
        }

        async fn get_comments(
            &self,
            video: VideoId,
        ) -> std::result::Result<Vec<Comment>, ApiError> {
            self.inner.get_comments(video).await
        }

        async fn toggle_like(
            &self,
            _video: VideoId,
            _user: UserId,
        ) -> std::result::Result<LikeStatus, ApiError> {
            let gate = self.gates.lock().unwrap().pop_front().expect("ungated call");
            gate.await.expect("gate dropped")
        }

        async fn add_comment(
            &self,
            video: VideoId,
            author: UserId,
            text: &str,
        ) -> std::result::Result<Comment, ApiError> {
            self.inner.add_comment(video, author, text).await
        }

        async fn toggle_save(
            &self,
            video: VideoId,
            user: UserId,
        ) -> std::result::Result<SaveStatus, ApiError> {
            self.inner.toggle_save(video, user).await
        }

        async fn get_profile(&self, user: UserId) -> std::result::Result<Profile, ApiError> {
            self.inner.get_profile(user).await
        }
    }

    #[tokio::test]
    async fn overlapping_likes_settle_in_response_arrival_order() {
        let inner = InMemoryApi::new();
        let video = sample_video();
        let id = video.id;
        inner.seed_video(video);

        let api = Arc::new(GatedLikeApi::new(inner));
        let store = VideoStore::new(api.clone());
        store.load(&VideoQuery::All).await.unwrap();
        let controller = InteractionController::new(store.clone(), api.clone());

        let user = UserId::new();
        let first_gate = api.gate();
        let second_gate = api.gate();

        // First intent: like. Optimistic state becomes liked, then the
        // call parks on its gate.
        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.toggle_like(id, Some(user)).await }
        });
        tokio::task::yield_now().await;
        assert!(store.is_liked_by(id, user).unwrap());

        // Second intent before the first settles: reads the optimistic
        // state and flips it back off.
        let second = tokio::spawn({
            let controller = controller.clone();
            async move { controller.toggle_like(id, Some(user)).await }
        });
        tokio::task::yield_now().await;
        assert!(!store.is_liked_by(id, user).unwrap());

        // Responses arrive out of call order: the second call settles
        // first (unliked), then the first (liked).
        second_gate
            .send(Ok(LikeStatus {
                liked: false,
                like_count: 0,
            }))
            .unwrap();
        assert!(!second.await.unwrap().unwrap());

        first_gate
            .send(Ok(LikeStatus {
                liked: true,
                like_count: 1,
            }))
            .unwrap();
        assert!(first.await.unwrap().unwrap());

        // Last-settled call's direction wins.
        assert!(store.is_liked_by(id, user).unwrap());
        assert_eq!(store.like_count(id).unwrap(), 1);
    }
}
