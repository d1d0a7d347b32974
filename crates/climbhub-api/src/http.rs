//! REST implementation of [`VideoApi`] over the ClimbHub backend.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use climbhub_shared::{Comment, Profile, UserId, Video, VideoId, VideoQuery};

use crate::client::{LikeStatus, SaveStatus, VideoApi};
use crate::config::ApiConfig;
use crate::error::{ApiError, Result};

/// Shape of a backend error body, e.g. `{"error": "video not found"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Preference-ranked listings come back in two buckets.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreferenceFeed {
    preferred_videos: Vec<Video>,
    other_videos: Vec<Video>,
}

/// [`VideoApi`] over HTTP.
///
/// Cheap to clone; the inner `reqwest::Client` is a connection-pooling
/// handle. The request timeout and optional bearer token come from
/// [`ApiConfig`].
#[derive(Clone)]
pub struct HttpApi {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpApi {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.trimmed_base_url(), path)
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if let Some(ref token) = self.config.auth_token {
            builder = builder.bearer_auth(token);
        }
        builder
    }

    /// Check the status and decode the body, surfacing the backend's
    /// `error` field when the call was rejected.
    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| status.to_string());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl VideoApi for HttpApi {
    async fn list_videos(&self, query: &VideoQuery) -> Result<Vec<Video>> {
        let path = match query {
            VideoQuery::All => "/video".to_string(),
            VideoQuery::Gym(gym) => format!("/video/gym/{gym}"),
            VideoQuery::Profile(profile) => format!("/video/profile/{profile}"),
            VideoQuery::Preferences(user) => format!("/video/preferences/{user}"),
        };
        debug!(%path, "listing videos");

        let response = self.request(reqwest::Method::GET, &path).send().await?;

        // The preference feed is the one listing with a distinct envelope:
        // preferred videos first, then the rest.
        if matches!(query, VideoQuery::Preferences(_)) {
            let feed: PreferenceFeed = Self::decode(response).await?;
            let mut videos = feed.preferred_videos;
            videos.extend(feed.other_videos);
            Ok(videos)
        } else {
            Self::decode(response).await
        }
    }

    async fn get_comments(&self, video: VideoId) -> Result<Vec<Comment>> {
        let response = self
            .request(reqwest::Method::GET, &format!("/comment/{video}"))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn toggle_like(&self, video: VideoId, user: UserId) -> Result<LikeStatus> {
        let response = self
            .request(reqwest::Method::POST, &format!("/video/{video}/like"))
            .json(&serde_json::json!({ "userId": user }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn add_comment(&self, video: VideoId, author: UserId, text: &str) -> Result<Comment> {
        let response = self
            .request(reqwest::Method::POST, "/comment")
            .json(&serde_json::json!({
                "videoId": video,
                "userId": author,
                "text": text,
            }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn toggle_save(&self, video: VideoId, user: UserId) -> Result<SaveStatus> {
        let response = self
            .request(reqwest::Method::POST, &format!("/video/{video}/save"))
            .json(&serde_json::json!({ "userId": user }))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_profile(&self, user: UserId) -> Result<Profile> {
        let response = self
            .request(reqwest::Method::GET, &format!("/profile/{user}"))
            .send()
            .await?;
        Self::decode(response).await
    }
}
