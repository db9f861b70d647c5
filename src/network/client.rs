//! API client wrapper - one function per Axora endpoint
//!
//! Every call fetches a fresh bearer token first, then issues exactly one
//! request and unwraps the `{success, message}` envelope.

use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::json;
use thiserror::Error;

use crate::composer::StorySubmission;
use crate::models::{
    ApiEnvelope, ConnectionLists, ConnectionsEnvelope, DiscoverEnvelope, ProfileEnvelope,
    StoriesEnvelope, Story, UserProfile,
};
use crate::network::auth::TokenProvider;

/// Failures surfaced to the user as notices; all leave local state editable
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out (30s)")]
    Timeout,
    #[error("Connection failed: {0}")]
    Connect(String),
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("Authentication failed: {0}")]
    Auth(String),
    /// The server answered with `success: false`
    #[error("{0}")]
    Rejected(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::Connect(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// Client for the Axora API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>, tokens: Arc<dyn TokenProvider>) -> Self {
        ApiClient {
            http,
            base_url: base_url.into(),
            tokens,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn bearer(&self) -> Result<String, ApiError> {
        self.tokens
            .token()
            .await
            .map_err(|e| ApiError::Auth(e.to_string()))
    }

    /// `GET /api/user/data` - the signed-in profile, used to validate a session
    pub async fn fetch_profile(&self) -> Result<UserProfile, ApiError> {
        let token = self.bearer().await?;
        let envelope: ProfileEnvelope = self
            .http
            .get(self.url("/api/user/data"))
            .bearer_auth(token)
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        envelope
            .user
            .ok_or_else(|| ApiError::Rejected(String::from("no profile in response")))
    }

    /// `GET /api/user/connections`
    pub async fn fetch_connections(&self) -> Result<ConnectionLists, ApiError> {
        let token = self.bearer().await?;
        let envelope: ConnectionsEnvelope = self
            .http
            .get(self.url("/api/user/connections"))
            .bearer_auth(token)
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        Ok(envelope.lists)
    }

    /// `GET /api/story/get`
    pub async fn fetch_stories(&self) -> Result<Vec<Story>, ApiError> {
        let token = self.bearer().await?;
        let envelope: StoriesEnvelope = self
            .http
            .get(self.url("/api/story/get"))
            .bearer_auth(token)
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        Ok(envelope.stories)
    }

    /// `POST /api/user/discover`
    pub async fn discover(&self, input: &str) -> Result<Vec<UserProfile>, ApiError> {
        let token = self.bearer().await?;
        let envelope: DiscoverEnvelope = self
            .http
            .post(self.url("/api/user/discover"))
            .bearer_auth(token)
            .json(&json!({ "input": input }))
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        Ok(envelope.users)
    }

    /// `POST /api/user/follow`
    pub async fn follow(&self, user_id: &str) -> Result<String, ApiError> {
        self.user_action("/api/user/follow", json!({ "id": user_id }))
            .await
    }

    /// `POST /api/user/unfollow`
    pub async fn unfollow(&self, user_id: &str) -> Result<String, ApiError> {
        self.user_action("/api/user/unfollow", json!({ "unfollowUserID": user_id }))
            .await
    }

    /// `POST /api/user/accept`
    pub async fn accept_connection(&self, user_id: &str) -> Result<String, ApiError> {
        self.user_action("/api/user/accept", json!({ "id": user_id }))
            .await
    }

    async fn user_action(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<String, ApiError> {
        let token = self.bearer().await?;
        let envelope: ApiEnvelope = self
            .http
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        Ok(envelope.message)
    }

    /// `POST /api/story/create` - multipart upload of a composed story
    pub async fn create_story(&self, submission: &StorySubmission) -> Result<String, ApiError> {
        let token = self.bearer().await?;

        let mut form = Form::new()
            .text("content", submission.content.clone())
            .text("media_type", submission.media_type.as_str())
            .text("background_color", submission.background.as_str());

        if let Some(media) = &submission.media {
            let part = Part::bytes(media.bytes.clone())
                .file_name(media.file_name.clone())
                .mime_str(&media.mime)
                .map_err(|e| ApiError::Transport(e.to_string()))?;
            form = form.part("media", part);
        }

        let envelope: ApiEnvelope = self
            .http
            .post(self.url("/api/story/create"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?
            .json()
            .await?;
        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }
        Ok(envelope.message)
    }
}

/// Create an HTTP client with default configuration
pub fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::auth::StaticTokenProvider;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(
            create_client(),
            base,
            Arc::new(StaticTokenProvider(String::from("tok_1"))),
        )
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let c = client("https://api.axora.app/");
        assert_eq!(
            c.url("/api/story/get"),
            "https://api.axora.app/api/story/get"
        );
    }

    #[tokio::test]
    async fn test_bearer_token_comes_from_provider() {
        let c = client("https://api.axora.app");
        assert_eq!(c.bearer().await.unwrap(), "tok_1");
    }
}
