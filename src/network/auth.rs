//! Token acquisition - bearer tokens are short-lived, so a fresh one is
//! requested from the auth collaborator immediately before every API call.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::RwLock;

/// Asynchronous "get current token" operation
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// Envelope returned by the token endpoint
#[derive(Debug, Deserialize)]
struct TokenEnvelope {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    token: String,
}

/// Exchanges a long-lived session key for short-lived bearer tokens
pub struct SessionTokenProvider {
    http: reqwest::Client,
    base_url: String,
    session_key: RwLock<Option<String>>,
}

impl SessionTokenProvider {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        SessionTokenProvider {
            http,
            base_url: base_url.into(),
            session_key: RwLock::new(None),
        }
    }

    /// Adopt a session key for future token requests
    pub fn set_session_key(&self, key: impl Into<String>) {
        *self.session_key.write().expect("session key lock poisoned") = Some(key.into());
    }

    pub fn clear_session_key(&self) {
        *self.session_key.write().expect("session key lock poisoned") = None;
    }

    fn current_key(&self) -> Option<String> {
        self.session_key
            .read()
            .expect("session key lock poisoned")
            .clone()
    }
}

#[async_trait]
impl TokenProvider for SessionTokenProvider {
    async fn token(&self) -> Result<String> {
        let Some(key) = self.current_key() else {
            bail!("not signed in");
        };
        let url = format!("{}/api/auth/token", self.base_url.trim_end_matches('/'));
        let envelope: TokenEnvelope = self
            .http
            .get(&url)
            .header("X-Session-Key", key)
            .send()
            .await
            .context("requesting token")?
            .json()
            .await
            .context("decoding token response")?;

        if !envelope.success || envelope.token.is_empty() {
            bail!("token refresh rejected: {}", envelope.message);
        }
        Ok(envelope.token)
    }
}

/// Fixed token, for tests
#[cfg(test)]
pub struct StaticTokenProvider(pub String);

#[cfg(test)]
#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
