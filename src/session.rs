//! Session handling
//!
//! A session is a caller-supplied credential that authenticates every request
//! of a run and is released when the run ends, whether it succeeded or not.

use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, info, warn};

/// Default header carrying the session token
pub const DEFAULT_TOKEN_HEADER: &str = "X-Tableau-Auth";

// ============================================================================
// Config
// ============================================================================

/// Session settings from a job definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Environment variable holding the token
    pub token_env: String,
    /// Header the token is sent in
    #[serde(default = "default_token_header")]
    pub token_header: String,
    /// Path POSTed to release the token, relative to the base URL
    #[serde(default)]
    pub sign_out_path: Option<String>,
}

fn default_token_header() -> String {
    DEFAULT_TOKEN_HEADER.to_string()
}

// ============================================================================
// Session Trait
// ============================================================================

/// An authenticated session
#[async_trait]
pub trait Session: Send + Sync {
    /// Headers to send with every request
    fn headers(&self) -> Vec<(String, String)>;

    /// Release the session on the remote side
    async fn release(&self) -> Result<()>;
}

/// Run `work`, then release the session regardless of the outcome
///
/// The work's result is returned unchanged. A failed release is logged and
/// does not mask it.
pub async fn with_session<S, F, T>(session: &S, work: F) -> Result<T>
where
    S: Session + ?Sized,
    F: Future<Output = Result<T>>,
{
    let outcome = work.await;

    if let Err(e) = &outcome {
        debug!("Run failed, releasing session before returning: {e}");
    }
    match session.release().await {
        Ok(()) => info!("Session released"),
        Err(e) => warn!("Failed to release session: {e}"),
    }

    outcome
}

// ============================================================================
// Token Session
// ============================================================================

/// A token sent in a header, optionally signed out with a POST
pub struct TokenSession {
    token: String,
    header: String,
    sign_out: Option<(HttpClient, String)>,
}

impl TokenSession {
    /// Create a session that sends `token` in the default header
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            header: DEFAULT_TOKEN_HEADER.to_string(),
            sign_out: None,
        }
    }

    /// Send the token in a different header
    #[must_use]
    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    /// POST to `path` through `client` on release
    #[must_use]
    pub fn with_sign_out(mut self, client: HttpClient, path: impl Into<String>) -> Self {
        self.sign_out = Some((client, path.into()));
        self
    }

    /// Build a session from job settings, reading the token from the
    /// environment
    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let token = std::env::var(&config.token_env).map_err(|_| {
            Error::session(format!(
                "environment variable '{}' is not set",
                config.token_env
            ))
        })?;
        if token.trim().is_empty() {
            return Err(Error::session(format!(
                "environment variable '{}' is empty",
                config.token_env
            )));
        }
        Ok(Self::new(token.trim()).with_header(&config.token_header))
    }

    /// Header name the token is sent in
    pub fn header(&self) -> &str {
        &self.header
    }
}

impl std::fmt::Debug for TokenSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSession")
            .field("header", &self.header)
            .field("token", &"<redacted>")
            .field("sign_out", &self.sign_out.as_ref().map(|(_, path)| path))
            .finish()
    }
}

#[async_trait]
impl Session for TokenSession {
    fn headers(&self) -> Vec<(String, String)> {
        vec![(self.header.clone(), self.token.clone())]
    }

    async fn release(&self) -> Result<()> {
        let Some((client, path)) = &self.sign_out else {
            return Ok(());
        };
        let mut config = RequestConfig::new();
        let carries_token = client
            .config()
            .default_headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(&self.header));
        if !carries_token {
            config = config.header(&self.header, &self.token);
        }

        client.request(Method::POST, path, config).await?;
        Ok(())
    }
}
