//! Client configuration loaded via OrthoConfig.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:3000/api/trpc";
const DEFAULT_AVATAR_URL: &str = "/avatar.png";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Configuration values for the feed client.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "FEED")]
pub struct FeedSettings {
    /// Mount point of the remote procedure endpoint.
    pub api_url: Option<String>,
    /// Bearer token of the signed-in user.
    pub session_token: Option<String>,
    /// Avatar shown next to the composer.
    pub avatar_url: Option<String>,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: Option<u64>,
    /// Emit logs as JSON rather than compact text.
    pub log_json: Option<bool>,
}

impl FeedSettings {
    /// Return the configured API URL, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured value is not a URL.
    pub fn api_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(self.api_url.as_deref().unwrap_or(DEFAULT_API_URL))
    }

    /// Return the configured avatar, falling back to the default.
    pub fn avatar_url(&self) -> &str {
        self.avatar_url.as_deref().unwrap_or(DEFAULT_AVATAR_URL)
    }

    /// Return the configured session token, ignoring blank values.
    pub fn session_token(&self) -> Option<&str> {
        self.session_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Whether logs are emitted as JSON. Defaults to `true`.
    pub fn log_json(&self) -> bool {
        self.log_json.unwrap_or(true)
    }

    /// Return the request timeout, falling back to the default.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .filter(|secs| *secs > 0)
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }
}
