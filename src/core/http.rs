//! Shared HTTP plumbing for the synthesis and voice-clone clients.
//!
//! Both clients talk to the same host with the same credentials, so they share
//! one pooled `reqwest::Client` and one header builder. The upstream service
//! expects `Authorization: Bearer;<token>` with a semicolon separator; it is
//! sent exactly like that.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::core::base::{VoiceCloneError, VoiceCloneResult};
use crate::utils::join_endpoint;

/// Header naming the product family a training/status request targets.
pub const RESOURCE_ID_HEADER: &str = "Resource-Id";

/// Builds the authorization header value for an access token.
#[inline]
pub fn bearer_value(token: &str) -> String {
    format!("Bearer;{token}")
}

/// Which header set a request needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSet {
    /// Authorization and content type only (synthesis)
    Standard,
    /// Standard headers plus `Resource-Id` (training and status)
    WithResourceId,
}

/// HTTP client bound to one configuration.
///
/// Cheap to clone; clones share the connection pool and configuration.
#[derive(Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    /// Validates the configuration and builds the underlying HTTP client.
    pub fn new(config: ClientConfig) -> VoiceCloneResult<Self> {
        config
            .validate()
            .map_err(|e| VoiceCloneError::InvalidConfiguration(e.to_string()))?;

        if config.accept_invalid_certs {
            warn!(
                "TLS certificate verification is disabled for {}; use this only against test servers",
                config.host
            );
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(concat!("volc-voiceclone/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                VoiceCloneError::InvalidConfiguration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            config: Arc::new(config),
        })
    }

    /// Returns the configuration this client was built with.
    #[inline]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Absolute URL for an endpoint path on the configured host.
    #[inline]
    pub fn endpoint(&self, path: &str) -> String {
        join_endpoint(&self.config.host, path)
    }

    /// Builds request headers for the given header set.
    pub fn headers(&self, set: HeaderSet) -> VoiceCloneResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut auth = HeaderValue::from_str(&bearer_value(&self.config.token)).map_err(|_| {
            VoiceCloneError::InvalidConfiguration(
                "access token contains characters not allowed in a header".to_string(),
            )
        })?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        if set == HeaderSet::WithResourceId {
            let value = HeaderValue::from_str(&self.config.resource_id).map_err(|_| {
                VoiceCloneError::InvalidConfiguration(format!(
                    "resource id '{}' is not a valid header value",
                    self.config.resource_id
                ))
            })?;
            headers.insert(HeaderName::from_static("resource-id"), value);
        }

        Ok(headers)
    }

    /// Sends a JSON POST and returns the raw body of a 200 response.
    ///
    /// Any other status becomes [`VoiceCloneError::Transport`] carrying the
    /// raw response body.
    pub async fn post_json<B>(&self, path: &str, body: &B, set: HeaderSet) -> VoiceCloneResult<String>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path);
        debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers(set)?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            warn!("{} returned HTTP {}", path, status.as_u16());
            return Err(VoiceCloneError::Transport {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }

    /// Sends a JSON POST and decodes the 200 response body.
    pub async fn post_json_as<B, R>(&self, path: &str, body: &B, set: HeaderSet) -> VoiceCloneResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let text = self.post_json(path, body, set).await?;
        serde_json::from_str(&text).map_err(|e| {
            VoiceCloneError::MalformedResponse(format!("{path}: {e}; body: {}", truncate(&text, 512)))
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
