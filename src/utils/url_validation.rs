//! Host URL validation for the configured API endpoint.
//!
//! The configured host must be an absolute `https` URL (plain `http` is
//! accepted for local mock servers and logged as a warning). Query strings and
//! fragments are rejected because endpoint paths are appended to the host.

use thiserror::Error;
use tracing::warn;
use url::Url;

/// Errors that can occur during host URL validation
#[derive(Debug, Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(#[from] url::ParseError),

    #[error("URL scheme must be http or https, got: {0}")]
    UnsupportedScheme(String),

    #[error("URL must have a host")]
    MissingHost,

    #[error("URL must not contain a {0}")]
    UnexpectedComponent(&'static str),
}

/// Validates the API host URL and returns it parsed.
///
/// # Example
///
/// ```rust
/// use volc_voiceclone::utils::validate_host_url;
///
/// assert!(validate_host_url("https://openspeech.bytedance.com").is_ok());
/// assert!(validate_host_url("ftp://openspeech.bytedance.com").is_err());
/// ```
pub fn validate_host_url(host: &str) -> Result<Url, UrlValidationError> {
    let url = Url::parse(host.trim())?;

    match url.scheme() {
        "https" => {}
        "http" => {
            warn!("API host {} uses plain HTTP, credentials are sent unencrypted", host);
        }
        other => return Err(UrlValidationError::UnsupportedScheme(other.to_string())),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }
    if url.query().is_some() {
        return Err(UrlValidationError::UnexpectedComponent("query string"));
    }
    if url.fragment().is_some() {
        return Err(UrlValidationError::UnexpectedComponent("fragment"));
    }

    Ok(url)
}

/// Joins an endpoint path onto a host, tolerating a trailing slash on the host.
pub fn join_endpoint(host: &str, path: &str) -> String {
    format!(
        "{}/{}",
        host.trim().trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_host_accepted() {
        let url = validate_host_url("https://openspeech.bytedance.com").unwrap();
        assert_eq!(url.host_str(), Some("openspeech.bytedance.com"));
    }

    #[test]
    fn test_http_host_accepted_for_local_servers() {
        assert!(validate_host_url("http://127.0.0.1:8080").is_ok());
    }

    #[test]
    fn test_unsupported_scheme_rejected() {
        match validate_host_url("ws://openspeech.bytedance.com") {
            Err(UrlValidationError::UnsupportedScheme(s)) => assert_eq!(s, "ws"),
            other => panic!("Expected UnsupportedScheme, got {other:?}"),
        }
    }

    #[test]
    fn test_relative_url_rejected() {
        assert!(matches!(
            validate_host_url("openspeech.bytedance.com"),
            Err(UrlValidationError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_query_and_fragment_rejected() {
        assert!(matches!(
            validate_host_url("https://example.com?x=1"),
            Err(UrlValidationError::UnexpectedComponent("query string"))
        ));
        assert!(matches!(
            validate_host_url("https://example.com#top"),
            Err(UrlValidationError::UnexpectedComponent("fragment"))
        ));
    }

    #[test]
    fn test_join_endpoint() {
        assert_eq!(
            join_endpoint("https://example.com/", "/api/v1/tts"),
            "https://example.com/api/v1/tts"
        );
        assert_eq!(
            join_endpoint("http://127.0.0.1:9000/proxy", "api/v1/tts"),
            "http://127.0.0.1:9000/proxy/api/v1/tts"
        );
    }
}
