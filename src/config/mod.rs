//! Client configuration
//!
//! This module builds a [`ClientConfig`] from various sources: .env files, YAML
//! files, and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//!
//! # Example
//! ```rust,no_run
//! use volc_voiceclone::config::ClientConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = ClientConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config = ClientConfig::from_file(&PathBuf::from("config.yaml"))?;
//!
//! println!("Using API host {}", config.host);
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use zeroize::Zeroize;

mod env;
mod yaml;

pub use env::{
    ENV_ACCEPT_INVALID_CERTS, ENV_APPID, ENV_CLUSTER, ENV_CONNECT_TIMEOUT, ENV_HOST,
    ENV_POLL_INTERVAL, ENV_REQUEST_TIMEOUT, ENV_RESOURCE_ID, ENV_TOKEN, ENV_TRAINING_TIMEOUT,
};
pub use yaml::{CredentialsYaml, ServiceYaml, TrainingYaml, YamlConfig};

use crate::core::voice_clone::PollPolicy;
use crate::core::{DEFAULT_CLUSTER, DEFAULT_HOST, DEFAULT_RESOURCE_ID};
use crate::utils::{UrlValidationError, validate_host_url};

/// Default per-request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Default TCP connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default interval between training status polls in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Default training wait deadline in seconds.
pub const DEFAULT_TRAINING_TIMEOUT_SECS: u64 = 3600;

/// Errors raised while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Missing required setting: {0}")]
    MissingValue(&'static str),

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid API host: {0}")]
    InvalidHost(#[from] UrlValidationError),
}

/// Client configuration
///
/// Holds the identity (application id and access token) and the endpoint
/// settings used by both the synthesis and the voice-clone clients. Treated as
/// immutable once built; the access token is zeroized when the value is dropped
/// and redacted from `Debug` output.
#[derive(Clone)]
pub struct ClientConfig {
    /// Application id issued by the console
    pub appid: String,
    /// Access token, sent as `Authorization: Bearer;<token>`
    pub token: String,
    /// API host, e.g. `https://openspeech.bytedance.com`
    pub host: String,
    /// Synthesis backend pool (`volcano_icl` or `volcano_icl_concurr`)
    pub cluster: String,
    /// `Resource-Id` header value for training and status requests
    pub resource_id: String,
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
    /// Disables TLS certificate verification. Only meant for test servers.
    pub accept_invalid_certs: bool,
    /// Fixed delay between training status polls
    pub poll_interval: Duration,
    /// Deadline for waiting on a training job
    pub training_timeout: Duration,
}

impl Drop for ClientConfig {
    fn drop(&mut self) {
        self.token.zeroize();
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("appid", &self.appid)
            .field("token", &"<redacted>")
            .field("host", &self.host)
            .field("cluster", &self.cluster)
            .field("resource_id", &self.resource_id)
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .field("poll_interval", &self.poll_interval)
            .field("training_timeout", &self.training_timeout)
            .finish()
    }
}

impl ClientConfig {
    /// Creates a configuration with the given credentials and default endpoint settings.
    pub fn new(appid: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            appid: appid.into(),
            token: token.into(),
            host: DEFAULT_HOST.to_string(),
            cluster: DEFAULT_CLUSTER.to_string(),
            resource_id: DEFAULT_RESOURCE_ID.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            accept_invalid_certs: false,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            training_timeout: Duration::from_secs(DEFAULT_TRAINING_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables only.
    ///
    /// Expects `BYTEDANCE_APPID` and `BYTEDANCE_TOKEN` to be set; every other
    /// setting falls back to its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load configuration from a YAML file with environment variable base.
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// After merging, the final configuration is validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let yaml = YamlConfig::from_file(path)?;
        Self::load(Some(yaml))
    }

    fn load(yaml: Option<YamlConfig>) -> Result<Self, ConfigError> {
        let env = env::EnvConfig::load()?;
        let yaml = yaml.unwrap_or_default();
        let credentials = yaml.credentials.unwrap_or_default();
        let service = yaml.service.unwrap_or_default();
        let training = yaml.training.unwrap_or_default();

        let appid = credentials
            .appid
            .or(env.appid)
            .ok_or(ConfigError::MissingValue(ENV_APPID))?;
        let token = credentials
            .token
            .or(env.token)
            .ok_or(ConfigError::MissingValue(ENV_TOKEN))?;

        let mut config = Self::new(appid, token);

        if let Some(host) = service.host.or(env.host) {
            config.host = host;
        }
        if let Some(cluster) = service.cluster.or(env.cluster) {
            config.cluster = cluster;
        }
        if let Some(resource_id) = service.resource_id.or(env.resource_id) {
            config.resource_id = resource_id;
        }
        if let Some(secs) = service
            .request_timeout_seconds
            .or(env.request_timeout_seconds)
        {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = service
            .connect_timeout_seconds
            .or(env.connect_timeout_seconds)
        {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(accept) = service.accept_invalid_certs.or(env.accept_invalid_certs) {
            config.accept_invalid_certs = accept;
        }
        if let Some(secs) = training.poll_interval_seconds.or(env.poll_interval_seconds) {
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Some(secs) = training.timeout_seconds.or(env.training_timeout_seconds) {
            config.training_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates credentials, host URL and timeouts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.appid.trim().is_empty() {
            return Err(ConfigError::MissingValue(ENV_APPID));
        }
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingValue(ENV_TOKEN));
        }
        validate_host_url(&self.host)?;
        if self.cluster.trim().is_empty() {
            return Err(ConfigError::MissingValue(ENV_CLUSTER));
        }
        if self.resource_id.trim().is_empty() {
            return Err(ConfigError::MissingValue(ENV_RESOURCE_ID));
        }

        for (key, value) in [
            (ENV_REQUEST_TIMEOUT, self.request_timeout),
            (ENV_CONNECT_TIMEOUT, self.connect_timeout),
            (ENV_TRAINING_TIMEOUT, self.training_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::InvalidValue {
                    key,
                    value: "0".to_string(),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Sets the API host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Sets the synthesis cluster.
    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = cluster.into();
        self
    }

    /// Sets the `Resource-Id` header value.
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = resource_id.into();
        self
    }

    /// Sets the per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Disables TLS certificate verification. Test servers only.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Sets the fixed training poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the training wait deadline.
    pub fn with_training_timeout(mut self, timeout: Duration) -> Self {
        self.training_timeout = timeout;
        self
    }

    /// Poll cadence and deadline derived from this configuration.
    pub fn poll_policy(&self) -> PollPolicy {
        PollPolicy::new(self.poll_interval, self.training_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    // Helper to clean up environment variables
    fn cleanup_env_vars() {
        unsafe {
            for key in [
                ENV_APPID,
                ENV_TOKEN,
                ENV_HOST,
                ENV_CLUSTER,
                ENV_RESOURCE_ID,
                ENV_REQUEST_TIMEOUT,
                ENV_CONNECT_TIMEOUT,
                ENV_ACCEPT_INVALID_CERTS,
                ENV_POLL_INTERVAL,
                ENV_TRAINING_TIMEOUT,
            ] {
                env::remove_var(key);
            }
        }
    }

    #[test]
    fn test_new_uses_defaults() {
        let config = ClientConfig::new("test_appid", "test_token");
        assert_eq!(config.appid, "test_appid");
        assert_eq!(config.token, "test_token");
        assert_eq!(config.host, "https://openspeech.bytedance.com");
        assert_eq!(config.cluster, "volcano_icl");
        assert_eq!(config.resource_id, "volc.megatts.voiceclone");
        assert!(!config.accept_invalid_certs);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.training_timeout, Duration::from_secs(3600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = ClientConfig::new("app", "super-secret-token");
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_validate_rejects_empty_credentials() {
        assert!(matches!(
            ClientConfig::new("", "token").validate(),
            Err(ConfigError::MissingValue(ENV_APPID))
        ));
        assert!(matches!(
            ClientConfig::new("app", "  ").validate(),
            Err(ConfigError::MissingValue(ENV_TOKEN))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_host() {
        let config = ClientConfig::new("app", "token").with_host("not a url");
        assert!(matches!(config.validate(), Err(ConfigError::InvalidHost(_))));
    }

    #[test]
    fn test_validate_rejects_zero_timeouts() {
        let config = ClientConfig::new("app", "token").with_training_timeout(Duration::ZERO);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                key: ENV_TRAINING_TIMEOUT,
                ..
            })
        ));
    }

    #[test]
    fn test_zero_poll_interval_is_allowed() {
        let config = ClientConfig::new("app", "token").with_poll_interval(Duration::ZERO);
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_policy().interval, Duration::ZERO);
    }

    #[test]
    #[serial]
    fn test_from_env() {
        cleanup_env_vars();
        unsafe {
            env::set_var(ENV_APPID, "env-app");
            env::set_var(ENV_TOKEN, "env-token");
            env::set_var(ENV_CLUSTER, "volcano_icl_concurr");
            env::set_var(ENV_POLL_INTERVAL, "3");
            env::set_var(ENV_ACCEPT_INVALID_CERTS, "false");
        }

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.appid, "env-app");
        assert_eq!(config.token, "env-token");
        assert_eq!(config.cluster, "volcano_icl_concurr");
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert_eq!(config.host, DEFAULT_HOST);

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_missing_token() {
        cleanup_env_vars();
        unsafe {
            env::set_var(ENV_APPID, "env-app");
        }

        let result = ClientConfig::from_env();
        assert!(matches!(result, Err(ConfigError::MissingValue(ENV_TOKEN))));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_number() {
        cleanup_env_vars();
        unsafe {
            env::set_var(ENV_APPID, "env-app");
            env::set_var(ENV_TOKEN, "env-token");
            env::set_var(ENV_TRAINING_TIMEOUT, "soon");
        }

        let result = ClientConfig::from_env();
        match result {
            Err(ConfigError::InvalidValue { key, value, .. }) => {
                assert_eq!(key, ENV_TRAINING_TIMEOUT);
                assert_eq!(value, "soon");
            }
            other => panic!("Expected InvalidValue, got {other:?}"),
        }

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_yaml_overrides_env() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");

        let yaml_content = r#"
credentials:
  token: "yaml-token"

service:
  host: "https://yaml.example.com"

training:
  timeout_seconds: 900
"#;
        fs::write(&config_path, yaml_content).unwrap();

        unsafe {
            env::set_var(ENV_APPID, "env-app");
            env::set_var(ENV_TOKEN, "env-token");
            env::set_var(ENV_HOST, "https://env.example.com");
            env::set_var(ENV_POLL_INTERVAL, "7");
        }

        let config = ClientConfig::from_file(&config_path).unwrap();

        // YAML overrides ENV
        assert_eq!(config.token, "yaml-token");
        assert_eq!(config.host, "https://yaml.example.com");
        assert_eq!(config.training_timeout, Duration::from_secs(900));
        // ENV values fill in what YAML leaves out
        assert_eq!(config.appid, "env-app");
        assert_eq!(config.poll_interval, Duration::from_secs(7));

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_missing_file() {
        cleanup_env_vars();

        let result = ClientConfig::from_file(Path::new("/nonexistent/config.yaml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );

        cleanup_env_vars();
    }

    #[test]
    #[serial]
    fn test_from_file_invalid_host() {
        cleanup_env_vars();

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.yaml");
        fs::write(
            &config_path,
            "credentials:\n  appid: a\n  token: t\nservice:\n  host: \"ftp://example.com\"\n",
        )
        .unwrap();

        let result = ClientConfig::from_file(&config_path);
        assert!(matches!(result, Err(ConfigError::InvalidHost(_))));

        cleanup_env_vars();
    }
}
