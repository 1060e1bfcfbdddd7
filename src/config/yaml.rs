use serde::Deserialize;
use std::path::Path;

use super::ConfigError;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present in
/// the file override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// credentials:
///   appid: "your-app-id"
///   token: "your-access-token"
///
/// service:
///   host: "https://openspeech.bytedance.com"
///   cluster: "volcano_icl"
///   resource_id: "volc.megatts.voiceclone"
///   request_timeout_seconds: 60
///   connect_timeout_seconds: 10
///   accept_invalid_certs: false
///
/// training:
///   poll_interval_seconds: 10
///   timeout_seconds: 3600
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub credentials: Option<CredentialsYaml>,
    pub service: Option<ServiceYaml>,
    pub training: Option<TrainingYaml>,
}

/// Credentials from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct CredentialsYaml {
    pub appid: Option<String>,
    pub token: Option<String>,
}

/// Service endpoint settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ServiceYaml {
    pub host: Option<String>,
    pub cluster: Option<String>,
    pub resource_id: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub connect_timeout_seconds: Option<u64>,
    /// Disables TLS certificate verification. Test servers only.
    pub accept_invalid_certs: Option<bool>,
}

/// Training poll settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TrainingYaml {
    pub poll_interval_seconds: Option<u64>,
    pub timeout_seconds: Option<u64>,
}

impl YamlConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(contents)?)
    }
}
