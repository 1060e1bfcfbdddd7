//! Environment variable loading.
//!
//! `.env` values are loaded into the process environment by the binary before
//! this runs, so real environment variables always win over `.env` entries.

use std::env;
use std::str::FromStr;

use super::ConfigError;

pub const ENV_APPID: &str = "BYTEDANCE_APPID";
pub const ENV_TOKEN: &str = "BYTEDANCE_TOKEN";
pub const ENV_HOST: &str = "BYTEDANCE_HOST";
pub const ENV_CLUSTER: &str = "BYTEDANCE_TTS_CLUSTER";
pub const ENV_RESOURCE_ID: &str = "BYTEDANCE_RESOURCE_ID";
pub const ENV_REQUEST_TIMEOUT: &str = "REQUEST_TIMEOUT_SECONDS";
pub const ENV_CONNECT_TIMEOUT: &str = "CONNECT_TIMEOUT_SECONDS";
pub const ENV_ACCEPT_INVALID_CERTS: &str = "ACCEPT_INVALID_CERTS";
pub const ENV_POLL_INTERVAL: &str = "POLL_INTERVAL_SECONDS";
pub const ENV_TRAINING_TIMEOUT: &str = "TRAINING_TIMEOUT_SECONDS";

/// Raw values read from the environment. `None` means unset or blank.
#[derive(Debug, Default)]
pub(crate) struct EnvConfig {
    pub appid: Option<String>,
    pub token: Option<String>,
    pub host: Option<String>,
    pub cluster: Option<String>,
    pub resource_id: Option<String>,
    pub request_timeout_seconds: Option<u64>,
    pub connect_timeout_seconds: Option<u64>,
    pub accept_invalid_certs: Option<bool>,
    pub poll_interval_seconds: Option<u64>,
    pub training_timeout_seconds: Option<u64>,
}

impl EnvConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Ok(Self {
            appid: string_var(ENV_APPID),
            token: string_var(ENV_TOKEN),
            host: string_var(ENV_HOST),
            cluster: string_var(ENV_CLUSTER),
            resource_id: string_var(ENV_RESOURCE_ID),
            request_timeout_seconds: parsed_var(ENV_REQUEST_TIMEOUT)?,
            connect_timeout_seconds: parsed_var(ENV_CONNECT_TIMEOUT)?,
            accept_invalid_certs: bool_var(ENV_ACCEPT_INVALID_CERTS)?,
            poll_interval_seconds: parsed_var(ENV_POLL_INTERVAL)?,
            training_timeout_seconds: parsed_var(ENV_TRAINING_TIMEOUT)?,
        })
    }
}

fn string_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed_var<T>(key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match string_var(key) {
        Some(value) => value
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidValue {
                key,
                value,
                reason: e.to_string(),
            }),
        None => Ok(None),
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn bool_var(key: &'static str) -> Result<Option<bool>, ConfigError> {
    match string_var(key) {
        Some(value) => match parse_bool(&value) {
            Some(b) => Ok(Some(b)),
            None => Err(ConfigError::InvalidValue {
                key,
                value,
                reason: "expected true/false".to_string(),
            }),
        },
        None => Ok(None),
    }
}
