//! Synthesis API message types.
//!
//! Request envelope:
//!
//! ```json
//! {
//!   "app": {"appid": "...", "token": "...", "cluster": "volcano_icl"},
//!   "user": {"uid": "<uuid>"},
//!   "audio": {"voice_type": "S_xxx", "encoding": "mp3", "speed_ratio": 1.0},
//!   "request": {"reqid": "<uuid>", "text": "...", "text_type": "plain", "operation": "query"}
//! }
//! ```
//!
//! Response envelope: `{"code": 3000, "message": "Success", "data": "<base64>", ...}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::config::{AudioEncoding, TextType};

// =============================================================================
// Request
// =============================================================================

/// Full synthesis request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsRequest {
    pub app: TtsApp,
    pub user: TtsUser,
    pub audio: TtsAudio,
    pub request: TtsRequestBody,
}

/// Application identity section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsApp {
    pub appid: String,
    pub token: String,
    pub cluster: String,
}

/// Caller identity section. `uid` is random per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsUser {
    pub uid: String,
}

/// Voice and output format section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsAudio {
    /// Speaker id of the cloned voice
    pub voice_type: String,
    pub encoding: AudioEncoding,
    pub speed_ratio: f32,
}

/// Text and operation section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsRequestBody {
    /// Random per request, echoed back by the server
    pub reqid: String,
    pub text: String,
    pub text_type: TextType,
    pub operation: String,
}

// =============================================================================
// Response
// =============================================================================

/// Synthesis response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TtsResponse {
    /// 3000 on success, anything else is a failure
    pub code: i64,

    #[serde(default)]
    pub message: String,

    #[serde(default)]
    pub reqid: Option<String>,

    #[serde(default)]
    pub operation: Option<String>,

    #[serde(default)]
    pub sequence: Option<i64>,

    /// Base64-encoded audio, present on success
    #[serde(default)]
    pub data: Option<String>,

    /// Extra metadata, e.g. `{"duration": "1960"}` in milliseconds
    #[serde(default)]
    pub addition: Option<Map<String, Value>>,
}

impl TtsResponse {
    /// Audio duration reported by the server in milliseconds.
    ///
    /// The server sends the value as a string; plain numbers are accepted too.
    pub fn duration_ms(&self) -> Option<u64> {
        match self.addition.as_ref()?.get("duration")? {
            Value::String(s) => s.trim().parse().ok(),
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }
}
