//! Training API message types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{LANGUAGE_CHINESE, MODEL_TYPE, SOURCE};
use crate::core::base::VoiceCloneError;

// =============================================================================
// Training Status
// =============================================================================

/// Lifecycle state of a training job, as reported by the status endpoint.
///
/// Encoded on the wire as an integer. Unknown codes fail to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum TrainingStatus {
    /// No job exists for the speaker id
    NotFound,
    /// Job accepted and in progress
    Training,
    /// Job finished successfully
    Succeeded,
    /// Job finished with an error
    Failed,
    /// Voice is trained and ready for synthesis
    Active,
}

impl TrainingStatus {
    /// Wire code of this status.
    pub const fn code(&self) -> i64 {
        match self {
            Self::NotFound => 0,
            Self::Training => 1,
            Self::Succeeded => 2,
            Self::Failed => 3,
            Self::Active => 4,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Training => "training",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Active => "active",
        }
    }

    /// Terminal states end polling.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Active)
    }

    /// `Succeeded` and `Active` both mean the voice is usable.
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Active)
    }
}

impl TryFrom<i64> for TrainingStatus {
    type Error = VoiceCloneError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::NotFound),
            1 => Ok(Self::Training),
            2 => Ok(Self::Succeeded),
            3 => Ok(Self::Failed),
            4 => Ok(Self::Active),
            other => Err(VoiceCloneError::MalformedResponse(format!(
                "unknown training status code {other}"
            ))),
        }
    }
}

impl From<TrainingStatus> for i64 {
    fn from(status: TrainingStatus) -> Self {
        status.code()
    }
}

impl std::fmt::Display for TrainingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Requests
// =============================================================================

/// One training sample in an upload request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainAudio {
    /// Base64-encoded audio
    pub audio_bytes: String,
    /// Format tag, e.g. `wav` or `mp3`
    pub audio_format: String,
}

/// Upload request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainRequest {
    pub appid: String,
    pub speaker_id: String,
    pub audios: Vec<TrainAudio>,
    pub source: i32,
    pub language: i32,
    pub model_type: i32,
}

impl TrainRequest {
    /// Builds a single-sample upload with the fixed source/language/model values.
    pub fn single(appid: &str, speaker_id: &str, audio: TrainAudio) -> Self {
        Self {
            appid: appid.to_string(),
            speaker_id: speaker_id.to_string(),
            audios: vec![audio],
            source: SOURCE,
            language: LANGUAGE_CHINESE,
            model_type: MODEL_TYPE,
        }
    }
}

/// Status query body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusRequest {
    pub appid: String,
    pub speaker_id: String,
}

// =============================================================================
// Responses
// =============================================================================

/// Service-level result block attached to training responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseResp {
    #[serde(rename = "StatusCode", default)]
    pub status_code: i64,
    #[serde(rename = "StatusMessage", default)]
    pub status_message: String,
}

impl BaseResp {
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status_code == 0
    }
}

/// Acknowledgment of a training upload.
///
/// Only confirms the upload was received. The training outcome is decided by
/// polling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrainingSubmission {
    #[serde(rename = "BaseResp", default, skip_serializing_if = "Option::is_none")]
    pub base_resp: Option<BaseResp>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_id: Option<String>,

    /// Any other fields the server returned
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of one status query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingStatusReport {
    #[serde(default)]
    pub speaker_id: String,

    pub status: TrainingStatus,

    /// URL of a demo clip, present once training has produced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_audio: Option<String>,

    #[serde(rename = "BaseResp", default, skip_serializing_if = "Option::is_none")]
    pub base_resp: Option<BaseResp>,

    /// Remaining fields such as `create_time` or `version`
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
