//! Training audio samples.

use std::path::Path;

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};

use super::messages::TrainAudio;
use crate::core::base::{VoiceCloneError, VoiceCloneResult};

/// Raw audio plus its format tag (`wav`, `mp3`, ...).
///
/// The format is forwarded to the server as-is; it is not checked against the
/// bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioSample {
    pub bytes: Vec<u8>,
    pub format: String,
}

impl AudioSample {
    pub fn new(bytes: impl Into<Vec<u8>>, format: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            format: format.into(),
        }
    }

    /// Reads a sample from disk, taking the format from the file extension.
    ///
    /// # Errors
    /// * `InvalidRequest` - the path has no extension
    /// * `Io` - the file cannot be read
    pub async fn from_path(path: impl AsRef<Path>) -> VoiceCloneResult<Self> {
        let path = path.as_ref();
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(str::to_lowercase)
            .ok_or_else(|| {
                VoiceCloneError::InvalidRequest(format!(
                    "cannot determine audio format of '{}': file has no extension",
                    path.display()
                ))
            })?;

        let bytes = tokio::fs::read(path).await?;
        Ok(Self { bytes, format })
    }

    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub(crate) fn to_train_audio(&self) -> TrainAudio {
        TrainAudio {
            audio_bytes: self.to_base64(),
            audio_format: self.format.clone(),
        }
    }
}
