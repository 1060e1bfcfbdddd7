//! Synthesis client implementation.
//!
//! `SynthesisClient` validates a [`SynthesisRequest`], builds the request
//! envelope with fresh random identifiers, performs exactly one POST and turns
//! the response envelope into audio bytes or a specific error:
//!
//! | Condition | Result |
//! |-----------|--------|
//! | non-200 HTTP status | `Transport { status, body }` |
//! | `code != 3000` | `Synthesis { code, message }` |
//! | `code == 3000` without `data` | `MalformedResponse` |
//! | invalid base64 | `Decode` |

use std::path::{Path, PathBuf};

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use tracing::{debug, info};
use uuid::Uuid;

use super::config::{AudioEncoding, SynthesisRequest};
use super::messages::{TtsApp, TtsAudio, TtsRequest, TtsRequestBody, TtsResponse, TtsUser};
use super::{OPERATION_QUERY, SUCCESS_CODE};
use crate::config::ClientConfig;
use crate::core::TTS_PATH;
use crate::core::base::{VoiceCloneError, VoiceCloneResult};
use crate::core::http::{ApiClient, HeaderSet};

/// Decoded audio plus the metadata returned alongside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedAudio {
    pub audio: Vec<u8>,
    pub encoding: AudioEncoding,
    /// Request id sent with the call
    pub request_id: String,
    /// Duration reported by the server, if any
    pub duration_ms: Option<u64>,
}

/// Text-to-speech client for cloned voices.
///
/// Stateless apart from the shared configuration; safe to clone and use from
/// several tasks at once.
#[derive(Clone)]
pub struct SynthesisClient {
    api: ApiClient,
}

impl SynthesisClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    /// * `InvalidConfiguration` - if the configuration fails validation
    pub fn new(config: ClientConfig) -> VoiceCloneResult<Self> {
        Ok(Self::from_api(ApiClient::new(config)?))
    }

    /// Creates a client sharing an existing HTTP client.
    pub fn from_api(api: ApiClient) -> Self {
        Self { api }
    }

    /// Synthesizes speech and returns the raw audio bytes.
    pub async fn synthesize(&self, request: &SynthesisRequest) -> VoiceCloneResult<Vec<u8>> {
        Ok(self.synthesize_detailed(request).await?.audio)
    }

    /// Synthesizes speech and returns audio together with response metadata.
    pub async fn synthesize_detailed(
        &self,
        request: &SynthesisRequest,
    ) -> VoiceCloneResult<SynthesizedAudio> {
        request.validate()?;

        let envelope = self.build_request(request);
        let request_id = envelope.request.reqid.clone();

        debug!(
            "Synthesizing: speaker={}, encoding={}, speed_ratio={}, text_type={}, reqid={}",
            request.speaker_id, request.encoding, request.speed_ratio, request.text_type, request_id
        );

        let response: TtsResponse = self
            .api
            .post_json_as(TTS_PATH, &envelope, HeaderSet::Standard)
            .await?;

        let audio = decode_response(response, request.encoding, request_id)?;

        info!(
            "Synthesized {} bytes for speaker {} (reqid={})",
            audio.audio.len(),
            request.speaker_id,
            audio.request_id
        );

        Ok(audio)
    }

    /// Synthesizes speech and writes it to `path`, creating parent directories.
    ///
    /// Returns the path written and the number of bytes.
    pub async fn synthesize_to_file(
        &self,
        request: &SynthesisRequest,
        path: impl AsRef<Path>,
    ) -> VoiceCloneResult<(PathBuf, usize)> {
        let audio = self.synthesize(request).await?;
        let path = path.as_ref().to_path_buf();
        write_audio(&path, &audio).await?;
        info!("Saved {} bytes of audio to {}", audio.len(), path.display());
        Ok((path, audio.len()))
    }

    /// Builds the request envelope with fresh request and user ids.
    fn build_request(&self, request: &SynthesisRequest) -> TtsRequest {
        let config = self.api.config();
        TtsRequest {
            app: TtsApp {
                appid: config.appid.clone(),
                token: config.token.clone(),
                cluster: config.cluster.clone(),
            },
            user: TtsUser {
                uid: Uuid::new_v4().to_string(),
            },
            audio: TtsAudio {
                voice_type: request.speaker_id.clone(),
                encoding: request.encoding,
                speed_ratio: request.speed_ratio,
            },
            request: TtsRequestBody {
                reqid: Uuid::new_v4().to_string(),
                text: request.text.clone(),
                text_type: request.text_type,
                operation: OPERATION_QUERY.to_string(),
            },
        }
    }
}

/// Validates a response envelope and decodes its audio.
fn decode_response(
    response: TtsResponse,
    encoding: AudioEncoding,
    request_id: String,
) -> VoiceCloneResult<SynthesizedAudio> {
    if response.code != SUCCESS_CODE {
        return Err(VoiceCloneError::Synthesis {
            code: response.code,
            message: response.message,
        });
    }

    let duration_ms = response.duration_ms();
    let data = response.data.ok_or_else(|| {
        VoiceCloneError::MalformedResponse(format!(
            "synthesis response with code {SUCCESS_CODE} has no audio data (reqid={request_id})"
        ))
    })?;

    Ok(SynthesizedAudio {
        audio: BASE64.decode(data.as_bytes())?,
        encoding,
        request_id,
        duration_ms,
    })
}

/// Writes audio bytes to `path`, creating parent directories as needed.
pub async fn write_audio(path: &Path, audio: &[u8]) -> VoiceCloneResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, audio).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tts::TextType;

    fn create_test_client() -> SynthesisClient {
        SynthesisClient::new(ClientConfig::new("test_appid", "test_token")).unwrap()
    }

    fn response(code: i64, data: Option<&str>) -> TtsResponse {
        TtsResponse {
            code,
            message: if code == SUCCESS_CODE {
                "Success".to_string()
            } else {
                "quota exceeded".to_string()
            },
            reqid: None,
            operation: None,
            sequence: None,
            data: data.map(str::to_string),
            addition: None,
        }
    }

    #[test]
    fn test_build_request_envelope() {
        let client = create_test_client();
        let request = SynthesisRequest::new("你好", "S_test")
            .with_encoding(AudioEncoding::Wav)
            .with_speed_ratio(1.5)
            .with_text_type(TextType::Ssml);

        let body = serde_json::to_value(client.build_request(&request)).unwrap();

        assert_eq!(body["app"]["appid"], "test_appid");
        assert_eq!(body["app"]["token"], "test_token");
        assert_eq!(body["app"]["cluster"], "volcano_icl");
        assert_eq!(body["audio"]["voice_type"], "S_test");
        assert_eq!(body["audio"]["encoding"], "wav");
        assert_eq!(body["audio"]["speed_ratio"], 1.5);
        assert_eq!(body["request"]["text"], "你好");
        assert_eq!(body["request"]["text_type"], "ssml");
        assert_eq!(body["request"]["operation"], "query");
        assert!(Uuid::parse_str(body["user"]["uid"].as_str().unwrap()).is_ok());
        assert!(Uuid::parse_str(body["request"]["reqid"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_build_request_uses_fresh_ids() {
        let client = create_test_client();
        let request = SynthesisRequest::new("hello", "S_test");

        let first = client.build_request(&request);
        let second = client.build_request(&request);

        assert_ne!(first.request.reqid, second.request.reqid);
        assert_ne!(first.user.uid, second.user.uid);
        assert_ne!(first.request.reqid, first.user.uid);
    }

    #[test]
    fn test_decode_response_success() {
        let audio = decode_response(
            response(3000, Some("AAEC/w==")),
            AudioEncoding::Mp3,
            "r1".to_string(),
        )
        .unwrap();
        assert_eq!(audio.audio, vec![0x00, 0x01, 0x02, 0xff]);
        assert_eq!(audio.request_id, "r1");
    }

    #[test]
    fn test_decode_response_failure_code() {
        let err = decode_response(response(3050, None), AudioEncoding::Mp3, "r".to_string())
            .unwrap_err();
        match err {
            VoiceCloneError::Synthesis { code, message } => {
                assert_eq!(code, 3050);
                assert_eq!(message, "quota exceeded");
            }
            other => panic!("Expected Synthesis error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_response_missing_audio_is_malformed() {
        let err = decode_response(response(3000, None), AudioEncoding::Mp3, "r".to_string())
            .unwrap_err();
        assert!(matches!(err, VoiceCloneError::MalformedResponse(_)));
    }

    #[test]
    fn test_decode_response_empty_audio_decodes_to_empty() {
        let audio =
            decode_response(response(3000, Some("")), AudioEncoding::Mp3, "r".to_string()).unwrap();
        assert!(audio.audio.is_empty());
    }

    #[test]
    fn test_decode_response_invalid_base64() {
        let err = decode_response(
            response(3000, Some("not base64!!")),
            AudioEncoding::Mp3,
            "r".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, VoiceCloneError::Decode(_)));
    }

    #[tokio::test]
    async fn test_write_audio_creates_parent_dirs() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("clip.mp3");

        write_audio(&path, b"ID3").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"ID3");
    }
}
