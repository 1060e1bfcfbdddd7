//! Synthesis request parameters and their client-side validation.

use serde::{Deserialize, Serialize};

use super::{DEFAULT_SPEED_RATIO, MAX_SPEED_RATIO, MAX_TEXT_BYTES, MIN_SPEED_RATIO};
use crate::core::base::{VoiceCloneError, VoiceCloneResult};

// =============================================================================
// Audio Encoding
// =============================================================================

/// Output audio encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AudioEncoding {
    Wav,
    Pcm,
    OggOpus,
    /// MP3 (default)
    #[default]
    Mp3,
}

impl AudioEncoding {
    /// Returns the API encoding string.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Pcm => "pcm",
            Self::OggOpus => "ogg_opus",
            Self::Mp3 => "mp3",
        }
    }

    /// File extension for audio saved in this encoding.
    #[inline]
    pub const fn file_extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Pcm => "pcm",
            Self::OggOpus => "ogg",
            Self::Mp3 => "mp3",
        }
    }

    /// Returns all supported encodings.
    pub const fn all() -> &'static [Self] {
        &[Self::Wav, Self::Pcm, Self::OggOpus, Self::Mp3]
    }
}

impl std::fmt::Display for AudioEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for AudioEncoding {
    type Err = VoiceCloneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wav" => Ok(Self::Wav),
            "pcm" => Ok(Self::Pcm),
            "ogg_opus" | "ogg" | "opus" => Ok(Self::OggOpus),
            "mp3" => Ok(Self::Mp3),
            other => Err(VoiceCloneError::InvalidRequest(format!(
                "unsupported encoding '{other}', expected one of: wav, pcm, ogg_opus, mp3"
            ))),
        }
    }
}

// =============================================================================
// Text Type
// =============================================================================

/// How the request text is interpreted by the server.
///
/// SSML text is passed through untouched; it is not parsed or validated here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TextType {
    #[default]
    Plain,
    Ssml,
}

impl TextType {
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Ssml => "ssml",
        }
    }
}

impl std::fmt::Display for TextType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Synthesis Request
// =============================================================================

/// Parameters of a single synthesis call.
///
/// # Example
///
/// ```rust
/// use volc_voiceclone::core::tts::{AudioEncoding, SynthesisRequest, TextType};
///
/// let request = SynthesisRequest::new("<speak>你好</speak>", "S_abc123")
///     .with_text_type(TextType::Ssml)
///     .with_encoding(AudioEncoding::OggOpus)
///     .with_speed_ratio(0.8);
///
/// assert!(request.validate().is_ok());
/// assert!(request.clone().with_speed_ratio(3.5).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    /// Text (or SSML document) to speak
    pub text: String,
    /// Cloned voice identifier, conventionally `S_`-prefixed
    pub speaker_id: String,
    pub encoding: AudioEncoding,
    /// Playback speed, accepted range [0.2, 3.0]
    pub speed_ratio: f32,
    pub text_type: TextType,
}

impl SynthesisRequest {
    /// Creates a plain-text MP3 request at normal speed.
    pub fn new(text: impl Into<String>, speaker_id: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            speaker_id: speaker_id.into(),
            encoding: AudioEncoding::default(),
            speed_ratio: DEFAULT_SPEED_RATIO,
            text_type: TextType::default(),
        }
    }

    #[inline]
    pub fn with_encoding(mut self, encoding: AudioEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Sets the speed ratio.
    ///
    /// The value is not clamped; out-of-range values are rejected by
    /// [`validate`](Self::validate) before anything is sent.
    #[inline]
    pub fn with_speed_ratio(mut self, speed_ratio: f32) -> Self {
        self.speed_ratio = speed_ratio;
        self
    }

    #[inline]
    pub fn with_text_type(mut self, text_type: TextType) -> Self {
        self.text_type = text_type;
        self
    }

    /// Checks every precondition the server would otherwise reject.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceCloneError::InvalidRequest`] if:
    /// - `text` is empty or whitespace
    /// - `text` exceeds 1024 UTF-8 bytes
    /// - `speaker_id` is empty
    /// - `speed_ratio` is outside [0.2, 3.0] (or NaN)
    pub fn validate(&self) -> VoiceCloneResult<()> {
        if self.text.trim().is_empty() {
            return Err(VoiceCloneError::InvalidRequest(
                "text must not be empty".to_string(),
            ));
        }
        if self.text.len() > MAX_TEXT_BYTES {
            return Err(VoiceCloneError::InvalidRequest(format!(
                "text exceeds maximum length of {} bytes (got {})",
                MAX_TEXT_BYTES,
                self.text.len()
            )));
        }
        if self.speaker_id.trim().is_empty() {
            return Err(VoiceCloneError::InvalidRequest(
                "speaker_id must not be empty".to_string(),
            ));
        }
        if !(MIN_SPEED_RATIO..=MAX_SPEED_RATIO).contains(&self.speed_ratio) {
            return Err(VoiceCloneError::InvalidRequest(format!(
                "speed_ratio must be between {} and {}, got {}",
                MIN_SPEED_RATIO, MAX_SPEED_RATIO, self.speed_ratio
            )));
        }
        Ok(())
    }
}
