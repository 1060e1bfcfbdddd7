//! Speech synthesis with cloned voices.
//!
//! This module wraps the HTTP synthesis endpoint: one POST per request, a JSON
//! envelope in, a JSON envelope with base64 audio out.
//!
//! # Example
//!
//! ```rust,no_run
//! use volc_voiceclone::config::ClientConfig;
//! use volc_voiceclone::core::tts::{AudioEncoding, SynthesisClient, SynthesisRequest};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = SynthesisClient::new(ClientConfig::new("app-id", "token"))?;
//!
//! let request = SynthesisRequest::new("你好，世界！", "S_abc123")
//!     .with_encoding(AudioEncoding::Wav)
//!     .with_speed_ratio(1.2);
//!
//! let audio = client.synthesize(&request).await?;
//! client.synthesize_to_file(&request, "output/hello.wav").await?;
//! # let _ = audio;
//! # Ok(())
//! # }
//! ```
//!
//! # API Reference
//!
//! - Synthesis: `POST {host}/api/v1/tts`
//!
//! # Authentication
//!
//! `Authorization: Bearer;{token}` header plus the appid/token/cluster triple
//! in the request body. No `Resource-Id` header is sent for synthesis.

pub mod config;
pub mod messages;
pub mod provider;

pub use config::{AudioEncoding, SynthesisRequest, TextType};
pub use messages::{TtsApp, TtsAudio, TtsRequest, TtsRequestBody, TtsResponse, TtsUser};
pub use provider::{SynthesisClient, SynthesizedAudio, write_audio};

// =============================================================================
// Limits and Defaults
// =============================================================================

/// The only response code that signals a successful synthesis.
pub const SUCCESS_CODE: i64 = 3000;

/// Operation value for one-shot (non-streaming) synthesis.
pub const OPERATION_QUERY: &str = "query";

/// Maximum UTF-8 byte length of the text in a single request.
pub const MAX_TEXT_BYTES: usize = 1024;

/// Minimum speed ratio.
pub const MIN_SPEED_RATIO: f32 = 0.2;

/// Maximum speed ratio.
pub const MAX_SPEED_RATIO: f32 = 3.0;

/// Default speed ratio.
pub const DEFAULT_SPEED_RATIO: f32 = 1.0;
