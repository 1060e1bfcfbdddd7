//! Base error and result types shared by the synthesis and voice-clone clients.
//!
//! Every failure is surfaced to the caller as a distinct variant. Nothing in
//! this crate retries or swallows an error; retry policy belongs to the caller.

use std::time::Duration;

use thiserror::Error;

use crate::core::voice_clone::{TrainingStatus, TrainingStatusReport};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur while talking to the voice-clone API.
#[derive(Debug, Error)]
pub enum VoiceCloneError {
    /// Invalid client configuration (missing credentials, bad host URL, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A request failed client-side validation and was never sent
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Connection or protocol failure before an HTTP status was received
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-200 status
    #[error("Transport error: HTTP {status}: {body}")]
    Transport { status: u16, body: String },

    /// Well-formed synthesis response carrying a failure code
    #[error("Synthesis failed with code {code}: {message}")]
    Synthesis { code: i64, message: String },

    /// A 200 response that is missing fields the contract requires
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Base64 audio payload could not be decoded
    #[error("Failed to decode audio payload: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The training job reached the `Failed` state
    #[error("Training failed for speaker {}: {}", .0.speaker_id, .0.status)]
    TrainingFailed(Box<TrainingStatusReport>),

    /// Polling deadline exceeded before a terminal state was observed
    #[error(
        "Training for speaker {speaker_id} did not finish within the deadline \
         (elapsed {elapsed:?}, last status: {last_status})"
    )]
    Timeout {
        speaker_id: String,
        elapsed: Duration,
        last_status: TrainingStatus,
    },

    /// The wait was cancelled by the caller between polls
    #[error("Waiting for speaker {speaker_id} was cancelled")]
    Cancelled { speaker_id: String },

    /// Local file I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl VoiceCloneError {
    /// Returns the HTTP status for `Transport` errors.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns true when the error came from the remote side rather than
    /// from local validation or I/O.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Transport { .. }
                | Self::Synthesis { .. }
                | Self::MalformedResponse(_)
                | Self::TrainingFailed(_)
        )
    }
}

/// Result type for voice-clone operations.
pub type VoiceCloneResult<T> = Result<T, VoiceCloneError>;
