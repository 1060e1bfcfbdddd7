//! Voice-clone training: sample upload, status queries and completion polling.
//!
//! Training is asynchronous. A submission only acknowledges that the samples
//! were accepted; the outcome is discovered by polling the status endpoint
//! until the job reaches a terminal state.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use volc_voiceclone::config::ClientConfig;
//! use volc_voiceclone::core::voice_clone::{AudioSample, VoiceCloneClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("app-id", "token")
//!     .with_poll_interval(Duration::from_secs(5));
//! let client = VoiceCloneClient::new(config)?;
//!
//! let sample = AudioSample::from_path("samples/reference.wav").await?;
//! let report = client.train_and_wait(&sample, "S_abc123").await?;
//! println!("status: {}, demo: {:?}", report.status, report.demo_audio);
//! # Ok(())
//! # }
//! ```
//!
//! # API Reference
//!
//! - Upload: `POST {host}/api/v1/mega_tts/audio/upload`
//! - Status: `POST {host}/api/v1/mega_tts/status`
//!
//! Both requests carry the `Resource-Id` header in addition to the standard
//! authorization headers.

pub mod messages;
pub mod poller;
pub mod provider;
pub mod sample;

pub use messages::{
    BaseResp, StatusRequest, TrainAudio, TrainRequest, TrainingStatus, TrainingStatusReport,
    TrainingSubmission,
};
pub use poller::{PollPolicy, StatusPoller, TrainingStatusSource};
pub use provider::VoiceCloneClient;
pub use sample::AudioSample;

use std::time::Duration;

// =============================================================================
// Upload Constants
// =============================================================================

/// `source` value the upload endpoint expects for API uploads.
pub const SOURCE: i32 = 2;

/// `language` value for Chinese training samples.
pub const LANGUAGE_CHINESE: i32 = 0;

/// `model_type` value for the standard clone model.
pub const MODEL_TYPE: i32 = 1;

// =============================================================================
// Polling Defaults
// =============================================================================

/// Default delay between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default overall wait deadline.
pub const DEFAULT_TRAINING_TIMEOUT: Duration = Duration::from_secs(3600);

/// Conventional prefix of cloned speaker ids.
pub const SPEAKER_ID_PREFIX: &str = "S_";
