pub mod base;
pub mod http;
pub mod tts;
pub mod voice_clone;

// =============================================================================
// API Constants
// =============================================================================

/// Default public API host.
pub const DEFAULT_HOST: &str = "https://openspeech.bytedance.com";

/// Default synthesis cluster for cloned voices. `volcano_icl_concurr` is the
/// concurrency-billed alternative.
pub const DEFAULT_CLUSTER: &str = "volcano_icl";

/// `Resource-Id` header value for the voice-clone product family.
pub const DEFAULT_RESOURCE_ID: &str = "volc.megatts.voiceclone";

/// Speech synthesis endpoint.
pub const TTS_PATH: &str = "/api/v1/tts";

/// Training sample upload endpoint.
pub const TRAIN_UPLOAD_PATH: &str = "/api/v1/mega_tts/audio/upload";

/// Training status endpoint.
pub const TRAIN_STATUS_PATH: &str = "/api/v1/mega_tts/status";

// Re-export commonly used types for convenience
pub use base::{VoiceCloneError, VoiceCloneResult};
pub use http::{ApiClient, HeaderSet};

pub use tts::{
    AudioEncoding, SynthesisClient, SynthesisRequest, SynthesizedAudio, TextType,
};

pub use voice_clone::{
    AudioSample, PollPolicy, StatusPoller, TrainingStatus, TrainingStatusReport,
    TrainingStatusSource, TrainingSubmission, VoiceCloneClient,
};
