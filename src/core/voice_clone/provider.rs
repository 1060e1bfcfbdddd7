//! Voice-clone training client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::messages::{StatusRequest, TrainRequest, TrainingStatusReport, TrainingSubmission};
use super::poller::{StatusPoller, TrainingStatusSource};
use super::sample::AudioSample;
use crate::config::ClientConfig;
use crate::core::base::{VoiceCloneError, VoiceCloneResult};
use crate::core::http::{ApiClient, HeaderSet};
use crate::core::{TRAIN_STATUS_PATH, TRAIN_UPLOAD_PATH};

/// Client for the training upload and status endpoints.
#[derive(Clone)]
pub struct VoiceCloneClient {
    api: ApiClient,
}

impl VoiceCloneClient {
    /// Creates a client from a configuration.
    ///
    /// # Errors
    /// * `InvalidConfiguration` - if the configuration fails validation
    pub fn new(config: ClientConfig) -> VoiceCloneResult<Self> {
        Ok(Self::from_api(ApiClient::new(config)?))
    }

    pub fn from_api(api: ApiClient) -> Self {
        Self { api }
    }

    /// Poller using the configured interval and training timeout.
    pub fn poller(&self) -> StatusPoller {
        StatusPoller::new(self.api.config().poll_policy())
    }

    /// Uploads a training sample for `speaker_id`.
    ///
    /// The returned acknowledgment only means the upload was accepted. A
    /// non-zero `BaseResp.StatusCode` is logged but not treated as an error;
    /// poll the status to learn the outcome.
    pub async fn train(
        &self,
        sample: &AudioSample,
        speaker_id: &str,
    ) -> VoiceCloneResult<TrainingSubmission> {
        check_speaker_id(speaker_id)?;
        if sample.format.trim().is_empty() {
            return Err(VoiceCloneError::InvalidRequest(
                "audio format must not be empty".to_string(),
            ));
        }

        let request = TrainRequest::single(
            &self.api.config().appid,
            speaker_id,
            sample.to_train_audio(),
        );

        info!(
            "Submitting {} bytes of {} audio for speaker {}",
            sample.bytes.len(),
            sample.format,
            speaker_id
        );

        let submission: TrainingSubmission = self
            .api
            .post_json_as(TRAIN_UPLOAD_PATH, &request, HeaderSet::WithResourceId)
            .await?;

        match &submission.base_resp {
            Some(base) if !base.is_ok() => warn!(
                "Upload for {} acknowledged with status {}: {}",
                speaker_id, base.status_code, base.status_message
            ),
            _ => debug!("Upload for {} acknowledged", speaker_id),
        }

        Ok(submission)
    }

    /// Reads `path` and uploads it as a training sample.
    pub async fn train_from_path(
        &self,
        path: impl AsRef<Path>,
        speaker_id: &str,
    ) -> VoiceCloneResult<TrainingSubmission> {
        let sample = AudioSample::from_path(path).await?;
        self.train(&sample, speaker_id).await
    }

    /// Queries the current training status once.
    pub async fn get_status(&self, speaker_id: &str) -> VoiceCloneResult<TrainingStatusReport> {
        check_speaker_id(speaker_id)?;

        let request = StatusRequest {
            appid: self.api.config().appid.clone(),
            speaker_id: speaker_id.to_string(),
        };

        let report: TrainingStatusReport = self
            .api
            .post_json_as(TRAIN_STATUS_PATH, &request, HeaderSet::WithResourceId)
            .await?;

        debug!("Status of {}: {}", speaker_id, report.status);
        Ok(report)
    }

    /// Waits for training to finish using the configured policy.
    pub async fn wait_for_completion(
        &self,
        speaker_id: &str,
    ) -> VoiceCloneResult<TrainingStatusReport> {
        self.poller().wait(self, speaker_id).await
    }

    /// Waits for training to finish with an explicit deadline.
    pub async fn wait_for_completion_with_timeout(
        &self,
        speaker_id: &str,
        timeout: Duration,
    ) -> VoiceCloneResult<TrainingStatusReport> {
        let policy = self.api.config().poll_policy().with_timeout(timeout);
        StatusPoller::new(policy).wait(self, speaker_id).await
    }

    /// Like [`wait_for_completion_with_timeout`](Self::wait_for_completion_with_timeout),
    /// but stops between queries once `cancel` fires.
    pub async fn wait_for_completion_cancellable(
        &self,
        speaker_id: &str,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> VoiceCloneResult<TrainingStatusReport> {
        let policy = self.api.config().poll_policy().with_timeout(timeout);
        StatusPoller::new(policy)
            .with_cancellation(cancel)
            .wait(self, speaker_id)
            .await
    }

    /// Uploads a sample, then waits for training to finish.
    ///
    /// If the upload fails no status query is made.
    pub async fn train_and_wait(
        &self,
        sample: &AudioSample,
        speaker_id: &str,
    ) -> VoiceCloneResult<TrainingStatusReport> {
        self.train_and_wait_with(sample, speaker_id, &self.poller())
            .await
    }

    /// [`train_and_wait`](Self::train_and_wait) with a caller-supplied poller.
    pub async fn train_and_wait_with(
        &self,
        sample: &AudioSample,
        speaker_id: &str,
        poller: &StatusPoller,
    ) -> VoiceCloneResult<TrainingStatusReport> {
        self.train(sample, speaker_id).await?;
        poller.wait(self, speaker_id).await
    }
}

#[async_trait]
impl TrainingStatusSource for VoiceCloneClient {
    async fn fetch_status(&self, speaker_id: &str) -> VoiceCloneResult<TrainingStatusReport> {
        self.get_status(speaker_id).await
    }
}

fn check_speaker_id(speaker_id: &str) -> VoiceCloneResult<()> {
    if speaker_id.trim().is_empty() {
        return Err(VoiceCloneError::InvalidRequest(
            "speaker_id must not be empty".to_string(),
        ));
    }
    Ok(())
}
