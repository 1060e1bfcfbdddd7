//! Completion polling for training jobs.
//!
//! The poller queries a [`TrainingStatusSource`] at a fixed cadence until the
//! job reaches a terminal state, the deadline passes or the caller cancels.
//!
//! ```text
//! query ──► Succeeded/Active ──► Ok(report)
//!   │
//!   ├─────► Failed ────────────► Err(TrainingFailed)
//!   │
//!   └─────► other ──► sleep(interval) ──► elapsed > timeout? ──► Err(Timeout)
//!                          │                     │
//!                      cancelled                 └── no ──► query
//!                          ▼
//!                   Err(Cancelled)
//! ```
//!
//! The deadline is checked after each sleep, never during a query, so a wait
//! can overrun its timeout by up to one interval plus one request.

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::messages::{TrainingStatus, TrainingStatusReport};
use super::{DEFAULT_POLL_INTERVAL, DEFAULT_TRAINING_TIMEOUT};
use crate::core::base::{VoiceCloneError, VoiceCloneResult};

/// Anything that can report the training status of a speaker.
#[async_trait]
pub trait TrainingStatusSource: Send + Sync {
    /// Performs one status query.
    async fn fetch_status(&self, speaker_id: &str) -> VoiceCloneResult<TrainingStatusReport>;
}

/// Cadence and deadline of a wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay between the end of one query and the start of the next
    pub interval: Duration,
    /// Maximum time spent waiting, measured from the start of the wait
    pub timeout: Duration,
}

impl PollPolicy {
    pub const fn new(interval: Duration, timeout: Duration) -> Self {
        Self { interval, timeout }
    }

    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_TRAINING_TIMEOUT)
    }
}

/// Drives a [`TrainingStatusSource`] until a terminal state.
#[derive(Debug, Clone, Default)]
pub struct StatusPoller {
    policy: PollPolicy,
    cancel: Option<CancellationToken>,
}

impl StatusPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            cancel: None,
        }
    }

    /// Makes the wait cancellable. Cancellation is observed between queries.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[inline]
    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Polls until the job for `speaker_id` is terminal.
    ///
    /// # Errors
    /// * `TrainingFailed` - the job reached `Failed`
    /// * `Timeout` - the deadline passed while the job was still running
    /// * `Cancelled` - the cancellation token fired during a sleep
    /// * any error from the status query, returned as-is without retrying
    pub async fn wait<S>(&self, source: &S, speaker_id: &str) -> VoiceCloneResult<TrainingStatusReport>
    where
        S: TrainingStatusSource + ?Sized,
    {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        info!(
            "Waiting for training of {} (interval {:?}, timeout {:?})",
            speaker_id, self.policy.interval, self.policy.timeout
        );

        loop {
            let report = source.fetch_status(speaker_id).await?;
            attempts += 1;
            debug!(
                "Training status for {}: {} (attempt {}, elapsed {:?})",
                speaker_id,
                report.status,
                attempts,
                started.elapsed()
            );

            if report.status.is_success() {
                info!(
                    "Training of {} finished with status {} after {} queries",
                    speaker_id, report.status, attempts
                );
                return Ok(report);
            }
            if report.status == TrainingStatus::Failed {
                warn!("Training of {} failed after {} queries", speaker_id, attempts);
                return Err(VoiceCloneError::TrainingFailed(Box::new(report)));
            }

            let last_status = report.status;
            self.pause(speaker_id).await?;

            let elapsed = started.elapsed();
            if elapsed > self.policy.timeout {
                warn!(
                    "Gave up waiting for {} after {:?} ({} queries, last status {})",
                    speaker_id, elapsed, attempts, last_status
                );
                return Err(VoiceCloneError::Timeout {
                    speaker_id: speaker_id.to_string(),
                    elapsed,
                    last_status,
                });
            }
        }
    }

    async fn pause(&self, speaker_id: &str) -> VoiceCloneResult<()> {
        let Some(token) = &self.cancel else {
            tokio::time::sleep(self.policy.interval).await;
            return Ok(());
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                info!("Wait for {} cancelled", speaker_id);
                Err(VoiceCloneError::Cancelled {
                    speaker_id: speaker_id.to_string(),
                })
            }
            _ = tokio::time::sleep(self.policy.interval) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays a fixed status sequence, repeating the last entry forever.
    struct ScriptedSource {
        script: Mutex<VecDeque<TrainingStatus>>,
        last: Mutex<TrainingStatus>,
        queries: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(statuses: &[TrainingStatus]) -> Self {
            Self {
                script: Mutex::new(statuses.iter().copied().collect()),
                last: Mutex::new(TrainingStatus::NotFound),
                queries: AtomicUsize::new(0),
            }
        }

        fn queries(&self) -> usize {
            self.queries.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TrainingStatusSource for ScriptedSource {
        async fn fetch_status(&self, speaker_id: &str) -> VoiceCloneResult<TrainingStatusReport> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            let status = {
                let mut last = self.last.lock().unwrap();
                if let Some(next) = self.script.lock().unwrap().pop_front() {
                    *last = next;
                }
                *last
            };
            Ok(TrainingStatusReport {
                speaker_id: speaker_id.to_string(),
                status,
                demo_audio: None,
                base_resp: None,
                extra: Map::new(),
            })
        }
    }

    struct FailingSource;

    #[async_trait]
    impl TrainingStatusSource for FailingSource {
        async fn fetch_status(&self, _speaker_id: &str) -> VoiceCloneResult<TrainingStatusReport> {
            Err(VoiceCloneError::Transport {
                status: 503,
                body: "unavailable".to_string(),
            })
        }
    }

    fn poller(interval_secs: u64, timeout_secs: u64) -> StatusPoller {
        StatusPoller::new(PollPolicy::new(
            Duration::from_secs(interval_secs),
            Duration::from_secs(timeout_secs),
        ))
    }

    #[test]
    fn test_default_policy() {
        let policy = PollPolicy::default();
        assert_eq!(policy.interval, Duration::from_secs(10));
        assert_eq!(policy.timeout, Duration::from_secs(3600));
    }

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_training() {
        use TrainingStatus::*;
        let source = ScriptedSource::new(&[Training, Training, Succeeded]);

        let report = poller(10, 3600).wait(&source, "S_test").await.unwrap();

        assert_eq!(report.status, Succeeded);
        assert_eq!(source.queries(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_active_is_success() {
        use TrainingStatus::*;
        let source = ScriptedSource::new(&[NotFound, Active]);

        let report = poller(10, 3600).wait(&source, "S_test").await.unwrap();

        assert_eq!(report.status, Active);
        assert_eq!(source.queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_stops_polling() {
        use TrainingStatus::*;
        let source = ScriptedSource::new(&[Training, Failed]);

        let err = poller(10, 3600).wait(&source, "S_test").await.unwrap_err();

        match err {
            VoiceCloneError::TrainingFailed(report) => {
                assert_eq!(report.status, Failed);
                assert_eq!(report.speaker_id, "S_test");
            }
            other => panic!("Expected TrainingFailed, got {other:?}"),
        }
        assert_eq!(source.queries(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_checked_after_sleep() {
        let source = ScriptedSource::new(&[TrainingStatus::Training]);
        let started = Instant::now();

        let err = poller(10, 15).wait(&source, "S_test").await.unwrap_err();

        match err {
            VoiceCloneError::Timeout {
                speaker_id,
                elapsed,
                last_status,
            } => {
                assert_eq!(speaker_id, "S_test");
                assert_eq!(last_status, TrainingStatus::Training);
                assert!(elapsed > Duration::from_secs(15));
            }
            other => panic!("Expected Timeout, got {other:?}"),
        }
        assert_eq!(source.queries(), 2);
        assert!(started.elapsed() >= Duration::from_secs(20));
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_error_is_returned_without_retry() {
        let err = poller(10, 3600).wait(&FailingSource, "S_test").await.unwrap_err();
        assert_eq!(err.http_status(), Some(503));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_sleep() {
        let source = ScriptedSource::new(&[TrainingStatus::Training]);
        let token = CancellationToken::new();
        let poller = poller(10, 3600).with_cancellation(token.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(25)).await;
            token.cancel();
        });

        let err = poller.wait(&source, "S_test").await.unwrap_err();
        canceller.await.unwrap();

        assert!(matches!(err, VoiceCloneError::Cancelled { ref speaker_id } if speaker_id == "S_test"));
        // Queries at 0s, 10s and 20s; cancelled during the third sleep
        assert_eq!(source.queries(), 3);
    }

    #[tokio::test]
    async fn test_non_terminal_status_is_stable_across_queries() {
        let source = ScriptedSource::new(&[TrainingStatus::Training]);
        let first = source.fetch_status("S_test").await.unwrap();
        let second = source.fetch_status("S_test").await.unwrap();
        let third = source.fetch_status("S_test").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);
        assert!(!third.status.is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_polls_back_to_back() {
        use TrainingStatus::*;
        let source = ScriptedSource::new(&[Training, Training, Training, Succeeded]);
        let started = Instant::now();

        let report = poller(0, 1).wait(&source, "S_test").await.unwrap();

        assert_eq!(report.status, Succeeded);
        assert_eq!(source.queries(), 4);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
