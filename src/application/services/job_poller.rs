use std::time::Duration;

use crate::application::ports::{ProviderError, SpeechProvider};
use crate::domain::{JobId, JobStatus};

/// Transcript text stored when the provider completes a job with no
/// recognized speech.
pub const NO_SPEECH_FALLBACK: &str = "No speech detected";

/// Terminal outcome of driving one provider job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { transcript: String },
    Failed { detail: String },
    TimedOut,
}

/// Bounded polling state machine: a submitted job stays pending until the
/// provider reports a terminal status or the tick budget runs out.
///
/// A poll transport failure aborts the machine immediately; it is never
/// retried, and no partial outcome is reported.
pub struct JobPoller {
    interval: Duration,
    max_ticks: u32,
}

impl JobPoller {
    pub fn new(interval: Duration, max_ticks: u32) -> Self {
        Self {
            interval,
            max_ticks,
        }
    }

    /// Total wall-clock wait a job may consume before timing out.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_ticks
    }

    pub async fn drive(
        &self,
        provider: &dyn SpeechProvider,
        job: &JobId,
    ) -> Result<JobOutcome, ProviderError> {
        for tick in 0..self.max_ticks {
            let snapshot = provider.poll_job(job).await?;

            match snapshot.status {
                JobStatus::Completed => {
                    let transcript = snapshot
                        .text
                        .filter(|t| !t.trim().is_empty())
                        .unwrap_or_else(|| NO_SPEECH_FALLBACK.to_string());
                    tracing::info!(job_id = %job, ticks = tick + 1, "Transcription job completed");
                    return Ok(JobOutcome::Completed { transcript });
                }
                JobStatus::Error => {
                    let detail = snapshot
                        .error
                        .filter(|e| !e.trim().is_empty())
                        .unwrap_or_else(|| "provider reported an unspecified error".to_string());
                    tracing::warn!(job_id = %job, ticks = tick + 1, detail = %detail, "Transcription job failed");
                    return Ok(JobOutcome::Failed { detail });
                }
                JobStatus::Queued | JobStatus::Processing => {
                    tokio::time::sleep(self.interval).await;
                }
            }
        }

        tracing::warn!(
            job_id = %job,
            ticks = self.max_ticks,
            budget_secs = self.budget().as_secs(),
            "Transcription job timed out"
        );
        Ok(JobOutcome::TimedOut)
    }
}
