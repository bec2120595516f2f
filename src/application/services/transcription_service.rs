use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::{
    ProviderError, SpeechProvider, StagingStore, StagingStoreError, TranscriptRepository,
    TranscriptionOptions,
};
use crate::application::services::{
    IntakeError, IntakeValidator, JobOutcome, JobPoller, Upload,
};
use crate::domain::{OwnerId, StagedFile, StoragePath, TranscriptId, TranscriptRecord};

/// Sequences one upload through intake, provider submission, the polling
/// state machine, persistence, and staged-file cleanup.
pub struct TranscriptionService<P>
where
    P: SpeechProvider,
{
    intake: IntakeValidator,
    provider: Arc<P>,
    poller: JobPoller,
    staging: Arc<dyn StagingStore>,
    repository: Arc<dyn TranscriptRepository>,
}

impl<P> TranscriptionService<P>
where
    P: SpeechProvider,
{
    pub fn new(
        intake: IntakeValidator,
        provider: Arc<P>,
        poller: JobPoller,
        staging: Arc<dyn StagingStore>,
        repository: Arc<dyn TranscriptRepository>,
    ) -> Self {
        Self {
            intake,
            provider,
            poller,
            staging,
            repository,
        }
    }

    /// Runs the full pipeline for one upload.
    ///
    /// Terminal job failures (provider error, timeout) are persisted as
    /// `failed` records and returned like any other outcome; only
    /// submission-time failures propagate as errors, and those never leave a
    /// record behind. The staged file is deleted exactly once on every exit
    /// path past intake.
    pub async fn process(
        &self,
        upload: Option<Upload>,
        owner: OwnerId,
    ) -> Result<TranscriptRecord, PipelineError> {
        let staged = self.intake.stage(upload).await?;
        let started = Instant::now();

        let outcome = self.run_job(&staged).await;
        self.discard_staged(&staged.path).await;
        let outcome = outcome?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        let record = match outcome {
            JobOutcome::Completed { transcript } => {
                TranscriptRecord::completed(owner, &staged, transcript, elapsed_ms)
            }
            JobOutcome::Failed { detail } => TranscriptRecord::failed(
                owner,
                &staged,
                format!("Transcription failed: {}", detail),
                elapsed_ms,
            ),
            JobOutcome::TimedOut => TranscriptRecord::failed(
                owner,
                &staged,
                format!(
                    "Transcription timed out after {} seconds",
                    self.poller.budget().as_secs()
                ),
                elapsed_ms,
            ),
        };

        if let Err(e) = self.repository.create(&record).await {
            tracing::error!(
                error = %e,
                filename = %record.filename,
                status = %record.status,
                "Failed to persist transcript record; job outcome is lost"
            );
            return Err(PipelineError::Store(e));
        }

        tracing::info!(
            record_id = %record.id.as_uuid(),
            owner_id = %owner.as_uuid(),
            status = %record.status,
            elapsed_ms,
            "Transcript record persisted"
        );

        Ok(record)
    }

    /// Records owned by the caller, newest first.
    pub async fn history(&self, owner: OwnerId) -> Result<Vec<TranscriptRecord>, PipelineError> {
        self.repository
            .list_by_owner(owner)
            .await
            .map_err(PipelineError::Store)
    }

    /// Owner-scoped delete. A record belonging to another owner, or no
    /// record at all, reports `false`; deleting twice is therefore harmless.
    /// Any staged file the record still references is removed best-effort.
    pub async fn delete_for_owner(
        &self,
        id: TranscriptId,
        owner: OwnerId,
    ) -> Result<bool, PipelineError> {
        let record = self
            .repository
            .find_by_id_for_owner(id, owner)
            .await
            .map_err(PipelineError::Store)?;

        let Some(record) = record else {
            return Ok(false);
        };

        if let Some(path) = &record.file_path {
            self.discard_staged(&StoragePath::from_raw(path.clone()))
                .await;
        }

        let found = self
            .repository
            .delete_by_id_for_owner(id, owner)
            .await
            .map_err(PipelineError::Store)?;

        if found {
            tracing::info!(
                record_id = %id.as_uuid(),
                owner_id = %owner.as_uuid(),
                "Transcript record deleted"
            );
        }

        Ok(found)
    }

    async fn run_job(&self, staged: &StagedFile) -> Result<JobOutcome, PipelineError> {
        let audio = self
            .staging
            .fetch(&staged.path)
            .await
            .map_err(PipelineError::Staging)?;

        let handle = self.provider.submit_audio(&audio).await?;
        let job = self
            .provider
            .start_job(&handle, &TranscriptionOptions::default())
            .await?;

        tracing::debug!(job_id = %job, filename = %staged.original_name, "Provider job started");

        let outcome = self.poller.drive(self.provider.as_ref(), &job).await?;
        Ok(outcome)
    }

    /// Best-effort removal of a staged object. An already-missing object is
    /// expected after normal pipeline cleanup; real failures are logged and
    /// swallowed.
    async fn discard_staged(&self, path: &StoragePath) {
        match self.staging.delete(path).await {
            Ok(()) => tracing::debug!(path = %path, "Staged file deleted"),
            Err(StagingStoreError::NotFound(_)) => {}
            Err(e) => tracing::warn!(error = %e, path = %path, "Failed to delete staged file"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error("provider: {0}")]
    Provider(#[from] ProviderError),
    #[error("staging: {0}")]
    Staging(StagingStoreError),
    #[error("store: {0}")]
    Store(crate::application::ports::RepositoryError),
}
