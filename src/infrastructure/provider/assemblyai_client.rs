use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{
    JobSnapshot, ProviderError, SpeechProvider, TranscriptionOptions,
};
use crate::domain::{JobId, UploadHandle};

/// AssemblyAI-protocol speech provider: raw-byte upload, job request, job
/// poll. All three calls authenticate with the static API key header.
pub struct AssemblyAiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl AssemblyAiClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.unwrap_or_else(|| "https://api.assemblyai.com".to_string()),
            api_key,
        }
    }

    /// No call proceeds without a key; this short-circuits before any
    /// network I/O.
    fn ensure_configured(&self) -> Result<(), ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "speech provider API key is missing".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    upload_url: Option<String>,
}

#[derive(Serialize)]
struct JobRequest<'a> {
    audio_url: &'a str,
    punctuate: bool,
    format_text: bool,
    language_detection: bool,
}

#[derive(Deserialize)]
struct JobResponse {
    id: Option<String>,
}

#[derive(Deserialize)]
struct JobStatusResponse {
    status: String,
    text: Option<String>,
    error: Option<String>,
}

#[async_trait]
impl SpeechProvider for AssemblyAiClient {
    async fn submit_audio(&self, audio: &[u8]) -> Result<UploadHandle, ProviderError> {
        self.ensure_configured()?;

        let url = format!("{}/v2/upload", self.base_url.trim_end_matches('/'));
        tracing::debug!(bytes = audio.len(), "Uploading audio to provider");

        let response = self
            .client
            .post(&url)
            .header("authorization", &self.api_key)
            .body(audio.to_vec())
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("upload request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::Rejected(format!(
                "upload status {}: {}",
                status, body
            )));
        }

        let result: UploadResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Rejected(format!("parse upload response: {}", e)))?;

        match result.upload_url {
            Some(handle) => Ok(UploadHandle::new(handle)),
            None => Err(ProviderError::Rejected(
                "no upload handle returned".to_string(),
            )),
        }
    }

    async fn start_job(
        &self,
        handle: &UploadHandle,
        options: &TranscriptionOptions,
    ) -> Result<JobId, ProviderError> {
        self.ensure_configured()?;

        let url = format!("{}/v2/transcript", self.base_url.trim_end_matches('/'));
        let request_body = JobRequest {
            audio_url: handle.as_str(),
            punctuate: options.punctuate,
            format_text: options.format_text,
            language_detection: options.language_detection,
        };

        let response = self
            .client
            .post(&url)
            .header("authorization", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("job request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::Rejected(format!(
                "job status {}: {}",
                status, body
            )));
        }

        let result: JobResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Rejected(format!("parse job response: {}", e)))?;

        match result.id {
            Some(id) => {
                tracing::info!(job_id = %id, "Provider accepted transcription job");
                Ok(JobId::new(id))
            }
            None => Err(ProviderError::Rejected(
                "no job identifier returned".to_string(),
            )),
        }
    }

    async fn poll_job(&self, job: &JobId) -> Result<JobSnapshot, ProviderError> {
        self.ensure_configured()?;

        let url = format!(
            "{}/v2/transcript/{}",
            self.base_url.trim_end_matches('/'),
            job.as_str()
        );

        let response = self
            .client
            .get(&url)
            .header("authorization", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("poll request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(ProviderError::Rejected(format!(
                "poll status {}: {}",
                status, body
            )));
        }

        let result: JobStatusResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Rejected(format!("parse poll response: {}", e)))?;

        let status = result
            .status
            .parse()
            .map_err(ProviderError::Rejected)?;

        Ok(JobSnapshot {
            status,
            text: result.text,
            error: result.error,
        })
    }
}
