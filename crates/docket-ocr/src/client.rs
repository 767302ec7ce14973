//! Transcription service client.
//!
//! The external service processes uploads asynchronously: a file is
//! uploaded, polled until it reports ready, transcribed, and finally
//! deleted. Deletion runs on every exit path, success or failure, so no
//! remote artifact is leaked.

use std::path::Path;
use std::time::Instant;

use docket_core::{OcrTranscriber, RetryPolicy, retry_with_backoff};
use reqwest::multipart::{Form, Part};
use reqwest::{Client as HttpClient, ClientBuilder};
use serde::Deserialize;

use crate::TRACING_TARGET;
use crate::config::OcrConfig;
use crate::error::{Error, Result};

/// Transcription instruction: verbatim text, structure preserved, no
/// summarization.
const TRANSCRIBE_INSTRUCTIONS: &str = "\
Reproduce every piece of text in this document verbatim. Preserve the
structure: render headings, lists and tables as lightweight markup and
keep the original line breaks. Do not summarize, interpret or omit
anything.";

#[derive(Debug, Deserialize)]
struct FileResource {
    id: String,
    status: FileStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
enum FileStatus {
    Processing,
    Ready,
    Failed,
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for the external transcription service.
#[derive(Debug, Clone)]
pub struct OcrClient {
    http_client: HttpClient,
    config: OcrConfig,
}

impl OcrClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: OcrConfig) -> Result<Self> {
        tracing::debug!(
            target: TRACING_TARGET,
            base_url = %config.base_url,
            "Creating OCR client"
        );

        let http_client = ClientBuilder::new()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Transcribes the file at `path` to plain text.
    ///
    /// Retries the whole upload-poll-transcribe sequence a bounded number
    /// of times; the last failure surfaces to the caller.
    pub async fn transcribe_file(&self, path: &Path, content_type: &str) -> Result<String> {
        retry_with_backoff(
            RetryPolicy::extraction(),
            "ocr_transcribe",
            |error| !matches!(error, Error::Io(_)),
            || self.attempt_transcription(path, content_type),
        )
        .await
    }

    async fn attempt_transcription(&self, path: &Path, content_type: &str) -> Result<String> {
        let file = self.upload_file(path, content_type).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            file_id = %file.id,
            "Uploaded file for transcription"
        );

        let result = self.poll_and_transcribe(&file.id).await;

        // Cleanup is unconditional: the remote artifact is transient and
        // must not outlive the request, whatever its outcome.
        if let Err(error) = self.delete_file(&file.id).await {
            tracing::warn!(
                target: TRACING_TARGET,
                file_id = %file.id,
                error = %error,
                "Failed to delete uploaded artifact"
            );
        }

        result
    }

    async fn poll_and_transcribe(&self, file_id: &str) -> Result<String> {
        self.poll_until_ready(file_id).await?;
        self.request_transcription(file_id).await
    }

    async fn upload_file(&self, path: &Path, content_type: &str) -> Result<FileResource> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("upload")
            .to_string();

        let part = Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(content_type)
            .map_err(Error::Http)?;
        let form = Form::new().part("file", part);

        let url = self.config.endpoint("v1/files")?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(Error::Http)?;

        read_json(response).await
    }

    async fn poll_until_ready(&self, file_id: &str) -> Result<()> {
        let started = Instant::now();

        loop {
            let file = self.get_file(file_id).await?;

            match file.status {
                FileStatus::Ready => return Ok(()),
                FileStatus::Failed => return Err(Error::ProcessingFailed(file_id.to_string())),
                FileStatus::Processing => {}
            }

            if started.elapsed() >= self.config.poll_timeout {
                return Err(Error::ProcessingTimeout(file_id.to_string()));
            }

            tokio::time::sleep(self.config.poll_interval).await;
        }
    }

    async fn get_file(&self, file_id: &str) -> Result<FileResource> {
        let url = self.config.endpoint(&format!("v1/files/{file_id}"))?;
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(Error::Http)?;

        read_json(response).await
    }

    async fn request_transcription(&self, file_id: &str) -> Result<String> {
        let url = self.config.endpoint("v1/transcriptions")?;
        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&serde_json::json!({
                "file_id": file_id,
                "instructions": TRANSCRIBE_INSTRUCTIONS,
            }))
            .send()
            .await
            .map_err(Error::Http)?;

        let transcription: TranscriptionResponse = read_json(response).await?;
        Ok(transcription.text)
    }

    async fn delete_file(&self, file_id: &str) -> Result<()> {
        let url = self.config.endpoint(&format!("v1/files/{file_id}"))?;
        let response = self
            .http_client
            .delete(url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(Error::Http)?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            Err(Error::api_error(status, message))
        }
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    if response.status().is_success() {
        response.json().await.map_err(Error::Http)
    } else {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        Err(Error::api_error(status, message))
    }
}

#[async_trait::async_trait]
impl OcrTranscriber for OcrClient {
    async fn transcribe(&self, path: &Path, content_type: &str) -> docket_core::Result<String> {
        self.transcribe_file(path, content_type)
            .await
            .map_err(Into::into)
    }
}
