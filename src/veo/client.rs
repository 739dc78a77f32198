//! VeoClient - handles communication with the Gemini video-generation API.

use std::time::Duration;

use serde::Serialize;

use super::credentials::GEMINI_API_KEY_ENV;
use super::operation::Operation;
use super::types::VideoConfig;

/// Default base URL for the Gemini API.
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default timeout for HTTP requests (30 seconds).
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout (10 seconds).
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Header carrying the API key on submit and poll calls.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Error-body signature the API returns when the operation handle is not
/// recognized, which happens when the key it was created with is invalid or
/// has expired.
const ENTITY_NOT_FOUND_SIGNATURE: &str = "requested entity was not found";

/// Check if an API error body indicates an unrecognized operation handle.
fn is_entity_not_found(error_text: &str) -> bool {
    error_text.to_lowercase().contains(ENTITY_NOT_FOUND_SIGNATURE)
}

/// Validate a prompt before sending it to the API.
///
/// # Errors
///
/// Returns `VeoError::EmptyPrompt` for empty or whitespace-only prompts.
pub fn validate_prompt(prompt: &str) -> Result<(), VeoError> {
    if prompt.trim().is_empty() {
        return Err(VeoError::EmptyPrompt);
    }
    Ok(())
}

/// Request body for video generation.
#[derive(Debug, Serialize)]
struct GenerateVideosRequest {
    instances: Vec<Instance>,
    parameters: Parameters,
}

#[derive(Debug, Serialize)]
struct Instance {
    /// The text prompt to generate video from.
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Parameters {
    /// Number of videos to produce. Always 1.
    sample_count: u32,
    aspect_ratio: String,
    resolution: String,
    duration_seconds: u32,
}

/// Client for communicating with the Gemini video-generation API.
pub struct VeoClient {
    api_key: String,
    base_url: String,
    http_client: reqwest::Client,
}

impl VeoClient {
    /// Create a new VeoClient by reading the API key from the environment.
    ///
    /// # Errors
    ///
    /// Returns `VeoError::MissingApiKey` if the `GEMINI_API_KEY` environment
    /// variable is not set or empty.
    pub fn new() -> Result<Self, VeoError> {
        let api_key = std::env::var(GEMINI_API_KEY_ENV).map_err(|_| VeoError::MissingApiKey)?;
        Self::with_api_key(api_key)
    }

    /// Create a new VeoClient with an explicit API key.
    pub fn with_api_key(api_key: String) -> Result<Self, VeoError> {
        Self::with_base_url(api_key, GEMINI_API_BASE_URL.to_string())
    }

    /// Create a new VeoClient with a custom base URL.
    ///
    /// Useful for testing against a mock server.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, VeoError> {
        if api_key.is_empty() {
            return Err(VeoError::MissingApiKey);
        }

        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            api_key,
            base_url,
            http_client,
        })
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a video generation request.
    ///
    /// Sends the prompt and parameters to the model's `predictLongRunning`
    /// endpoint and returns the operation handle to poll.
    ///
    /// # Errors
    ///
    /// Returns `VeoError::EmptyPrompt` or `VeoError::InvalidDuration` for
    /// invalid input, `VeoError::ApiError` if the API rejects the request,
    /// or `VeoError::HttpError` if the request fails in transit.
    pub async fn submit(&self, prompt: &str, config: &VideoConfig) -> Result<Operation, VeoError> {
        validate_prompt(prompt)?;
        config.validate()?;

        let url = format!(
            "{}/v1beta/models/{}:predictLongRunning",
            self.base_url,
            config.model.api_id()
        );

        let request_body = GenerateVideosRequest {
            instances: vec![Instance {
                prompt: prompt.to_string(),
            }],
            parameters: Parameters {
                sample_count: 1,
                aspect_ratio: config.aspect_ratio.as_str().to_string(),
                resolution: config.resolution.as_str().to_string(),
                duration_seconds: config.duration_secs,
            },
        };

        log::info!(
            "Submitting generation request to {} ({}s, {}, {})",
            config.model.api_id(),
            config.duration_secs,
            config.aspect_ratio,
            config.resolution
        );

        let response = self
            .http_client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(VeoError::ApiError(format!(
                "Generation request failed with status {}: {}",
                status, error_text
            )));
        }

        let operation: Operation = response.json().await?;
        log::info!("Generation accepted, operation: {}", operation.name);
        Ok(operation)
    }

    /// Re-fetch the status of a previously submitted operation.
    ///
    /// # Errors
    ///
    /// Returns `VeoError::InvalidApiKey` when the API no longer recognizes
    /// the operation handle (the key it was created with is invalid or has
    /// expired), and `VeoError::StatusCheckFailed` for every other poll
    /// failure, transport-level included.
    pub async fn fetch_operation(&self, operation: &Operation) -> Result<Operation, VeoError> {
        let url = format!("{}/v1beta/{}", self.base_url, operation.name);

        let response = self
            .http_client
            .get(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await
            .map_err(|e| VeoError::StatusCheckFailed {
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("Status check failed with status {}: {}", status, error_text);
            if is_entity_not_found(&error_text) {
                return Err(VeoError::InvalidApiKey);
            }
            return Err(VeoError::StatusCheckFailed {
                message: format!("status {}: {}", status, error_text),
            });
        }

        let updated: Operation =
            response
                .json()
                .await
                .map_err(|e| VeoError::StatusCheckFailed {
                    message: e.to_string(),
                })?;
        log::debug!("Operation {} done={}", updated.name, updated.done);
        Ok(updated)
    }

    /// Download the produced video bytes from a result URI.
    ///
    /// The API key is appended to the URI as a query parameter, which is how
    /// the file endpoint authorizes the fetch.
    ///
    /// # Errors
    ///
    /// Returns `VeoError::DownloadFailed` carrying the response status text
    /// when the server answers with a non-success status, or
    /// `VeoError::HttpError` if the request fails in transit.
    pub async fn download(&self, uri: &str) -> Result<Vec<u8>, VeoError> {
        let url = format!("{}&key={}", uri, self.api_key);

        log::info!("Downloading video from result URI");
        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(VeoError::DownloadFailed {
                status: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        // Stream the body instead of buffering it through reqwest's default
        // single-allocation path; generated clips can run to tens of MB.
        use futures_util::StreamExt;
        let mut stream = response.bytes_stream();
        let mut bytes = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            bytes.extend_from_slice(&chunk);
        }

        log::info!("Downloaded {} bytes", bytes.len());
        Ok(bytes)
    }
}

/// Errors that can occur during the video generation workflow.
#[derive(Debug, thiserror::Error)]
pub enum VeoError {
    #[error("API key not found. Please select an API key.")]
    MissingApiKey,

    #[error("API key is invalid or expired. Please select a new key.")]
    InvalidApiKey,

    #[error("Failed to get video generation status: {message}")]
    StatusCheckFailed {
        /// What went wrong with the poll call.
        message: String,
    },

    #[error("Video generation succeeded, but no download link was found.")]
    NoResult,

    #[error("Failed to download the video. Status: {status}")]
    DownloadFailed {
        /// Status text of the failed byte-fetch response.
        status: String,
    },

    #[error("Empty prompt")]
    EmptyPrompt,

    #[error("Invalid duration: {secs}s (must be between 2 and 180 seconds)")]
    InvalidDuration { secs: u32 },

    #[error("API error: {0}")]
    ApiError(String),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
