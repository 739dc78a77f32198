//! Request orchestrator: submit, poll until done, download.

use std::time::Duration;

use super::asset::VideoAsset;
use super::client::{VeoClient, VeoError};
use super::credentials::{CredentialSource, CredentialStatus};
use super::types::VideoConfig;

/// How long to wait between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Progress message emitted right before the request is submitted.
pub const MSG_SUBMITTING: &str = "Initiating video generation request...";

/// Progress message emitted once the operation handle has been obtained.
pub const MSG_REQUEST_ACCEPTED: &str =
    "Request received. The model is now generating your video...";

/// Progress message emitted when the operation completes.
pub const MSG_DOWNLOAD_READY: &str = "Video generated! Preparing for download...";

/// Messages cycled through while the operation is still running, one per
/// poll iteration, starting at index 0 and wrapping around.
pub const REASSURING_MESSAGES: &[&str] = &[
    "Warming up the quantum video synthesizer...",
    "Teaching pixels to dance in harmony...",
    "Composing a symphony of light and motion...",
    "This can take a few minutes, good things come to those who wait...",
    "Finalizing the hyperrealistic details...",
    "Almost there! Polishing the final frames...",
];

/// Tunable knobs for the poll loop.
///
/// Both the interval and the message list are injectable so tests can run
/// the loop without real ten-second waits.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Fixed delay between status polls.
    pub poll_interval: Duration,
    /// Messages cycled through while waiting.
    pub progress_messages: Vec<String>,
    /// Override the API base URL (mock servers).
    pub base_url: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            progress_messages: REASSURING_MESSAGES
                .iter()
                .map(|m| m.to_string())
                .collect(),
            base_url: None,
        }
    }
}

/// Drives one generation request from prompt to playable bytes.
///
/// At most one request should be in flight per generator; callers serialize
/// invocations. There is no cancellation: once started, the poll loop runs
/// until the operation settles or a poll fails.
pub struct Generator {
    credentials: Box<dyn CredentialSource>,
    options: GenerateOptions,
}

impl Generator {
    pub fn new(credentials: impl CredentialSource + 'static) -> Self {
        Self::with_options(credentials, GenerateOptions::default())
    }

    pub fn with_options(
        credentials: impl CredentialSource + 'static,
        options: GenerateOptions,
    ) -> Self {
        Self {
            credentials: Box::new(credentials),
            options,
        }
    }

    pub fn options(&self) -> &GenerateOptions {
        &self.options
    }

    /// Generate a video from a text prompt.
    ///
    /// Submits the request, polls the operation at a fixed interval while
    /// reporting progress through `on_progress`, and downloads the produced
    /// video. `on_progress` is the only side channel; everything else arrives
    /// through the returned `Result`.
    ///
    /// # Errors
    ///
    /// * `VeoError::MissingApiKey` - no credential available; nothing was sent.
    /// * `VeoError::InvalidApiKey` - a poll was rejected because the operation
    ///   handle is no longer recognized.
    /// * `VeoError::StatusCheckFailed` - any other poll failure. Failed polls
    ///   are not retried.
    /// * `VeoError::NoResult` - the operation completed without a usable
    ///   video URI; no byte fetch is attempted.
    /// * `VeoError::DownloadFailed` - the byte fetch answered non-success.
    pub async fn generate(
        &self,
        prompt: &str,
        config: &VideoConfig,
        mut on_progress: impl FnMut(&str),
    ) -> Result<VideoAsset, VeoError> {
        if self.credentials.status() != CredentialStatus::Present {
            return Err(VeoError::MissingApiKey);
        }
        let api_key = self.credentials.api_key().ok_or(VeoError::MissingApiKey)?;

        // Built fresh per call so the latest selected key is used.
        let client = match &self.options.base_url {
            Some(base_url) => VeoClient::with_base_url(api_key, base_url.clone())?,
            None => VeoClient::with_api_key(api_key)?,
        };

        on_progress(MSG_SUBMITTING);
        let mut operation = client.submit(prompt, config).await?;
        on_progress(MSG_REQUEST_ACCEPTED);

        let messages = &self.options.progress_messages;
        let mut message_index = 0usize;
        while !operation.done {
            tokio::time::sleep(self.options.poll_interval).await;
            if !messages.is_empty() {
                on_progress(messages[message_index % messages.len()].as_str());
            }
            message_index += 1;
            operation = client.fetch_operation(&operation).await?;
        }

        on_progress(MSG_DOWNLOAD_READY);
        let uri = operation.video_uri().ok_or(VeoError::NoResult)?;
        let bytes = client.download(uri).await?;
        Ok(VideoAsset::new(bytes))
    }
}
