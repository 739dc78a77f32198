//! Google Veo text-to-video integration.
//!
//! This module drives the full generation workflow against the Gemini API:
//! submit a prompt with generation parameters, poll the returned long-running
//! operation until it completes, and download the produced video as an
//! in-memory asset the caller can save or play back.

mod asset;
mod client;
mod credentials;
mod generate;
mod operation;
mod types;

pub use asset::{VideoAsset, VIDEO_MIME};
pub use client::{validate_prompt, VeoClient, VeoError, GEMINI_API_BASE_URL};
pub use credentials::{CredentialSource, CredentialStatus, EnvCredentials, GEMINI_API_KEY_ENV};
pub use generate::{
    GenerateOptions, Generator, DEFAULT_POLL_INTERVAL, MSG_DOWNLOAD_READY, MSG_REQUEST_ACCEPTED,
    MSG_SUBMITTING, REASSURING_MESSAGES,
};
pub use operation::{GeneratedVideo, Operation, OperationResponse, VideoHandle};
pub use types::{
    AspectRatio, Resolution, VideoConfig, VideoModel, DEFAULT_DURATION_SECS, MAX_DURATION_SECS,
    MIN_DURATION_SECS,
};
