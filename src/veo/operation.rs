//! Long-running operation handle returned by the Veo API.
//!
//! The operation payload is treated as opaque except for the pieces the
//! workflow needs: the `name` used to re-fetch status, the `done` flag, and
//! the nested URI of the produced video. Everything else the server sends is
//! ignored.

use serde::Deserialize;

/// Handle for an in-flight video generation job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Resource name used to poll for status, e.g.
    /// `models/veo-3.1-fast-generate-preview/operations/abc123`.
    pub name: String,
    /// Completion flag. Absent in the payload until the job settles.
    #[serde(default)]
    pub done: bool,
    /// Result payload, present once `done` is true and the job succeeded.
    #[serde(default)]
    pub response: Option<OperationResponse>,
}

/// Result payload of a completed operation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    #[serde(default)]
    pub generated_videos: Vec<GeneratedVideo>,
}

/// One generated sample within the result payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedVideo {
    #[serde(default)]
    pub video: Option<VideoHandle>,
}

/// Reference to the produced video file.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoHandle {
    #[serde(default)]
    pub uri: Option<String>,
}

impl Operation {
    /// Extract the download URI of the first generated video.
    ///
    /// Returns `None` when any link of the nested chain is missing or the
    /// URI is empty.
    pub fn video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generated_videos
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_pending_operation() {
        let json = r#"{"name": "models/veo-3.1-fast-generate-preview/operations/op-1"}"#;
        let operation: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(
            operation.name,
            "models/veo-3.1-fast-generate-preview/operations/op-1"
        );
        assert!(!operation.done);
        assert!(operation.response.is_none());
    }

    #[test]
    fn test_deserialize_completed_operation_with_uri() {
        let json = r#"{
            "name": "models/veo-3.1-generate-preview/operations/op-2",
            "done": true,
            "response": {
                "generatedVideos": [
                    {"video": {"uri": "https://example.com/video.mp4?alt=media"}}
                ]
            }
        }"#;
        let operation: Operation = serde_json::from_str(json).unwrap();
        assert!(operation.done);
        assert_eq!(
            operation.video_uri(),
            Some("https://example.com/video.mp4?alt=media")
        );
    }

    #[test]
    fn test_video_uri_none_without_response() {
        let json = r#"{"name": "models/m/operations/op-3", "done": true}"#;
        let operation: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(operation.video_uri(), None);
    }

    #[test]
    fn test_video_uri_none_with_empty_sample_list() {
        let json = r#"{
            "name": "models/m/operations/op-4",
            "done": true,
            "response": {"generatedVideos": []}
        }"#;
        let operation: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(operation.video_uri(), None);
    }

    #[test]
    fn test_video_uri_none_when_video_missing() {
        let json = r#"{
            "name": "models/m/operations/op-5",
            "done": true,
            "response": {"generatedVideos": [{}]}
        }"#;
        let operation: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(operation.video_uri(), None);
    }

    #[test]
    fn test_video_uri_none_when_uri_empty() {
        let json = r#"{
            "name": "models/m/operations/op-6",
            "done": true,
            "response": {"generatedVideos": [{"video": {"uri": ""}}]}
        }"#;
        let operation: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(operation.video_uri(), None);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let json = r#"{
            "name": "models/m/operations/op-7",
            "done": true,
            "metadata": {"progress": 80},
            "response": {
                "@type": "type.googleapis.com/GenerateVideoResponse",
                "generatedVideos": [
                    {"video": {"uri": "https://example.com/v.mp4?alt=media", "mimeType": "video/mp4"}}
                ]
            }
        }"#;
        let operation: Operation = serde_json::from_str(json).unwrap();
        assert_eq!(
            operation.video_uri(),
            Some("https://example.com/v.mp4?alt=media")
        );
    }
}
