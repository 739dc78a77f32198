//! Generation parameter types for the Veo API.

use super::client::VeoError;

/// Minimum video duration in seconds.
pub const MIN_DURATION_SECS: u32 = 2;

/// Maximum video duration in seconds.
pub const MAX_DURATION_SECS: u32 = 180;

/// Default video duration in seconds.
pub const DEFAULT_DURATION_SECS: u32 = 7;

/// Veo model variant to generate with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoModel {
    /// Faster generation, good quality.
    #[default]
    Fast,
    /// Slower generation, best quality.
    Quality,
}

impl VideoModel {
    /// The model identifier sent on the wire.
    pub fn api_id(&self) -> &'static str {
        match self {
            VideoModel::Fast => "veo-3.1-fast-generate-preview",
            VideoModel::Quality => "veo-3.1-generate-preview",
        }
    }

    /// Parse from a short name or a full model identifier.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fast" | "veo-3.1-fast-generate-preview" => Some(VideoModel::Fast),
            "quality" | "veo-3.1-generate-preview" => Some(VideoModel::Quality),
            _ => None,
        }
    }
}

impl std::fmt::Display for VideoModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VideoModel::Fast => write!(f, "fast"),
            VideoModel::Quality => write!(f, "quality"),
        }
    }
}

/// Output aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// 16:9 landscape.
    #[default]
    Widescreen,
    /// 9:16 portrait.
    Portrait,
}

impl AspectRatio {
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Widescreen => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "16:9" => Some(AspectRatio::Widescreen),
            "9:16" => Some(AspectRatio::Portrait),
            _ => None,
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// 1280x720.
    #[default]
    P720,
    /// 1920x1080.
    P1080,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::P720 => "720p",
            Resolution::P1080 => "1080p",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "720p" => Some(Resolution::P720),
            "1080p" => Some(Resolution::P1080),
            _ => None,
        }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters for one generation request. Immutable once submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConfig {
    pub model: VideoModel,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
    /// Requested clip length in seconds (2-180).
    pub duration_secs: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            model: VideoModel::Fast,
            aspect_ratio: AspectRatio::Widescreen,
            resolution: Resolution::P720,
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }
}

impl VideoConfig {
    /// Check that the duration is within the supported range.
    ///
    /// # Errors
    ///
    /// Returns `VeoError::InvalidDuration` when `duration_secs` falls outside
    /// 2-180 seconds.
    pub fn validate(&self) -> Result<(), VeoError> {
        if !(MIN_DURATION_SECS..=MAX_DURATION_SECS).contains(&self.duration_secs) {
            return Err(VeoError::InvalidDuration {
                secs: self.duration_secs,
            });
        }
        Ok(())
    }
}
