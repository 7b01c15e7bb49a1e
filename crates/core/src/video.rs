//! Video vocabulary: resolution, aspect ratio, lifecycle status, and the
//! validation rules applied to new generation requests.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Request limits
-------------------------------------------------------------------------- */

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;
pub const MIN_PROMPT_LEN: usize = 10;
pub const MAX_PROMPT_LEN: usize = 2000;
pub const MAX_NEGATIVE_PROMPT_LEN: usize = 1000;
pub const MAX_DURATION_SECS: i32 = 30;

/// Duration used when a request does not specify one.
pub const DEFAULT_DURATION_SECS: i32 = 5;

/// Duration cap applied by the quick-create endpoint.
pub const QUICK_MAX_DURATION_SECS: i32 = 3;

/// Input type recorded on every video created from a text prompt.
pub const INPUT_TYPE_TEXT: &str = "text";

/* --------------------------------------------------------------------------
Resolution
-------------------------------------------------------------------------- */

/// Target output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    #[default]
    Sd480p,
    Hd720p,
    FullHd1080p,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Sd480p => "sd_480p",
            Resolution::Hd720p => "hd_720p",
            Resolution::FullHd1080p => "full_hd_1080p",
        }
    }

    /// Short edge in pixels.
    pub fn base_size(self) -> u32 {
        match self {
            Resolution::Sd480p => 480,
            Resolution::Hd720p => 720,
            Resolution::FullHd1080p => 1080,
        }
    }
}

impl FromStr for Resolution {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sd_480p" => Ok(Resolution::Sd480p),
            "hd_720p" => Ok(Resolution::Hd720p),
            "full_hd_1080p" => Ok(Resolution::FullHd1080p),
            other => Err(CoreError::Validation(format!(
                "Invalid resolution '{other}'. Must be one of: sd_480p, hd_720p, full_hd_1080p"
            ))),
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* --------------------------------------------------------------------------
Aspect ratio
-------------------------------------------------------------------------- */

/// Output frame shape. `9:16` (mobile portrait) is the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AspectRatio {
    #[default]
    Portrait916,
    Landscape169,
    Square11,
    Portrait45,
    Portrait23,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            AspectRatio::Portrait916 => "9:16",
            AspectRatio::Landscape169 => "16:9",
            AspectRatio::Square11 => "1:1",
            AspectRatio::Portrait45 => "4:5",
            AspectRatio::Portrait23 => "2:3",
        }
    }

    /// Parse a `w:h` string, falling back to `9:16` for anything unknown.
    pub fn parse_or_default(s: &str) -> Self {
        match s.trim() {
            "16:9" => AspectRatio::Landscape169,
            "1:1" => AspectRatio::Square11,
            "4:5" => AspectRatio::Portrait45,
            "2:3" => AspectRatio::Portrait23,
            _ => AspectRatio::Portrait916,
        }
    }

    /// Pixel `(width, height)` for this ratio at the given resolution.
    ///
    /// The resolution's base size is used as the height; the width is derived
    /// from the ratio with integer division.
    pub fn dimensions(self, resolution: Resolution) -> (u32, u32) {
        let base = resolution.base_size();
        match self {
            AspectRatio::Portrait916 => (base * 9 / 16, base),
            AspectRatio::Landscape169 => (base * 16 / 9, base),
            AspectRatio::Square11 => (base, base),
            AspectRatio::Portrait45 => (base * 4 / 5, base),
            AspectRatio::Portrait23 => (base * 2 / 3, base),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for AspectRatio {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for AspectRatio {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(AspectRatio::parse_or_default(&raw))
    }
}

/* --------------------------------------------------------------------------
Status
-------------------------------------------------------------------------- */

/// Stored status ID type (SMALLINT column).
pub type StatusId = i16;

/// Lifecycle status as persisted in `videos.status_id`.
///
/// `Processing` and `Cancelled` are part of the stored vocabulary but are
/// never produced by the generation pipeline.
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VideoStatus {
    Pending = 1,
    Processing = 2,
    GeneratingImage = 3,
    GeneratingVideo = 4,
    Completed = 5,
    Failed = 6,
    Cancelled = 7,
}

/// Statuses the polling scheduler selects for processing.
pub const IN_FLIGHT_STATUSES: [VideoStatus; 3] = [
    VideoStatus::Pending,
    VideoStatus::GeneratingImage,
    VideoStatus::GeneratingVideo,
];

impl VideoStatus {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    pub fn from_id(id: StatusId) -> Option<Self> {
        match id {
            1 => Some(VideoStatus::Pending),
            2 => Some(VideoStatus::Processing),
            3 => Some(VideoStatus::GeneratingImage),
            4 => Some(VideoStatus::GeneratingVideo),
            5 => Some(VideoStatus::Completed),
            6 => Some(VideoStatus::Failed),
            7 => Some(VideoStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VideoStatus::Pending => "Pending",
            VideoStatus::Processing => "Processing",
            VideoStatus::GeneratingImage => "GeneratingImage",
            VideoStatus::GeneratingVideo => "GeneratingVideo",
            VideoStatus::Completed => "Completed",
            VideoStatus::Failed => "Failed",
            VideoStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            VideoStatus::Completed | VideoStatus::Failed | VideoStatus::Cancelled
        )
    }
}

impl From<VideoStatus> for StatusId {
    fn from(value: VideoStatus) -> Self {
        value as StatusId
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

/// Validate the user-supplied fields of a new generation request.
pub fn validate_new_video(
    title: &str,
    description: &str,
    text_prompt: &str,
    negative_prompt: Option<&str>,
    duration_secs: i32,
) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title is required".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Title must not exceed {MAX_TITLE_LEN} characters"
        )));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Description must not exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }

    let prompt_len = text_prompt.trim().chars().count();
    if prompt_len == 0 {
        return Err(CoreError::Validation("Text prompt is required".to_string()));
    }
    if prompt_len < MIN_PROMPT_LEN {
        return Err(CoreError::Validation(format!(
            "Text prompt must be at least {MIN_PROMPT_LEN} characters"
        )));
    }
    if prompt_len > MAX_PROMPT_LEN {
        return Err(CoreError::Validation(format!(
            "Text prompt must not exceed {MAX_PROMPT_LEN} characters"
        )));
    }

    if let Some(negative) = negative_prompt {
        if negative.chars().count() > MAX_NEGATIVE_PROMPT_LEN {
            return Err(CoreError::Validation(format!(
                "Negative prompt must not exceed {MAX_NEGATIVE_PROMPT_LEN} characters"
            )));
        }
    }

    if duration_secs <= 0 {
        return Err(CoreError::Validation(
            "Duration must be greater than 0".to_string(),
        ));
    }
    if duration_secs > MAX_DURATION_SECS {
        return Err(CoreError::Validation(format!(
            "Duration must not exceed {MAX_DURATION_SECS} seconds"
        )));
    }

    Ok(())
}
