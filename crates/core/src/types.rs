/// Video records are keyed by UUID.
pub type VideoId = uuid::Uuid;

/// Owning user of a video record.
pub type UserId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
