use std::time::Duration;

/// Polling scheduler settings.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Pause between the end of one tick and the start of the next.
    pub interval: Duration,
}

impl SchedulerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                          | Default |
    /// |----------------------------------|---------|
    /// | `VIDEO_PROCESSING_INTERVAL_SECS` | `30`    |
    pub fn from_env() -> Self {
        let interval_secs: u64 = std::env::var("VIDEO_PROCESSING_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("VIDEO_PROCESSING_INTERVAL_SECS must be a valid u64");

        Self {
            interval: Duration::from_secs(interval_secs.max(1)),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}
