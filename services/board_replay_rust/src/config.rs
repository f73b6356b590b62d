use std::env;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_FEED_DIR: &str = "./feeds";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Directory holding captured feed responses, either flat or one subdirectory per frame
    pub feed_dir: PathBuf,
    pub poll_interval: Duration,
}

impl ReplayConfig {
    pub fn from_env() -> Self {
        let feed_dir = env::var("FEED_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_FEED_DIR.to_string());

        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        Self {
            feed_dir: PathBuf::from(feed_dir),
            poll_interval: Duration::from_secs(poll_interval_secs),
        }
    }
}
