//! Captured feed frames on disk.
//!
//! A frame is a directory holding any of `definitions.json`, `odds.json`,
//! `bookmaker.json` and `legacy.json`. `FEED_DIR` is either a single frame
//! (re-read every tick) or a parent of frame directories replayed in name
//! order and looped.

use anyhow::{Context, Result};
use oddsline_core::FeedSnapshot;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const DEFINITIONS_FILE: &str = "definitions.json";
pub const ODDS_FILE: &str = "odds.json";
pub const BOOKMAKER_FILE: &str = "bookmaker.json";
pub const LEGACY_FILE: &str = "legacy.json";

pub struct FrameSource {
    frames: Vec<PathBuf>,
    cursor: usize,
}

impl FrameSource {
    pub fn discover(feed_dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(feed_dir)
            .with_context(|| format!("Failed to read feed directory {}", feed_dir.display()))?;

        let mut frames = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_dir() {
                frames.push(path);
            }
        }
        frames.sort();

        if frames.is_empty() {
            info!("Replaying single frame from {}", feed_dir.display());
            frames.push(feed_dir.to_path_buf());
        } else {
            info!("Replaying {} frames from {}", frames.len(), feed_dir.display());
        }

        Ok(Self { frames, cursor: 0 })
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Next frame directory, wrapping to the first after the last
    pub fn next_frame(&mut self) -> &Path {
        let index = self.cursor % self.frames.len();
        self.cursor = self.cursor.wrapping_add(1);
        &self.frames[index]
    }
}

async fn read_feed(dir: &Path, file: &str) -> Result<Option<Value>> {
    let path = dir.join(file);
    let present = tokio::fs::try_exists(&path)
        .await
        .with_context(|| format!("Failed to check {}", path.display()))?;
    if !present {
        debug!("{} not present in frame", path.display());
        return Ok(None);
    }
    let body = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value = serde_json::from_str(&body)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;
    Ok(Some(value))
}

/// Load every feed file present in `dir` into a snapshot
pub async fn load_snapshot(dir: &Path) -> Result<FeedSnapshot> {
    Ok(FeedSnapshot {
        definitions: read_feed(dir, DEFINITIONS_FILE).await?,
        odds: read_feed(dir, ODDS_FILE).await?,
        bookmaker_fancy: read_feed(dir, BOOKMAKER_FILE).await?,
        legacy: read_feed(dir, LEGACY_FILE).await?,
    })
}
