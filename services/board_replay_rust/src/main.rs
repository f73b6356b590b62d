//! Board Replay Service - drives a live board from captured feed responses
//!
//! Each poll tick loads the next captured frame, runs one reconciliation pass
//! through a `LiveBoard`, and logs the markets and flagged cells. Stands in
//! for the polling host a UI would embed.
//!
//! Architecture:
//! ```text
//! FEED_DIR/<frame>/{definitions,odds,bookmaker,legacy}.json
//!        │ (every POLL_INTERVAL_SECS)
//!        ▼
//!   LiveBoard::refresh ──> PassReport ──> log
//!        │
//!   sweeper task (BLINK_SWEEP_MS) expires flags
//! ```

mod config;
mod replay;

use crate::config::ReplayConfig;
use crate::replay::{load_snapshot, FrameSource};
use anyhow::{Context, Result};
use dotenv::dotenv;
use oddsline_core::{BoardUpdate, LiveBoard, PipelineConfig};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Board Replay Service...");

    let config = ReplayConfig::from_env();
    let pipeline_config = PipelineConfig::from_env();
    pipeline_config
        .validate()
        .context("Invalid pipeline configuration")?;

    info!(
        "Config: feed_dir={}, poll_interval={}s, odds_columns={}, blink_window={}ms",
        config.feed_dir.display(),
        config.poll_interval.as_secs(),
        pipeline_config.odds_columns,
        pipeline_config.blink_window.as_millis()
    );

    let mut frames = FrameSource::discover(&config.feed_dir)?;
    debug!("{} frame(s) queued for replay", frames.len());
    let board = LiveBoard::new(&pipeline_config);
    board
        .start_sweeper()
        .context("Failed to start blink sweeper")?;

    let mut interval = tokio::time::interval(config.poll_interval);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let frame = frames.next_frame().to_path_buf();
                match load_snapshot(&frame).await {
                    Ok(snapshot) => log_update(&board.refresh(&snapshot)),
                    Err(e) => warn!("Skipping frame {}: {:#}", frame.display(), e),
                }
            }
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => info!("Received shutdown signal"),
                    Err(e) => error!("Unable to listen for shutdown signal: {}", e),
                }
                break;
            }
        }
    }

    board.shutdown();
    info!("Board Replay Service stopped");
    Ok(())
}

fn log_update(update: &BoardUpdate) {
    info!(
        "Pass complete: {} markets, {} cells, {} changed ({} newly flagged)",
        update.markets.len(),
        update.report.observed,
        update.report.changed.len(),
        update.report.newly_flagged.len()
    );

    for key in &update.report.newly_flagged {
        let Some(market) = update.markets.get(key.market_index) else {
            continue;
        };
        let Some(row) = market.rows.get(key.row_index) else {
            continue;
        };
        if let Some(level) = row.levels(key.side).get(key.column) {
            debug!(
                market = %market.name,
                runner = %row.label,
                side = ?key.side,
                column = key.column,
                price = %level.price,
                volume = %level.volume,
                "price changed"
            );
        }
    }
}
