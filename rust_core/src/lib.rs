//! Oddsline Core - live betting-market reconciliation.
//!
//! This crate provides:
//! - Feed decoding with response-wrapper probing (definitions, odds, bookmaker/fancy, legacy)
//! - Per-feed normalization into one canonical market model
//! - Runner identity reconciliation between the definition and odds feeds
//! - Cross-feed deduplication with explicit source precedence
//! - Display filtering and ordering
//! - Fixed-width price ladder formatting
//! - Cell-level change detection with time-boxed flags
//! - A thread-safe live board that serializes passes and sweeps expired flags

pub mod board;
pub mod config;
pub mod detector;
pub mod error;
pub mod feeds;
pub mod filter;
pub mod formatter;
pub mod matching;
pub mod merger;
pub mod models;
pub mod normalizer;
pub mod orderer;
pub mod pipeline;

pub use board::{BoardUpdate, LiveBoard};
pub use config::PipelineConfig;
pub use detector::{CellKey, ChangeDetector, PassReport};
pub use error::{BoardError, ConfigError, DataIntegrityIssue, FeedError};
pub use models::{
    BetSelection, CanonicalMarket, CanonicalRow, EventInfo, FeedSource, MarketKind, PriceLevel,
    RowStatus, Side,
};
pub use normalizer::{SourceBatch, SourceNormalizer};
pub use pipeline::{FeedSnapshot, Pipeline};

/// Run a single stateless reconciliation pass.
///
/// Hosts that poll repeatedly should keep a [`Pipeline`] (or a [`LiveBoard`]
/// when change flags are needed) instead of rebuilding one per tick.
pub fn reconcile(snapshot: &FeedSnapshot, config: &PipelineConfig) -> Vec<CanonicalMarket> {
    Pipeline::new(config).reconcile(snapshot)
}
