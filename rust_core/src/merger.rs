//! Cross-feed deduplication.
//!
//! Markets are keyed by `lowercase(name) + "_" + lowercase(type)`. Sources are
//! visited in [`SOURCE_PRECEDENCE`] order and the first market seen for a key
//! wins whole; later duplicates are discarded without any field-level merge.

use crate::models::{CanonicalMarket, FeedSource};
use rustc_hash::FxHashSet;
use tracing::debug;

/// Merge precedence, highest first
pub const SOURCE_PRECEDENCE: [FeedSource; 3] = [
    FeedSource::DefinitionWithOdds,
    FeedSource::BookmakerFancy,
    FeedSource::Legacy,
];

fn precedence_rank(source: FeedSource) -> usize {
    SOURCE_PRECEDENCE
        .iter()
        .position(|s| *s == source)
        .unwrap_or(SOURCE_PRECEDENCE.len())
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarketMerger;

impl MarketMerger {
    pub fn new() -> Self {
        Self
    }

    /// Deduplicate fragments from every source.
    ///
    /// Input order within a source is preserved; across sources the output
    /// follows precedence order.
    pub fn merge(&self, mut fragments: Vec<CanonicalMarket>) -> Vec<CanonicalMarket> {
        // stable: keeps feed order inside each source
        fragments.sort_by_key(|m| precedence_rank(m.source));

        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut merged = Vec::with_capacity(fragments.len());

        for market in fragments {
            let key = market.dedup_key();
            if seen.contains(&key) {
                debug!(
                    key = %key,
                    market_id = %market.market_id,
                    source = market.source.as_str(),
                    "discarding duplicate market"
                );
                continue;
            }
            seen.insert(key);
            merged.push(market);
        }

        merged
    }
}
