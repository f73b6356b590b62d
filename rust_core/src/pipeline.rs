//! End-to-end reconciliation pass.
//!
//! ```text
//! FeedSnapshot → SourceNormalizer → MarketMerger → MarketFilter → MarketOrderer
//! ```
//!
//! A pass is synchronous and does no I/O. Feed payloads arrive already
//! fetched as JSON values; a missing or malformed feed contributes nothing.

use crate::config::PipelineConfig;
use crate::feeds::{self, RawMarketDefinition, RawOddsSnapshot, RawSectionMarket};
use crate::filter::MarketFilter;
use crate::merger::MarketMerger;
use crate::models::CanonicalMarket;
use crate::normalizer::{SourceBatch, SourceNormalizer};
use crate::orderer::MarketOrderer;
use serde_json::Value;
use tracing::debug;

pub const DEFINITIONS_FEED: &str = "definitions";
pub const ODDS_FEED: &str = "odds";
pub const BOOKMAKER_FANCY_FEED: &str = "bookmaker_fancy";
pub const LEGACY_FEED: &str = "legacy";

/// Raw responses from every upstream feed for one poll tick
#[derive(Debug, Clone, Default)]
pub struct FeedSnapshot {
    pub definitions: Option<Value>,
    pub odds: Option<Value>,
    pub bookmaker_fancy: Option<Value>,
    pub legacy: Option<Value>,
}

impl FeedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_definitions(mut self, value: Value) -> Self {
        self.definitions = Some(value);
        self
    }

    pub fn with_odds(mut self, value: Value) -> Self {
        self.odds = Some(value);
        self
    }

    pub fn with_bookmaker_fancy(mut self, value: Value) -> Self {
        self.bookmaker_fancy = Some(value);
        self
    }

    pub fn with_legacy(mut self, value: Value) -> Self {
        self.legacy = Some(value);
        self
    }

    /// Decode every present feed into its tagged batch.
    ///
    /// Odds without definitions are ignored; definitions without odds still
    /// produce markets with sentinel prices.
    pub fn decode(&self) -> Vec<SourceBatch> {
        let mut batches = Vec::with_capacity(3);

        if let Some(definitions) = &self.definitions {
            let definitions: Vec<RawMarketDefinition> =
                feeds::decode_list(DEFINITIONS_FEED, definitions);
            let odds: Vec<RawOddsSnapshot> = self
                .odds
                .as_ref()
                .map(|odds| feeds::decode_list(ODDS_FEED, odds))
                .unwrap_or_default();
            batches.push(SourceBatch::DefinitionWithOdds { definitions, odds });
        } else if self.odds.is_some() {
            debug!("odds snapshot received without market definitions, ignoring");
        }

        if let Some(value) = &self.bookmaker_fancy {
            let markets: Vec<RawSectionMarket> = feeds::decode_list(BOOKMAKER_FANCY_FEED, value);
            batches.push(SourceBatch::BookmakerFancy(markets));
        }

        if let Some(value) = &self.legacy {
            let markets: Vec<RawSectionMarket> = feeds::decode_list(LEGACY_FEED, value);
            batches.push(SourceBatch::Legacy(markets));
        }

        batches
    }
}

/// The pure reconciliation pipeline
pub struct Pipeline {
    normalizer: SourceNormalizer,
    merger: MarketMerger,
    filter: MarketFilter,
    orderer: MarketOrderer,
}

impl Pipeline {
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_normalizer(SourceNormalizer::new(config))
    }

    pub fn with_normalizer(normalizer: SourceNormalizer) -> Self {
        Self {
            normalizer,
            merger: MarketMerger::new(),
            filter: MarketFilter::new(),
            orderer: MarketOrderer::new(),
        }
    }

    pub fn normalizer(&self) -> &SourceNormalizer {
        &self.normalizer
    }

    pub fn reconcile(&self, snapshot: &FeedSnapshot) -> Vec<CanonicalMarket> {
        self.reconcile_batches(&snapshot.decode())
    }

    pub fn reconcile_batches(&self, batches: &[SourceBatch]) -> Vec<CanonicalMarket> {
        let fragments: Vec<CanonicalMarket> = batches
            .iter()
            .flat_map(|batch| self.normalizer.normalize(batch))
            .collect();
        let normalized = fragments.len();

        let merged = self.merger.merge(fragments);
        let kept = self.filter.apply(merged);
        let ordered = self.orderer.order(kept);

        debug!(
            batches = batches.len(),
            normalized,
            displayed = ordered.len(),
            "reconciliation pass complete"
        );
        ordered
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedSource;
    use serde_json::json;

    #[test]
    fn test_snapshot_decode_tags() {
        let snapshot = FeedSnapshot::new()
            .with_definitions(json!([]))
            .with_bookmaker_fancy(json!({ "success": true, "data": [] }))
            .with_legacy(json!({ "data": [] }));
        let sources: Vec<FeedSource> = snapshot.decode().iter().map(SourceBatch::source).collect();
        assert_eq!(
            sources,
            vec![FeedSource::DefinitionWithOdds, FeedSource::BookmakerFancy, FeedSource::Legacy]
        );
    }

    #[test]
    fn test_odds_without_definitions_ignored() {
        let snapshot = FeedSnapshot::new().with_odds(json!({ "status": true, "data": [] }));
        assert!(snapshot.decode().is_empty());
        assert!(Pipeline::default().reconcile(&snapshot).is_empty());
    }

    #[test]
    fn test_unrecognized_shape_yields_empty() {
        let snapshot = FeedSnapshot::new().with_bookmaker_fancy(json!({ "markets": [] }));
        assert!(Pipeline::default().reconcile(&snapshot).is_empty());
    }

    #[test]
    fn test_full_pass_filters_and_orders() {
        let snapshot = FeedSnapshot::new()
            .with_definitions(json!([{
                "marketId": "1.1", "marketName": "MATCH_ODDS",
                "runners": [{ "selectionId": 1, "runnerName": "India" }]
            }]))
            .with_bookmaker_fancy(json!({ "success": true, "data": [
                { "mid": "20", "mname": "Super Over", "gtype": "fancy", "section": [{ "sid": 1, "nat": "x" }] },
                { "mid": "21", "mname": "6 over runs", "gtype": "fancy", "section": [{ "sid": 1, "nat": "IND" }] },
                { "mid": "22", "mname": "Bookmaker", "gtype": "match1", "section": [{ "sid": 1, "nat": "IND" }] }
            ]}));

        let names: Vec<String> = Pipeline::default()
            .reconcile(&snapshot)
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["MATCH_ODDS", "Bookmaker", "6 over runs"]);
    }
}
