//! Source normalization
//!
//! Each upstream feed is a tagged [`SourceBatch`] variant and passes through
//! its own adapter before any shared logic runs:
//! - definition + odds: joined by market id, runner identity reconciled
//! - bookmaker/fancy and legacy: self-contained, one row per section
//!
//! Markets that end up with no valid rows are dropped here.

use crate::config::PipelineConfig;
use crate::feeds::{RawMarketDefinition, RawOddsSnapshot, RawSectionMarket};
use crate::formatter::OddsFormatter;
use crate::matching::RunnerMatcherChain;
use crate::models::{CanonicalMarket, FeedSource};

mod definition;
mod section;

/// One feed's decoded payload for a single refresh tick
#[derive(Debug, Clone)]
pub enum SourceBatch {
    DefinitionWithOdds {
        definitions: Vec<RawMarketDefinition>,
        odds: Vec<RawOddsSnapshot>,
    },
    BookmakerFancy(Vec<RawSectionMarket>),
    Legacy(Vec<RawSectionMarket>),
}

impl SourceBatch {
    pub fn source(&self) -> FeedSource {
        match self {
            SourceBatch::DefinitionWithOdds { .. } => FeedSource::DefinitionWithOdds,
            SourceBatch::BookmakerFancy(_) => FeedSource::BookmakerFancy,
            SourceBatch::Legacy(_) => FeedSource::Legacy,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            SourceBatch::DefinitionWithOdds { definitions, .. } => definitions.is_empty(),
            SourceBatch::BookmakerFancy(markets) | SourceBatch::Legacy(markets) => {
                markets.is_empty()
            }
        }
    }
}

/// Per-feed adapters producing canonical market fragments
pub struct SourceNormalizer {
    formatter: OddsFormatter,
    matchers: RunnerMatcherChain,
    default_min_stake: f64,
    default_max_stake: f64,
}

impl SourceNormalizer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_matchers(config, RunnerMatcherChain::new())
    }

    /// Normalizer with a custom runner matcher chain
    pub fn with_matchers(config: &PipelineConfig, matchers: RunnerMatcherChain) -> Self {
        Self {
            formatter: OddsFormatter::new(config.odds_columns),
            matchers,
            default_min_stake: config.default_min_stake,
            default_max_stake: config.default_max_stake,
        }
    }

    pub fn formatter(&self) -> &OddsFormatter {
        &self.formatter
    }

    /// Normalize one batch; output preserves the feed's market order
    pub fn normalize(&self, batch: &SourceBatch) -> Vec<CanonicalMarket> {
        match batch {
            SourceBatch::DefinitionWithOdds { definitions, odds } => {
                self.normalize_definitions(definitions, odds)
            }
            SourceBatch::BookmakerFancy(markets) => {
                self.normalize_sections(FeedSource::BookmakerFancy, markets)
            }
            SourceBatch::Legacy(markets) => self.normalize_sections(FeedSource::Legacy, markets),
        }
    }

    fn stake_limits(&self, min: Option<f64>, max: Option<f64>) -> (f64, f64) {
        (
            min.unwrap_or(self.default_min_stake),
            max.unwrap_or(self.default_max_stake),
        )
    }
}
