//! Display exclusion rules.
//!
//! Rules are independent; a market is dropped when any of them matches.

use crate::models::{CanonicalMarket, MarketKind};
use tracing::trace;

/// Lowercased name fragments that exclude a market
pub const EXCLUDED_NAME_FRAGMENTS: &[&str] = &[
    "2nd",
    "line",
    "over total",
    "tournament winner",
    "bookmaker big bash cup",
    "match odds including tie",
    "match odds (inc. tie)",
    "completed match",
    "super over",
];

/// Why a market was excluded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExclusionRule {
    NameFragment(&'static str),
    /// Type `match` on anything other than the canonical match-odds market
    NonCanonicalMatchType,
}

/// True for the canonical match-odds market name, in either spelling
pub fn is_match_odds_name(name: &str) -> bool {
    let name = name.trim();
    name.eq_ignore_ascii_case("MATCH_ODDS") || name.eq_ignore_ascii_case("MATCH ODDS")
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarketFilter;

impl MarketFilter {
    pub fn new() -> Self {
        Self
    }

    /// First rule that excludes this market, if any
    pub fn exclusion(&self, market: &CanonicalMarket) -> Option<ExclusionRule> {
        let name = market.name.to_lowercase();
        if let Some(fragment) = EXCLUDED_NAME_FRAGMENTS.iter().find(|f| name.contains(*f)) {
            return Some(ExclusionRule::NameFragment(*fragment));
        }
        if market.market_type == Some(MarketKind::Match) && !is_match_odds_name(&market.name) {
            return Some(ExclusionRule::NonCanonicalMatchType);
        }
        None
    }

    pub fn apply(&self, markets: Vec<CanonicalMarket>) -> Vec<CanonicalMarket> {
        markets
            .into_iter()
            .filter(|market| match self.exclusion(market) {
                Some(rule) => {
                    trace!(market_id = %market.market_id, name = %market.name, ?rule, "market excluded");
                    false
                }
                None => true,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeedSource;

    fn market(name: &str, kind: Option<MarketKind>) -> CanonicalMarket {
        CanonicalMarket {
            market_id: "1".to_string(),
            numeric_id: None,
            name: name.to_string(),
            market_type: kind,
            min_stake: 500.0,
            max_stake: 500_000.0,
            rows: vec![],
            source: FeedSource::Legacy,
            inplay: false,
            event: None,
        }
    }

    #[test]
    fn test_name_fragments_case_insensitive() {
        let filter = MarketFilter::new();
        for name in [
            "2nd Innings 20 over runs",
            "Match Odds Including Tie",
            "MATCH ODDS (INC. TIE)",
            "Tournament Winner",
            "Super Over",
            "Completed Match",
            "Over Total 6.5",
            "Bookmaker Big Bash Cup",
            "IND line",
        ] {
            assert!(filter.exclusion(&market(name, None)).is_some(), "{name}");
        }
        assert_eq!(
            filter.exclusion(&market("Innings 2ND", None)),
            Some(ExclusionRule::NameFragment("2nd"))
        );
    }

    #[test]
    fn test_match_type_only_for_match_odds() {
        let filter = MarketFilter::new();
        assert_eq!(
            filter.exclusion(&market("To Win The Toss", Some(MarketKind::Match))),
            Some(ExclusionRule::NonCanonicalMatchType)
        );
        assert_eq!(filter.exclusion(&market("MATCH_ODDS", Some(MarketKind::Match))), None);
        assert_eq!(filter.exclusion(&market("match odds", Some(MarketKind::Match))), None);
        assert_eq!(filter.exclusion(&market("To Win The Toss", None)), None);
    }

    #[test]
    fn test_apply_keeps_order() {
        let kept = MarketFilter::new().apply(vec![
            market("Bookmaker", Some(MarketKind::Match1)),
            market("Super Over", None),
            market("6 over runs", Some(MarketKind::Fancy)),
        ]);
        let names: Vec<&str> = kept.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Bookmaker", "6 over runs"]);
    }
}
