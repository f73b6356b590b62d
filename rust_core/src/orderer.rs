//! Display ordering.

use crate::filter::is_match_odds_name;
use crate::models::{CanonicalMarket, MarketKind};

/// Display priority, lower first.
///
/// 1. match odds
/// 2. bookmaker (`match1` or named "BOOKMAKER")
/// 3. fancy family
/// 4. untyped or unknown type
/// 5. everything else
pub fn display_priority(name: &str, market_type: Option<&MarketKind>) -> u8 {
    if is_match_odds_name(name) {
        return 1;
    }
    if market_type == Some(&MarketKind::Match1) || name.trim().eq_ignore_ascii_case("BOOKMAKER") {
        return 2;
    }
    match market_type {
        Some(kind) if kind.is_fancy_family() => 3,
        None => 4,
        Some(MarketKind::Match) => 5,
        Some(_) => 4,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MarketOrderer;

impl MarketOrderer {
    pub fn new() -> Self {
        Self
    }

    /// Stable sort by priority, then case-insensitive name
    pub fn order(&self, mut markets: Vec<CanonicalMarket>) -> Vec<CanonicalMarket> {
        markets.sort_by_cached_key(|m| {
            (
                display_priority(&m.name, m.market_type.as_ref()),
                m.name.to_lowercase(),
            )
        });
        markets
    }
}
