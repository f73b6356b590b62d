//! Market type taxonomy (`gtype`) shared by the bookmaker/fancy and legacy feeds
//!
//! The definition feed carries no type at all, so a market's kind is optional
//! everywhere downstream. Unknown `gtype` values are preserved verbatim.

use serde::{Deserialize, Serialize};

/// Universal market type discriminator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MarketKind {
    /// Exchange-style match market
    Match,
    /// Bookmaker match market
    Match1,
    Fancy,
    Fancy1,
    Fancy2,
    OddEven,
    CricketCasino,
    Meter,
    /// Any other upstream value, lowercased
    Other(String),
}

impl MarketKind {
    /// Parse an upstream `gtype` value (case-insensitive)
    pub fn from_gtype(gtype: &str) -> Self {
        let lowered = gtype.trim().to_lowercase();
        match lowered.as_str() {
            "match" => Self::Match,
            "match1" => Self::Match1,
            "fancy" => Self::Fancy,
            "fancy1" => Self::Fancy1,
            "fancy2" => Self::Fancy2,
            "oddeven" => Self::OddEven,
            "cricketcasino" => Self::CricketCasino,
            "meter" => Self::Meter,
            _ => Self::Other(lowered),
        }
    }

    /// Parse an optional `gtype`, treating blank values as absent
    pub fn from_optional(gtype: Option<&str>) -> Option<Self> {
        gtype
            .filter(|g| !g.trim().is_empty())
            .map(Self::from_gtype)
    }

    /// The definition feed has no `gtype`; infer the one kind that overlaps
    /// the bookmaker feed so both copies of a market share a merge key.
    pub fn infer_from_name(market_name: &str) -> Option<Self> {
        if market_name.trim().eq_ignore_ascii_case("bookmaker") {
            Some(Self::Match1)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Match => "match",
            Self::Match1 => "match1",
            Self::Fancy => "fancy",
            Self::Fancy1 => "fancy1",
            Self::Fancy2 => "fancy2",
            Self::OddEven => "oddeven",
            Self::CricketCasino => "cricketcasino",
            Self::Meter => "meter",
            Self::Other(raw) => raw.as_str(),
        }
    }

    /// Session-style markets rendered in the fancy section
    pub fn is_fancy_family(&self) -> bool {
        matches!(
            self,
            Self::Fancy
                | Self::Fancy1
                | Self::Fancy2
                | Self::OddEven
                | Self::CricketCasino
                | Self::Meter
        )
    }
}

impl From<String> for MarketKind {
    fn from(value: String) -> Self {
        Self::from_gtype(&value)
    }
}

impl From<MarketKind> for String {
    fn from(kind: MarketKind) -> Self {
        kind.as_str().to_string()
    }
}
