//! Wire shapes of the upstream feeds.
//!
//! Everything here is ephemeral per refresh tick. Fields are optional or
//! defaulted wherever feeds have been seen to omit them; validation happens
//! in the normalizer, not during decoding.

use super::lenient;
use serde::Deserialize;

// ============================================================================
// Market definitions feed
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMarketDefinition {
    #[serde(default, deserialize_with = "lenient::id_string_opt")]
    pub market_id: Option<String>,
    #[serde(default)]
    pub event: Option<RawEvent>,
    #[serde(default)]
    pub market_name: String,
    #[serde(default)]
    pub runners: Vec<RawRunner>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEvent {
    #[serde(default, deserialize_with = "lenient::id_string_opt")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub open_date: Option<String>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRunner {
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub selection_id: Option<i64>,
    #[serde(default)]
    pub runner_name: String,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub handicap: Option<f64>,
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub sort_priority: Option<i64>,
}

// ============================================================================
// Odds snapshot feed
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOddsSnapshot {
    #[serde(default, deserialize_with = "lenient::id_string_opt")]
    pub market_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::bool_lenient")]
    pub inplay: bool,
    #[serde(default)]
    pub runners: Vec<RawOddsRunner>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOddsRunner {
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub selection_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub ex: Option<RawExchangePrices>,
}

impl RawOddsRunner {
    pub fn back_levels(&self) -> &[RawPriceSize] {
        self.ex.as_ref().map(|ex| ex.available_to_back.as_slice()).unwrap_or(&[])
    }

    pub fn lay_levels(&self) -> &[RawPriceSize] {
        self.ex.as_ref().map(|ex| ex.available_to_lay.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExchangePrices {
    #[serde(default)]
    pub available_to_back: Vec<RawPriceSize>,
    #[serde(default)]
    pub available_to_lay: Vec<RawPriceSize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPriceSize {
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub size: Option<f64>,
}

// ============================================================================
// Section-based feeds (bookmaker/fancy and legacy combined)
// ============================================================================

/// A self-contained market where every section is a selection.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSectionMarket {
    #[serde(default, deserialize_with = "lenient::id_string_opt")]
    pub mid: Option<String>,
    #[serde(default)]
    pub mname: String,
    #[serde(default)]
    pub gtype: Option<String>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub max: Option<f64>,
    #[serde(default)]
    pub section: Vec<RawSection>,
}

/// Bookmaker / fancy feed element
pub type RawBookmakerFancyMarket = RawSectionMarket;

/// Legacy combined feed element
pub type RawLegacyMarketEntry = RawSectionMarket;

#[derive(Debug, Clone, Deserialize)]
pub struct RawSection {
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub sid: Option<i64>,
    #[serde(default)]
    pub nat: String,
    #[serde(default, deserialize_with = "lenient::i64_opt")]
    pub gscode: Option<i64>,
    #[serde(default)]
    pub gstatus: Option<String>,
    #[serde(default)]
    pub odds: Vec<RawSectionOdds>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawSectionOdds {
    #[serde(default)]
    pub otype: String,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub odds: Option<f64>,
    #[serde(default, deserialize_with = "lenient::f64_opt")]
    pub size: Option<f64>,
}
