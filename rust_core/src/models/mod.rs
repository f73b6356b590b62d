// Canonical market models shared by every pipeline stage
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod market_type;

pub use market_type::MarketKind;

// ============================================================================
// Feed Source & Side Enums
// ============================================================================

/// The closed set of upstream feeds a market can come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedSource {
    /// Market-definitions feed joined with the polled odds snapshot
    DefinitionWithOdds,
    /// Bookmaker / fancy markets feed
    BookmakerFancy,
    /// Legacy self-contained combined feed
    Legacy,
}

impl FeedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSource::DefinitionWithOdds => "definition_odds",
            FeedSource::BookmakerFancy => "bookmaker_fancy",
            FeedSource::Legacy => "legacy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Back,
    Lay,
}

impl Side {
    /// Parse a section `otype` value
    pub fn from_otype(otype: &str) -> Option<Self> {
        let otype = otype.trim();
        if otype.eq_ignore_ascii_case("back") {
            Some(Side::Back)
        } else if otype.eq_ignore_ascii_case("lay") {
            Some(Side::Lay)
        } else {
            None
        }
    }
}

// ============================================================================
// Price Levels & Rows
// ============================================================================

/// One displayed price cell: formatted price and formatted volume.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceLevel {
    pub price: String,
    pub volume: String,
}

impl PriceLevel {
    pub const SENTINEL_VALUE: &'static str = "0";

    pub fn new(price: impl Into<String>, volume: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            volume: volume.into(),
        }
    }

    /// Placeholder for a level the feed did not provide
    pub fn sentinel() -> Self {
        Self::new(Self::SENTINEL_VALUE, Self::SENTINEL_VALUE)
    }

    pub fn is_sentinel(&self) -> bool {
        self.price == Self::SENTINEL_VALUE && self.volume == Self::SENTINEL_VALUE
    }

    /// Bet entry must refuse any cell without a real quoted price
    pub fn is_interactive(&self) -> bool {
        self.price != Self::SENTINEL_VALUE
    }
}

impl Default for PriceLevel {
    fn default() -> Self {
        Self::sentinel()
    }
}

/// Trading status of a single selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    #[default]
    Active,
    Suspended,
    BallRunning,
    Closed,
    /// Unrecognised upstream status, kept uppercased
    Other(String),
}

impl RowStatus {
    /// Parse a `gstatus` / runner `status` value; blank means active
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return RowStatus::Active;
        };
        let upper = raw.to_uppercase().replace('_', " ");
        match upper.as_str() {
            "ACTIVE" | "OPEN" => RowStatus::Active,
            "SUSPENDED" | "SUSPEND" => RowStatus::Suspended,
            "BALL RUNNING" => RowStatus::BallRunning,
            "CLOSED" | "REMOVED" | "WINNER" | "LOSER" => RowStatus::Closed,
            _ => RowStatus::Other(upper),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, RowStatus::Active | RowStatus::Other(_))
    }
}

/// One selection within a canonical market.
///
/// `back` and `lay` always hold exactly the configured column count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    pub label: String,
    /// Authoritative identity, taken from the definition feed when present
    pub selection_id: i64,
    pub back: Vec<PriceLevel>,
    pub lay: Vec<PriceLevel>,
    #[serde(default)]
    pub status: RowStatus,
}

impl CanonicalRow {
    pub fn levels(&self, side: Side) -> &[PriceLevel] {
        match side {
            Side::Back => &self.back,
            Side::Lay => &self.lay,
        }
    }
}

// ============================================================================
// Markets
// ============================================================================

/// Event metadata carried by definition-feed markets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInfo {
    pub id: Option<String>,
    pub name: Option<String>,
    /// Parsed open date, when the feed supplied RFC 3339
    pub open_date: Option<DateTime<Utc>>,
    /// Open date exactly as the feed supplied it
    pub open_date_raw: Option<String>,
    pub country_code: Option<String>,
    pub timezone: Option<String>,
}

impl EventInfo {
    pub fn parse_open_date(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

/// A normalized, tradeable market ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalMarket {
    /// Market id as a string (`marketIdString` for bet entry)
    pub market_id: String,
    /// Numeric id for feeds that key markets by integer `mid`
    pub numeric_id: Option<i64>,
    pub name: String,
    pub market_type: Option<MarketKind>,
    pub min_stake: f64,
    pub max_stake: f64,
    pub rows: Vec<CanonicalRow>,
    pub source: FeedSource,
    #[serde(default)]
    pub inplay: bool,
    #[serde(default)]
    pub event: Option<EventInfo>,
}

impl CanonicalMarket {
    /// Composite key used for cross-feed deduplication
    pub fn dedup_key(&self) -> String {
        dedup_key(&self.name, self.market_type.as_ref())
    }

    pub fn type_str(&self) -> &str {
        self.market_type.as_ref().map(MarketKind::as_str).unwrap_or("")
    }

    /// Build the payload a bet-entry collaborator needs for one price cell.
    ///
    /// Returns `None` for sentinel cells, closed/suspended rows and
    /// out-of-range coordinates.
    pub fn bet_selection(&self, row_index: usize, side: Side, column: usize) -> Option<BetSelection> {
        let row = self.rows.get(row_index)?;
        if !row.status.is_open() {
            return None;
        }
        let level = row.levels(side).get(column)?;
        if !level.is_interactive() {
            return None;
        }

        Some(BetSelection {
            market_id: self.market_id.clone(),
            numeric_market_id: self.numeric_id,
            market_name: self.name.clone(),
            market_type: self.market_type.clone(),
            selection_id: row.selection_id,
            runner_name: row.label.clone(),
            side,
            price: level.price.clone(),
            min_stake: self.min_stake,
            max_stake: self.max_stake,
        })
    }
}

pub fn dedup_key(name: &str, market_type: Option<&MarketKind>) -> String {
    format!(
        "{}_{}",
        name.to_lowercase(),
        market_type.map(|k| k.as_str().to_lowercase()).unwrap_or_default()
    )
}

/// Wager payload skeleton handed to the bet-entry collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BetSelection {
    pub market_id: String,
    pub numeric_market_id: Option<i64>,
    pub market_name: String,
    pub market_type: Option<MarketKind>,
    pub selection_id: i64,
    pub runner_name: String,
    pub side: Side,
    pub price: String,
    pub min_stake: f64,
    pub max_stake: f64,
}
