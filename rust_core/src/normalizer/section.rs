//! Section-based adapter shared by the bookmaker/fancy and legacy feeds.

use super::SourceNormalizer;
use crate::feeds::{RawSection, RawSectionMarket};
use crate::models::{CanonicalMarket, CanonicalRow, FeedSource, MarketKind, RowStatus, Side};
use tracing::{debug, warn};

impl SourceNormalizer {
    pub(super) fn normalize_sections(
        &self,
        source: FeedSource,
        markets: &[RawSectionMarket],
    ) -> Vec<CanonicalMarket> {
        markets
            .iter()
            .filter_map(|market| self.normalize_section_market(source, market))
            .collect()
    }

    fn normalize_section_market(
        &self,
        source: FeedSource,
        market: &RawSectionMarket,
    ) -> Option<CanonicalMarket> {
        let Some(mid) = market.mid.as_deref() else {
            debug!(source = source.as_str(), name = %market.mname, "section market has no mid, dropping");
            return None;
        };

        let rows: Vec<CanonicalRow> = market
            .section
            .iter()
            .filter_map(|section| self.section_row(source, mid, section))
            .collect();

        if rows.is_empty() {
            debug!(source = source.as_str(), mid, "section market has no valid rows, dropping");
            return None;
        }

        let (min_stake, max_stake) = self.stake_limits(market.min, market.max);
        Some(CanonicalMarket {
            market_id: mid.to_string(),
            numeric_id: mid.parse().ok(),
            name: market.mname.clone(),
            market_type: MarketKind::from_optional(market.gtype.as_deref()),
            min_stake,
            max_stake,
            rows,
            source,
            inplay: false,
            event: None,
        })
    }

    fn section_row(&self, source: FeedSource, mid: &str, section: &RawSection) -> Option<CanonicalRow> {
        let selection_id = match section.sid {
            Some(sid) if sid > 0 => sid,
            other => {
                warn!(source = source.as_str(), mid, sid = ?other, nat = %section.nat, "skipping section without a positive sid");
                return None;
            }
        };

        let quotes = |side: Side| {
            section
                .odds
                .iter()
                .filter(move |o| Side::from_otype(&o.otype) == Some(side))
                .map(|o| (o.odds, o.size))
        };

        Some(CanonicalRow {
            label: section.nat.clone(),
            selection_id,
            back: self.formatter.format_side(Side::Back, quotes(Side::Back)),
            lay: self.formatter.format_side(Side::Lay, quotes(Side::Lay)),
            status: RowStatus::parse(section.gstatus.as_deref()),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PipelineConfig;
    use crate::models::{FeedSource, MarketKind, PriceLevel, RowStatus};
    use crate::normalizer::{SourceBatch, SourceNormalizer};
    use serde_json::json;

    fn bookmaker(value: serde_json::Value) -> SourceBatch {
        SourceBatch::BookmakerFancy(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_sections_become_rows() {
        let normalizer = SourceNormalizer::new(&PipelineConfig::default());
        let markets = normalizer.normalize(&bookmaker(json!([{
            "mid": "9001", "mname": "Bookmaker", "gtype": "match1", "min": 100, "max": 25000,
            "section": [
                { "sid": 1, "nat": "India", "gstatus": "ACTIVE", "odds": [
                    { "otype": "back", "odds": 45, "size": 100000 },
                    { "otype": "lay", "odds": 48, "size": 100000 }
                ]},
                { "sid": 2, "nat": "Australia", "gstatus": "SUSPENDED", "odds": [
                    { "otype": "back", "odds": 0, "size": 0 }
                ]}
            ]
        }])));

        assert_eq!(markets.len(), 1);
        let m = &markets[0];
        assert_eq!(m.source, FeedSource::BookmakerFancy);
        assert_eq!(m.market_type, Some(MarketKind::Match1));
        assert_eq!(m.numeric_id, Some(9001));
        assert_eq!((m.min_stake, m.max_stake), (100.0, 25000.0));
        assert_eq!(m.rows[0].back, vec![PriceLevel::new("45", "100.0k")]);
        assert_eq!(m.rows[0].lay, vec![PriceLevel::new("48", "100.0k")]);
        assert_eq!(m.rows[1].status, RowStatus::Suspended);
        assert!(m.rows[1].back[0].is_sentinel());
        assert!(m.rows[1].lay[0].is_sentinel());
    }

    #[test]
    fn test_invalid_sections_and_empty_markets() {
        let normalizer = SourceNormalizer::new(&PipelineConfig::default());
        let markets = normalizer.normalize(&SourceBatch::Legacy(
            serde_json::from_value(json!([
                { "mid": "1", "mname": "Only bad", "section": [{ "sid": 0, "nat": "x" }] },
                { "mname": "No mid", "section": [{ "sid": 3, "nat": "y" }] },
                { "mid": "2", "mname": "6 over runs", "gtype": "fancy", "section": [
                    { "nat": "no sid" },
                    { "sid": 7, "nat": "IND 6 over" }
                ]}
            ]))
            .unwrap(),
        ));

        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].name, "6 over runs");
        assert_eq!(markets[0].rows.len(), 1);
        assert_eq!(markets[0].source, FeedSource::Legacy);
        assert_eq!((markets[0].min_stake, markets[0].max_stake), (500.0, 500_000.0));
    }

    #[test]
    fn test_non_numeric_mid_kept_as_string() {
        let normalizer = SourceNormalizer::new(&PipelineConfig::default().with_odds_columns(2));
        let markets = normalizer.normalize(&bookmaker(json!([{
            "mid": "bm-7", "mname": "Toss", "section": [{ "sid": 4, "nat": "India", "odds": [
                { "otype": "BACK", "odds": 1.9, "size": 500 },
                { "otype": "back", "odds": 1.95, "size": 20 }
            ]}]
        }])));
        let m = &markets[0];
        assert_eq!(m.market_id, "bm-7");
        assert_eq!(m.numeric_id, None);
        assert_eq!(m.market_type, None);
        assert_eq!(
            m.rows[0].back,
            vec![PriceLevel::new("1.95", "20.00"), PriceLevel::new("1.90", "500.00")]
        );
    }
}
