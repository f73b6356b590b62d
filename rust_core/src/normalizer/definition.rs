//! Definition + odds adapter.

use super::SourceNormalizer;
use crate::feeds::{RawMarketDefinition, RawOddsSnapshot};
use crate::matching::{authoritative_selection_id, sibling_owner, MatchContext};
use crate::models::{CanonicalMarket, CanonicalRow, EventInfo, FeedSource, MarketKind, RowStatus, Side};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

impl SourceNormalizer {
    pub(super) fn normalize_definitions(
        &self,
        definitions: &[RawMarketDefinition],
        odds: &[RawOddsSnapshot],
    ) -> Vec<CanonicalMarket> {
        let mut odds_by_market: FxHashMap<&str, &RawOddsSnapshot> = FxHashMap::default();
        for snapshot in odds {
            if let Some(market_id) = snapshot.market_id.as_deref() {
                // first snapshot for a market id wins
                odds_by_market.entry(market_id).or_insert(snapshot);
            }
        }

        definitions
            .iter()
            .filter_map(|def| {
                let market_id = def.market_id.as_deref()?;
                self.normalize_definition(market_id, def, odds_by_market.get(market_id).copied())
            })
            .collect()
    }

    fn normalize_definition(
        &self,
        market_id: &str,
        def: &RawMarketDefinition,
        odds: Option<&RawOddsSnapshot>,
    ) -> Option<CanonicalMarket> {
        let odds_runners = odds.map(|o| o.runners.as_slice()).unwrap_or(&[]);
        let mut rows = Vec::with_capacity(def.runners.len());

        for (position, runner) in def.runners.iter().enumerate() {
            let selection_id = match authoritative_selection_id(runner) {
                Ok(id) => id,
                Err(issue) => {
                    warn!(market_id, position, %issue, "skipping definition runner");
                    continue;
                }
            };

            let ctx = MatchContext {
                selection_id,
                position,
                definition_len: def.runners.len(),
                odds_runners,
            };
            let matched = self.matchers.resolve(&ctx);

            let row = match matched.runner() {
                Some(odds_runner) => {
                    if let Some(sibling) =
                        sibling_owner(&def.runners, position, odds_runner.selection_id)
                    {
                        debug!(
                            market_id,
                            selection_id,
                            sibling_position = sibling,
                            matcher = matched.matcher_name().unwrap_or_default(),
                            "odds runner matched belongs to a sibling runner, prices may repeat"
                        );
                    } else if odds_runner.selection_id != Some(selection_id) {
                        debug!(
                            market_id,
                            selection_id,
                            odds_selection_id = ?odds_runner.selection_id,
                            matcher = matched.matcher_name().unwrap_or_default(),
                            "odds runner matched under a different id"
                        );
                    }
                    CanonicalRow {
                        label: runner.runner_name.clone(),
                        selection_id,
                        back: self.formatter.format_side(
                            Side::Back,
                            odds_runner.back_levels().iter().map(|l| (l.price, l.size)),
                        ),
                        lay: self.formatter.format_side(
                            Side::Lay,
                            odds_runner.lay_levels().iter().map(|l| (l.price, l.size)),
                        ),
                        status: RowStatus::parse(odds_runner.status.as_deref()),
                    }
                }
                None => {
                    if odds.is_some() {
                        debug!(market_id, selection_id, "no odds runner matched, showing sentinel prices");
                    }
                    CanonicalRow {
                        label: runner.runner_name.clone(),
                        selection_id,
                        back: self.formatter.empty_side(),
                        lay: self.formatter.empty_side(),
                        status: RowStatus::Active,
                    }
                }
            };
            rows.push(row);
        }

        if rows.is_empty() {
            debug!(market_id, "definition market has no valid runners, dropping");
            return None;
        }

        let (min_stake, max_stake) = self.stake_limits(None, None);
        Some(CanonicalMarket {
            market_id: market_id.to_string(),
            numeric_id: None,
            name: def.market_name.clone(),
            market_type: MarketKind::infer_from_name(&def.market_name),
            min_stake,
            max_stake,
            rows,
            source: FeedSource::DefinitionWithOdds,
            inplay: odds.map(|o| o.inplay).unwrap_or(false),
            event: def.event.as_ref().map(|event| EventInfo {
                id: event.id.clone(),
                name: event.name.clone(),
                open_date: event.open_date.as_deref().and_then(EventInfo::parse_open_date),
                open_date_raw: event.open_date.clone(),
                country_code: event.country_code.clone(),
                timezone: event.timezone.clone(),
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::config::PipelineConfig;
    use crate::models::PriceLevel;
    use crate::normalizer::{SourceBatch, SourceNormalizer};
    use serde_json::{json, Value};

    fn batch(definitions: Value, odds: Value) -> SourceBatch {
        SourceBatch::DefinitionWithOdds {
            definitions: serde_json::from_value(definitions).unwrap(),
            odds: serde_json::from_value(odds).unwrap(),
        }
    }

    fn normalizer() -> SourceNormalizer {
        SourceNormalizer::new(&PipelineConfig::default())
    }

    #[test]
    fn test_identity_comes_from_definition() {
        // odds feed re-keyed its runners; positional match still finds prices
        let markets = normalizer().normalize(&batch(
            json!([{
                "marketId": "1.1", "marketName": "MATCH_ODDS",
                "runners": [
                    { "selectionId": 111, "runnerName": "India" },
                    { "selectionId": 222, "runnerName": "Australia" }
                ]
            }]),
            json!([{
                "marketId": "1.1", "inplay": true,
                "runners": [
                    { "selectionId": 9001, "ex": { "availableToBack": [{ "price": 1.85, "size": 2500 }] } },
                    { "selectionId": 9002, "ex": { "availableToLay": [{ "price": 2.1, "size": 45.2 }] } }
                ]
            }]),
        ));

        assert_eq!(markets.len(), 1);
        let m = &markets[0];
        assert!(m.inplay);
        assert_eq!(m.rows[0].selection_id, 111);
        assert_eq!(m.rows[1].selection_id, 222);
        assert_eq!(m.rows[0].back, vec![PriceLevel::new("1.85", "2.5k")]);
        assert_eq!(m.rows[1].lay, vec![PriceLevel::new("2.10", "45.20")]);
        assert_eq!(m.min_stake, 500.0);
        assert_eq!(m.max_stake, 500_000.0);
    }

    #[test]
    fn test_invalid_runners_skipped_siblings_kept() {
        let markets = normalizer().normalize(&batch(
            json!([{
                "marketId": "1.2", "marketName": "MATCH_ODDS",
                "runners": [
                    { "selectionId": 111, "runnerName": "India" },
                    { "selectionId": 0, "runnerName": "Ghost" },
                    { "selectionId": 333, "runnerName": "Tie" },
                    { "selectionId": 222, "runnerName": "Australia" }
                ]
            }]),
            json!([]),
        ));

        let labels: Vec<&str> = markets[0].rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["India", "Australia"]);
        assert!(markets[0].rows.iter().all(|r| r.back[0].is_sentinel()));
    }

    #[test]
    fn test_length_mismatch_leaves_unmatched_rows_empty() {
        let markets = normalizer().normalize(&batch(
            json!([{
                "marketId": "1.3", "marketName": "MATCH_ODDS",
                "runners": [
                    { "selectionId": 111, "runnerName": "India" },
                    { "selectionId": 222, "runnerName": "Australia" },
                    { "selectionId": 333, "runnerName": "The Draw" }
                ]
            }]),
            json!([{
                "marketId": "1.3",
                "runners": [
                    { "selectionId": 111, "ex": { "availableToBack": [{ "price": 1.5, "size": 10 }] } },
                    { "selectionId": 8888, "ex": { "availableToBack": [{ "price": 3.0, "size": 10 }] } }
                ]
            }]),
        ));

        let rows = &markets[0].rows;
        assert_eq!(rows[0].back[0].price, "1.50");
        assert!(rows[1].back[0].is_sentinel());
        assert!(rows[2].back[0].is_sentinel());
    }

    #[test]
    fn test_positional_match_onto_sibling_odds_runner() {
        // 111 has no odds entry; position 0 lands on 222's prices
        let markets = normalizer().normalize(&batch(
            json!([{
                "marketId": "1.6", "marketName": "MATCH_ODDS",
                "runners": [
                    { "selectionId": 111, "runnerName": "India" },
                    { "selectionId": 222, "runnerName": "Australia" }
                ]
            }]),
            json!([{
                "marketId": "1.6",
                "runners": [
                    { "selectionId": 222, "ex": { "availableToBack": [{ "price": 2.4, "size": 10 }] } },
                    { "selectionId": 9999, "ex": { "availableToBack": [{ "price": 1.6, "size": 10 }] } }
                ]
            }]),
        ));

        let rows = &markets[0].rows;
        assert_eq!(rows[0].selection_id, 111);
        assert_eq!(rows[1].selection_id, 222);
        assert_eq!(rows[0].back[0].price, "2.40");
        assert_eq!(rows[1].back[0].price, "2.40");
    }

    #[test]
    fn test_market_without_valid_rows_dropped() {
        let markets = normalizer().normalize(&batch(
            json!([
                { "marketId": "1.4", "marketName": "Empty", "runners": [{ "runnerName": "tie", "selectionId": 5 }] },
                { "marketName": "No id", "runners": [{ "runnerName": "A", "selectionId": 5 }] }
            ]),
            json!([]),
        ));
        assert!(markets.is_empty());
    }

    #[test]
    fn test_event_metadata_carried() {
        let markets = normalizer().normalize(&batch(
            json!([{
                "marketId": "1.5", "marketName": "Bookmaker",
                "event": { "id": "3321", "name": "India v Australia", "openDate": "2024-02-10T09:30:00.000Z", "countryCode": "IN", "timezone": "GMT" },
                "runners": [{ "selectionId": 1, "runnerName": "India" }]
            }]),
            json!([]),
        ));
        let m = &markets[0];
        assert_eq!(m.market_type, Some(crate::models::MarketKind::Match1));
        let event = m.event.as_ref().unwrap();
        assert_eq!(event.name.as_deref(), Some("India v Australia"));
        assert!(event.open_date.is_some());
        assert_eq!(event.country_code.as_deref(), Some("IN"));
    }
}
