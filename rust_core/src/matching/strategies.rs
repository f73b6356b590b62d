//! Built-in runner matching strategies.

use super::{MatchContext, RunnerMatcher};
use crate::feeds::RawOddsRunner;

/// Match on selection id equality
pub struct ExactIdMatcher;

impl RunnerMatcher for ExactIdMatcher {
    fn find<'a>(&self, ctx: &MatchContext<'a>) -> Option<&'a RawOddsRunner> {
        ctx.odds_runners
            .iter()
            .find(|r| r.selection_id == Some(ctx.selection_id))
    }

    fn matcher_name(&self) -> &'static str {
        "exact_id"
    }
}

/// Match by array index, only when both feeds list the same number of runners
pub struct PositionalMatcher;

impl RunnerMatcher for PositionalMatcher {
    fn find<'a>(&self, ctx: &MatchContext<'a>) -> Option<&'a RawOddsRunner> {
        if ctx.odds_runners.len() != ctx.definition_len {
            return None;
        }
        ctx.odds_runners.get(ctx.position)
    }

    fn matcher_name(&self) -> &'static str {
        "positional"
    }
}
