//! Runner Reconciliation
//!
//! Resolves the authoritative identity of a definition-feed runner and locates
//! its price data in the odds feed. Identity always comes from the definition
//! feed; the odds feed's own selection id is only ever a lookup key.
//!
//! Price lookup is an ordered chain of [`RunnerMatcher`] strategies. The first
//! strategy that returns a runner wins. The default chain is exact id, then
//! positional; a runner nothing matches keeps sentinel prices.

use crate::error::DataIntegrityIssue;
use crate::feeds::{RawOddsRunner, RawRunner};

// Concrete matcher implementations
pub mod strategies;

pub use strategies::{ExactIdMatcher, PositionalMatcher};

/// Everything a strategy may look at when locating one runner's prices
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    /// Authoritative selection id of the definition runner
    pub selection_id: i64,
    /// Index of the runner in the definition feed's runner array
    pub position: usize,
    /// Length of the definition feed's runner array (before any skips)
    pub definition_len: usize,
    pub odds_runners: &'a [RawOddsRunner],
}

/// Result of running the matcher chain for one runner
#[derive(Debug, Clone, Copy)]
pub enum RunnerMatch<'a> {
    Matched {
        runner: &'a RawOddsRunner,
        matcher: &'static str,
    },
    Unmatched,
}

impl<'a> RunnerMatch<'a> {
    pub fn runner(&self) -> Option<&'a RawOddsRunner> {
        match self {
            RunnerMatch::Matched { runner, .. } => Some(runner),
            RunnerMatch::Unmatched => None,
        }
    }

    pub fn matcher_name(&self) -> Option<&'static str> {
        match self {
            RunnerMatch::Matched { matcher, .. } => Some(matcher),
            RunnerMatch::Unmatched => None,
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, RunnerMatch::Matched { .. })
    }
}

/// One discrete strategy for locating an odds runner.
///
/// Implementations must return a definite answer: the matching runner, or
/// `None` to let the next strategy try.
pub trait RunnerMatcher: Send + Sync {
    fn find<'a>(&self, ctx: &MatchContext<'a>) -> Option<&'a RawOddsRunner>;

    /// Matcher name for logging and debugging
    fn matcher_name(&self) -> &'static str;
}

/// Ordered matcher chain
pub struct RunnerMatcherChain {
    matchers: Vec<Box<dyn RunnerMatcher>>,
}

impl RunnerMatcherChain {
    /// Create a chain with the default strategies: exact id, then positional
    pub fn new() -> Self {
        let matchers: Vec<Box<dyn RunnerMatcher>> =
            vec![Box::new(ExactIdMatcher), Box::new(PositionalMatcher)];
        Self { matchers }
    }

    /// Chain with no strategies; every runner is unmatched
    pub fn empty() -> Self {
        Self { matchers: Vec::new() }
    }

    /// Append a strategy, tried after every existing one
    pub fn register_matcher(&mut self, matcher: Box<dyn RunnerMatcher>) {
        self.matchers.push(matcher);
    }

    pub fn matcher_names(&self) -> Vec<&'static str> {
        self.matchers.iter().map(|m| m.matcher_name()).collect()
    }

    pub fn resolve<'a>(&self, ctx: &MatchContext<'a>) -> RunnerMatch<'a> {
        for matcher in &self.matchers {
            if let Some(runner) = matcher.find(ctx) {
                return RunnerMatch::Matched {
                    runner,
                    matcher: matcher.matcher_name(),
                };
            }
        }
        RunnerMatch::Unmatched
    }
}

impl Default for RunnerMatcherChain {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a definition runner and return its authoritative selection id.
///
/// Tie runners and runners without a positive id are rejected.
pub fn authoritative_selection_id(runner: &RawRunner) -> Result<i64, DataIntegrityIssue> {
    if runner.runner_name.trim().eq_ignore_ascii_case("tie") {
        return Err(DataIntegrityIssue::TieRunner {
            runner_name: runner.runner_name.clone(),
        });
    }
    match runner.selection_id {
        None => Err(DataIntegrityIssue::MissingSelectionId {
            runner_name: runner.runner_name.clone(),
        }),
        Some(id) if id <= 0 => Err(DataIntegrityIssue::NonPositiveSelectionId {
            runner_name: runner.runner_name.clone(),
            selection_id: id,
        }),
        Some(id) => Ok(id),
    }
}

/// Position of another definition runner whose own id equals `odds_selection_id`.
///
/// A positional match onto such an odds runner shows the sibling's prices.
pub fn sibling_owner(
    definition_runners: &[RawRunner],
    position: usize,
    odds_selection_id: Option<i64>,
) -> Option<usize> {
    let odds_selection_id = odds_selection_id?;
    definition_runners
        .iter()
        .enumerate()
        .find(|(index, runner)| *index != position && runner.selection_id == Some(odds_selection_id))
        .map(|(index, _)| index)
}
