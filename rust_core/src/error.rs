//! Error taxonomy for the reconciliation pipeline.
//!
//! Data-shape problems never escape the pipeline: they are logged and the
//! affected runner, market or feed degrades to "absent". The types here exist
//! so those log lines carry a structured reason, and so the few genuinely
//! fallible entry points (config validation, sweeper start) can report why.

use thiserror::Error;

/// A single malformed runner that was skipped while its market carried on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataIntegrityIssue {
    #[error("runner '{runner_name}' has no selection id")]
    MissingSelectionId { runner_name: String },

    #[error("runner '{runner_name}' has non-positive selection id {selection_id}")]
    NonPositiveSelectionId { runner_name: String, selection_id: i64 },

    #[error("runner '{runner_name}' is a tie selection")]
    TieRunner { runner_name: String },
}

/// Feed-level decode failures. Callers of the pipeline never see these; the
/// feed is treated as empty and the error is logged.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("{feed} feed: response matched no known wrapper shape")]
    UnrecognizedShape { feed: &'static str },

    #[error("{feed} feed: invalid JSON: {source}")]
    InvalidJson {
        feed: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Inconsistent pipeline configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("odds column count must be at least 1")]
    ZeroColumns,

    #[error("default min stake {min} exceeds default max stake {max}")]
    StakeRange { min: f64, max: f64 },

    #[error("blink window must be non-zero")]
    ZeroBlinkWindow,

    #[error("blink sweep interval must be non-zero")]
    ZeroSweepInterval,
}

/// Live board hosting errors.
#[derive(Debug, Error)]
pub enum BoardError {
    #[error("blink sweeper requires a running tokio runtime")]
    NoRuntime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_issue_display() {
        let issue = DataIntegrityIssue::NonPositiveSelectionId {
            runner_name: "Draw".to_string(),
            selection_id: 0,
        };
        assert_eq!(
            issue.to_string(),
            "runner 'Draw' has non-positive selection id 0"
        );
    }

    #[test]
    fn test_feed_error_names_feed() {
        let err = FeedError::UnrecognizedShape { feed: "odds" };
        assert!(err.to_string().starts_with("odds feed"));
    }
}
