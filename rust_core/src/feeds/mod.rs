//! Feed decoding: wire shapes plus response-wrapper probing.
//!
//! Upstream endpoints disagree on how they wrap their payload. Probing tries
//! the known wrappers in a fixed order and fails closed to an empty list; a
//! single undecodable element is skipped without discarding its siblings.

use crate::error::FeedError;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

pub mod lenient;
pub mod raw;

pub use raw::{
    RawBookmakerFancyMarket, RawEvent, RawExchangePrices, RawLegacyMarketEntry,
    RawMarketDefinition, RawOddsRunner, RawOddsSnapshot, RawPriceSize, RawRunner, RawSection,
    RawSectionMarket, RawSectionOdds,
};

/// Known response wrappers, in match order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `[ ... ]`
    BareArray,
    /// `{ "data": [ ... ] }` (optionally with a `status` flag)
    DataWrapper,
    /// `{ "success": bool, "data": [ ... ] }`
    SuccessDataWrapper,
}

pub const ENVELOPE_MATCH_ORDER: [EnvelopeShape; 3] = [
    EnvelopeShape::BareArray,
    EnvelopeShape::DataWrapper,
    EnvelopeShape::SuccessDataWrapper,
];

/// Outcome of matching one wrapper shape
enum ShapeMatch<'a> {
    NoMatch,
    /// Wrapper matched but upstream flagged the response as failed
    Rejected,
    Items(&'a [Value]),
}

impl EnvelopeShape {
    fn try_unwrap<'a>(&self, value: &'a Value) -> ShapeMatch<'a> {
        match self {
            EnvelopeShape::BareArray => match value {
                Value::Array(items) => ShapeMatch::Items(items),
                _ => ShapeMatch::NoMatch,
            },
            EnvelopeShape::DataWrapper => {
                let Some(obj) = value.as_object() else {
                    return ShapeMatch::NoMatch;
                };
                if obj.contains_key("success") {
                    return ShapeMatch::NoMatch;
                }
                match obj.get("data") {
                    Some(Value::Array(items)) => {
                        if obj.get("status").and_then(Value::as_bool) == Some(false) {
                            ShapeMatch::Rejected
                        } else {
                            ShapeMatch::Items(items)
                        }
                    }
                    _ => ShapeMatch::NoMatch,
                }
            }
            EnvelopeShape::SuccessDataWrapper => {
                let Some(obj) = value.as_object() else {
                    return ShapeMatch::NoMatch;
                };
                let Some(success) = obj.get("success").and_then(Value::as_bool) else {
                    return ShapeMatch::NoMatch;
                };
                match obj.get("data") {
                    Some(Value::Array(items)) if success => ShapeMatch::Items(items),
                    Some(Value::Array(_)) => ShapeMatch::Rejected,
                    _ => ShapeMatch::NoMatch,
                }
            }
        }
    }
}

/// Unwrap a feed response into its element list, or `Err` if no shape matched.
pub fn unwrap_envelope<'a>(feed: &'static str, value: &'a Value) -> Result<&'a [Value], FeedError> {
    for shape in ENVELOPE_MATCH_ORDER {
        match shape.try_unwrap(value) {
            ShapeMatch::Items(items) => {
                debug!(feed, ?shape, count = items.len(), "feed envelope matched");
                return Ok(items);
            }
            ShapeMatch::Rejected => {
                debug!(feed, ?shape, "feed response flagged unsuccessful, treating as empty");
                return Ok(&[]);
            }
            ShapeMatch::NoMatch => {}
        }
    }
    Err(FeedError::UnrecognizedShape { feed })
}

/// Decode every element of a feed response. Never fails: unknown wrappers
/// yield an empty list and undecodable elements are skipped, both logged.
pub fn decode_list<T: DeserializeOwned>(feed: &'static str, value: &Value) -> Vec<T> {
    let items = match unwrap_envelope(feed, value) {
        Ok(items) => items,
        Err(e) => {
            warn!(feed, error = %e, "unrecognized feed response, treating as empty");
            return Vec::new();
        }
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match T::deserialize(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                warn!(feed, index, error = %e, "skipping undecodable feed element");
                None
            }
        })
        .collect()
}

/// Parse a raw response body, then decode it like [`decode_list`].
pub fn decode_list_str<T: DeserializeOwned>(feed: &'static str, body: &str) -> Vec<T> {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => decode_list(feed, &value),
        Err(source) => {
            let e = FeedError::InvalidJson { feed, source };
            warn!(feed, error = %e, "feed body is not JSON, treating as empty");
            Vec::new()
        }
    }
}
