//! Deserializers for numbers that may arrive as strings, numbers or null.
//!
//! Upstream feeds are inconsistent about quoting: the same `price` may be
//! `1.85`, `"1.85"` or missing depending on which backend produced it.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Int(i64),
    Float(f64),
    String(String),
    Null,
}

impl StringOrNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            StringOrNumber::Int(n) => Some(*n as f64),
            StringOrNumber::Float(n) => Some(*n),
            StringOrNumber::String(s) => s.trim().parse().ok(),
            StringOrNumber::Null => None,
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            StringOrNumber::Int(n) => Some(*n),
            StringOrNumber::Float(n) if n.is_finite() && n.fract() == 0.0 => Some(*n as i64),
            StringOrNumber::Float(_) => None,
            StringOrNumber::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|n| n.is_finite() && n.fract() == 0.0)
                        .map(|n| n as i64)
                })
            }
            StringOrNumber::Null => None,
        }
    }

    fn into_id_string(self) -> Option<String> {
        match self {
            StringOrNumber::Int(n) => Some(n.to_string()),
            StringOrNumber::Float(n) => Some(n.to_string()),
            StringOrNumber::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            StringOrNumber::Null => None,
        }
    }
}

/// `Option<f64>` from a number, numeric string or null. Unparseable strings become `None`.
pub fn f64_opt<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_f64()).filter(|n| n.is_finite()))
}

/// `Option<i64>` from an integer, integral float, numeric string or null.
pub fn i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

/// Identifier that may be quoted or bare (`"1.2345"`, `4521`).
pub fn id_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<StringOrNumber> = Option::deserialize(deserializer)?;
    Ok(value.and_then(StringOrNumber::into_id_string))
}

/// Boolean that may arrive as `true`, `"true"`, `1` or null (null = false).
pub fn bool_lenient<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolLike {
        Bool(bool),
        Int(i64),
        String(String),
        Null,
    }

    Ok(match Option::<BoolLike>::deserialize(deserializer)? {
        Some(BoolLike::Bool(b)) => b,
        Some(BoolLike::Int(n)) => n != 0,
        Some(BoolLike::String(s)) => matches!(s.trim().to_lowercase().as_str(), "true" | "1"),
        Some(BoolLike::Null) | None => false,
    })
}
