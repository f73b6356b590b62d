//! Price ladder formatting.
//!
//! Turns raw (price, size) pairs into a fixed-width ladder of display strings:
//! back sorted best-first (highest), lay sorted best-first (lowest), truncated
//! to the column count and padded with sentinels.

use crate::models::{PriceLevel, Side};
use std::cmp::Ordering;

/// Sorts, truncates, pads and formats one side of a price ladder.
#[derive(Debug, Clone, Copy)]
pub struct OddsFormatter {
    columns: usize,
}

impl OddsFormatter {
    pub fn new(columns: usize) -> Self {
        Self {
            columns: columns.max(1),
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Format one side of the ladder from raw `(price, size)` pairs.
    ///
    /// Levels without a positive finite price are treated as absent.
    pub fn format_side<I>(&self, side: Side, levels: I) -> Vec<PriceLevel>
    where
        I: IntoIterator<Item = (Option<f64>, Option<f64>)>,
    {
        let mut quoted: Vec<(f64, f64)> = levels
            .into_iter()
            .filter_map(|(price, size)| {
                let price = price.filter(|p| p.is_finite() && *p > 0.0)?;
                Some((price, size.unwrap_or(0.0)))
            })
            .collect();

        quoted.sort_by(|a, b| best_first(side, a.0, b.0));

        let mut formatted: Vec<PriceLevel> = quoted
            .into_iter()
            .take(self.columns)
            .map(|(price, size)| PriceLevel::new(format_price(price), format_volume(size)))
            .collect();
        formatted.resize(self.columns, PriceLevel::sentinel());
        formatted
    }

    /// A side with no quoted levels at all
    pub fn empty_side(&self) -> Vec<PriceLevel> {
        vec![PriceLevel::sentinel(); self.columns]
    }
}

/// Back: highest price first. Lay: lowest price first.
fn best_first(side: Side, a: f64, b: f64) -> Ordering {
    match side {
        Side::Back => b.total_cmp(&a),
        Side::Lay => a.total_cmp(&b),
    }
}

/// Rounded to cents first; whole results print without decimals, the rest with two.
pub fn format_price(price: f64) -> String {
    if !price.is_finite() || price <= 0.0 {
        return PriceLevel::SENTINEL_VALUE.to_string();
    }
    let rounded = (price * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{:.2}", rounded)
    }
}

/// `>= 1000` → one-decimal thousands ("1.5k"), `0` → "0", else two decimals.
pub fn format_volume(size: f64) -> String {
    if !size.is_finite() || size <= 0.0 {
        return PriceLevel::SENTINEL_VALUE.to_string();
    }
    if size >= 1000.0 {
        format!("{:.1}k", size / 1000.0)
    } else {
        format!("{:.2}", size)
    }
}
