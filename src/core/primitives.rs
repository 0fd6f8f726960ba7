use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{ChartError, ChartResult};

pub(crate) fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

/// Rounds `value` to `places` decimals, halves away from zero.
///
/// Goes through `Decimal` so `0.455` rounds to `0.46` instead of tripping over
/// its binary representation. Non-finite input is returned unchanged.
#[must_use]
pub fn round_to_places(value: f64, places: u32) -> f64 {
    let Some(decimal) = Decimal::from_f64(value) else {
        return value;
    };
    decimal
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(value)
}

/// Converts a raw 0..=100 percentage into a stored proportion: `round(p / 100, 3)`.
pub fn percent_to_proportion(percent: Decimal, field_name: &str) -> ChartResult<f64> {
    let scaled = (percent / Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero);
    decimal_to_f64(scaled, field_name)
}

/// Converts a stored proportion back to a display percentage: `round(v * 100, 1)`.
#[must_use]
pub fn proportion_to_percent(proportion: f64) -> f64 {
    let Some(decimal) = Decimal::from_f64(proportion) else {
        return proportion * 100.0;
    };
    (decimal * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(proportion * 100.0)
}

/// Renders a plain number the way a table cell shows it: integers without a
/// fractional part, everything else with the shortest round-tripping digits.
#[must_use]
pub fn display_number(value: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_owned();
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
