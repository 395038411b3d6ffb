use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount for display: two decimal places, halves away from zero.
///
/// Rounding is presentational only. Totals are carried exact and rounded
/// once per displayed figure, never mid-computation.
pub fn round_kes(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Format an amount with exactly two decimals, e.g. `210.00`.
pub fn fmt_kes(value: Decimal) -> String {
    format!("{:.2}", round_kes(value))
}
