//! Helpers shared by the calculators.

use rust_decimal::Decimal;

use crate::TaxOutput;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// The engine never rounds intermediate values; this is for callers that
/// present or compare final amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use broadtax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(3231.905)), dec!(3231.91));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Finishes a calculation as an amount or as a rate over `income`.
///
/// Either way the result is zero when `income` is zero or negative, which
/// also keeps rates free of division by zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use broadtax_core::TaxOutput;
/// use broadtax_core::calculations::common::amount_or_rate;
///
/// assert_eq!(amount_or_rate(dec!(154), dec!(1000), TaxOutput::Amount), dec!(154));
/// assert_eq!(amount_or_rate(dec!(154), dec!(1000), TaxOutput::Rate), dec!(0.154));
/// assert_eq!(amount_or_rate(dec!(154), dec!(0), TaxOutput::Rate), dec!(0));
/// ```
pub fn amount_or_rate(
    amount: Decimal,
    income: Decimal,
    output: TaxOutput,
) -> Decimal {
    if income <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    match output {
        TaxOutput::Amount => amount,
        TaxOutput::Rate => amount / income,
    }
}
