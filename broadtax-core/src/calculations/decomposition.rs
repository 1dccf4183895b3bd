//! Isolating one income component's share of a composite liability.
//!
//! Two techniques are layered on any `Fn(Decimal) -> Decimal` that holds
//! the other components fixed:
//!
//! - [`isolate`]: `total(x) - total(0)`, the liability added by `x`. For a
//!   liability non-linear in `x` this is an attribution, not an exact split.
//! - [`marginal_rate`]: `(isolated(x + 1) - isolated(x)) / 1`, a forward
//!   difference over one unit of currency (unit-10k), not a derivative.
//!
//! `component + 1` must be representable; see the crate-level supported range.

use rust_decimal::Decimal;

/// Width of the forward-difference step used by [`marginal_rate`].
pub const MARGINAL_STEP: Decimal = Decimal::ONE;

/// Liability attributable to `component`, against a zero baseline.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use broadtax_core::calculations::decomposition::isolate;
///
/// let total = |x| dec!(100) + x * dec!(0.2);
///
/// assert_eq!(isolate(total, dec!(50)), dec!(10));
/// ```
pub fn isolate<F>(
    total: F,
    component: Decimal,
) -> Decimal
where
    F: Fn(Decimal) -> Decimal,
{
    total(component) - total(Decimal::ZERO)
}

/// Unit-step marginal rate of `isolated` at `component`; zero when
/// `component` is zero or negative.
pub fn marginal_rate<F>(
    isolated: F,
    component: Decimal,
) -> Decimal
where
    F: Fn(Decimal) -> Decimal,
{
    if component <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    (isolated(component + MARGINAL_STEP) - isolated(component)) / MARGINAL_STEP
}
