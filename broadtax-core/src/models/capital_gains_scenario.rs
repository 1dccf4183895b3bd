use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A one-home real estate disposal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsScenario {
    pub sell_price: Decimal,
    pub buy_price: Decimal,

    /// Seller's ownership share, in `(0, 1]`.
    pub holder_ratio: Decimal,

    /// Seller's own necessary expenses.
    pub expense: Decimal,
    pub hold_years: Decimal,
    pub residency_years: Decimal,

    /// Overrides the configured basic capital gains deduction.
    #[serde(default)]
    pub base_deduction: Option<Decimal>,
}

impl CapitalGainsScenario {
    /// Sole ownership, no expenses, no holding or residency period.
    pub fn new(
        sell_price: Decimal,
        buy_price: Decimal,
    ) -> Self {
        Self {
            sell_price,
            buy_price,
            holder_ratio: Decimal::ONE,
            expense: Decimal::ZERO,
            hold_years: Decimal::ZERO,
            residency_years: Decimal::ZERO,
            base_deduction: None,
        }
    }
}
