use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of a progressive schedule, covering `(min_income, max_income]`.
///
/// `max_income` of `None` marks the open-ended top row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
    /// Factor applied to the whole row result; 1.1 grafts the 10% local
    /// income tax onto the national tax.
    pub surtax_multiplier: Decimal,
}

impl TaxBracket {
    /// Whether `tax_base` falls in this row. The upper bound is inclusive.
    pub fn contains(
        &self,
        tax_base: Decimal,
    ) -> bool {
        self.max_income.is_none_or(|max| tax_base <= max)
    }

    /// `(base_tax + (tax_base - min_income) * tax_rate) * surtax_multiplier`
    pub fn tax_for(
        &self,
        tax_base: Decimal,
    ) -> Decimal {
        (self.base_tax + (tax_base - self.min_income) * self.tax_rate) * self.surtax_multiplier
    }
}
