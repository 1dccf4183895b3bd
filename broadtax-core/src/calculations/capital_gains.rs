//! Capital gains tax on the sale of a one-home residence.
//!
//! # Calculation Structure
//!
//! | Step | Rule |
//! |------|------|
//! | Taxable fraction | 0 if sell ≤ 120000, else `1 − 120000 / sell` |
//! | Deduction ratio | holding credit + residency credit, each `min(⌊years⌋ × 4%, 40%)` |
//! | Gain | `(sell × share − buy × share − expense) × taxable fraction` |
//! | Tax base | `max(gain × (1 − deduction ratio) − 250, 0)` |
//! | Tax | Progressive schedule on the tax base |
//!
//! A holding period under 3 years earns no holding credit, and a residency
//! period under 2 years earns no residency credit.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::calculations::common::max;
use crate::{CapitalGainsScenario, TaxYearConfig};

/// Intermediate values of a capital gains tax calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsResult {
    pub taxable_fraction: Decimal,
    pub capital_gain: Decimal,
    pub deduction_ratio: Decimal,
    pub tax_base: Decimal,
    pub tax: Decimal,
}

/// Calculator for the one-home capital gains tax.
#[derive(Debug, Clone, Copy)]
pub struct CapitalGainsWorksheet<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> CapitalGainsWorksheet<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    /// Fraction of the gain that remains taxable after the one-home
    /// exemption: 0 means fully exempt, 1 fully taxable.
    pub fn exemption_taxable_fraction(
        &self,
        sell_price: Decimal,
    ) -> Decimal {
        let cutoff = self.config.luxury_house_cutoff;
        if sell_price <= cutoff {
            return Decimal::ZERO;
        }

        Decimal::ONE - cutoff / sell_price
    }

    /// Combined long-term holding deduction ratio for the holding and
    /// residency periods, in years.
    pub fn holding_deduction_ratio(
        &self,
        hold_years: Decimal,
        residency_years: Decimal,
    ) -> Decimal {
        let holding = self.period_credit(
            hold_years,
            self.config.min_holding_years,
            self.config.max_holding_deduction,
        );
        let residency = self.period_credit(
            residency_years,
            self.config.min_residency_years,
            self.config.max_residency_deduction,
        );

        holding + residency
    }

    /// Seller's share of the gain that remains after the one-home exemption.
    pub fn capital_gain(
        &self,
        scenario: &CapitalGainsScenario,
    ) -> Decimal {
        let share = scenario.holder_ratio;
        let gain = scenario.sell_price * share - scenario.buy_price * share - scenario.expense;

        gain * self.exemption_taxable_fraction(scenario.sell_price)
    }

    /// Gain after the holding deduction and the basic deduction, floored at zero.
    pub fn tax_base(
        &self,
        scenario: &CapitalGainsScenario,
    ) -> Decimal {
        let gain = self.capital_gain(scenario);
        let ratio = self.holding_deduction_ratio(scenario.hold_years, scenario.residency_years);

        self.base_after_deductions(gain, ratio, scenario)
    }

    /// Capital gains tax, local surtax included.
    pub fn capital_gain_tax(
        &self,
        scenario: &CapitalGainsScenario,
    ) -> Decimal {
        self.config.brackets.tax_for(self.tax_base(scenario))
    }

    /// Runs every step of the calculation.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use broadtax_core::{CapitalGainsScenario, CapitalGainsWorksheet, TaxYearConfig};
    ///
    /// let config = TaxYearConfig::year_2025();
    /// let worksheet = CapitalGainsWorksheet::new(&config);
    ///
    /// let scenario = CapitalGainsScenario {
    ///     holder_ratio: dec!(0.5),
    ///     expense: dec!(2000),
    ///     hold_years: dec!(5),
    ///     residency_years: dec!(3),
    ///     ..CapitalGainsScenario::new(dec!(200000), dec!(100000))
    /// };
    ///
    /// let result = worksheet.calculate(&scenario);
    ///
    /// assert_eq!(result.tax_base, dec!(12806));
    /// assert_eq!(result.tax, dec!(3231.91));
    /// ```
    pub fn calculate(
        &self,
        scenario: &CapitalGainsScenario,
    ) -> CapitalGainsResult {
        let taxable_fraction = self.exemption_taxable_fraction(scenario.sell_price);
        let capital_gain = self.capital_gain(scenario);
        let deduction_ratio =
            self.holding_deduction_ratio(scenario.hold_years, scenario.residency_years);
        let tax_base = self.base_after_deductions(capital_gain, deduction_ratio, scenario);
        let tax = self.config.brackets.tax_for(tax_base);

        trace!(
            sell_price = %scenario.sell_price,
            taxable_fraction = %taxable_fraction,
            tax_base = %tax_base,
            "capital gains tax calculated"
        );

        CapitalGainsResult {
            taxable_fraction,
            capital_gain,
            deduction_ratio,
            tax_base,
            tax,
        }
    }

    fn base_after_deductions(
        &self,
        gain: Decimal,
        deduction_ratio: Decimal,
        scenario: &CapitalGainsScenario,
    ) -> Decimal {
        let deduction = scenario
            .base_deduction
            .unwrap_or(self.config.capital_gain_deduction);

        max(gain * (Decimal::ONE - deduction_ratio) - deduction, Decimal::ZERO)
    }

    fn period_credit(
        &self,
        years: Decimal,
        min_years: Decimal,
        cap: Decimal,
    ) -> Decimal {
        if years < min_years {
            return Decimal::ZERO;
        }

        (years.floor() * self.config.annual_deduction_rate).min(cap)
    }
}
