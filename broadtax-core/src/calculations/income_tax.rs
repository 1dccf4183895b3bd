//! Income tax on financial and non-financial income.
//!
//! # Calculation Structure
//!
//! | Operation | Rule |
//! |-----------|------|
//! | `income_tax` | Progressive schedule on a tax base (zero if base ≤ 0) |
//! | `withhold_tax` | `max(F, 0) × 15.4%` |
//! | `comp_income_tax` | Schedule on `income − deduction`; zero if income ≤ 0 |
//! | `final_income_tax` | F ≤ 2000: separate taxation; F > 2000: greater of the two methods |
//! | `income_tax_for_fin` | `final(F, N) − final(0, N)`; zero if F ≤ 0 |
//! | `income_tax_for_fin_marginal_rate` | Unit forward difference of the above |
//!
//! When financial income F exceeds the comprehensive taxation cutoff C the
//! taxpayer owes the greater of:
//!
//! - Method 1: comprehensive tax on `F + N − C` plus withholding on `C`
//! - Method 2: comprehensive tax on `N` plus withholding on all of `F`
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use broadtax_core::{IncomeTaxCalculator, TaxOutput, TaxYearConfig};
//!
//! let config = TaxYearConfig::year_2025();
//! let calculator = IncomeTaxCalculator::new(&config);
//!
//! // Method 1: comp(6000) + withhold(2000) = 910.8 + 308
//! // Method 2: comp(3000) + withhold(5000) = 331.65 + 770
//! let tax = calculator.final_income_tax(dec!(5000), dec!(3000), TaxOutput::Amount);
//!
//! assert_eq!(tax, dec!(1218.8));
//! ```

use rust_decimal::Decimal;
use tracing::trace;

use crate::calculations::common::{amount_or_rate, max};
use crate::calculations::decomposition::{isolate, marginal_rate};
use crate::{TaxOutput, TaxYearConfig};

/// Calculator for comprehensive, withholding and combined income tax.
#[derive(Debug, Clone, Copy)]
pub struct IncomeTaxCalculator<'a> {
    config: &'a TaxYearConfig,
}

impl<'a> IncomeTaxCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &'a TaxYearConfig {
        self.config
    }

    /// Tax on `tax_base` under the configured progressive schedule.
    pub fn income_tax(
        &self,
        tax_base: Decimal,
    ) -> Decimal {
        self.config.brackets.tax_for(tax_base)
    }

    /// Flat withholding tax on financial income.
    pub fn withhold_tax(
        &self,
        fin_income: Decimal,
        output: TaxOutput,
    ) -> Decimal {
        if fin_income <= Decimal::ZERO {
            trace!(fin_income = %fin_income, "non-positive financial income; no withholding");
        }

        let tax = max(fin_income, Decimal::ZERO) * self.config.withholding_rate;

        amount_or_rate(tax, fin_income, output)
    }

    /// Progressive tax on `comp_income` after the personal deduction.
    ///
    /// The zero guard looks at `comp_income`, not at the tax base; an
    /// income below the deduction has a negative base that the schedule
    /// already floors to zero.
    pub fn comp_income_tax(
        &self,
        comp_income: Decimal,
        output: TaxOutput,
    ) -> Decimal {
        let tax_base = comp_income - self.config.earned_income_deduction;
        let tax = self.income_tax(tax_base);

        if comp_income <= Decimal::ZERO {
            trace!(comp_income = %comp_income, "non-positive comprehensive income; no tax");
        }

        amount_or_rate(tax, comp_income, output)
    }

    /// Total income tax on financial income `fin_income` and other income
    /// `ex_fin_income`. A rate is measured against their sum.
    pub fn final_income_tax(
        &self,
        fin_income: Decimal,
        ex_fin_income: Decimal,
        output: TaxOutput,
    ) -> Decimal {
        let total_income = fin_income + ex_fin_income;
        let cutoff = self.config.financial_income_cutoff;

        if total_income <= Decimal::ZERO {
            trace!(total_income = %total_income, "non-positive total income; no income tax");
        }

        let separate = self.comp_income_tax(ex_fin_income, TaxOutput::Amount)
            + self.withhold_tax(fin_income, TaxOutput::Amount);

        let tax = if fin_income <= cutoff {
            separate
        } else {
            let excess_method = self.comp_income_tax(total_income - cutoff, TaxOutput::Amount)
                + self.withhold_tax(cutoff, TaxOutput::Amount);

            trace!(
                fin_income = %fin_income,
                excess_method = %excess_method,
                separate_method = %separate,
                "financial income above comprehensive taxation cutoff"
            );
            max(excess_method, separate)
        };

        amount_or_rate(tax, total_income, output)
    }

    /// Share of [`final_income_tax`](Self::final_income_tax) attributable to
    /// financial income. A rate is measured against `fin_income`.
    pub fn income_tax_for_fin(
        &self,
        fin_income: Decimal,
        ex_fin_income: Decimal,
        output: TaxOutput,
    ) -> Decimal {
        let tax = self.fin_share(fin_income, ex_fin_income);

        amount_or_rate(tax, fin_income, output)
    }

    /// Marginal income tax rate on one more unit of financial income.
    pub fn income_tax_for_fin_marginal_rate(
        &self,
        fin_income: Decimal,
        ex_fin_income: Decimal,
    ) -> Decimal {
        marginal_rate(|f| self.fin_share(f, ex_fin_income), fin_income)
    }

    fn fin_share(
        &self,
        fin_income: Decimal,
        ex_fin_income: Decimal,
    ) -> Decimal {
        isolate(
            |f| self.final_income_tax(f, ex_fin_income, TaxOutput::Amount),
            fin_income,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};
    use rust_decimal_macros::dec;

    use super::*;

    fn config() -> TaxYearConfig {
        TaxYearConfig::year_2025()
    }

    // =========================================================================
    // withhold_tax tests
    // =========================================================================

    #[test]
    fn withhold_tax_applies_flat_rate() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(calculator.withhold_tax(dec!(1000), TaxOutput::Amount), dec!(154));
        assert_eq!(calculator.withhold_tax(dec!(1000), TaxOutput::Rate), dec!(0.154));
    }

    #[test]
    fn withhold_tax_non_positive_income_is_zero() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(calculator.withhold_tax(dec!(-5), TaxOutput::Amount), dec!(0));
        assert_eq!(calculator.withhold_tax(dec!(0), TaxOutput::Rate), dec!(0));
    }

    // =========================================================================
    // comp_income_tax tests
    // =========================================================================

    #[test]
    fn comp_income_tax_subtracts_deduction() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        // Base 1400 -> (1400 * 0.06) * 1.1
        assert_eq!(
            calculator.comp_income_tax(dec!(1550), TaxOutput::Amount),
            dec!(92.4)
        );
    }

    #[test]
    fn comp_income_tax_rate_divides_by_income() {
        let config = TaxYearConfig {
            earned_income_deduction: dec!(0),
            ..config()
        };
        let calculator = IncomeTaxCalculator::new(&config);

        // 1000 * 0.06 * 1.1 = 66
        assert_eq!(
            calculator.comp_income_tax(dec!(1000), TaxOutput::Rate),
            dec!(0.066)
        );
    }

    #[test]
    fn comp_income_tax_income_below_deduction_is_zero() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.comp_income_tax(dec!(100), TaxOutput::Amount),
            dec!(0)
        );
        assert_eq!(calculator.comp_income_tax(dec!(100), TaxOutput::Rate), dec!(0));
    }

    #[test]
    fn comp_income_tax_non_positive_income_is_zero() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(calculator.comp_income_tax(dec!(0), TaxOutput::Rate), dec!(0));
        assert_eq!(
            calculator.comp_income_tax(dec!(-100), TaxOutput::Amount),
            dec!(0)
        );
    }

    #[test]
    fn comp_income_tax_uses_configured_deduction() {
        let config = TaxYearConfig {
            earned_income_deduction: dec!(0),
            ..config()
        };
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.comp_income_tax(dec!(1400), TaxOutput::Amount),
            dec!(92.4)
        );
    }

    // =========================================================================
    // final_income_tax tests
    // =========================================================================

    #[test]
    fn final_income_tax_below_cutoff_taxes_separately() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        // comp(3000) + withhold(1000) = 331.65 + 154
        assert_eq!(
            calculator.final_income_tax(dec!(1000), dec!(3000), TaxOutput::Amount),
            dec!(485.65)
        );
    }

    #[test]
    fn final_income_tax_above_cutoff_takes_excess_method_when_larger() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        let excess_method = calculator.comp_income_tax(dec!(6000), TaxOutput::Amount)
            + calculator.withhold_tax(dec!(2000), TaxOutput::Amount);
        let separate_method = calculator.comp_income_tax(dec!(3000), TaxOutput::Amount)
            + calculator.withhold_tax(dec!(5000), TaxOutput::Amount);

        assert_eq!(excess_method, dec!(1218.8));
        assert_eq!(separate_method, dec!(1101.65));
        assert_eq!(
            calculator.final_income_tax(dec!(5000), dec!(3000), TaxOutput::Amount),
            dec!(1218.8)
        );
    }

    #[test]
    fn final_income_tax_above_cutoff_takes_separate_method_when_larger() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        // Excess method: comp(1000) + 308 = 56.1 + 308; separate: 3000 * 0.154
        assert_eq!(
            calculator.final_income_tax(dec!(3000), dec!(0), TaxOutput::Amount),
            dec!(462)
        );
    }

    #[test]
    fn final_income_tax_rate_uses_total_income() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.final_income_tax(dec!(5000), dec!(3000), TaxOutput::Rate),
            dec!(0.15235)
        );
    }

    #[test]
    fn final_income_tax_is_continuous_at_cutoff() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        let at = calculator.final_income_tax(dec!(2000), dec!(3000), TaxOutput::Amount);
        let below = calculator.final_income_tax(dec!(1999.99), dec!(3000), TaxOutput::Amount);
        let above = calculator.final_income_tax(dec!(2000.01), dec!(3000), TaxOutput::Amount);

        assert_eq!(at, dec!(639.65));
        assert!((at - below).abs() < dec!(0.01));
        assert!((above - at).abs() < dec!(0.01));
    }

    #[test]
    fn final_income_tax_non_positive_total_is_zero() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.final_income_tax(dec!(0), dec!(0), TaxOutput::Amount),
            dec!(0)
        );
        assert_eq!(
            calculator.final_income_tax(dec!(-100), dec!(50), TaxOutput::Rate),
            dec!(0)
        );
    }

    // =========================================================================
    // income_tax_for_fin tests
    // =========================================================================

    #[test]
    fn income_tax_for_fin_subtracts_baseline() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        // 1218.8 - comp(3000)
        assert_eq!(
            calculator.income_tax_for_fin(dec!(5000), dec!(3000), TaxOutput::Amount),
            dec!(887.15)
        );
        assert_eq!(
            calculator.income_tax_for_fin(dec!(5000), dec!(3000), TaxOutput::Rate),
            dec!(0.17743)
        );
    }

    #[test]
    fn income_tax_for_fin_below_cutoff_is_withholding() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.income_tax_for_fin(dec!(1000), dec!(3000), TaxOutput::Rate),
            dec!(0.154)
        );
    }

    #[test]
    fn income_tax_for_fin_non_positive_fin_income_is_zero() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.income_tax_for_fin(dec!(0), dec!(3000), TaxOutput::Amount),
            dec!(0)
        );
        assert_eq!(
            calculator.income_tax_for_fin(dec!(-10), dec!(3000), TaxOutput::Amount),
            dec!(0)
        );
    }

    // =========================================================================
    // income_tax_for_fin_marginal_rate tests
    // =========================================================================

    #[test]
    fn marginal_rate_below_cutoff_is_withholding_rate() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.income_tax_for_fin_marginal_rate(dec!(1000), dec!(3000)),
            dec!(0.154)
        );
    }

    #[test]
    fn marginal_rate_above_cutoff_follows_bracket() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        // Tax base 5850 sits in the 24% row: 0.24 * 1.1
        assert_eq!(
            calculator.income_tax_for_fin_marginal_rate(dec!(5000), dec!(3000)),
            dec!(0.264)
        );
    }

    #[test]
    fn marginal_rate_when_separate_method_wins() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.income_tax_for_fin_marginal_rate(dec!(3000), dec!(0)),
            dec!(0.154)
        );
    }

    #[test]
    fn marginal_rate_non_positive_fin_income_is_zero() {
        let config = config();
        let calculator = IncomeTaxCalculator::new(&config);

        assert_eq!(
            calculator.income_tax_for_fin_marginal_rate(dec!(0), dec!(3000)),
            dec!(0)
        );
    }

    // =========================================================================
    // properties
    // =========================================================================

    proptest! {
        #[test]
        fn prop_fin_share_plus_baseline_is_total(fin in 0i64..200_000, ex_fin in 0i64..200_000) {
            let config = config();
            let calculator = IncomeTaxCalculator::new(&config);
            let (fin, ex_fin) = (Decimal::from(fin), Decimal::from(ex_fin));

            let share = calculator.income_tax_for_fin(fin, ex_fin, TaxOutput::Amount);
            let baseline = calculator.final_income_tax(Decimal::ZERO, ex_fin, TaxOutput::Amount);

            prop_assert_eq!(
                share + baseline,
                calculator.final_income_tax(fin, ex_fin, TaxOutput::Amount)
            );
        }

        #[test]
        fn prop_combined_tax_is_at_least_separate_taxation(fin in 0i64..200_000, ex_fin in 0i64..200_000) {
            let config = config();
            let calculator = IncomeTaxCalculator::new(&config);
            let (fin, ex_fin) = (Decimal::from(fin), Decimal::from(ex_fin));

            let separate = calculator.comp_income_tax(ex_fin, TaxOutput::Amount)
                + calculator.withhold_tax(fin, TaxOutput::Amount);

            prop_assert!(calculator.final_income_tax(fin, ex_fin, TaxOutput::Amount) >= separate);
        }

        #[test]
        fn prop_methods_agree_at_cutoff(cents in -1_000_000i64..20_000_000) {
            let config = config();
            let calculator = IncomeTaxCalculator::new(&config);
            let ex_fin = Decimal::new(cents, 2);
            let cutoff = config.financial_income_cutoff;

            let excess_method = calculator.comp_income_tax(cutoff + ex_fin - cutoff, TaxOutput::Amount)
                + calculator.withhold_tax(cutoff, TaxOutput::Amount);
            let separate_method = calculator.comp_income_tax(ex_fin, TaxOutput::Amount)
                + calculator.withhold_tax(cutoff, TaxOutput::Amount);

            prop_assert_eq!(excess_method, separate_method);
            prop_assert_eq!(
                calculator.final_income_tax(cutoff, ex_fin, TaxOutput::Amount),
                separate_method
            );
        }

        #[test]
        fn prop_no_jump_just_above_cutoff(cents in -1_000_000i64..20_000_000) {
            let config = config();
            let calculator = IncomeTaxCalculator::new(&config);
            let ex_fin = Decimal::new(cents, 2);
            let cutoff = config.financial_income_cutoff;
            let step = Decimal::new(1, 2);

            let at = calculator.final_income_tax(cutoff, ex_fin, TaxOutput::Amount);
            let above = calculator.final_income_tax(cutoff + step, ex_fin, TaxOutput::Amount);

            prop_assert!(above >= at);
            prop_assert!(above - at <= step);
        }
    }
}
