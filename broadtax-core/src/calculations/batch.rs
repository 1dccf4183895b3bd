//! Element-wise evaluation of every calculator over [`Series`] arguments.
//!
//! Each method broadcasts its scalar arguments against its array arguments
//! and evaluates the scalar calculator once per element. Elements are
//! independent of one another.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use broadtax_core::{BatchCalculator, Series, TaxOutput, TaxYearConfig};
//!
//! let config = TaxYearConfig::year_2025();
//! let batch = BatchCalculator::new(&config);
//!
//! let fin_income = Series::from(vec![dec!(1000), dec!(2000), dec!(5000)]);
//! let other_income = Series::from(dec!(3000));
//!
//! let tax = batch.final_income_tax(&fin_income, &other_income, TaxOutput::Amount)?;
//!
//! assert_eq!(tax, Series::from(vec![dec!(485.65), dec!(639.65), dec!(1218.8)]));
//! # Ok::<(), broadtax_core::CalculationError>(())
//! ```

use rust_decimal::Decimal;

use crate::calculations::{
    BroadTaxCalculator, CapitalGainsWorksheet, HealthPremiumCalculator, IncomeTaxCalculator,
    Series,
};
use crate::{CalculationError, CapitalGainsScenario, MembershipType, TaxOutput, TaxYearConfig};

/// Runs the scalar calculators over [`Series`] arguments.
#[derive(Debug, Clone, Copy)]
pub struct BatchCalculator<'a> {
    income_tax: IncomeTaxCalculator<'a>,
    health_premium: HealthPremiumCalculator<'a>,
    broad_tax: BroadTaxCalculator<'a>,
    capital_gains: CapitalGainsWorksheet<'a>,
}

impl<'a> BatchCalculator<'a> {
    pub fn new(config: &'a TaxYearConfig) -> Self {
        Self {
            income_tax: IncomeTaxCalculator::new(config),
            health_premium: HealthPremiumCalculator::new(config),
            broad_tax: BroadTaxCalculator::new(config),
            capital_gains: CapitalGainsWorksheet::new(config),
        }
    }

    // -------------------------------------------------------------------------
    // Income tax
    // -------------------------------------------------------------------------

    pub fn income_tax(
        &self,
        tax_base: &Series,
    ) -> Series {
        tax_base.map(|base| self.income_tax.income_tax(base))
    }

    pub fn withhold_tax(
        &self,
        fin_income: &Series,
        output: TaxOutput,
    ) -> Series {
        fin_income.map(|fin| self.income_tax.withhold_tax(fin, output))
    }

    pub fn comp_income_tax(
        &self,
        comp_income: &Series,
        output: TaxOutput,
    ) -> Series {
        comp_income.map(|income| self.income_tax.comp_income_tax(income, output))
    }

    pub fn final_income_tax(
        &self,
        fin_income: &Series,
        ex_fin_income: &Series,
        output: TaxOutput,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[fin_income, ex_fin_income], |args| {
            self.income_tax.final_income_tax(args[0], args[1], output)
        })
    }

    pub fn income_tax_for_fin(
        &self,
        fin_income: &Series,
        ex_fin_income: &Series,
        output: TaxOutput,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[fin_income, ex_fin_income], |args| {
            self.income_tax.income_tax_for_fin(args[0], args[1], output)
        })
    }

    pub fn income_tax_for_fin_marginal_rate(
        &self,
        fin_income: &Series,
        ex_fin_income: &Series,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[fin_income, ex_fin_income], |args| {
            self.income_tax.income_tax_for_fin_marginal_rate(args[0], args[1])
        })
    }

    // -------------------------------------------------------------------------
    // Health premium
    // -------------------------------------------------------------------------

    pub fn income_health_premium(
        &self,
        member_type: MembershipType,
        ex_salary: &Series,
        salary: &Series,
        output: TaxOutput,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[ex_salary, salary], |args| {
            self.health_premium
                .income_health_premium(member_type, args[0], args[1], output)
        })
    }

    /// Parses `member_type` before evaluating any element.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidCategory`] for an unknown tag and
    /// [`CalculationError::ShapeMismatch`] for arrays of different lengths.
    pub fn income_health_premium_for_tag(
        &self,
        member_type: &str,
        ex_salary: &Series,
        salary: &Series,
        output: TaxOutput,
    ) -> Result<Series, CalculationError> {
        let member_type = MembershipType::parse(member_type)?;

        self.income_health_premium(member_type, ex_salary, salary, output)
    }

    pub fn h_premium_for_ex_salary(
        &self,
        member_type: MembershipType,
        ex_salary: &Series,
        salary: &Series,
        output: TaxOutput,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[ex_salary, salary], |args| {
            self.health_premium
                .h_premium_for_ex_salary(member_type, args[0], args[1], output)
        })
    }

    pub fn h_premium_for_ex_salary_marginal_rate(
        &self,
        member_type: MembershipType,
        ex_salary: &Series,
        salary: &Series,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[ex_salary, salary], |args| {
            self.health_premium
                .h_premium_for_ex_salary_marginal_rate(member_type, args[0], args[1])
        })
    }

    // -------------------------------------------------------------------------
    // Broad tax
    // -------------------------------------------------------------------------

    pub fn broad_tax(
        &self,
        member_type: MembershipType,
        fin_income: &Series,
        salary: &Series,
        ex_fin_salary: &Series,
        output: TaxOutput,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[fin_income, salary, ex_fin_salary], |args| {
            self.broad_tax
                .broad_tax(member_type, args[0], args[1], args[2], output)
        })
    }

    pub fn broad_tax_for_fin(
        &self,
        member_type: MembershipType,
        fin_income: &Series,
        salary: &Series,
        ex_fin_salary: &Series,
        output: TaxOutput,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[fin_income, salary, ex_fin_salary], |args| {
            self.broad_tax
                .broad_tax_for_fin(member_type, args[0], args[1], args[2], output)
        })
    }

    pub fn broad_tax_for_fin_marginal_rate(
        &self,
        member_type: MembershipType,
        fin_income: &Series,
        salary: &Series,
        ex_fin_salary: &Series,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[fin_income, salary, ex_fin_salary], |args| {
            self.broad_tax
                .broad_tax_for_fin_marginal_rate(member_type, args[0], args[1], args[2])
        })
    }

    // -------------------------------------------------------------------------
    // Capital gains
    // -------------------------------------------------------------------------

    pub fn exemption_taxable_fraction(
        &self,
        sell_price: &Series,
    ) -> Series {
        sell_price.map(|sell| self.capital_gains.exemption_taxable_fraction(sell))
    }

    pub fn holding_deduction_ratio(
        &self,
        hold_years: &Series,
        residency_years: &Series,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[hold_years, residency_years], |args| {
            self.capital_gains.holding_deduction_ratio(args[0], args[1])
        })
    }

    pub fn capital_gain(
        &self,
        sell_price: &Series,
        buy_price: &Series,
        holder_ratio: &Series,
        expense: &Series,
    ) -> Result<Series, CalculationError> {
        Series::zip_with(&[sell_price, buy_price, holder_ratio, expense], |args| {
            let scenario = CapitalGainsScenario {
                holder_ratio: args[2],
                expense: args[3],
                ..CapitalGainsScenario::new(args[0], args[1])
            };
            self.capital_gains.capital_gain(&scenario)
        })
    }

    /// Capital gains tax base per sale, using the configured basic deduction.
    pub fn tax_base(
        &self,
        sell_price: &Series,
        buy_price: &Series,
        holder_ratio: &Series,
        expense: &Series,
        hold_years: &Series,
        residency_years: &Series,
    ) -> Result<Series, CalculationError> {
        self.per_sale(
            [sell_price, buy_price, holder_ratio, expense, hold_years, residency_years],
            |scenario| self.capital_gains.tax_base(scenario),
        )
    }

    /// Capital gains tax per sale, using the configured basic deduction.
    pub fn capital_gain_tax(
        &self,
        sell_price: &Series,
        buy_price: &Series,
        holder_ratio: &Series,
        expense: &Series,
        hold_years: &Series,
        residency_years: &Series,
    ) -> Result<Series, CalculationError> {
        self.per_sale(
            [sell_price, buy_price, holder_ratio, expense, hold_years, residency_years],
            |scenario| self.capital_gains.capital_gain_tax(scenario),
        )
    }

    fn per_sale<F>(
        &self,
        columns: [&Series; 6],
        f: F,
    ) -> Result<Series, CalculationError>
    where
        F: Fn(&CapitalGainsScenario) -> Decimal,
    {
        Series::zip_with(&columns, |args| {
            let scenario = CapitalGainsScenario {
                holder_ratio: args[2],
                expense: args[3],
                hold_years: args[4],
                residency_years: args[5],
                ..CapitalGainsScenario::new(args[0], args[1])
            };
            f(&scenario)
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn config() -> TaxYearConfig {
        TaxYearConfig::year_2025()
    }

    // =========================================================================
    // income tax tests
    // =========================================================================

    #[test]
    fn income_tax_maps_each_base() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let bases = Series::from(vec![dec!(-10), dec!(1400), dec!(5000)]);

        assert_eq!(
            batch.income_tax(&bases),
            Series::from(vec![dec!(0), dec!(92.4), dec!(686.4)])
        );
    }

    #[test]
    fn final_income_tax_scalar_inputs_give_scalar() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let tax = batch.final_income_tax(
            &Series::from(dec!(5000)),
            &Series::from(dec!(3000)),
            TaxOutput::Rate,
        );

        assert_eq!(tax, Ok(Series::from(dec!(0.15235))));
    }

    #[test]
    fn income_tax_for_fin_rejects_mismatched_arrays() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let result = batch.income_tax_for_fin(
            &Series::from(vec![dec!(1000), dec!(2000)]),
            &Series::from(vec![dec!(3000)]),
            TaxOutput::Amount,
        );

        assert_eq!(
            result,
            Err(CalculationError::ShapeMismatch {
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn income_tax_for_fin_marginal_rate_per_element() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let rates = batch.income_tax_for_fin_marginal_rate(
            &Series::from(vec![dec!(0), dec!(1000), dec!(5000)]),
            &Series::from(dec!(3000)),
        );

        assert_eq!(
            rates,
            Ok(Series::from(vec![dec!(0), dec!(0.154), dec!(0.264)]))
        );
    }

    // =========================================================================
    // health premium tests
    // =========================================================================

    #[test]
    fn income_health_premium_dependent_jump() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let premium = batch.income_health_premium(
            MembershipType::Dependent,
            &Series::from(vec![dec!(2000), dec!(2001)]),
            &Series::from(dec!(0)),
            TaxOutput::Amount,
        );

        assert_eq!(premium, Ok(Series::from(vec![dec!(0), dec!(160.244082)])));
    }

    #[test]
    fn income_health_premium_for_tag_rejects_unknown_tag_first() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        // Shapes also mismatch; the tag is checked before any element.
        let result = batch.income_health_premium_for_tag(
            "freelancer",
            &Series::from(vec![dec!(1), dec!(2)]),
            &Series::from(vec![dec!(1)]),
            TaxOutput::Amount,
        );

        assert_eq!(
            result,
            Err(CalculationError::InvalidCategory("freelancer".to_string()))
        );
    }

    // =========================================================================
    // broad tax tests
    // =========================================================================

    #[test]
    fn broad_tax_for_fin_over_fin_income_axis() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let shares = batch.broad_tax_for_fin(
            MembershipType::Employee,
            &Series::from(vec![dec!(0), dec!(5000)]),
            &Series::from(dec!(3000)),
            &Series::from(dec!(0)),
            TaxOutput::Amount,
        );

        assert_eq!(shares, Ok(Series::from(vec![dec!(0), dec!(1127.396)])));
    }

    // =========================================================================
    // capital gains tests
    // =========================================================================

    #[test]
    fn exemption_taxable_fraction_over_sell_prices() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let prices = Series::from(vec![dec!(100000), dec!(120000), dec!(240000)]);

        assert_eq!(
            batch.exemption_taxable_fraction(&prices),
            Series::from(vec![dec!(0), dec!(0), dec!(0.5)])
        );
    }

    #[test]
    fn capital_gain_tax_matches_scalar_worksheet() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let tax = batch.capital_gain_tax(
            &Series::from(vec![dec!(120000), dec!(200000)]),
            &Series::from(dec!(100000)),
            &Series::from(dec!(0.5)),
            &Series::from(dec!(2000)),
            &Series::from(dec!(5)),
            &Series::from(dec!(3)),
        );

        assert_eq!(tax, Ok(Series::from(vec![dec!(0), dec!(3231.91)])));
    }

    #[test]
    fn holding_deduction_ratio_broadcasts_residency() {
        let config = config();
        let batch = BatchCalculator::new(&config);

        let ratios = batch.holding_deduction_ratio(
            &Series::from(vec![dec!(2), dec!(5), dec!(20)]),
            &Series::from(dec!(3)),
        );

        assert_eq!(
            ratios,
            Ok(Series::from(vec![dec!(0.12), dec!(0.32), dec!(0.52)]))
        );
    }
}
