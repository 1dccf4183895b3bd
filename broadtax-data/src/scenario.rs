//! CSV loaders for calculation scenarios.
//!
//! ## Broad tax scenarios
//!
//! | Column | Required | Type | Notes |
//! |-----------------|----------|---------|------------------------------------------|
//! | `member_type` | yes | string | `employee`, `dependent` or `self_employed` |
//! | `fin_income` | yes | decimal | Financial income |
//! | `salary` | yes | decimal | Salary income |
//! | `ex_fin_salary` | yes | decimal | Income that is neither financial nor salary |
//!
//! ```csv
//! member_type,fin_income,salary,ex_fin_salary
//! employee,5000,3000,0
//! ```
//!
//! ## House sales
//!
//! | Column | Required | Type | Default |
//! |-------------------|----------|---------|---------|
//! | `sell_price` | yes | decimal | |
//! | `buy_price` | yes | decimal | |
//! | `holder_ratio` | no | decimal | 1 |
//! | `expense` | no | decimal | 0 |
//! | `hold_years` | no | decimal | 0 |
//! | `residency_years` | no | decimal | 0 |
//! | `base_deduction` | no | decimal | configured deduction |
//!
//! Leave a cell empty, or omit the column, to take the default.

use std::io::Read;
use std::path::Path;

use anyhow::Context;
use broadtax_core::{
    BroadTaxCalculator, BroadTaxResult, CalculationError, CapitalGainsScenario, MembershipType,
    Series, TaxOutput, TaxYearConfig,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::LoaderError;

// ---------------------------------------------------------------------------
// Serde-compatible rows that mirror the CSV layouts
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BroadTaxRow {
    member_type: String,
    fin_income: Decimal,
    salary: Decimal,
    ex_fin_salary: Decimal,
}

#[derive(Debug, Deserialize)]
struct HouseSaleRow {
    sell_price: Decimal,
    buy_price: Decimal,
    #[serde(default)]
    holder_ratio: Option<Decimal>,
    #[serde(default)]
    expense: Option<Decimal>,
    #[serde(default)]
    hold_years: Option<Decimal>,
    #[serde(default)]
    residency_years: Option<Decimal>,
    #[serde(default)]
    base_deduction: Option<Decimal>,
}

impl From<HouseSaleRow> for CapitalGainsScenario {
    fn from(row: HouseSaleRow) -> Self {
        CapitalGainsScenario {
            sell_price: row.sell_price,
            buy_price: row.buy_price,
            holder_ratio: row.holder_ratio.unwrap_or(Decimal::ONE),
            expense: row.expense.unwrap_or_default(),
            hold_years: row.hold_years.unwrap_or_default(),
            residency_years: row.residency_years.unwrap_or_default(),
            base_deduction: row.base_deduction,
        }
    }
}

// ---------------------------------------------------------------------------
// Broad tax scenarios
// ---------------------------------------------------------------------------

/// Broad tax scenarios in column form: a membership type per row and one
/// value per income component.
///
/// `member_types` fixes the row count. A scalar column applies to every
/// row; an array column must have one value per row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadTaxScenarioSet {
    pub member_types: Vec<MembershipType>,
    pub fin_income: Series,
    pub salary: Series,
    pub ex_fin_salary: Series,
}

impl BroadTaxScenarioSet {
    pub fn len(&self) -> usize {
        self.member_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.member_types.is_empty()
    }

    /// Breakdown for every row, in file order.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::ShapeMismatch`] when an array column does
    /// not have one value per membership type.
    pub fn results(
        &self,
        config: &TaxYearConfig,
    ) -> Result<Vec<BroadTaxResult>, CalculationError> {
        let rows = self.len();
        let fin_income = self.fin_income.broadcast_to(rows)?;
        let salary = self.salary.broadcast_to(rows)?;
        let ex_fin_salary = self.ex_fin_salary.broadcast_to(rows)?;

        let calculator = BroadTaxCalculator::new(config);

        let results = self
            .member_types
            .iter()
            .zip(fin_income)
            .zip(salary)
            .zip(ex_fin_salary)
            .map(|(((&member_type, fin), salary), other)| {
                calculator.calculate(member_type, fin, salary, other)
            })
            .collect();

        Ok(results)
    }

    /// Broad tax for every row, as amounts or rates over total income.
    ///
    /// # Errors
    ///
    /// Same as [`results`](Self::results).
    pub fn broad_tax(
        &self,
        config: &TaxYearConfig,
        output: TaxOutput,
    ) -> Result<Series, CalculationError> {
        let values = self
            .results(config)?
            .into_iter()
            .map(|result| match output {
                TaxOutput::Amount => result.broad_tax,
                TaxOutput::Rate => result.effective_rate(),
            })
            .collect::<Vec<_>>();

        Ok(Series::from(values))
    }
}

/// Parse broad tax scenarios from CSV.
///
/// # Errors
///
/// * [`LoaderError::Csv`] if the CSV is structurally invalid or a required
///   field cannot be deserialised.
/// * [`LoaderError::InvalidMembershipType`] if a row has an unknown tag.
pub fn load_broad_tax_scenarios<R: Read>(reader: R) -> Result<BroadTaxScenarioSet, LoaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let mut member_types = Vec::new();
    let mut fin_income = Vec::new();
    let mut salary = Vec::new();
    let mut ex_fin_salary = Vec::new();

    for (idx, result) in csv_reader.deserialize::<BroadTaxRow>().enumerate() {
        let row = result?;
        let row_number = idx + 1;

        let member_type = MembershipType::parse(&row.member_type).map_err(|_| {
            LoaderError::InvalidMembershipType {
                tag: row.member_type.clone(),
                row: row_number,
            }
        })?;

        member_types.push(member_type);
        fin_income.push(row.fin_income);
        salary.push(row.salary);
        ex_fin_salary.push(row.ex_fin_salary);
    }

    debug!(count = member_types.len(), "loaded broad tax scenarios");

    Ok(BroadTaxScenarioSet {
        member_types,
        fin_income: Series::from(fin_income),
        salary: Series::from(salary),
        ex_fin_salary: Series::from(ex_fin_salary),
    })
}

/// Read a file from disk and delegate to [`load_broad_tax_scenarios`].
pub fn load_broad_tax_scenarios_file(path: &Path) -> anyhow::Result<BroadTaxScenarioSet> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open: {}", path.display()))?;

    let scenarios = load_broad_tax_scenarios(file)
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;

    Ok(scenarios)
}

// ---------------------------------------------------------------------------
// House sales
// ---------------------------------------------------------------------------

/// Parse one-home sales from CSV, in file order.
///
/// # Errors
///
/// Returns [`LoaderError::Csv`] if the CSV is structurally invalid or a
/// price cannot be deserialised.
pub fn load_house_sales<R: Read>(reader: R) -> Result<Vec<CapitalGainsScenario>, LoaderError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let sales = csv_reader
        .deserialize::<HouseSaleRow>()
        .map(|result| result.map(CapitalGainsScenario::from))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = sales.len(), "loaded house sales");
    Ok(sales)
}

/// Read a file from disk and delegate to [`load_house_sales`].
pub fn load_house_sales_file(path: &Path) -> anyhow::Result<Vec<CapitalGainsScenario>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open: {}", path.display()))?;

    let sales = load_house_sales(file)
        .with_context(|| format!("Failed to parse CSV: {}", path.display()))?;

    Ok(sales)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
