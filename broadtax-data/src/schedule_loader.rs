use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::Context;
use broadtax_core::{BracketSchedule, TaxBracket};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::LoaderError;

/// A single record from a bracket schedule CSV file.
///
/// - `tax_year`: The tax year the row belongs to (e.g., 2025)
/// - `min_income`: Lower bound of the row, exclusive
/// - `max_income`: Upper bound of the row, inclusive (empty for unbounded)
/// - `base_tax`: Tax accumulated below `min_income`, before surtax
/// - `rate`: Marginal rate as a decimal (e.g., 0.06 for 6%)
/// - `surtax_multiplier`: Factor applied to the row result (1.1 for a 10% surtax)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
    pub surtax_multiplier: Decimal,
}

impl From<&BracketRecord> for TaxBracket {
    fn from(record: &BracketRecord) -> Self {
        TaxBracket {
            min_income: record.min_income,
            max_income: record.max_income,
            tax_rate: record.rate,
            base_tax: record.base_tax,
            surtax_multiplier: record.surtax_multiplier,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for progressive schedules stored as CSV.
///
/// One file may hold several tax years; [`build`](Self::build) picks one.
pub struct BracketScheduleLoader;

impl BracketScheduleLoader {
    /// Parse bracket records from a CSV reader.
    ///
    /// The reader can be any type that implements `Read`, such as a file or
    /// a byte slice. Records are returned in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, LoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        debug!(count = records.len(), "parsed bracket records");
        Ok(records)
    }

    /// Distinct tax years present in `records`, ascending.
    pub fn tax_years(records: &[BracketRecord]) -> Vec<i32> {
        let mut years: Vec<i32> = records.iter().map(|r| r.tax_year).collect();
        years.sort_unstable();
        years.dedup();
        years
    }

    /// Build the schedule for `tax_year` from `records`.
    ///
    /// Rows may appear in any order; they are sorted by `min_income` before
    /// validation.
    ///
    /// # Errors
    ///
    /// * [`LoaderError::TaxYearNotFound`] if no record has `tax_year`.
    /// * [`LoaderError::Schedule`] if the rows do not form a valid schedule.
    pub fn build(
        records: &[BracketRecord],
        tax_year: i32,
    ) -> Result<BracketSchedule, LoaderError> {
        let mut brackets: Vec<TaxBracket> = records
            .iter()
            .filter(|r| r.tax_year == tax_year)
            .map(TaxBracket::from)
            .collect();

        if brackets.is_empty() {
            warn!(tax_year, "no bracket records for tax year");
            return Err(LoaderError::TaxYearNotFound(tax_year));
        }

        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));

        BracketSchedule::new(brackets).map_err(|e| {
            warn!(tax_year, error = %e, "rejected bracket schedule");
            LoaderError::Schedule(e)
        })
    }

    /// Parse `reader` and build the schedule for `tax_year`.
    pub fn load<R: Read>(
        reader: R,
        tax_year: i32,
    ) -> Result<BracketSchedule, LoaderError> {
        let records = Self::parse(reader)?;
        Self::build(&records, tax_year)
    }

    /// Read the schedule for `tax_year` from a CSV file on disk.
    pub fn load_file(
        path: &Path,
        tax_year: i32,
    ) -> anyhow::Result<BracketSchedule> {
        let file =
            File::open(path).with_context(|| format!("Failed to open: {}", path.display()))?;

        let schedule = Self::load(file, tax_year).with_context(|| {
            format!(
                "Failed to load {} schedule from: {}",
                tax_year,
                path.display()
            )
        })?;

        Ok(schedule)
    }
}
