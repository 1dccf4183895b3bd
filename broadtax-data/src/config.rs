//! Tax-year configuration from TOML.
//!
//! Every key is optional; an omitted key keeps its 2025 value. A file that
//! changes only the personal deduction looks like:
//!
//! ```toml
//! tax_year = 2026
//! earned_income_deduction = 300
//! ```
//!
//! A `brackets` array replaces the whole schedule:
//!
//! ```toml
//! [[brackets]]
//! min_income = 0
//! max_income = 5000
//! base_tax = 0
//! tax_rate = 0.1
//! surtax_multiplier = 1.1
//!
//! [[brackets]]
//! min_income = 5000
//! base_tax = 500
//! tax_rate = 0.2
//! surtax_multiplier = 1.1
//! ```

use std::path::Path;

use anyhow::Context;
use broadtax_core::TaxYearConfig;
use tracing::{debug, warn};

use crate::LoaderError;

/// Parse and validate a configuration from TOML text.
///
/// # Errors
///
/// * [`LoaderError::Toml`] if the text is not valid TOML, a value has the
///   wrong type, or the bracket schedule is invalid.
/// * [`LoaderError::Config`] if a rate or amount is out of range.
pub fn load_config_str(input: &str) -> Result<TaxYearConfig, LoaderError> {
    let config: TaxYearConfig = toml::from_str(input).inspect_err(|e| {
        warn!(error = %e, "rejected tax year configuration");
    })?;

    config.validate().inspect_err(|e| {
        warn!(tax_year = config.tax_year, error = %e, "rejected tax year configuration");
    })?;

    debug!(tax_year = config.tax_year, "loaded tax year configuration");
    Ok(config)
}

/// Read a file from disk and delegate to [`load_config_str`].
pub fn load_config_file(path: &Path) -> anyhow::Result<TaxYearConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {}", path.display()))?;

    let config = load_config_str(&contents)
        .with_context(|| format!("Failed to load configuration: {}", path.display()))?;

    Ok(config)
}
