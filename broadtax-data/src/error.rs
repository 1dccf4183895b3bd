use broadtax_core::{ConfigError, ScheduleError};
use thiserror::Error;

/// Errors that can occur while loading engine inputs.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Bad CSV structure, a missing required column, or a cell that is not
    /// a number.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// A `member_type` cell that is not a recognised tag. `row` is 1-based
    /// and does not count the header.
    #[error("unrecognised membership type '{tag}' on row {row}")]
    InvalidMembershipType { tag: String, row: usize },

    #[error("invalid bracket schedule: {0}")]
    Schedule(#[from] ScheduleError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("tax year {0} not found in bracket data")]
    TaxYearNotFound(i32),
}
