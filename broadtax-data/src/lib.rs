//! Loaders that build engine inputs from files.
//!
//! - [`BracketScheduleLoader`] reads progressive schedules from CSV.
//! - [`config`] reads a [`TaxYearConfig`](broadtax_core::TaxYearConfig) from TOML.
//! - [`scenario`] reads broad tax scenarios and house sales from CSV.

pub mod config;
pub mod error;
pub mod scenario;
pub mod schedule_loader;

pub use config::{load_config_file, load_config_str};
pub use error::LoaderError;
pub use scenario::{
    BroadTaxScenarioSet, load_broad_tax_scenarios, load_broad_tax_scenarios_file,
    load_house_sales, load_house_sales_file,
};
pub use schedule_loader::{BracketRecord, BracketScheduleLoader};
