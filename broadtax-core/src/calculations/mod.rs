//! Tax and premium calculators for the 2025 schedule.
//!
//! Each calculator borrows a [`TaxYearConfig`](crate::TaxYearConfig) and
//! evaluates one scenario at a time. [`BatchCalculator`] runs them
//! element-wise over [`Series`] arguments.

pub mod batch;
pub mod broad_tax;
pub mod capital_gains;
pub mod common;
pub mod decomposition;
pub mod health_premium;
pub mod income_tax;
pub mod series;

pub use batch::BatchCalculator;
pub use broad_tax::{BroadTaxCalculator, BroadTaxResult};
pub use capital_gains::{CapitalGainsResult, CapitalGainsWorksheet};
pub use health_premium::HealthPremiumCalculator;
pub use income_tax::IncomeTaxCalculator;
pub use series::Series;
