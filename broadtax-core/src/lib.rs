//! Broad tax engine for the 2025 schedule.
//!
//! Computes progressive income tax, flat withholding on financial income,
//! health insurance premiums by membership type and one-home capital gains
//! tax. Amounts are in units of ten thousand currency units. Each function
//! either returns an absolute amount or a rate over the relevant income,
//! selected by [`TaxOutput`].
//!
//! Scalar calculators live in [`calculations`]; [`calculations::batch`]
//! evaluates the same operations element-wise over [`Series`] arguments.
//!
//! # Supported range
//!
//! [`BracketSchedule::tax_for`] accepts any [`Decimal`](rust_decimal::Decimal).
//! The composite operations add income components together and step one
//! unit past them for marginal rates, so their inputs are expected within
//! `±10^15` (unit-10k), where every result is exact. Components near
//! `Decimal::MAX` overflow the sum and panic.

pub mod calculations;
pub mod error;
pub mod models;

pub use calculations::{
    BatchCalculator, BroadTaxCalculator, BroadTaxResult, CapitalGainsResult,
    CapitalGainsWorksheet, HealthPremiumCalculator, IncomeTaxCalculator, Series,
};
pub use error::CalculationError;
pub use models::*;
