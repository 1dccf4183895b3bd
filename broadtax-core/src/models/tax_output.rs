use serde::{Deserialize, Serialize};

/// Whether an operation returns an absolute amount or a rate over the
/// income it is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxOutput {
    #[default]
    Amount,
    Rate,
}

impl TaxOutput {
    /// Maps a boolean rate flag: `true` selects [`TaxOutput::Rate`].
    pub fn from_rate_flag(rate: bool) -> Self {
        if rate { Self::Rate } else { Self::Amount }
    }
}
