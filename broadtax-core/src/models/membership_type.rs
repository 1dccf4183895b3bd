use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::CalculationError;

/// Health insurance membership category. Selects the premium formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipType {
    /// Workplace member: premium on salary plus non-salary income above a cutoff.
    Employee,
    /// Covered through a family member; exempt until total income passes a cutoff.
    Dependent,
    /// Regional member: premium on all income.
    SelfEmployed,
}

impl MembershipType {
    pub const ALL: [MembershipType; 3] = [Self::Employee, Self::Dependent, Self::SelfEmployed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Dependent => "dependent",
            Self::SelfEmployed => "self_employed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Employee => "Workplace member",
            Self::Dependent => "Dependent",
            Self::SelfEmployed => "Regional member",
        }
    }

    /// Parses a tag such as `"self_employed"`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculationError::InvalidCategory`] for any other tag; no
    /// category is assumed.
    pub fn parse(s: &str) -> Result<Self, CalculationError> {
        match s {
            "employee" => Ok(Self::Employee),
            "dependent" => Ok(Self::Dependent),
            "self_employed" => Ok(Self::SelfEmployed),
            other => {
                warn!(tag = other, "rejected unknown membership type");
                Err(CalculationError::InvalidCategory(other.to_string()))
            }
        }
    }
}

impl FromStr for MembershipType {
    type Err = CalculationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MembershipType {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tracing_subscriber::fmt::format::FmtSpan;

    use super::*;

    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_span_events(FmtSpan::NONE)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn parse_round_trips_every_tag() {
        for member_type in MembershipType::ALL {
            assert_eq!(MembershipType::parse(member_type.as_str()), Ok(member_type));
        }
    }

    #[test]
    fn parse_rejects_unknown_tag() {
        let _guard = init_test_tracing();
        let result = "freelancer".parse::<MembershipType>();

        assert_eq!(
            result,
            Err(CalculationError::InvalidCategory("freelancer".to_string()))
        );
    }

    #[test]
    fn parse_is_case_sensitive() {
        let _guard = init_test_tracing();
        assert!(MembershipType::parse("Employee").is_err());
    }

    #[test]
    fn display_uses_tag() {
        assert_eq!(MembershipType::SelfEmployed.to_string(), "self_employed");
    }
}
