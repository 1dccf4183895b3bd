mod bracket_schedule;
mod capital_gains_scenario;
mod membership_type;
mod tax_bracket;
mod tax_output;
mod tax_year_config;

pub use bracket_schedule::{BracketSchedule, ScheduleError};
pub use capital_gains_scenario::CapitalGainsScenario;
pub use membership_type::MembershipType;
pub use tax_bracket::TaxBracket;
pub use tax_output::TaxOutput;
pub use tax_year_config::{ConfigError, TaxYearConfig};
