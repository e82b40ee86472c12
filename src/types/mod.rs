mod composite;
mod condition;
mod enums;
mod error;
mod match_report;
mod record;
mod rule;

pub use composite::{Composite, CompositeClause, CompositeRule, MultiRule};
pub use condition::Condition;
pub use enums::{
    CompositeRuleType, ConditionType, GasType, PlanetType, RuleType, SpectrType, StarClass,
    StarType, VeinType, GAS_ORDER, VEIN_ORDER,
};
pub use error::{ParseEnumError, RuleError};
pub use match_report::MatchReport;
pub use record::{Galaxy, Gas, Planet, Position, Star, Vein, VeinStat};
pub use rule::{Clause, Rule, SimpleRule};
