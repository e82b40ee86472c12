mod error;
mod evaluate;
pub mod geometry;
mod normalize;
pub mod parse;
pub mod profile;
pub mod search;
#[cfg(feature = "binary-cache")]
pub mod serial;
mod stats;
mod types;
mod validate;

pub use error::SeedRuleError;
pub use evaluate::StarMetrics;
pub use normalize::{
    construct_multi_rule, construct_rule, conversion_for, fix_rule, try_construct_multi_rule,
    try_construct_rule, unfix_rule, UnitConversion, OIL_AMOUNT_SCALE, UNIT_CONVERSIONS,
};
pub use parse::ParseError;
pub use profile::{
    Criteria, MemoryProfileStore, ProfileSettings, ProfileSnapshot, ProfileStore, SearchPredicate,
    StarRecord, StoreError,
};
pub use search::{QueryError, SearchParams};
pub use stats::{average_patches, stat_vein, total_average_amount, total_average_patches};
pub use types::{
    Clause, Composite, CompositeClause, CompositeRule, CompositeRuleType, Condition,
    ConditionType, Galaxy, Gas, GasType, MatchReport, MultiRule, ParseEnumError, Planet,
    PlanetType, Position, Rule, RuleError, RuleType, SimpleRule, SpectrType, Star, StarClass,
    StarType, Vein, VeinStat, VeinType, GAS_ORDER, VEIN_ORDER,
};
pub use validate::{
    check_multi_rule, check_operands, check_rules, validate_multi_rule, validate_rules,
};
