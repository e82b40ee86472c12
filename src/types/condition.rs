use std::fmt;

use serde::{Deserialize, Serialize};

use super::enums::ConditionType;

/// Numeric test applied to a measured quantity.
///
/// Serialized as `{"type": "Gt", "value": 3}` or
/// `{"type": "Between", "low": 1, "high": 5}`. Deserialized range bounds
/// are reordered like the constructors do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", from = "ConditionRepr")]
pub enum Condition {
    Eq { value: f64 },
    Neq { value: f64 },
    Lt { value: f64 },
    Lte { value: f64 },
    Gt { value: f64 },
    Gte { value: f64 },
    Between { low: f64, high: f64 },
    NotBetween { low: f64, high: f64 },
}

impl Condition {
    #[must_use]
    pub fn eq(value: f64) -> Self {
        Condition::Eq { value }
    }

    #[must_use]
    pub fn neq(value: f64) -> Self {
        Condition::Neq { value }
    }

    #[must_use]
    pub fn lt(value: f64) -> Self {
        Condition::Lt { value }
    }

    #[must_use]
    pub fn lte(value: f64) -> Self {
        Condition::Lte { value }
    }

    #[must_use]
    pub fn gt(value: f64) -> Self {
        Condition::Gt { value }
    }

    #[must_use]
    pub fn gte(value: f64) -> Self {
        Condition::Gte { value }
    }

    /// Inclusive range test. The bounds are reordered so that `low <= high`.
    #[must_use]
    pub fn between(a: f64, b: f64) -> Self {
        let (low, high) = ordered(a, b);
        Condition::Between { low, high }
    }

    /// Negation of [`between`](Self::between).
    #[must_use]
    pub fn not_between(a: f64, b: f64) -> Self {
        let (low, high) = ordered(a, b);
        Condition::NotBetween { low, high }
    }

    #[must_use]
    pub fn condition_type(&self) -> ConditionType {
        match self {
            Condition::Eq { .. } => ConditionType::Eq,
            Condition::Neq { .. } => ConditionType::Neq,
            Condition::Lt { .. } => ConditionType::Lt,
            Condition::Lte { .. } => ConditionType::Lte,
            Condition::Gt { .. } => ConditionType::Gt,
            Condition::Gte { .. } => ConditionType::Gte,
            Condition::Between { .. } => ConditionType::Between,
            Condition::NotBetween { .. } => ConditionType::NotBetween,
        }
    }

    /// Test a measured value. Range bounds are inclusive.
    #[must_use]
    pub fn matches(&self, measured: f64) -> bool {
        match *self {
            Condition::Eq { value } => measured == value,
            Condition::Neq { value } => measured != value,
            Condition::Lt { value } => measured < value,
            Condition::Lte { value } => measured <= value,
            Condition::Gt { value } => measured > value,
            Condition::Gte { value } => measured >= value,
            Condition::Between { low, high } => low <= measured && measured <= high,
            Condition::NotBetween { low, high } => !(low <= measured && measured <= high),
        }
    }

    /// Build a new condition with `f` applied to every numeric operand.
    #[must_use]
    pub fn map_operands(&self, f: impl Fn(f64) -> f64) -> Self {
        match *self {
            Condition::Eq { value } => Condition::Eq { value: f(value) },
            Condition::Neq { value } => Condition::Neq { value: f(value) },
            Condition::Lt { value } => Condition::Lt { value: f(value) },
            Condition::Lte { value } => Condition::Lte { value: f(value) },
            Condition::Gt { value } => Condition::Gt { value: f(value) },
            Condition::Gte { value } => Condition::Gte { value: f(value) },
            Condition::Between { low, high } => Condition::Between {
                low: f(low),
                high: f(high),
            },
            Condition::NotBetween { low, high } => Condition::NotBetween {
                low: f(low),
                high: f(high),
            },
        }
    }

    /// The numeric operands in declaration order.
    #[must_use]
    pub fn operands(&self) -> Vec<f64> {
        match *self {
            Condition::Eq { value }
            | Condition::Neq { value }
            | Condition::Lt { value }
            | Condition::Lte { value }
            | Condition::Gt { value }
            | Condition::Gte { value } => vec![value],
            Condition::Between { low, high } | Condition::NotBetween { low, high } => {
                vec![low, high]
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ConditionRepr {
    Eq { value: f64 },
    Neq { value: f64 },
    Lt { value: f64 },
    Lte { value: f64 },
    Gt { value: f64 },
    Gte { value: f64 },
    Between { low: f64, high: f64 },
    NotBetween { low: f64, high: f64 },
}

impl From<ConditionRepr> for Condition {
    fn from(repr: ConditionRepr) -> Self {
        match repr {
            ConditionRepr::Eq { value } => Condition::eq(value),
            ConditionRepr::Neq { value } => Condition::neq(value),
            ConditionRepr::Lt { value } => Condition::lt(value),
            ConditionRepr::Lte { value } => Condition::lte(value),
            ConditionRepr::Gt { value } => Condition::gt(value),
            ConditionRepr::Gte { value } => Condition::gte(value),
            ConditionRepr::Between { low, high } => Condition::between(low, high),
            ConditionRepr::NotBetween { low, high } => Condition::not_between(low, high),
        }
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Eq { value } => write!(f, "== {value}"),
            Condition::Neq { value } => write!(f, "!= {value}"),
            Condition::Lt { value } => write!(f, "< {value}"),
            Condition::Lte { value } => write!(f, "<= {value}"),
            Condition::Gt { value } => write!(f, "> {value}"),
            Condition::Gte { value } => write!(f, ">= {value}"),
            Condition::Between { low, high } => write!(f, "between({low}, {high})"),
            Condition::NotBetween { low, high } => write!(f, "not between({low}, {high})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_conditions() {
        let x = 10.0;
        assert!(Condition::eq(10.0).matches(x));
        assert!(!Condition::neq(10.0).matches(x));
        assert!(Condition::lt(20.0).matches(x));
        assert!(Condition::lte(10.0).matches(x));
        assert!(!Condition::lte(9.0).matches(x));
        assert!(Condition::gt(5.0).matches(x));
        assert!(Condition::gte(10.0).matches(x));
        assert!(!Condition::gte(11.0).matches(x));
    }

    #[test]
    fn between_is_inclusive() {
        let c = Condition::between(1.0, 5.0);
        assert!(c.matches(1.0));
        assert!(c.matches(5.0));
        assert!(c.matches(3.0));
        assert!(!c.matches(5.5));
        assert!(!Condition::not_between(1.0, 5.0).matches(1.0));
        assert!(Condition::not_between(1.0, 5.0).matches(0.5));
    }

    #[test]
    fn between_orders_bounds() {
        assert_eq!(
            Condition::between(8.0, 2.0),
            Condition::Between {
                low: 2.0,
                high: 8.0
            }
        );
    }

    #[test]
    fn nan_only_satisfies_negative_tests() {
        assert!(!Condition::eq(f64::NAN).matches(f64::NAN));
        assert!(Condition::neq(1.0).matches(f64::NAN));
        assert!(!Condition::between(0.0, 1.0).matches(f64::NAN));
        assert!(Condition::not_between(0.0, 1.0).matches(f64::NAN));
    }

    #[test]
    fn map_operands_touches_every_bound() {
        let scaled = Condition::between(1.0, 2.0).map_operands(|v| v * 10.0);
        assert_eq!(scaled.operands(), vec![10.0, 20.0]);
        let scaled = Condition::gt(3.0).map_operands(|v| v + 1.0);
        assert_eq!(scaled, Condition::gt(4.0));
    }

    #[test]
    fn condition_type_matches_variant() {
        assert_eq!(Condition::gte(1.0).condition_type(), ConditionType::Gte);
        assert_eq!(
            Condition::not_between(1.0, 2.0).condition_type(),
            ConditionType::NotBetween
        );
    }

    #[test]
    fn display() {
        assert_eq!(Condition::gt(5000.0).to_string(), "> 5000");
        assert_eq!(Condition::lte(2.5).to_string(), "<= 2.5");
        assert_eq!(
            Condition::not_between(1.0, 3.0).to_string(),
            "not between(1, 3)"
        );
    }
}
