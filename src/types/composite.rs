use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::enums::CompositeRuleType;
use super::error::RuleError;
use super::rule::{Rule, SimpleRule};

/// User input for a criterion that must hold for several bodies at once:
/// the number of stars satisfying `rules` must satisfy `condition`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiRule {
    pub condition: Condition,
    pub rules: Vec<Vec<SimpleRule>>,
}

/// Canonical multiplicity leaf: a per-body predicate plus the threshold its
/// match count is tested against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composite {
    pub condition: Condition,
    pub rule: Rule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CompositeRepr", into = "CompositeRepr")]
pub enum CompositeClause {
    Single(Composite),
    Or(Vec<Composite>),
}

/// Canonical galaxy-level criterion, an `And` of [`CompositeClause`]s at
/// most. Built by [`construct_multi_rule`](crate::construct_multi_rule).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CompositeRepr", into = "CompositeRepr")]
pub enum CompositeRule {
    Clause(CompositeClause),
    And(Vec<CompositeClause>),
}

impl CompositeClause {
    #[must_use]
    pub fn composite_type(&self) -> CompositeRuleType {
        match self {
            CompositeClause::Single(_) => CompositeRuleType::Composite,
            CompositeClause::Or(_) => CompositeRuleType::CompositeOr,
        }
    }

    #[must_use]
    pub fn composites(&self) -> &[Composite] {
        match self {
            CompositeClause::Single(composite) => std::slice::from_ref(composite),
            CompositeClause::Or(composites) => composites,
        }
    }
}

impl CompositeRule {
    #[must_use]
    pub fn composite_type(&self) -> CompositeRuleType {
        match self {
            CompositeRule::Clause(clause) => clause.composite_type(),
            CompositeRule::And(_) => CompositeRuleType::CompositeAnd,
        }
    }

    #[must_use]
    pub fn clauses(&self) -> &[CompositeClause] {
        match self {
            CompositeRule::Clause(clause) => std::slice::from_ref(clause),
            CompositeRule::And(clauses) => clauses,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum CompositeRepr {
    Composite { condition: Condition, rule: Rule },
    CompositeOr { rules: Vec<CompositeRepr> },
    CompositeAnd { rules: Vec<CompositeRepr> },
}

impl TryFrom<CompositeRepr> for CompositeClause {
    type Error = RuleError;

    fn try_from(repr: CompositeRepr) -> Result<Self, Self::Error> {
        match repr {
            CompositeRepr::Composite { condition, rule } => {
                Ok(CompositeClause::Single(Composite { condition, rule }))
            }
            CompositeRepr::CompositeOr { rules } => rules
                .into_iter()
                .map(|r| match r {
                    CompositeRepr::Composite { condition, rule } => Ok(Composite { condition, rule }),
                    _ => Err(RuleError::InvalidShape {
                        reason: "a CompositeOr group may only contain Composite rules".into(),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(CompositeClause::Or),
            CompositeRepr::CompositeAnd { .. } => Err(RuleError::InvalidShape {
                reason: "a CompositeAnd group cannot be nested inside another group".into(),
            }),
        }
    }
}

impl TryFrom<CompositeRepr> for CompositeRule {
    type Error = RuleError;

    fn try_from(repr: CompositeRepr) -> Result<Self, Self::Error> {
        match repr {
            CompositeRepr::CompositeAnd { rules } => rules
                .into_iter()
                .map(CompositeClause::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(CompositeRule::And),
            other => CompositeClause::try_from(other).map(CompositeRule::Clause),
        }
    }
}

fn composite_repr(composite: Composite) -> CompositeRepr {
    CompositeRepr::Composite {
        condition: composite.condition,
        rule: composite.rule,
    }
}

impl From<CompositeClause> for CompositeRepr {
    fn from(clause: CompositeClause) -> Self {
        match clause {
            CompositeClause::Single(composite) => composite_repr(composite),
            CompositeClause::Or(composites) => CompositeRepr::CompositeOr {
                rules: composites.into_iter().map(composite_repr).collect(),
            },
        }
    }
}

impl From<CompositeRule> for CompositeRepr {
    fn from(rule: CompositeRule) -> Self {
        match rule {
            CompositeRule::Clause(clause) => clause.into(),
            CompositeRule::And(clauses) => CompositeRepr::CompositeAnd {
                rules: clauses.into_iter().map(CompositeRepr::from).collect(),
            },
        }
    }
}
