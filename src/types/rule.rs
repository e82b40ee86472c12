use std::fmt;

use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::enums::{GasType, RuleType, SpectrType, StarType, VeinType};
use super::error::RuleError;

/// A single criterion over one star system, as entered by the user.
///
/// Every variant carries exactly the operands its rule type needs.
/// `Unset` is the placeholder for a rule whose type has not been chosen
/// yet; it never passes validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimpleRule {
    #[serde(rename = "None")]
    Unset,
    Luminosity {
        condition: Condition,
    },
    DysonRadius {
        condition: Condition,
    },
    AverageVeinAmount {
        vein: VeinType,
        condition: Condition,
    },
    AverageVeinPatch {
        vein: VeinType,
        condition: Condition,
    },
    Spectr {
        spectr: Vec<SpectrType>,
    },
    TidalLockCount {
        condition: Condition,
    },
    OceanType {
        #[serde(rename = "oceanType")]
        ocean_type: u32,
    },
    StarType {
        #[serde(rename = "starType")]
        star_type: Vec<StarType>,
    },
    GasCount {
        gas: GasType,
        condition: Condition,
    },
    SatelliteCount {
        condition: Condition,
    },
    /// Distance of the star from the birth point.
    Birth {
        condition: Condition,
    },
}

impl SimpleRule {
    #[must_use]
    pub fn rule_type(&self) -> RuleType {
        match self {
            SimpleRule::Unset => RuleType::None,
            SimpleRule::Luminosity { .. } => RuleType::Luminosity,
            SimpleRule::DysonRadius { .. } => RuleType::DysonRadius,
            SimpleRule::AverageVeinAmount { .. } => RuleType::AverageVeinAmount,
            SimpleRule::AverageVeinPatch { .. } => RuleType::AverageVeinPatch,
            SimpleRule::Spectr { .. } => RuleType::Spectr,
            SimpleRule::TidalLockCount { .. } => RuleType::TidalLockCount,
            SimpleRule::OceanType { .. } => RuleType::OceanType,
            SimpleRule::StarType { .. } => RuleType::StarType,
            SimpleRule::GasCount { .. } => RuleType::GasCount,
            SimpleRule::SatelliteCount { .. } => RuleType::SatelliteCount,
            SimpleRule::Birth { .. } => RuleType::Birth,
        }
    }

    /// The numeric condition, for rule types that are condition-driven.
    #[must_use]
    pub fn condition(&self) -> Option<&Condition> {
        match self {
            SimpleRule::Luminosity { condition }
            | SimpleRule::DysonRadius { condition }
            | SimpleRule::AverageVeinAmount { condition, .. }
            | SimpleRule::AverageVeinPatch { condition, .. }
            | SimpleRule::TidalLockCount { condition }
            | SimpleRule::GasCount { condition, .. }
            | SimpleRule::SatelliteCount { condition }
            | SimpleRule::Birth { condition } => Some(condition),
            SimpleRule::Unset
            | SimpleRule::Spectr { .. }
            | SimpleRule::OceanType { .. }
            | SimpleRule::StarType { .. } => None,
        }
    }

    pub fn condition_mut(&mut self) -> Option<&mut Condition> {
        match self {
            SimpleRule::Luminosity { condition }
            | SimpleRule::DysonRadius { condition }
            | SimpleRule::AverageVeinAmount { condition, .. }
            | SimpleRule::AverageVeinPatch { condition, .. }
            | SimpleRule::TidalLockCount { condition }
            | SimpleRule::GasCount { condition, .. }
            | SimpleRule::SatelliteCount { condition }
            | SimpleRule::Birth { condition } => Some(condition),
            _ => None,
        }
    }

    #[must_use]
    pub fn vein(&self) -> Option<VeinType> {
        match self {
            SimpleRule::AverageVeinAmount { vein, .. } | SimpleRule::AverageVeinPatch { vein, .. } => {
                Some(*vein)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn is_unset(&self) -> bool {
        matches!(self, SimpleRule::Unset)
    }
}

/// One disjunction of the canonical tree: a single rule, or an `Or` of
/// rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr", into = "NodeRepr")]
pub enum Clause {
    Simple(SimpleRule),
    Or(Vec<SimpleRule>),
}

/// Canonical, evaluable search criterion.
///
/// Built by [`construct_rule`](crate::construct_rule). The shape is at most
/// an `And` of [`Clause`]s, and a clause is at most an `Or` of simple
/// rules, so deeper nesting cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NodeRepr", into = "NodeRepr")]
pub enum Rule {
    Clause(Clause),
    And(Vec<Clause>),
}

impl Clause {
    #[must_use]
    pub fn rule_type(&self) -> RuleType {
        match self {
            Clause::Simple(rule) => rule.rule_type(),
            Clause::Or(_) => RuleType::Or,
        }
    }

    /// The simple rules of this clause, in order.
    #[must_use]
    pub fn rules(&self) -> &[SimpleRule] {
        match self {
            Clause::Simple(rule) => std::slice::from_ref(rule),
            Clause::Or(rules) => rules,
        }
    }
}

impl Rule {
    #[must_use]
    pub fn rule_type(&self) -> RuleType {
        match self {
            Rule::Clause(clause) => clause.rule_type(),
            Rule::And(_) => RuleType::And,
        }
    }

    /// The conjoined clauses, in order.
    #[must_use]
    pub fn clauses(&self) -> &[Clause] {
        match self {
            Rule::Clause(clause) => std::slice::from_ref(clause),
            Rule::And(clauses) => clauses,
        }
    }

    /// Iterate over every simple rule in the tree, depth first.
    pub fn simple_rules(&self) -> impl Iterator<Item = &SimpleRule> {
        self.clauses().iter().flat_map(Clause::rules)
    }

    /// Parse rule text, validate it and normalize it.
    ///
    /// # Errors
    ///
    /// Returns [`SeedRuleError`](crate::SeedRuleError) on syntax errors or
    /// when the parsed groups fail validation.
    pub fn from_dsl(input: &str) -> Result<Self, crate::SeedRuleError> {
        let groups = crate::parse::parse(input)?;
        Ok(crate::normalize::try_construct_rule(&groups)?)
    }

    /// Read rule text from a file and build it with [`from_dsl`](Self::from_dsl).
    ///
    /// # Errors
    ///
    /// Returns [`SeedRuleError`](crate::SeedRuleError) on I/O, syntax or
    /// validation errors.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, crate::SeedRuleError> {
        let input = std::fs::read_to_string(path)?;
        Self::from_dsl(&input)
    }
}

impl From<SimpleRule> for Clause {
    fn from(rule: SimpleRule) -> Self {
        Clause::Simple(rule)
    }
}

impl From<SimpleRule> for Rule {
    fn from(rule: SimpleRule) -> Self {
        Rule::Clause(Clause::Simple(rule))
    }
}

impl From<Clause> for Rule {
    fn from(clause: Clause) -> Self {
        Rule::Clause(clause)
    }
}

// -- Display (rule text syntax) ---------------------------------------------

impl fmt::Display for SimpleRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleRule::Unset => write!(f, "none"),
            SimpleRule::Luminosity { condition } => write!(f, "luminosity {condition}"),
            SimpleRule::DysonRadius { condition } => write!(f, "dyson_radius {condition}"),
            SimpleRule::AverageVeinAmount { vein, condition } => {
                write!(f, "avg_vein_amount({vein}) {condition}")
            }
            SimpleRule::AverageVeinPatch { vein, condition } => {
                write!(f, "avg_vein_patch({vein}) {condition}")
            }
            SimpleRule::Spectr { spectr } => write!(f, "spectr in [{}]", join(spectr)),
            SimpleRule::TidalLockCount { condition } => {
                write!(f, "tidal_lock_count {condition}")
            }
            SimpleRule::OceanType { ocean_type } => write!(f, "ocean_type == {ocean_type}"),
            SimpleRule::StarType { star_type } => write!(f, "star_type in [{}]", join(star_type)),
            SimpleRule::GasCount { gas, condition } => write!(f, "gas_count({gas}) {condition}"),
            SimpleRule::SatelliteCount { condition } => {
                write!(f, "satellite_count {condition}")
            }
            SimpleRule::Birth { condition } => write!(f, "birth {condition}"),
        }
    }
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Canonical rules hold game units; their text shows display units so that
/// [`Rule::from_dsl`] reads it back to the same tree.
impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, rule) in self.rules().iter().enumerate() {
            if i > 0 {
                write!(f, " OR ")?;
            }
            write!(f, "{}", crate::normalize::unfix_rule(rule))?;
        }
        Ok(())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses().iter().enumerate() {
            if i > 0 {
                write!(f, "\nAND ")?;
            }
            write!(f, "{clause}")?;
        }
        Ok(())
    }
}

// -- Wire representation ----------------------------------------------------

/// Plain nested record form of a rule tree: either a tagged `And`/`Or`
/// group or a bare simple rule.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum NodeRepr {
    Group(GroupRepr),
    Leaf(SimpleRule),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
enum GroupRepr {
    And { rules: Vec<NodeRepr> },
    Or { rules: Vec<NodeRepr> },
}

fn leaves(nodes: Vec<NodeRepr>) -> Result<Vec<SimpleRule>, RuleError> {
    nodes
        .into_iter()
        .map(|node| match node {
            NodeRepr::Leaf(rule) => Ok(rule),
            NodeRepr::Group(_) => Err(RuleError::InvalidShape {
                reason: "an Or group may only contain simple rules".into(),
            }),
        })
        .collect()
}

impl TryFrom<NodeRepr> for Clause {
    type Error = RuleError;

    fn try_from(node: NodeRepr) -> Result<Self, Self::Error> {
        match node {
            NodeRepr::Leaf(rule) => Ok(Clause::Simple(rule)),
            NodeRepr::Group(GroupRepr::Or { rules }) => Ok(Clause::Or(leaves(rules)?)),
            NodeRepr::Group(GroupRepr::And { .. }) => Err(RuleError::InvalidShape {
                reason: "an And group cannot be nested inside another group".into(),
            }),
        }
    }
}

impl TryFrom<NodeRepr> for Rule {
    type Error = RuleError;

    fn try_from(node: NodeRepr) -> Result<Self, Self::Error> {
        match node {
            NodeRepr::Group(GroupRepr::And { rules }) => rules
                .into_iter()
                .map(Clause::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Rule::And),
            other => Clause::try_from(other).map(Rule::Clause),
        }
    }
}

impl From<Clause> for NodeRepr {
    fn from(clause: Clause) -> Self {
        match clause {
            Clause::Simple(rule) => NodeRepr::Leaf(rule),
            Clause::Or(rules) => NodeRepr::Group(GroupRepr::Or {
                rules: rules.into_iter().map(NodeRepr::Leaf).collect(),
            }),
        }
    }
}

impl From<Rule> for NodeRepr {
    fn from(rule: Rule) -> Self {
        match rule {
            Rule::Clause(clause) => clause.into(),
            Rule::And(clauses) => NodeRepr::Group(GroupRepr::And {
                rules: clauses.into_iter().map(NodeRepr::from).collect(),
            }),
        }
    }
}
