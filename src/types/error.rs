use thiserror::Error;

/// Why a set of rule groups cannot be turned into a search predicate.
///
/// Group and rule positions are zero-based indices into the input as the
/// user entered it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("no rule groups given; at least one group is required")]
    NoGroups,

    #[error("rule group {group} is empty")]
    EmptyGroup { group: usize },

    #[error("rule {index} in group {group} has no rule type")]
    UnsetRule { group: usize, index: usize },

    #[error("composite rule {index} in group {group} has no rule groups")]
    EmptyComposite { group: usize, index: usize },

    #[error("composite rule {index} in group {group}: {source}")]
    InvalidComposite {
        group: usize,
        index: usize,
        #[source]
        source: Box<RuleError>,
    },

    #[error("rule {index} in group {group} has an incomplete operand: {reason}")]
    MissingOperand {
        group: usize,
        index: usize,
        reason: String,
    },

    #[error("invalid rule tree: {reason}")]
    InvalidShape { reason: String },
}

/// A string or item id that names no variant of the target vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub(crate) fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}
