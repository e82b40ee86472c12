use thiserror::Error;

use crate::parse::ParseError;
use crate::profile::StoreError;
use crate::search::QueryError;
use crate::RuleError;

/// Unified error type covering parsing, validation, search parameters,
/// profile storage and I/O.
///
/// Returned by convenience methods like [`Rule::from_dsl()`](crate::Rule::from_dsl).
#[derive(Debug, Error)]
pub enum SeedRuleError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Serialize(#[from] crate::serial::SerializeError),

    #[cfg(feature = "binary-cache")]
    #[error(transparent)]
    Deserialize(#[from] crate::serial::DeserializeError),
}
