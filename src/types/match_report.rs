use std::fmt;
use std::time::Duration;

/// Detailed outcome of [`Rule::explain()`](crate::Rule::explain).
///
/// Records the overall result, the result of every top-level clause in
/// order, and the wall-clock duration of the evaluation. Unlike
/// [`Rule::matches()`](crate::Rule::matches), every clause is evaluated.
#[derive(Debug, Clone)]
#[must_use]
pub struct MatchReport {
    matched: bool,
    clauses: Vec<bool>,
    duration: Duration,
}

impl MatchReport {
    pub(crate) fn new(clauses: Vec<bool>, duration: Duration) -> Self {
        Self {
            matched: clauses.iter().all(|&c| c),
            clauses,
            duration,
        }
    }

    /// Same answer as [`Rule::matches()`](crate::Rule::matches).
    #[must_use]
    pub fn matched(&self) -> bool {
        self.matched
    }

    #[must_use]
    pub fn clause_results(&self) -> &[bool] {
        &self.clauses
    }

    /// Indices of the clauses that did not hold.
    #[must_use]
    pub fn failed_clauses(&self) -> Vec<usize> {
        self.clauses
            .iter()
            .enumerate()
            .filter(|(_, ok)| !**ok)
            .map(|(i, _)| i)
            .collect()
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl fmt::Display for MatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "matched: {}", self.matched)?;
        let clauses: Vec<String> = self.clauses.iter().map(ToString::to_string).collect();
        write!(f, ", clauses: [{}]", clauses.join(", "))?;
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}
