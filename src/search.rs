//! Search parameters and their query-string form.
//!
//! Only values that differ from the defaults appear in the query string, so
//! a default search has an empty one.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use winnow::ascii::{dec_uint, float};
use winnow::combinator::{alt, cut_err, eof, opt, peek, separated, terminated};
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

pub const MIN_STAR_COUNT: u32 = 32;
pub const MAX_STAR_COUNT: u32 = 64;
pub const DEFAULT_STAR_COUNT: u32 = 64;

/// Resource multipliers the game lets a new galaxy be created with.
pub const RESOURCE_MULTIPLERS: [f64; 10] = [0.1, 0.5, 0.8, 1.0, 1.5, 2.0, 3.0, 5.0, 8.0, 100.0];
pub const DEFAULT_RESOURCE_MULTIPLER: f64 = 1.0;

/// Errors produced when reading or checking search parameters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    #[error("malformed query string at byte {offset}")]
    Syntax { offset: usize },

    #[error("star count {0} is outside 32..=64")]
    CountOutOfRange(u32),

    #[error("resource multipler {0} is not one the game offers")]
    UnsupportedMultipler(f64),
}

/// Galaxy generation settings a search runs with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    pub count: u32,
    pub multipler: f64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            count: DEFAULT_STAR_COUNT,
            multipler: DEFAULT_RESOURCE_MULTIPLER,
        }
    }
}

impl SearchParams {
    /// Build parameters, rejecting values the game does not offer.
    ///
    /// # Errors
    ///
    /// [`QueryError::CountOutOfRange`] or [`QueryError::UnsupportedMultipler`].
    pub fn new(count: u32, multipler: f64) -> Result<Self, QueryError> {
        let params = Self { count, multipler };
        params.check()?;
        Ok(params)
    }

    /// # Errors
    ///
    /// See [`new`](Self::new).
    pub fn check(&self) -> Result<(), QueryError> {
        if !(MIN_STAR_COUNT..=MAX_STAR_COUNT).contains(&self.count) {
            return Err(QueryError::CountOutOfRange(self.count));
        }
        if !RESOURCE_MULTIPLERS.contains(&self.multipler) {
            return Err(QueryError::UnsupportedMultipler(self.multipler));
        }
        Ok(())
    }

    /// `""` for the defaults, otherwise `?count=..&multipler=..` with only
    /// the non-default keys present.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut pairs = Vec::new();
        if self.count != DEFAULT_STAR_COUNT {
            pairs.push(format!("count={}", self.count));
        }
        if self.multipler != DEFAULT_RESOURCE_MULTIPLER {
            pairs.push(format!("multipler={}", self.multipler));
        }
        if pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", pairs.join("&"))
        }
    }

    /// Inverse of [`to_query_string`](Self::to_query_string). Missing keys
    /// take their defaults and unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// [`QueryError::Syntax`] for malformed input, or the range errors of
    /// [`check`](Self::check).
    pub fn from_query_string(query: &str) -> Result<Self, QueryError> {
        let pairs = query_pairs
            .parse(query)
            .map_err(|e| QueryError::Syntax { offset: e.offset() })?;
        let mut params = Self::default();
        for pair in pairs {
            match pair {
                Pair::Count(count) => params.count = count,
                Pair::Multipler(multipler) => params.multipler = multipler,
                Pair::Other => {}
            }
        }
        params.check()?;
        Ok(params)
    }
}

enum Pair {
    Count(u32),
    Multipler(f64),
    Other,
}

fn is_query_char(c: char) -> bool {
    c != '&' && c != '=' && c != '#'
}

fn pair(input: &mut &str) -> ModalResult<Pair> {
    alt((
        ("count=", cut_err(terminated(dec_uint, opt_end))).map(|(_, n)| Pair::Count(n)),
        ("multipler=", cut_err(terminated(float, opt_end))).map(|(_, m)| Pair::Multipler(m)),
        (
            take_while(1.., is_query_char),
            opt(('=', take_while(0.., is_query_char))),
        )
            .map(|_| Pair::Other),
    ))
    .parse_next(input)
}

/// Succeeds only at a pair boundary, so `count=12x` is a syntax error rather
/// than an unknown key.
fn opt_end(input: &mut &str) -> ModalResult<()> {
    peek(alt((eof.void(), "&".void()))).parse_next(input)
}

// Empty pairs (`a&&b`, a trailing `&`) are skipped like browsers do.
fn query_pairs(input: &mut &str) -> ModalResult<Vec<Pair>> {
    opt('?').parse_next(input)?;
    separated(0.., opt(pair).map(|p| p.unwrap_or(Pair::Other)), '&').parse_next(input)
}
