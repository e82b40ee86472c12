//! Saved searches: criteria, search range, progress and the stars found.

use std::collections::BTreeMap;

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::search::SearchParams;
use crate::{
    try_construct_multi_rule, try_construct_rule, CompositeRule, Galaxy, MultiRule, Rule,
    RuleError, SimpleRule, Star,
};

/// Every profile id starts with this prefix.
pub const PROFILE_PREFIX: &str = "profile_";

const PROFILE_ID_LEN: usize = 20;

/// A fresh profile id: [`PROFILE_PREFIX`] followed by 20 random
/// alphanumeric characters.
#[must_use]
pub fn generate_profile_id() -> String {
    generate_profile_id_with(&mut rand::thread_rng())
}

/// [`generate_profile_id`] drawing from a caller-supplied generator.
pub fn generate_profile_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = rng
        .sample_iter(&Alphanumeric)
        .take(PROFILE_ID_LEN)
        .map(char::from)
        .collect();
    format!("{PROFILE_PREFIX}{suffix}")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no profile with id '{0}'")]
    UnknownProfile(String),

    #[error("profile id '{0}' does not start with 'profile_'")]
    InvalidId(String),

    #[error("seed range {start}..{end} is empty")]
    EmptyRange { start: u32, end: u32 },

    #[error("star {index} of seed {seed} does not fit a record id")]
    InvalidRecord { seed: u32, index: u32 },
}

/// What a profile searches for, as raw rule groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Criteria {
    /// Stars matching a per-star rule.
    Star { rules: Vec<Vec<SimpleRule>> },
    /// Galaxies whose stars satisfy multiplicity requirements.
    Galaxy { rules: Vec<Vec<MultiRule>> },
}

impl Criteria {
    /// Validate and normalize the criteria into something a search can run.
    ///
    /// # Errors
    ///
    /// The first [`RuleError`] found in the rule groups.
    pub fn compile(&self) -> Result<SearchPredicate, RuleError> {
        match self {
            Criteria::Star { rules } => try_construct_rule(rules).map(SearchPredicate::Star),
            Criteria::Galaxy { rules } => {
                try_construct_multi_rule(rules).map(SearchPredicate::Galaxy)
            }
        }
    }
}

/// Compiled [`Criteria`].
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPredicate {
    Star(Rule),
    Galaxy(CompositeRule),
}

impl SearchPredicate {
    /// The stars of `galaxy` worth recording, or `None` when the galaxy is
    /// not a hit.
    ///
    /// For a star rule these are the matching stars. For a galaxy rule the
    /// whole galaxy must match; the stars recorded are the ones matched by
    /// any composite's per-star rule.
    #[must_use]
    pub fn search(&self, galaxy: &Galaxy) -> Option<Galaxy> {
        let stars: Vec<Star> = match self {
            SearchPredicate::Star(rule) => rule.filter(&galaxy.stars).cloned().collect(),
            SearchPredicate::Galaxy(rule) => {
                if !rule.matches(&galaxy.stars) {
                    return None;
                }
                galaxy
                    .stars
                    .iter()
                    .filter(|s| {
                        rule.clauses()
                            .iter()
                            .flat_map(|c| c.composites())
                            .any(|c| c.rule.matches(*s))
                    })
                    .cloned()
                    .collect()
            }
        };
        if stars.is_empty() {
            return None;
        }
        Some(Galaxy {
            seed: galaxy.seed,
            stars,
        })
    }
}

/// A saved search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSettings {
    pub id: String,
    pub name: String,
    pub criteria: Criteria,
    pub search: SearchParams,
    /// First seed of the range, inclusive.
    pub start: u32,
    /// End of the range, exclusive.
    pub end: u32,
    /// Next seed to examine.
    pub current: u32,
}

impl ProfileSettings {
    /// New settings under a fresh id, with progress at `start`.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyRange`] when `start >= end`.
    pub fn new(
        name: impl Into<String>,
        criteria: Criteria,
        search: SearchParams,
        start: u32,
        end: u32,
    ) -> Result<Self, StoreError> {
        if start >= end {
            return Err(StoreError::EmptyRange { start, end });
        }
        Ok(Self {
            id: generate_profile_id(),
            name: name.into(),
            criteria,
            search,
            start,
            end,
            current: start,
        })
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.current >= self.end
    }

    /// Fraction of the seed range already examined, in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.end <= self.start {
            return 1.0;
        }
        let done = f64::from(self.current.clamp(self.start, self.end) - self.start);
        done / f64::from(self.end - self.start)
    }
}

/// Star indices must stay below this for record ids to be unique.
pub const RECORD_INDEX_LIMIT: u32 = 100;

/// One star found by a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StarRecord {
    /// `seed * 100 + index`, unique within a profile while `index` is
    /// below [`RECORD_INDEX_LIMIT`].
    pub id: u64,
    pub seed: u32,
    pub index: u32,
}

impl StarRecord {
    #[must_use]
    pub fn new(seed: u32, index: u32) -> Self {
        Self {
            id: u64::from(seed) * u64::from(RECORD_INDEX_LIMIT) + u64::from(index),
            seed,
            index,
        }
    }

    /// Whether the record can be stored without its id colliding.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidRecord`] if the index is out of range or the id
    /// was not derived from `seed` and `index`.
    pub fn check(&self) -> Result<(), StoreError> {
        if self.index >= RECORD_INDEX_LIMIT || *self != Self::new(self.seed, self.index) {
            return Err(StoreError::InvalidRecord {
                seed: self.seed,
                index: self.index,
            });
        }
        Ok(())
    }
}

/// Persistence for profiles and their results.
pub trait ProfileStore {
    /// Ids of every stored profile.
    fn profile_ids(&self) -> Vec<String>;

    /// # Errors
    ///
    /// [`StoreError::InvalidId`] for ids without the profile prefix.
    fn settings(&self, id: &str) -> Result<Option<ProfileSettings>, StoreError>;

    /// Insert or replace settings, keyed by `settings.id`.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidId`] for ids without the profile prefix.
    fn put_settings(&mut self, settings: ProfileSettings) -> Result<(), StoreError>;

    /// Advance the profile to `current_seed` and record every star of
    /// `found`. Recording a star twice keeps one record. Nothing changes
    /// when an error is returned.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownProfile`] if the profile does not exist,
    /// [`StoreError::InvalidRecord`] for a star index of
    /// [`RECORD_INDEX_LIMIT`] or more.
    fn save_progress(
        &mut self,
        id: &str,
        current_seed: u32,
        found: &[Galaxy],
    ) -> Result<(), StoreError>;

    /// Add records without touching progress. Either every record is added
    /// or none is.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownProfile`] if the profile does not exist,
    /// [`StoreError::InvalidRecord`] if any record fails
    /// [`StarRecord::check`].
    fn put_records(&mut self, id: &str, records: &[StarRecord]) -> Result<(), StoreError>;

    /// Recorded stars ordered by id.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownProfile`] if the profile does not exist.
    fn records(&self, id: &str) -> Result<Vec<StarRecord>, StoreError>;

    /// Drop every record and rewind progress to the start of the range.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownProfile`] if the profile does not exist.
    fn clear_records(&mut self, id: &str) -> Result<(), StoreError>;

    /// Remove settings and records.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownProfile`] if the profile does not exist.
    fn delete(&mut self, id: &str) -> Result<(), StoreError>;
}

/// Copy the settings of `id` under a fresh id with progress rewound.
/// Records are not copied.
///
/// # Errors
///
/// [`StoreError::UnknownProfile`] if `id` does not exist, or any error of
/// [`ProfileStore::put_settings`].
pub fn clone_profile<S: ProfileStore + ?Sized>(store: &mut S, id: &str) -> Result<String, StoreError> {
    let mut settings = store
        .settings(id)?
        .ok_or_else(|| StoreError::UnknownProfile(id.to_owned()))?;
    settings.id = generate_profile_id();
    settings.current = settings.start;
    let new_id = settings.id.clone();
    store.put_settings(settings)?;
    debug!(from = %id, to = %new_id, "cloned profile");
    Ok(new_id)
}

fn check_id(id: &str) -> Result<(), StoreError> {
    if id.starts_with(PROFILE_PREFIX) {
        Ok(())
    } else {
        Err(StoreError::InvalidId(id.to_owned()))
    }
}

#[derive(Debug, Clone)]
struct StoredProfile {
    settings: ProfileSettings,
    records: BTreeMap<u64, StarRecord>,
}

/// In-process [`ProfileStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profiles: BTreeMap<String, StoredProfile>,
}

impl MemoryProfileStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn profile(&self, id: &str) -> Result<&StoredProfile, StoreError> {
        check_id(id)?;
        self.profiles
            .get(id)
            .ok_or_else(|| StoreError::UnknownProfile(id.to_owned()))
    }

    fn profile_mut(&mut self, id: &str) -> Result<&mut StoredProfile, StoreError> {
        check_id(id)?;
        self.profiles
            .get_mut(id)
            .ok_or_else(|| StoreError::UnknownProfile(id.to_owned()))
    }
}

impl ProfileStore for MemoryProfileStore {
    fn profile_ids(&self) -> Vec<String> {
        self.profiles.keys().cloned().collect()
    }

    fn settings(&self, id: &str) -> Result<Option<ProfileSettings>, StoreError> {
        check_id(id)?;
        Ok(self.profiles.get(id).map(|p| p.settings.clone()))
    }

    fn put_settings(&mut self, settings: ProfileSettings) -> Result<(), StoreError> {
        check_id(&settings.id)?;
        debug!(id = %settings.id, current = settings.current, "stored profile settings");
        match self.profiles.get_mut(&settings.id) {
            Some(profile) => profile.settings = settings,
            None => {
                self.profiles.insert(
                    settings.id.clone(),
                    StoredProfile {
                        settings,
                        records: BTreeMap::new(),
                    },
                );
            }
        }
        Ok(())
    }

    fn save_progress(
        &mut self,
        id: &str,
        current_seed: u32,
        found: &[Galaxy],
    ) -> Result<(), StoreError> {
        let records: Vec<StarRecord> = found
            .iter()
            .flat_map(|g| g.stars.iter().map(move |s| StarRecord::new(g.seed, s.index)))
            .collect();
        self.put_records(id, &records)?;
        self.profile_mut(id)?.settings.current = current_seed;
        debug!(id = %id, current = current_seed, "saved search progress");
        Ok(())
    }

    fn put_records(&mut self, id: &str, records: &[StarRecord]) -> Result<(), StoreError> {
        let profile = self.profile_mut(id)?;
        records.iter().try_for_each(StarRecord::check)?;
        let before = profile.records.len();
        profile.records.extend(records.iter().map(|r| (r.id, *r)));
        debug!(id = %id, added = profile.records.len() - before, "stored star records");
        Ok(())
    }

    fn records(&self, id: &str) -> Result<Vec<StarRecord>, StoreError> {
        Ok(self.profile(id)?.records.values().copied().collect())
    }

    fn clear_records(&mut self, id: &str) -> Result<(), StoreError> {
        let profile = self.profile_mut(id)?;
        profile.records.clear();
        profile.settings.current = profile.settings.start;
        debug!(id = %id, "cleared profile records");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        check_id(id)?;
        if self.profiles.remove(id).is_none() {
            return Err(StoreError::UnknownProfile(id.to_owned()));
        }
        debug!(id = %id, "deleted profile");
        Ok(())
    }
}

/// Everything a store holds for one profile.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSnapshot {
    pub settings: ProfileSettings,
    pub records: Vec<StarRecord>,
}

impl ProfileSnapshot {
    /// Read profile `id` out of `store`.
    ///
    /// # Errors
    ///
    /// [`StoreError::UnknownProfile`] if the profile does not exist.
    pub fn capture<S: ProfileStore + ?Sized>(store: &S, id: &str) -> Result<Self, StoreError> {
        let settings = store
            .settings(id)?
            .ok_or_else(|| StoreError::UnknownProfile(id.to_owned()))?;
        let records = store.records(id)?;
        Ok(Self { settings, records })
    }

    /// Write this profile into `store`, replacing any profile with the same
    /// id.
    ///
    /// # Errors
    ///
    /// Any error of the store.
    pub fn restore<S: ProfileStore + ?Sized>(&self, store: &mut S) -> Result<(), StoreError> {
        let id = self.settings.id.as_str();
        if store.settings(id)?.is_some() {
            store.delete(id)?;
        }
        store.put_settings(self.settings.clone())?;
        store.put_records(id, &self.records)
    }
}

#[cfg(feature = "binary-cache")]
impl ProfileSnapshot {
    /// Encode into the binary snapshot format.
    ///
    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) if encoding fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>, crate::serial::SerializeError> {
        crate::serial::encode(self)
    }

    /// Decode bytes produced by [`to_bytes`](Self::to_bytes).
    ///
    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// format, integrity, or validation failure.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, crate::serial::DeserializeError> {
        crate::serial::decode(bytes)
    }

    /// # Errors
    ///
    /// Returns [`SerializeError`](crate::serial::SerializeError) on
    /// encoding or I/O failure.
    pub fn to_binary_file(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), crate::serial::SerializeError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`DeserializeError`](crate::serial::DeserializeError) on
    /// I/O, format, integrity, or validation failure.
    pub fn from_binary_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, crate::serial::DeserializeError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }
}
