//! Binary serialization and deserialization of profile snapshots.
//!
//! This module provides a stable binary format for persisting a
//! [`ProfileSnapshot`](crate::ProfileSnapshot): the settings of one saved
//! search together with the stars it has found. The format consists of a
//! 32-byte fixed header followed by a bincode-encoded payload.
//!
//! ## Wire Format
//!
//! ```text
//! Offset  Size  Field
//! 0       4     Magic bytes: b"DSPS"
//! 4       2     Format version (u16, little-endian)
//! 6       2     Engine version (u16, little-endian)
//! 8       4     Flags (u32, reserved)
//! 12      4     Payload length in bytes (u32, little-endian)
//! 16      16    BLAKE3 hash of the payload (truncated to 16 bytes)
//! 32..    var   Bincode-encoded payload
//! ```
//!
//! ## Versioning
//!
//! The format version in the header must match exactly. If it does not,
//! deserialization fails immediately with [`DeserializeError::IncompatibleVersion`].
//! The engine version is informational only.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::profile::{
    Criteria, ProfileSettings, ProfileSnapshot, StarRecord, PROFILE_PREFIX, RECORD_INDEX_LIMIT,
};
use crate::search::SearchParams;
use crate::{Condition, GasType, MultiRule, SimpleRule, SpectrType, StarType, VeinType};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const MAGIC: &[u8; 4] = b"DSPS";
const FORMAT_VERSION: u16 = 1;
const ENGINE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 32;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when serializing a profile snapshot to bytes.
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("failed to encode profile snapshot: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("I/O error during serialization: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur when deserializing a profile snapshot from bytes.
#[derive(Debug, Error)]
pub enum DeserializeError {
    #[error("not a profile snapshot: invalid magic bytes")]
    BadMagic,

    #[error("incompatible format version: blob is v{blob}, engine supports v{supported}")]
    IncompatibleVersion { blob: u16, supported: u16 },

    #[error("integrity check failed: BLAKE3 checksum mismatch")]
    ChecksumMismatch,

    #[error("payload length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: u32, actual: usize },

    #[error("failed to decode payload: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("I/O error during deserialization: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Serialized type hierarchy
// ---------------------------------------------------------------------------
//
// The public rule types use internally tagged serde representations, which
// bincode cannot decode. The payload goes through these externally tagged
// mirrors instead.

#[derive(Debug, Serialize, Deserialize)]
struct SerializedSnapshot {
    metadata: SnapshotMetadata,
    settings: SerializedSettings,
    records: Vec<(u32, u32)>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SnapshotMetadata {
    record_count: usize,
    rule_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedSettings {
    id: String,
    name: String,
    criteria: SerializedCriteria,
    count: u32,
    multipler: f64,
    start: u32,
    end: u32,
    current: u32,
}

#[derive(Debug, Serialize, Deserialize)]
enum SerializedCriteria {
    Star(Vec<Vec<SerializedRule>>),
    Galaxy(Vec<Vec<SerializedMultiRule>>),
}

#[derive(Debug, Serialize, Deserialize)]
struct SerializedMultiRule {
    condition: SerializedCondition,
    rules: Vec<Vec<SerializedRule>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum SerializedCondition {
    Eq(f64),
    Neq(f64),
    Lt(f64),
    Lte(f64),
    Gt(f64),
    Gte(f64),
    Between(f64, f64),
    NotBetween(f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum SerializedRule {
    Unset,
    Luminosity(SerializedCondition),
    DysonRadius(SerializedCondition),
    AverageVeinAmount(VeinType, SerializedCondition),
    AverageVeinPatch(VeinType, SerializedCondition),
    Spectr(Vec<SpectrType>),
    TidalLockCount(SerializedCondition),
    OceanType(u32),
    StarType(Vec<StarType>),
    GasCount(GasType, SerializedCondition),
    SatelliteCount(SerializedCondition),
    Birth(SerializedCondition),
}

// ---------------------------------------------------------------------------
// Condition conversion
// ---------------------------------------------------------------------------

fn serialize_condition(condition: Condition) -> SerializedCondition {
    match condition {
        Condition::Eq { value } => SerializedCondition::Eq(value),
        Condition::Neq { value } => SerializedCondition::Neq(value),
        Condition::Lt { value } => SerializedCondition::Lt(value),
        Condition::Lte { value } => SerializedCondition::Lte(value),
        Condition::Gt { value } => SerializedCondition::Gt(value),
        Condition::Gte { value } => SerializedCondition::Gte(value),
        Condition::Between { low, high } => SerializedCondition::Between(low, high),
        Condition::NotBetween { low, high } => SerializedCondition::NotBetween(low, high),
    }
}

// Bounds are restored as stored; reordering would hide a corrupted blob.
fn deserialize_condition(condition: SerializedCondition) -> Condition {
    match condition {
        SerializedCondition::Eq(value) => Condition::Eq { value },
        SerializedCondition::Neq(value) => Condition::Neq { value },
        SerializedCondition::Lt(value) => Condition::Lt { value },
        SerializedCondition::Lte(value) => Condition::Lte { value },
        SerializedCondition::Gt(value) => Condition::Gt { value },
        SerializedCondition::Gte(value) => Condition::Gte { value },
        SerializedCondition::Between(low, high) => Condition::Between { low, high },
        SerializedCondition::NotBetween(low, high) => Condition::NotBetween { low, high },
    }
}

// ---------------------------------------------------------------------------
// Rule conversion
// ---------------------------------------------------------------------------

fn serialize_rule(rule: &SimpleRule) -> SerializedRule {
    match rule {
        SimpleRule::Unset => SerializedRule::Unset,
        SimpleRule::Luminosity { condition } => {
            SerializedRule::Luminosity(serialize_condition(*condition))
        }
        SimpleRule::DysonRadius { condition } => {
            SerializedRule::DysonRadius(serialize_condition(*condition))
        }
        SimpleRule::AverageVeinAmount { vein, condition } => {
            SerializedRule::AverageVeinAmount(*vein, serialize_condition(*condition))
        }
        SimpleRule::AverageVeinPatch { vein, condition } => {
            SerializedRule::AverageVeinPatch(*vein, serialize_condition(*condition))
        }
        SimpleRule::Spectr { spectr } => SerializedRule::Spectr(spectr.clone()),
        SimpleRule::TidalLockCount { condition } => {
            SerializedRule::TidalLockCount(serialize_condition(*condition))
        }
        SimpleRule::OceanType { ocean_type } => SerializedRule::OceanType(*ocean_type),
        SimpleRule::StarType { star_type } => SerializedRule::StarType(star_type.clone()),
        SimpleRule::GasCount { gas, condition } => {
            SerializedRule::GasCount(*gas, serialize_condition(*condition))
        }
        SimpleRule::SatelliteCount { condition } => {
            SerializedRule::SatelliteCount(serialize_condition(*condition))
        }
        SimpleRule::Birth { condition } => SerializedRule::Birth(serialize_condition(*condition)),
    }
}

fn deserialize_rule(rule: SerializedRule) -> SimpleRule {
    match rule {
        SerializedRule::Unset => SimpleRule::Unset,
        SerializedRule::Luminosity(c) => SimpleRule::Luminosity {
            condition: deserialize_condition(c),
        },
        SerializedRule::DysonRadius(c) => SimpleRule::DysonRadius {
            condition: deserialize_condition(c),
        },
        SerializedRule::AverageVeinAmount(vein, c) => SimpleRule::AverageVeinAmount {
            vein,
            condition: deserialize_condition(c),
        },
        SerializedRule::AverageVeinPatch(vein, c) => SimpleRule::AverageVeinPatch {
            vein,
            condition: deserialize_condition(c),
        },
        SerializedRule::Spectr(spectr) => SimpleRule::Spectr { spectr },
        SerializedRule::TidalLockCount(c) => SimpleRule::TidalLockCount {
            condition: deserialize_condition(c),
        },
        SerializedRule::OceanType(ocean_type) => SimpleRule::OceanType { ocean_type },
        SerializedRule::StarType(star_type) => SimpleRule::StarType { star_type },
        SerializedRule::GasCount(gas, c) => SimpleRule::GasCount {
            gas,
            condition: deserialize_condition(c),
        },
        SerializedRule::SatelliteCount(c) => SimpleRule::SatelliteCount {
            condition: deserialize_condition(c),
        },
        SerializedRule::Birth(c) => SimpleRule::Birth {
            condition: deserialize_condition(c),
        },
    }
}

fn serialize_groups(groups: &[Vec<SimpleRule>]) -> Vec<Vec<SerializedRule>> {
    groups
        .iter()
        .map(|g| g.iter().map(serialize_rule).collect())
        .collect()
}

fn deserialize_groups(groups: Vec<Vec<SerializedRule>>) -> Vec<Vec<SimpleRule>> {
    groups
        .into_iter()
        .map(|g| g.into_iter().map(deserialize_rule).collect())
        .collect()
}

fn serialize_criteria(criteria: &Criteria) -> SerializedCriteria {
    match criteria {
        Criteria::Star { rules } => SerializedCriteria::Star(serialize_groups(rules)),
        Criteria::Galaxy { rules } => SerializedCriteria::Galaxy(
            rules
                .iter()
                .map(|g| {
                    g.iter()
                        .map(|m| SerializedMultiRule {
                            condition: serialize_condition(m.condition),
                            rules: serialize_groups(&m.rules),
                        })
                        .collect()
                })
                .collect(),
        ),
    }
}

fn deserialize_criteria(criteria: SerializedCriteria) -> Criteria {
    match criteria {
        SerializedCriteria::Star(groups) => Criteria::Star {
            rules: deserialize_groups(groups),
        },
        SerializedCriteria::Galaxy(groups) => Criteria::Galaxy {
            rules: groups
                .into_iter()
                .map(|g| {
                    g.into_iter()
                        .map(|m| MultiRule {
                            condition: deserialize_condition(m.condition),
                            rules: deserialize_groups(m.rules),
                        })
                        .collect()
                })
                .collect(),
        },
    }
}

fn count_rules(criteria: &SerializedCriteria) -> usize {
    match criteria {
        SerializedCriteria::Star(groups) => groups.iter().map(Vec::len).sum(),
        SerializedCriteria::Galaxy(groups) => groups
            .iter()
            .flatten()
            .map(|m| m.rules.iter().map(Vec::len).sum::<usize>())
            .sum(),
    }
}

// ---------------------------------------------------------------------------
// ProfileSnapshot <-> SerializedSnapshot
// ---------------------------------------------------------------------------

fn snapshot_to_serialized(snapshot: &ProfileSnapshot) -> SerializedSnapshot {
    let settings = &snapshot.settings;
    let criteria = serialize_criteria(&settings.criteria);
    let rule_count = count_rules(&criteria);
    SerializedSnapshot {
        metadata: SnapshotMetadata {
            record_count: snapshot.records.len(),
            rule_count,
        },
        settings: SerializedSettings {
            id: settings.id.clone(),
            name: settings.name.clone(),
            criteria,
            count: settings.search.count,
            multipler: settings.search.multipler,
            start: settings.start,
            end: settings.end,
            current: settings.current,
        },
        records: snapshot.records.iter().map(|r| (r.seed, r.index)).collect(),
    }
}

fn serialized_to_snapshot(ser: SerializedSnapshot) -> Result<ProfileSnapshot, DeserializeError> {
    validate(&ser)?;

    let s = ser.settings;
    let settings = ProfileSettings {
        id: s.id,
        name: s.name,
        criteria: deserialize_criteria(s.criteria),
        search: SearchParams {
            count: s.count,
            multipler: s.multipler,
        },
        start: s.start,
        end: s.end,
        current: s.current,
    };
    let records = ser
        .records
        .into_iter()
        .map(|(seed, index)| StarRecord::new(seed, index))
        .collect();
    Ok(ProfileSnapshot { settings, records })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(ser: &SerializedSnapshot) -> Result<(), DeserializeError> {
    // Metadata consistency
    if ser.metadata.record_count != ser.records.len() {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} records but payload has {}",
            ser.metadata.record_count,
            ser.records.len()
        )));
    }
    let rule_count = count_rules(&ser.settings.criteria);
    if ser.metadata.rule_count != rule_count {
        return Err(DeserializeError::Validation(format!(
            "metadata says {} rules but payload has {}",
            ser.metadata.rule_count, rule_count
        )));
    }

    let settings = &ser.settings;
    if !settings.id.starts_with(PROFILE_PREFIX) {
        return Err(DeserializeError::Validation(format!(
            "profile id '{}' lacks the '{PROFILE_PREFIX}' prefix",
            settings.id
        )));
    }
    if settings.start >= settings.end {
        return Err(DeserializeError::Validation(format!(
            "empty seed range {}..{}",
            settings.start, settings.end
        )));
    }
    SearchParams {
        count: settings.count,
        multipler: settings.multipler,
    }
    .check()
    .map_err(|e| DeserializeError::Validation(e.to_string()))?;

    // Record ids are derived from (seed, index) and must stay unique
    let mut seen = BTreeSet::new();
    for &(seed, index) in &ser.records {
        if index >= RECORD_INDEX_LIMIT {
            return Err(DeserializeError::Validation(format!(
                "star index {index} of seed {seed} does not fit a record id"
            )));
        }
        if !seen.insert((seed, index)) {
            return Err(DeserializeError::Validation(format!(
                "duplicate record for seed {seed} star {index}"
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Header I/O
// ---------------------------------------------------------------------------

fn write_header(buf: &mut Vec<u8>, payload: &[u8]) {
    let hash = blake3::hash(payload);
    let hash_bytes = hash.as_bytes();

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&ENGINE_VERSION.to_le_bytes());
    buf.extend_from_slice(&0u32.to_le_bytes()); // flags (reserved)
    #[allow(clippy::cast_possible_truncation)] // payload will never exceed 4 GiB
    let payload_len = payload.len() as u32;
    buf.extend_from_slice(&payload_len.to_le_bytes());
    buf.extend_from_slice(&hash_bytes[..16]);
}

#[allow(clippy::cast_possible_truncation)] // HEADER_SIZE is 32, always fits in u32
fn read_header(bytes: &[u8]) -> Result<(u16, u32, [u8; 16]), DeserializeError> {
    if bytes.len() < HEADER_SIZE {
        return Err(DeserializeError::LengthMismatch {
            expected: HEADER_SIZE as u32,
            actual: bytes.len(),
        });
    }

    if &bytes[0..4] != MAGIC {
        return Err(DeserializeError::BadMagic);
    }

    let format_version = u16::from_le_bytes([bytes[4], bytes[5]]);
    let payload_len = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]);

    let mut hash = [0u8; 16];
    hash.copy_from_slice(&bytes[16..32]);

    Ok((format_version, payload_len, hash))
}

// ---------------------------------------------------------------------------
// Public encode/decode
// ---------------------------------------------------------------------------

pub(crate) fn encode(snapshot: &ProfileSnapshot) -> Result<Vec<u8>, SerializeError> {
    let serialized = snapshot_to_serialized(snapshot);
    let payload = bincode::serde::encode_to_vec(&serialized, bincode::config::standard())?;

    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    write_header(&mut buf, &payload);
    buf.extend_from_slice(&payload);
    debug!(
        id = %snapshot.settings.id,
        records = snapshot.records.len(),
        bytes = buf.len(),
        "encoded profile snapshot"
    );
    Ok(buf)
}

pub(crate) fn decode(bytes: &[u8]) -> Result<ProfileSnapshot, DeserializeError> {
    let (format_version, payload_len, stored_hash) = read_header(bytes)?;

    if format_version != FORMAT_VERSION {
        return Err(DeserializeError::IncompatibleVersion {
            blob: format_version,
            supported: FORMAT_VERSION,
        });
    }

    let payload_start = HEADER_SIZE;
    let payload_end = payload_start + payload_len as usize;
    if bytes.len() < payload_end {
        return Err(DeserializeError::LengthMismatch {
            expected: payload_len,
            actual: bytes.len() - HEADER_SIZE,
        });
    }
    let payload = &bytes[payload_start..payload_end];

    // Integrity check
    let computed_hash = blake3::hash(payload);
    if computed_hash.as_bytes()[..16] != stored_hash {
        warn!(payload_len, "profile snapshot failed its integrity check");
        return Err(DeserializeError::ChecksumMismatch);
    }

    let (serialized, _): (SerializedSnapshot, usize) =
        bincode::serde::decode_from_slice(payload, bincode::config::standard())?;

    let snapshot = serialized_to_snapshot(serialized)?;
    debug!(
        id = %snapshot.settings.id,
        records = snapshot.records.len(),
        "decoded profile snapshot"
    );
    Ok(snapshot)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
