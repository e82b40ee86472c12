//! Distances between star positions.
//!
//! The empty-set sentinels let callers fold these straight into a
//! [`Condition`](crate::Condition) test: no star is ever "nearer than
//! infinity" or "further than negative infinity".

use crate::Position;

/// Euclidean distance from the birth point (the origin).
#[must_use]
pub fn distance_from_birth(p: Position) -> f64 {
    let [x, y, z] = p;
    (x * x + y * y + z * z).sqrt()
}

#[must_use]
pub fn distance_from(a: Position, b: Position) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Smallest distance from `reference` to any of `points`, or `+∞` if
/// `points` is empty.
#[must_use]
pub fn nearest_distance_from(reference: Position, points: &[Position]) -> f64 {
    points
        .iter()
        .map(|&p| distance_from(reference, p))
        .fold(f64::INFINITY, |acc, d| if acc < d { acc } else { d })
}

/// Largest distance from `reference` to any of `points`, or `-∞` if
/// `points` is empty.
#[must_use]
pub fn furthest_distance_from(reference: Position, points: &[Position]) -> f64 {
    points
        .iter()
        .map(|&p| distance_from(reference, p))
        .fold(f64::NEG_INFINITY, |acc, d| if acc > d { acc } else { d })
}
