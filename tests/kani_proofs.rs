#![cfg(kani)]
//! Kani proof harnesses for rule evaluation.
//!
//! The harnesses work on a model of the canonical rule tree: each simple
//! rule is a `measured op threshold` test over integer measurements, a
//! clause is an OR of up to `MAX_N` such tests, and a rule is an AND of up
//! to `MAX_N` clauses. Integer measurements keep the model free of NaN,
//! which the float harnesses below exclude explicitly.
//!
//! Run with: `cargo kani --tests --harness <harness_name>`

use dsp_seed_rules::Condition;

/// Maximum number of clauses / rules per clause for bounded proofs.
const MAX_N: usize = 4;

/// Compare two i32 values with one of 8 operators (encoded as 0..7).
/// Operators 6 and 7 are the inclusive range test and its negation against
/// `[low, low + width]`.
fn model_test(measured: i32, op: u8, threshold: i32, width: u8) -> bool {
    let low = i64::from(threshold);
    let high = low + i64::from(width);
    let x = i64::from(measured);
    match op {
        0 => x == low,
        1 => x != low,
        2 => x < low,
        3 => x <= low,
        4 => x > low,
        5 => x >= low,
        6 => low <= x && x <= high,
        _ => !(low <= x && x <= high),
    }
}

fn condition_for(op: u8, threshold: i32, width: u8) -> Condition {
    let low = f64::from(threshold);
    let high = low + f64::from(width);
    match op {
        0 => Condition::eq(low),
        1 => Condition::neq(low),
        2 => Condition::lt(low),
        3 => Condition::lte(low),
        4 => Condition::gt(low),
        5 => Condition::gte(low),
        6 => Condition::between(low, high),
        _ => Condition::not_between(low, high),
    }
}

/// AND over clauses of OR over tests, measured against `values[rule]`.
fn model_rule(
    n_clauses: usize,
    clause_len: &[usize; MAX_N],
    values: &[i32; MAX_N],
    ops: &[[u8; MAX_N]; MAX_N],
    thresholds: &[[i32; MAX_N]; MAX_N],
) -> bool {
    let mut all = true;
    for c in 0..n_clauses {
        let mut any = false;
        for r in 0..clause_len[c] {
            if model_test(values[r], ops[c][r], thresholds[c][r], 0) {
                any = true;
            }
        }
        all = all && any;
    }
    all
}

// ---------------------------------------------------------------------------
// Proof 1: Condition agrees with the integer model
// ---------------------------------------------------------------------------

#[kani::proof]
fn condition_matches_model() {
    let measured: i32 = kani::any();
    let op: u8 = kani::any();
    kani::assume(op < 8);
    let threshold: i32 = kani::any();
    let width: u8 = kani::any();

    let expected = model_test(measured, op, threshold, width);
    let actual = condition_for(op, threshold, width).matches(f64::from(measured));
    assert_eq!(actual, expected);
}

// ---------------------------------------------------------------------------
// Proof 2: Range tests partition every non-NaN value
// ---------------------------------------------------------------------------

#[kani::proof]
fn between_partitions() {
    let a: f64 = kani::any();
    let b: f64 = kani::any();
    let x: f64 = kani::any();
    kani::assume(!a.is_nan() && !b.is_nan() && !x.is_nan());

    let inside = Condition::between(a, b).matches(x);
    let outside = Condition::not_between(a, b).matches(x);
    assert!(inside != outside);
}

// ---------------------------------------------------------------------------
// Proof 3: Range bounds are ordered regardless of argument order
// ---------------------------------------------------------------------------

#[kani::proof]
fn between_orders_bounds() {
    let a: f64 = kani::any();
    let b: f64 = kani::any();
    kani::assume(!a.is_nan() && !b.is_nan());

    assert_eq!(Condition::between(a, b), Condition::between(b, a));
    if let Condition::Between { low, high } = Condition::between(a, b) {
        assert!(low <= high);
    } else {
        unreachable!();
    }
}

// ---------------------------------------------------------------------------
// Proof 4: Adding a clause can only narrow an AND of ORs
// ---------------------------------------------------------------------------

#[kani::proof]
#[kani::unwind(5)]
fn extra_clause_narrows() {
    let n_clauses: usize = kani::any();
    kani::assume(n_clauses >= 1 && n_clauses < MAX_N);
    let clause_len: [usize; MAX_N] = kani::any();
    for len in &clause_len {
        kani::assume(*len >= 1 && *len <= MAX_N);
    }
    let values: [i32; MAX_N] = kani::any();
    let ops: [[u8; MAX_N]; MAX_N] = kani::any();
    let thresholds: [[i32; MAX_N]; MAX_N] = kani::any();

    let narrow = model_rule(n_clauses + 1, &clause_len, &values, &ops, &thresholds);
    let wide = model_rule(n_clauses, &clause_len, &values, &ops, &thresholds);
    assert!(!narrow || wide);
}

// ---------------------------------------------------------------------------
// Proof 5: Scaling operands by a positive factor preserves the outcome
// ---------------------------------------------------------------------------

#[kani::proof]
fn positive_scaling_preserves_outcome() {
    let measured: i16 = kani::any();
    let threshold: i16 = kani::any();
    let op: u8 = kani::any();
    kani::assume(op < 6);

    let condition = condition_for(op, i32::from(threshold), 0);
    let scaled = condition.map_operands(|v| v * 25_000.0);
    let before = condition.matches(f64::from(measured));
    let after = scaled.matches(f64::from(measured) * 25_000.0);
    assert_eq!(before, after);
}
