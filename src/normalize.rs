use tracing::debug;

use crate::{
    Clause, Composite, CompositeClause, CompositeRule, MultiRule, Rule, RuleError, RuleType,
    SimpleRule, VeinType,
};

/// Raw game units of oil per unit shown to the user.
pub const OIL_AMOUNT_SCALE: f64 = 25_000.0;

/// A scale factor applied to the condition operands of one
/// `(rule type, vein)` combination when a rule is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitConversion {
    pub rule_type: RuleType,
    pub vein: VeinType,
    pub factor: f64,
}

/// Every unit conversion [`fix_rule`] applies.
pub const UNIT_CONVERSIONS: &[UnitConversion] = &[UnitConversion {
    rule_type: RuleType::AverageVeinAmount,
    vein: VeinType::Oil,
    factor: OIL_AMOUNT_SCALE,
}];

/// The conversion that applies to `rule`, if any.
#[must_use]
pub fn conversion_for(rule: &SimpleRule) -> Option<&'static UnitConversion> {
    let vein = rule.vein()?;
    let rule_type = rule.rule_type();
    UNIT_CONVERSIONS
        .iter()
        .find(|c| c.rule_type == rule_type && c.vein == vein)
}

/// Convert a rule's operands from display units to the units the
/// generator reports. Rules without a conversion are returned unchanged.
#[must_use]
pub fn fix_rule(rule: &SimpleRule) -> SimpleRule {
    let mut fixed = rule.clone();
    if let Some(conversion) = conversion_for(rule) {
        if let Some(condition) = fixed.condition_mut() {
            *condition = condition.map_operands(|v| v * conversion.factor);
        }
    }
    fixed
}

/// Inverse of [`fix_rule`]: convert operands back to display units.
#[must_use]
pub fn unfix_rule(rule: &SimpleRule) -> SimpleRule {
    let mut shown = rule.clone();
    if let Some(conversion) = conversion_for(rule) {
        if let Some(condition) = shown.condition_mut() {
            *condition = condition.map_operands(|v| v / conversion.factor);
        }
    }
    shown
}

/// Normalize rule groups into a canonical [`Rule`].
///
/// The outer slice is a conjunction of groups, each group a disjunction of
/// rules. Singleton groups collapse to their rule and a single group
/// collapses to its clause, so the result is never more nested than needed.
///
/// The input is expected to have passed
/// [`validate_rules`](crate::validate_rules); an empty outer slice yields an
/// empty `And` and an empty group an empty `Or`.
#[must_use]
pub fn construct_rule(groups: &[Vec<SimpleRule>]) -> Rule {
    let mut clauses: Vec<Clause> = groups.iter().map(|g| construct_clause(g)).collect();
    debug!(groups = groups.len(), "constructed rule");
    if clauses.len() == 1 {
        if let Some(clause) = clauses.pop() {
            return Rule::Clause(clause);
        }
    }
    Rule::And(clauses)
}

fn construct_clause(group: &[SimpleRule]) -> Clause {
    match group {
        [rule] => Clause::Simple(fix_rule(rule)),
        rules => Clause::Or(rules.iter().map(fix_rule).collect()),
    }
}

/// Normalize composite rule groups into a canonical [`CompositeRule`].
///
/// Every [`MultiRule`] becomes a [`Composite`] pairing its threshold with
/// the normalized per-star rule; groups collapse like in
/// [`construct_rule`].
#[must_use]
pub fn construct_multi_rule(groups: &[Vec<MultiRule>]) -> CompositeRule {
    let mut clauses: Vec<CompositeClause> = groups
        .iter()
        .map(|group| {
            let mut composites: Vec<Composite> = group
                .iter()
                .map(|multi| Composite {
                    condition: multi.condition,
                    rule: construct_rule(&multi.rules),
                })
                .collect();
            if composites.len() == 1 {
                if let Some(composite) = composites.pop() {
                    return CompositeClause::Single(composite);
                }
            }
            CompositeClause::Or(composites)
        })
        .collect();
    debug!(groups = groups.len(), "constructed composite rule");
    if clauses.len() == 1 {
        if let Some(clause) = clauses.pop() {
            return CompositeRule::Clause(clause);
        }
    }
    CompositeRule::And(clauses)
}

/// Validate with [`check_rules`](crate::check_rules), then normalize.
///
/// # Errors
///
/// Returns the first [`RuleError`] found in `groups`.
pub fn try_construct_rule(groups: &[Vec<SimpleRule>]) -> Result<Rule, RuleError> {
    crate::validate::check_rules(groups)?;
    Ok(construct_rule(groups))
}

/// Validate with [`check_multi_rule`](crate::check_multi_rule), then
/// normalize.
///
/// # Errors
///
/// Returns the first [`RuleError`] found in `groups`.
pub fn try_construct_multi_rule(groups: &[Vec<MultiRule>]) -> Result<CompositeRule, RuleError> {
    crate::validate::check_multi_rule(groups)?;
    Ok(construct_multi_rule(groups))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Condition, SpectrType};

    fn oil(condition: Condition) -> SimpleRule {
        SimpleRule::AverageVeinAmount {
            vein: VeinType::Oil,
            condition,
        }
    }

    fn spectr() -> SimpleRule {
        SimpleRule::Spectr {
            spectr: vec![SpectrType::K, SpectrType::G],
        }
    }

    fn birth() -> SimpleRule {
        SimpleRule::Birth {
            condition: Condition::lte(10.0),
        }
    }

    #[test]
    fn fix_rule_scales_oil_amount() {
        let fixed = fix_rule(&oil(Condition::eq(2.0)));
        assert_eq!(fixed, oil(Condition::eq(50000.0)));
    }

    #[test]
    fn fix_rule_scales_both_range_bounds() {
        let fixed = fix_rule(&oil(Condition::between(1.0, 2.0)));
        assert_eq!(fixed, oil(Condition::between(25000.0, 50000.0)));
    }

    #[test]
    fn fix_rule_leaves_other_veins_alone() {
        let iron = SimpleRule::AverageVeinAmount {
            vein: VeinType::Iron,
            condition: Condition::eq(2.0),
        };
        assert_eq!(fix_rule(&iron), iron);
        let oil_patch = SimpleRule::AverageVeinPatch {
            vein: VeinType::Oil,
            condition: Condition::eq(2.0),
        };
        assert_eq!(fix_rule(&oil_patch), oil_patch);
    }

    #[test]
    fn unfix_rule_inverts_fix_rule() {
        let shown = oil(Condition::between(1.0, 3.0));
        assert_eq!(unfix_rule(&fix_rule(&shown)), shown);
        assert_eq!(unfix_rule(&birth()), birth());
    }

    #[test]
    fn conversion_lookup() {
        assert_eq!(
            conversion_for(&oil(Condition::gt(1.0))).map(|c| c.factor),
            Some(OIL_AMOUNT_SCALE)
        );
        assert!(conversion_for(&birth()).is_none());
    }

    #[test]
    fn singleton_collapses_to_rule() {
        assert_eq!(construct_rule(&[vec![birth()]]), Rule::from(birth()));
    }

    #[test]
    fn group_becomes_or() {
        assert_eq!(
            construct_rule(&[vec![spectr(), oil(Condition::gt(1.0))]]),
            Rule::Clause(Clause::Or(vec![spectr(), oil(Condition::gt(25000.0))]))
        );
    }

    #[test]
    fn groups_become_and_of_unwrapped_clauses() {
        assert_eq!(
            construct_rule(&[vec![spectr()], vec![birth()]]),
            Rule::And(vec![Clause::Simple(spectr()), Clause::Simple(birth())])
        );
    }

    #[test]
    fn empty_input_does_not_panic() {
        assert_eq!(construct_rule(&[]), Rule::And(vec![]));
        assert_eq!(construct_rule(&[vec![]]), Rule::Clause(Clause::Or(vec![])));
    }

    #[test]
    fn multi_rule_singleton() {
        let multi = MultiRule {
            condition: Condition::gte(2.0),
            rules: vec![vec![birth()]],
        };
        assert_eq!(
            construct_multi_rule(&[vec![multi]]),
            CompositeRule::Clause(CompositeClause::Single(Composite {
                condition: Condition::gte(2.0),
                rule: Rule::from(birth()),
            }))
        );
    }

    #[test]
    fn multi_rule_groups() {
        let a = MultiRule {
            condition: Condition::gte(1.0),
            rules: vec![vec![oil(Condition::gt(1.0))]],
        };
        let b = MultiRule {
            condition: Condition::eq(0.0),
            rules: vec![vec![spectr()], vec![birth()]],
        };
        let rule = construct_multi_rule(&[vec![a.clone(), b.clone()], vec![b]]);
        match rule {
            CompositeRule::And(clauses) => {
                assert_eq!(clauses.len(), 2);
                assert!(matches!(&clauses[0], CompositeClause::Or(c) if c.len() == 2));
                assert!(matches!(&clauses[1], CompositeClause::Single(_)));
                let first = &clauses[0].composites()[0];
                assert_eq!(first.rule, Rule::from(oil(Condition::gt(25000.0))));
            }
            other => panic!("expected CompositeAnd, got {other:?}"),
        }
    }

    #[test]
    fn try_construct_rejects_invalid_input() {
        assert_eq!(try_construct_rule(&[]), Err(RuleError::NoGroups));
        assert!(try_construct_rule(&[vec![birth()]]).is_ok());
        assert_eq!(
            try_construct_multi_rule(&[vec![]]),
            Err(RuleError::EmptyGroup { group: 0 })
        );
    }
}
