use crate::{MultiRule, Planet, RuleError, SimpleRule, VeinType};

/// Whether `groups` is complete enough to search with.
///
/// False when there are no groups, a group is empty, or a rule has no type.
/// Operands are not inspected; see [`check_operands`].
#[must_use]
pub fn validate_rules(groups: &[Vec<SimpleRule>]) -> bool {
    check_rules(groups).is_ok()
}

/// Whether composite `groups` are complete enough to search with: no empty
/// levels, and every inner rule tree passes [`validate_rules`].
#[must_use]
pub fn validate_multi_rule(groups: &[Vec<MultiRule>]) -> bool {
    check_multi_rule(groups).is_ok()
}

/// Like [`validate_rules`], reporting the first problem found.
///
/// # Errors
///
/// [`RuleError::NoGroups`], [`RuleError::EmptyGroup`] or
/// [`RuleError::UnsetRule`].
pub fn check_rules(groups: &[Vec<SimpleRule>]) -> Result<(), RuleError> {
    if groups.is_empty() {
        return Err(RuleError::NoGroups);
    }
    for (group_idx, group) in groups.iter().enumerate() {
        if group.is_empty() {
            return Err(RuleError::EmptyGroup { group: group_idx });
        }
        for (rule_idx, rule) in group.iter().enumerate() {
            if rule.is_unset() {
                return Err(RuleError::UnsetRule {
                    group: group_idx,
                    index: rule_idx,
                });
            }
        }
    }
    Ok(())
}

/// Like [`validate_multi_rule`], reporting the first problem found.
///
/// # Errors
///
/// [`RuleError::NoGroups`] or [`RuleError::EmptyGroup`] for the outer
/// levels, [`RuleError::InvalidComposite`] wrapping the inner error when a
/// composite's own rule groups are invalid.
pub fn check_multi_rule(groups: &[Vec<MultiRule>]) -> Result<(), RuleError> {
    if groups.is_empty() {
        return Err(RuleError::NoGroups);
    }
    for (group_idx, group) in groups.iter().enumerate() {
        if group.is_empty() {
            return Err(RuleError::EmptyGroup { group: group_idx });
        }
        for (idx, multi) in group.iter().enumerate() {
            if let Err(source) = check_rules(&multi.rules) {
                if source == RuleError::NoGroups {
                    return Err(RuleError::EmptyComposite {
                        group: group_idx,
                        index: idx,
                    });
                }
                return Err(RuleError::InvalidComposite {
                    group: group_idx,
                    index: idx,
                    source: Box::new(source),
                });
            }
        }
    }
    Ok(())
}

/// Stricter check of the operands [`validate_rules`] leaves alone: a vein
/// must be selected, enum sets must be non-empty, numbers must be finite
/// and range bounds ordered.
///
/// # Errors
///
/// [`RuleError::MissingOperand`] naming the first offending rule.
pub fn check_operands(groups: &[Vec<SimpleRule>]) -> Result<(), RuleError> {
    for (group_idx, group) in groups.iter().enumerate() {
        for (rule_idx, rule) in group.iter().enumerate() {
            if let Some(reason) = operand_problem(rule) {
                return Err(RuleError::MissingOperand {
                    group: group_idx,
                    index: rule_idx,
                    reason: reason.to_owned(),
                });
            }
        }
    }
    Ok(())
}

fn operand_problem(rule: &SimpleRule) -> Option<&'static str> {
    if rule.vein() == Some(VeinType::None) {
        return Some("no vein selected");
    }
    match rule {
        SimpleRule::Spectr { spectr } if spectr.is_empty() => {
            return Some("no spectral class selected")
        }
        SimpleRule::StarType { star_type } if star_type.is_empty() => {
            return Some("no star type selected")
        }
        SimpleRule::OceanType { ocean_type } if *ocean_type == Planet::NO_OCEAN => {
            return Some("no ocean type selected")
        }
        _ => {}
    }
    let condition = rule.condition()?;
    let operands = condition.operands();
    if operands.iter().any(|v| !v.is_finite()) {
        return Some("condition operand is not a finite number");
    }
    if let &[low, high] = operands.as_slice() {
        if low > high {
            return Some("range lower bound exceeds upper bound");
        }
    }
    None
}
