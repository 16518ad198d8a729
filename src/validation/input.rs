//! Structural checks on the group list.
//!
//! Run before generation to catch configuration mistakes the quota
//! calculator would otherwise paper over:
//! - Duplicate or empty group IDs
//! - Groups with neither a staffing size nor a fixed quota
//! - Groups with a workload that are unavailable all week
//! - Staffing rules that overlap or contradict the group's settings

use std::collections::HashSet;

use crate::models::{Cell, Group};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two groups share the same ID.
    DuplicateId,
    /// A group has an empty ID.
    EmptyId,
    /// A group has staffing size 0 and no fixed quota.
    MissingWorkload,
    /// A group with a workload can never be assigned.
    NeverAvailable,
    /// Two staffing rules of one group cover the same hour.
    OverlappingRules,
    /// A coupling rule on a group that forbids double staffing.
    ConflictingRule,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the group list.
///
/// Checks:
/// 1. No empty group IDs
/// 2. No duplicate group IDs
/// 3. Every group has a staffing size or a fixed quota
/// 4. No group with a non-zero workload is unavailable in every cell
/// 5. No two staffing rules of a group overlap
/// 6. Coupling rules only on groups that allow double staffing
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_groups(groups: &[Group]) -> ValidationResult {
    let mut errors = Vec::new();
    let mut ids = HashSet::new();

    for g in groups {
        if g.id.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyId,
                format!("Group '{}' has an empty ID", g.name),
            ));
        } else if !ids.insert(g.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate group ID: {}", g.id),
            ));
        }

        let has_workload = match g.weekly_quota {
            Some(q) => q > 0,
            None => g.staffing_size > 0,
        };
        if g.weekly_quota.is_none() && g.staffing_size == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingWorkload,
                format!("Group '{}' has neither a staffing size nor a weekly quota", g.id),
            ));
        }

        if has_workload && Cell::all().all(|c| g.is_unavailable_at(c)) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NeverAvailable,
                format!("Group '{}' is unavailable for the whole week", g.id),
            ));
        }

        for (i, rule) in g.staffing_rules.iter().enumerate() {
            if g.staffing_rules[i + 1..]
                .iter()
                .any(|other| rule.window.overlaps(&other.window))
            {
                errors.push(ValidationError::new(
                    ValidationErrorKind::OverlappingRules,
                    format!(
                        "Group '{}' has overlapping staffing rules on day {}",
                        g.id,
                        rule.window.day()
                    ),
                ));
            }
            if rule.force_coupling && !g.allow_double_staffing {
                errors.push(ValidationError::new(
                    ValidationErrorKind::ConflictingRule,
                    format!(
                        "Group '{}' has a coupling rule but forbids double staffing",
                        g.id
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
