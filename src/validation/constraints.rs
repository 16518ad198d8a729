//! Constraint checks on a schedule.
//!
//! The validator is stateless: it reads a schedule and the current group
//! list (which may have changed since generation) and reports every
//! violation it finds. It can run after generation, after each manual
//! edit, or at any other time. It never mutates its inputs and never logs.
//!
//! Cell checks run in canonical cell order; staffing-rule capacity and
//! quota checks follow in group order, so identical inputs always give
//! identical output. A cell naming a missing group is reported once as
//! informational and otherwise read as empty.

use crate::config::RosterConfig;
use crate::models::{find_group, Group, Violation, ViolationKind, WeeklySchedule};
use crate::quota::{QuotaCalculator, QuotaPlan};

/// Reports hard, soft and quota violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstraintValidator {
    tolerance: usize,
}

impl Default for ConstraintValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintValidator {
    /// Creates a validator with the default quota tolerance.
    pub fn new() -> Self {
        Self::from_config(&RosterConfig::default())
    }

    /// Creates a validator using the config's quota tolerance.
    pub fn from_config(config: &RosterConfig) -> Self {
        Self {
            tolerance: config.quota_tolerance,
        }
    }

    /// Sets the allowed |assigned - target| before reporting a deviation.
    pub fn with_tolerance(mut self, tolerance: usize) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Quota tolerance in cells.
    pub fn tolerance(&self) -> usize {
        self.tolerance
    }

    /// Validates against quotas recomputed from `groups`.
    pub fn validate(&self, schedule: &WeeklySchedule, groups: &[Group]) -> Vec<Violation> {
        let plan = QuotaCalculator::new(schedule.capacity()).compute_silently(groups);
        self.validate_against(schedule, groups, &plan)
    }

    /// Validates against an explicit quota plan.
    pub fn validate_against(
        &self,
        schedule: &WeeklySchedule,
        groups: &[Group],
        plan: &QuotaPlan,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (cell, id) in schedule.iter() {
            let Some(id) = id else { continue };
            let Some(group) = find_group(groups, id) else {
                violations.push(Violation::at_cell(
                    ViolationKind::StaleReference,
                    cell,
                    id,
                    format!("Unknown group '{id}' at {cell}"),
                ));
                continue;
            };

            if group.is_unavailable_at(cell) {
                violations.push(Violation::at_cell(
                    ViolationKind::Hard,
                    cell,
                    id,
                    format!("Group '{id}' is unavailable at {cell}"),
                ));
            }
            // Reported once per slot, on the first position.
            if !group.allow_double_staffing && cell.position == 0 && schedule.is_double_staffed(cell)
            {
                violations.push(Violation::at_cell(
                    ViolationKind::DoubleStaffing,
                    cell,
                    id,
                    format!("Group '{id}' holds both positions at {cell}"),
                ));
            }
            if group.requires_coupling_at(cell) {
                if let Some(other) = schedule
                    .occupant(cell.partner(), groups)
                    .filter(|&other| other != id)
                {
                    violations.push(Violation::at_cell(
                        ViolationKind::StaffingRule,
                        cell,
                        id,
                        format!("Group '{id}' shares its coupled hour at {cell} with '{other}'"),
                    ));
                }
            }
            if group.in_activity_window(cell) {
                violations.push(Violation::at_cell(
                    ViolationKind::SoftActivityOverlap,
                    cell,
                    id,
                    format!("Group '{id}' is on duty during its activity window at {cell}"),
                ));
            }
        }

        let counts = schedule.assigned_counts();
        for group in groups {
            for rule in &group.staffing_rules {
                let Some(max) = rule.max_capacity else {
                    continue;
                };
                let used = schedule.count_in_window(&group.id, &rule.window);
                if used > max as usize {
                    let w = rule.window;
                    violations.push(Violation::for_group(
                        ViolationKind::StaffingRule,
                        group.id.as_str(),
                        format!(
                            "Group '{}' holds {used} cells on day {} {:02}:00-{:02}:00, limit {max}",
                            group.id,
                            w.day(),
                            w.start_slot(),
                            w.end_slot()
                        ),
                    ));
                }
            }

            let assigned = counts.get(&group.id).copied().unwrap_or(0);
            let target = plan.target(&group.id);
            if assigned.abs_diff(target) > self.tolerance {
                violations.push(Violation::for_group(
                    ViolationKind::QuotaDeviation,
                    group.id.as_str(),
                    format!(
                        "Group '{}' has {assigned} cells, target {target}",
                        group.id
                    ),
                ));
            }
        }

        violations
    }
}

/// Validates a schedule with default settings.
pub fn validate(schedule: &WeeklySchedule, groups: &[Group]) -> Vec<Violation> {
    ConstraintValidator::new().validate(schedule, groups)
}

/// Whether any violation is hard.
pub fn has_hard_violations(violations: &[Violation]) -> bool {
    violations.iter().any(Violation::is_hard)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Cell, StaffingRule, TimeWindow};

    fn kinds(violations: &[Violation]) -> Vec<ViolationKind> {
        violations.iter().map(|v| v.kind).collect()
    }

    #[test]
    fn test_hard_and_soft_violations() {
        let groups = vec![Group::new("A")
            .with_weekly_quota(2)
            .with_unavailability(TimeWindow::new(0, 0, 1).unwrap())
            .with_activity_window(TimeWindow::new(0, 1, 2).unwrap())];
        let mut s = WeeklySchedule::new();
        s.set(Cell::new(0, 0, 0), Some("A".into())).unwrap();
        s.set(Cell::new(0, 1, 0), Some("A".into())).unwrap();

        let v = validate(&s, &groups);
        assert_eq!(
            kinds(&v),
            vec![ViolationKind::Hard, ViolationKind::SoftActivityOverlap]
        );
        assert_eq!(v[0].cell, Some(Cell::new(0, 0, 0)));
        assert!(has_hard_violations(&v));
    }

    #[test]
    fn test_clean_schedule() {
        let groups = vec![Group::new("A").with_weekly_quota(1)];
        let mut s = WeeklySchedule::new();
        s.set(Cell::new(3, 3, 1), Some("A".into())).unwrap();
        let v = validate(&s, &groups);
        assert!(v.is_empty(), "{v:?}");
    }

    #[test]
    fn test_double_staffing_reported_once() {
        let groups = vec![Group::new("C").with_weekly_quota(2).without_double_staffing()];
        let mut s = WeeklySchedule::new();
        s.set(Cell::new(1, 1, 0), Some("C".into())).unwrap();
        s.set(Cell::new(1, 1, 1), Some("C".into())).unwrap();

        let v = validate(&s, &groups);
        assert_eq!(kinds(&v), vec![ViolationKind::DoubleStaffing]);
        assert_eq!(v[0].cell, Some(Cell::new(1, 1, 0)));
    }

    #[test]
    fn test_stale_reference_is_informational() {
        let groups = vec![Group::new("A").with_weekly_quota(0)];
        let mut s = WeeklySchedule::new();
        s.set(Cell::new(2, 0, 0), Some("deleted".into())).unwrap();

        let v = validate(&s, &groups);
        assert_eq!(kinds(&v), vec![ViolationKind::StaleReference]);
        assert_eq!(v[0].group_id, "deleted");
        assert!(!has_hard_violations(&v));
    }

    #[test]
    fn test_stale_partner_does_not_break_coupling() {
        let rule = StaffingRule::new(TimeWindow::whole_day(1).unwrap()).coupled();
        let groups = vec![Group::new("K").with_weekly_quota(1).with_staffing_rule(rule)];
        let mut s = WeeklySchedule::new();
        s.set(Cell::new(1, 4, 0), Some("K".into())).unwrap();
        s.set(Cell::new(1, 4, 1), Some("deleted".into())).unwrap();

        let v = validate(&s, &groups);
        assert_eq!(kinds(&v), vec![ViolationKind::StaleReference]);
    }

    #[test]
    fn test_coupled_hour_shared_with_other_group() {
        let rule = StaffingRule::new(TimeWindow::new(0, 20, 24).unwrap()).coupled();
        let groups = vec![
            Group::new("K").with_weekly_quota(1).with_staffing_rule(rule),
            Group::new("B").with_weekly_quota(1),
        ];
        let mut s = WeeklySchedule::new();
        s.set(Cell::new(0, 21, 0), Some("K".into())).unwrap();
        s.set(Cell::new(0, 21, 1), Some("B".into())).unwrap();

        let v = validate(&s, &groups);
        assert_eq!(kinds(&v), vec![ViolationKind::StaffingRule]);
        assert_eq!(v[0].cell, Some(Cell::new(0, 21, 0)));
        assert_eq!(v[0].group_id, "K");
        assert!(has_hard_violations(&v));
    }

    #[test]
    fn test_capacity_rule_exceeded() {
        let rule = StaffingRule::new(TimeWindow::new(5, 0, 12).unwrap()).with_max_capacity(2);
        let groups = vec![Group::new("A").with_weekly_quota(3).with_staffing_rule(rule)];
        let mut s = WeeklySchedule::new();
        s.set(Cell::new(5, 1, 0), Some("A".into())).unwrap();
        s.set(Cell::new(5, 1, 1), Some("A".into())).unwrap();
        s.set(Cell::new(5, 11, 0), Some("A".into())).unwrap();

        let v = validate(&s, &groups);
        assert_eq!(kinds(&v), vec![ViolationKind::StaffingRule]);
        assert_eq!(v[0].cell, None);
        assert!(v[0].message.contains("limit 2"));

        s.clear(Cell::new(5, 11, 0)).unwrap();
        s.set(Cell::new(5, 12, 0), Some("A".into())).unwrap();
        assert!(validate(&s, &groups).is_empty());
    }

    #[test]
    fn test_quota_deviation_tolerance() {
        let groups = vec![Group::new("A").with_weekly_quota(5)];
        let mut s = WeeklySchedule::new();
        for slot in 0..3 {
            s.set(Cell::new(0, slot, 0), Some("A".into())).unwrap();
        }

        let strict = ConstraintValidator::new().validate(&s, &groups);
        assert_eq!(kinds(&strict), vec![ViolationKind::QuotaDeviation]);
        assert!(!has_hard_violations(&strict));

        let lenient = ConstraintValidator::new().with_tolerance(2).validate(&s, &groups);
        assert!(lenient.is_empty());
    }

    #[test]
    fn test_validate_against_explicit_plan() {
        let groups = vec![Group::new("A").with_staffing_size(1)];
        let s = WeeklySchedule::new();
        let plan = QuotaCalculator::new(0).compute(&groups);
        assert!(ConstraintValidator::new()
            .validate_against(&s, &groups, &plan)
            .is_empty());
        // Recomputed for the full week, A should have 336.
        assert_eq!(kinds(&validate(&s, &groups)), vec![ViolationKind::QuotaDeviation]);
    }

    #[test]
    fn test_idempotent_and_pure() {
        let groups = vec![
            Group::new("A")
                .with_staffing_size(1)
                .with_activity_window(TimeWindow::whole_day(4).unwrap()),
            Group::new("B").with_staffing_size(1),
        ];
        let mut s = WeeklySchedule::new();
        for c in Cell::all().filter(|c| c.day == 4) {
            s.set(c, Some("A".into())).unwrap();
        }
        let snapshot = s.clone();
        let first = validate(&s, &groups);
        let second = validate(&s, &groups);
        assert_eq!(first, second);
        assert_eq!(s, snapshot);
    }

    #[test]
    fn test_from_config() {
        let config = RosterConfig {
            quota_tolerance: 7,
            ..Default::default()
        };
        assert_eq!(ConstraintValidator::from_config(&config).tolerance(), 7);
    }
}
