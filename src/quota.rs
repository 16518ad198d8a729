//! Weekly quota computation.
//!
//! # Algorithm
//!
//! 1. Groups with a fixed weekly quota take exactly that many cells.
//! 2. The remaining `R = C - Σ fixed` cells are split among the other
//!    groups in proportion to their staffing size.
//! 3. Shares are floored, and the leftover cells go one each to the groups
//!    with the largest fractional remainder (Hamilton / largest-remainder
//!    method), so the proportional targets sum to exactly `R`.
//!
//! Inconsistent configurations (fixed quotas beyond capacity, or leftover
//! cells with no proportional group) produce a [`QuotaWarning`] and a
//! best-effort plan, never an error.
//!
//! # Reference
//! Balinski & Young (2001), "Fair Representation", Ch. 2

use std::cmp::Reverse;
use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::QuotaWarning;
use crate::models::{Group, GroupId, WeeklySchedule};

/// Target cell counts per group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaPlan {
    /// Group id → target number of cells.
    pub targets: BTreeMap<GroupId, usize>,
    /// Configuration problems detected while computing the plan.
    #[serde(skip)]
    pub warnings: Vec<QuotaWarning>,
}

impl QuotaPlan {
    /// Target for a group (0 if the group is not in the plan).
    pub fn target(&self, group_id: &str) -> usize {
        self.targets.get(group_id).copied().unwrap_or(0)
    }

    /// Sum of all targets.
    pub fn total(&self) -> usize {
        self.targets.values().sum()
    }

    /// Whether the configuration was inconsistent.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Computes quota plans for a fixed grid capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaCalculator {
    capacity: usize,
}

impl Default for QuotaCalculator {
    fn default() -> Self {
        Self::for_week()
    }
}

impl QuotaCalculator {
    /// Creates a calculator for `capacity` cells.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Creates a calculator for a full [`WeeklySchedule`].
    pub fn for_week() -> Self {
        Self::new(WeeklySchedule::CELL_COUNT)
    }

    /// Grid capacity used for distribution.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Computes the target for every group, logging any warnings.
    pub fn compute(&self, groups: &[Group]) -> QuotaPlan {
        let plan = self.compute_silently(groups);
        for warning in &plan.warnings {
            warn!("{warning}");
        }
        plan
    }

    /// Same as [`Self::compute`], without logging. Warnings stay in the plan.
    pub(crate) fn compute_silently(&self, groups: &[Group]) -> QuotaPlan {
        let mut plan = QuotaPlan::default();

        let (fixed, proportional): (Vec<&Group>, Vec<&Group>) =
            groups.iter().partition(|g| g.has_fixed_quota());

        let mut fixed_total = 0usize;
        for g in &fixed {
            let quota = g.weekly_quota.unwrap_or(0) as usize;
            fixed_total += quota;
            plan.targets.insert(g.id.clone(), quota);
        }

        let remaining = match self.capacity.checked_sub(fixed_total) {
            Some(r) => r,
            None => {
                plan.warnings.push(QuotaWarning::FixedExceedsCapacity {
                    fixed: fixed_total,
                    capacity: self.capacity,
                });
                0
            }
        };

        if proportional.is_empty() {
            if remaining > 0 {
                plan.warnings.push(QuotaWarning::NoProportionalGroups {
                    leftover: remaining,
                });
            }
            return plan;
        }

        for (id, share) in largest_remainder(&proportional, remaining) {
            plan.targets.insert(id, share);
        }
        plan
    }
}

/// Splits `total` among groups by staffing size.
///
/// Uses integer arithmetic throughout so results do not depend on float
/// rounding. If every weight is zero, the split is even.
fn largest_remainder(groups: &[&Group], total: usize) -> Vec<(GroupId, usize)> {
    let mut weights: Vec<u64> = groups.iter().map(|g| u64::from(g.staffing_size)).collect();
    let mut weight_sum: u64 = weights.iter().sum();
    if weight_sum == 0 {
        weights.iter_mut().for_each(|w| *w = 1);
        weight_sum = weights.len() as u64;
    }

    let total = total as u64;
    let mut shares: Vec<(usize, u64, u64)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let scaled = total * w;
            (i, scaled / weight_sum, scaled % weight_sum)
        })
        .collect();

    let floored: u64 = shares.iter().map(|&(_, q, _)| q).sum();
    let leftover = (total - floored) as usize;

    // Largest fractional remainder first; equal remainders by ascending id.
    let mut order: Vec<usize> = (0..shares.len()).collect();
    order.sort_by_key(|&i| (Reverse(shares[i].2), groups[i].id.as_str()));
    for &i in order.iter().take(leftover) {
        shares[i].1 += 1;
    }

    shares
        .into_iter()
        .map(|(i, q, _)| (groups[i].id.clone(), q as usize))
        .collect()
}

/// Computes a quota plan for a full week.
pub fn compute_quotas(groups: &[Group]) -> QuotaPlan {
    QuotaCalculator::for_week().compute(groups)
}
