//! Seeded greedy slot assignment.
//!
//! # Algorithm
//!
//! 1. Enumerate every cell and permute the list with a ChaCha8 stream
//!    seeded from the caller's seed (Fisher–Yates).
//! 2. Walk the permutation. For each empty, unlocked cell, collect the
//!    groups that may take it: available, not double-staffed against their
//!    wishes, not breaking a coupled hour, and within every staffing-rule
//!    capacity. Taking one position of an empty coupled hour reserves
//!    capacity for the partner position too.
//! 3. Pick the group with the largest deficit (`target - assigned`).
//!    Ties go to a group whose activity windows do not cover the cell,
//!    then to the smallest group id.
//! 4. Cells with no candidate stay empty and are reported as shortfall.
//!
//! Processing cells in a random order keeps the same groups from always
//! landing on the same early-week hours. Activity windows only break
//! ties; they never outrank the deficit.
//!
//! # Complexity
//! O(C * g) where C = cell count, g = number of groups.

use std::cmp::Ordering;

use log::debug;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::improve::{improve, LocalScoring};
use crate::config::RosterConfig;
use crate::editor::{check_placement, exceeded_capacity};
use crate::error::SwapSide;
use crate::models::{Cell, Group, WeeklySchedule};
use crate::quota::QuotaPlan;

/// A generated schedule and the cells no group could take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// The filled schedule.
    pub schedule: WeeklySchedule,
    /// Cells left empty because no group was eligible, in canonical order.
    pub shortfall: Vec<Cell>,
}

/// Randomized greedy assigner with an explicit seed.
///
/// Identical groups, plan and seed always produce the identical schedule.
///
/// # Example
///
/// ```
/// use u_roster::models::{Group, WeeklySchedule};
/// use u_roster::quota::compute_quotas;
/// use u_roster::scheduler::SlotAssigner;
///
/// let groups = vec![
///     Group::new("A").with_weekly_quota(100),
///     Group::new("B").with_staffing_size(1),
/// ];
/// let plan = compute_quotas(&groups);
/// let result = SlotAssigner::new(42).generate(&groups, &plan);
///
/// assert!(result.shortfall.is_empty());
/// assert_eq!(result.schedule.assigned_len(), WeeklySchedule::CELL_COUNT);
/// assert_eq!(result.schedule.cells_of("A").len(), 100);
/// ```
#[derive(Debug, Clone)]
pub struct SlotAssigner {
    seed: u64,
    improvement_iterations: usize,
    scoring: LocalScoring,
}

impl SlotAssigner {
    /// Creates a greedy-only assigner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            improvement_iterations: 0,
            scoring: LocalScoring::default(),
        }
    }

    /// Runs `iterations` local-search rounds after the greedy fill.
    pub fn with_improvement(mut self, iterations: usize) -> Self {
        self.improvement_iterations = iterations;
        self
    }

    /// Takes iteration count and scoring weights from a config.
    pub fn with_config(mut self, config: &RosterConfig) -> Self {
        self.improvement_iterations = config.improvement_iterations;
        self.scoring = LocalScoring::from(config);
        self
    }

    /// The seed driving cell order and local search.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Fills a new, empty schedule.
    pub fn generate(&self, groups: &[Group], plan: &QuotaPlan) -> GenerationResult {
        let mut schedule = WeeklySchedule::new();
        let shortfall = self.fill(&mut schedule, groups, plan);
        GenerationResult {
            schedule,
            shortfall,
        }
    }

    /// Fills the empty, unlocked cells of an existing schedule.
    ///
    /// Cells that already hold a group count toward that group's progress
    /// and are never overwritten. Cells naming a group missing from
    /// `groups` are emptied first and refilled. Returns the shortfall cells.
    pub fn fill(
        &self,
        schedule: &mut WeeklySchedule,
        groups: &[Group],
        plan: &QuotaPlan,
    ) -> Vec<Cell> {
        let stale = schedule.prune_stale(groups);
        if !stale.is_empty() {
            debug!("cleared {} stale cells before filling", stale.len());
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut order: Vec<Cell> = Cell::all().collect();
        order.shuffle(&mut rng);

        let existing = schedule.assigned_counts();
        let targets: Vec<i64> = groups.iter().map(|g| plan.target(&g.id) as i64).collect();
        let mut assigned: Vec<i64> = groups
            .iter()
            .map(|g| existing.get(&g.id).copied().unwrap_or(0) as i64)
            .collect();

        let mut shortfall = Vec::new();
        let mut filled = 0usize;
        for cell in order {
            if schedule.get(cell).is_some() || schedule.is_locked(cell) {
                continue;
            }
            match select_group(schedule, groups, &targets, &assigned, cell) {
                Some(i) => {
                    schedule.put(cell, Some(groups[i].id.clone()));
                    assigned[i] += 1;
                    filled += 1;
                }
                None => shortfall.push(cell),
            }
        }
        shortfall.sort_unstable();

        debug!(
            "seed {}: filled {} cells, {} shortfall, {} groups",
            self.seed,
            filled,
            shortfall.len(),
            groups.len()
        );

        if self.improvement_iterations > 0 {
            let accepted = improve(
                schedule,
                groups,
                self.scoring,
                self.improvement_iterations,
                &mut rng,
            );
            debug!(
                "local search accepted {accepted} of {} swaps",
                self.improvement_iterations
            );
        }
        shortfall
    }
}

/// Index of the best eligible group for a cell, if any.
fn select_group(
    schedule: &WeeklySchedule,
    groups: &[Group],
    targets: &[i64],
    assigned: &[i64],
    cell: Cell,
) -> Option<usize> {
    let partner = schedule.occupant(cell.partner(), groups);
    groups
        .iter()
        .enumerate()
        .filter(|(_, g)| can_place(schedule, groups, g, cell, partner))
        .max_by(|&(i, a), &(j, b)| {
            let deficit_a = targets[i] - assigned[i];
            let deficit_b = targets[j] - assigned[j];
            deficit_a
                .cmp(&deficit_b)
                .then_with(|| prefer_outside_window(a, b, cell))
                .then_with(|| b.id.cmp(&a.id))
        })
        .map(|(i, _)| i)
}

/// Whether `group` may take the empty `cell` next to `partner`.
fn can_place(
    schedule: &WeeklySchedule,
    groups: &[Group],
    group: &Group,
    cell: Cell,
    partner: Option<&str>,
) -> bool {
    if check_placement(schedule, groups, group, cell, None, partner, SwapSide::First).is_err() {
        return false;
    }
    partner.is_some()
        || !group.requires_coupling_at(cell)
        || exceeded_capacity(schedule, group, cell, None, 2).is_none()
}

/// `Greater` when `a` is outside its activity windows and `b` is inside.
fn prefer_outside_window(a: &Group, b: &Group, cell: Cell) -> Ordering {
    b.in_activity_window(cell).cmp(&a.in_activity_window(cell))
}

/// Generates a greedy-only schedule from a quota plan.
pub fn generate_schedule(groups: &[Group], plan: &QuotaPlan, seed: u64) -> GenerationResult {
    SlotAssigner::new(seed).generate(groups, plan)
}
