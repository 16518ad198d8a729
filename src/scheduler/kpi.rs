//! Roster quality metrics (KPIs).
//!
//! Summarizes a schedule for display next to the grid and for comparing
//! generations under different seeds.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Coverage | Cells held by a listed group / total cells |
//! | Activity overlaps | Cells inside the holder's activity windows |
//! | Paired slots | Slots where one group holds both positions |
//! | Total deviation | Σ \|assigned − target\| over groups |
//! | Max deviation | Largest single \|assigned − target\| |

use std::collections::HashMap;

use crate::models::{find_group, Cell, Group, GroupId, WeeklySchedule};
use crate::quota::QuotaPlan;

/// Schedule quality indicators.
#[derive(Debug, Clone)]
pub struct RosterKpi {
    /// Fraction of cells with a group (0.0..1.0).
    pub coverage_rate: f64,
    /// Number of empty cells (stale cells count as empty).
    pub empty_cells: usize,
    /// Cells that fall inside their group's activity windows.
    pub activity_overlaps: usize,
    /// Slots where both positions hold the same group.
    pub paired_slots: usize,
    /// Assigned cells per group in the list (0 for groups with none).
    pub load_by_group: HashMap<GroupId, usize>,
    /// Sum of quota deviations across groups.
    pub total_deviation: usize,
    /// Largest quota deviation of any group.
    pub max_deviation: usize,
}

impl RosterKpi {
    /// Computes KPIs for a schedule.
    ///
    /// # Arguments
    /// * `schedule` - The schedule to measure.
    /// * `groups` - Current group list (for activity windows).
    /// * `plan` - Quota targets to measure deviation against.
    pub fn calculate(schedule: &WeeklySchedule, groups: &[Group], plan: &QuotaPlan) -> Self {
        let capacity = schedule.capacity();
        let assigned = Cell::all()
            .filter(|&c| schedule.occupant(c, groups).is_some())
            .count();

        let activity_overlaps = schedule
            .iter()
            .filter(|&(cell, id)| {
                id.and_then(|id| find_group(groups, id))
                    .is_some_and(|g| g.in_activity_window(cell))
            })
            .count();

        let paired_slots = Cell::all()
            .filter(|c| c.position == 0 && schedule.is_double_staffed(*c))
            .count();

        let counts = schedule.assigned_counts();
        let load_by_group: HashMap<GroupId, usize> = groups
            .iter()
            .map(|g| (g.id.clone(), counts.get(&g.id).copied().unwrap_or(0)))
            .collect();

        let deviations: Vec<usize> = groups
            .iter()
            .map(|g| load_by_group[&g.id].abs_diff(plan.target(&g.id)))
            .collect();

        Self {
            coverage_rate: if capacity > 0 {
                assigned as f64 / capacity as f64
            } else {
                0.0
            },
            empty_cells: capacity - assigned,
            activity_overlaps,
            paired_slots,
            load_by_group,
            total_deviation: deviations.iter().sum(),
            max_deviation: deviations.into_iter().max().unwrap_or(0),
        }
    }
}
