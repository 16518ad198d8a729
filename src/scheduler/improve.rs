//! Swap-based local search.
//!
//! After the greedy fill, random pairs of unlocked cells are exchanged when
//! the exchange is feasible and lowers the score. Swaps move cells between
//! groups without changing any group's count, so quota progress is
//! preserved while the soft costs shrink.
//!
//! # Score
//! Lower is better. For a cell held by group `g`:
//! - `+activity_window_penalty` if the cell lies in one of `g`'s activity windows
//! - `-paired_bonus` if the partner cell is also held by `g`
//!
//! For each group, over its duty hours in week order (an hour counts once
//! even when both positions are held):
//! - a run of `n` consecutive hours within [`Group::max_consecutive_hours`]
//!   earns `-n * consecutive_bonus_per_hour`; a longer run costs
//!   `excess^consecutive_penalty_exponent * consecutive_penalty_multiplier`
//! - a rest gap of `r` idle hours costs `(6 - r) * rest_penalty` below 6
//!   hours, `short_rest_penalty` below 16, and earns `-long_rest_bonus` at
//!   24 or more
//!
//! A swap only changes the cell scores of the two cells and their
//! partners and the run scores of the two groups involved, so only those
//! are compared.

use log::trace;
use rand::Rng;

use crate::config::RosterConfig;
use crate::editor::check_swap;
use crate::models::{find_group, Cell, Group, WeeklySchedule, DAYS_PER_WEEK, SLOTS_PER_DAY};

const HOURS_PER_WEEK: usize = DAYS_PER_WEEK as usize * SLOTS_PER_DAY as usize;

/// Rest gaps shorter than this are penalized per missing hour.
const MIN_REST_HOURS: usize = 6;
/// Rest gaps shorter than this get the flat short-rest penalty.
const FULL_REST_HOURS: usize = 16;
/// Rest gaps of at least this long earn the long-rest bonus.
const LONG_REST_HOURS: usize = 24;

/// Weights for the local score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LocalScoring {
    pub activity_window_penalty: i64,
    pub paired_bonus: i64,
    pub consecutive_bonus_per_hour: i64,
    pub consecutive_penalty_exponent: u32,
    pub consecutive_penalty_multiplier: i64,
    pub rest_penalty: i64,
    pub short_rest_penalty: i64,
    pub long_rest_bonus: i64,
}

impl From<&RosterConfig> for LocalScoring {
    fn from(config: &RosterConfig) -> Self {
        Self {
            activity_window_penalty: config.activity_window_penalty,
            paired_bonus: config.paired_bonus,
            consecutive_bonus_per_hour: config.consecutive_bonus_per_hour,
            consecutive_penalty_exponent: config.consecutive_penalty_exponent,
            consecutive_penalty_multiplier: config.consecutive_penalty_multiplier,
            rest_penalty: config.rest_penalty,
            short_rest_penalty: config.short_rest_penalty,
            long_rest_bonus: config.long_rest_bonus,
        }
    }
}

impl Default for LocalScoring {
    fn default() -> Self {
        Self::from(&RosterConfig::default())
    }
}

impl LocalScoring {
    fn cell_score(&self, schedule: &WeeklySchedule, groups: &[Group], cell: Cell) -> i64 {
        let Some(id) = schedule.get(cell) else {
            return 0;
        };
        let Some(group) = find_group(groups, id) else {
            return 0;
        };
        let mut score = 0;
        if group.in_activity_window(cell) {
            score += self.activity_window_penalty;
        }
        if schedule.get(cell.partner()) == Some(id) {
            score -= self.paired_bonus;
        }
        score
    }

    /// Score of both cells and their partners.
    fn region_score(&self, schedule: &WeeklySchedule, groups: &[Group], a: Cell, b: Cell) -> i64 {
        let mut region = vec![a, a.partner(), b, b.partner()];
        region.sort_unstable();
        region.dedup();
        region
            .into_iter()
            .map(|c| self.cell_score(schedule, groups, c))
            .sum()
    }

    /// Run and rest score of one group's duty hours.
    fn sequence_score(&self, schedule: &WeeklySchedule, group: &Group) -> i64 {
        let mut on_duty = [false; HOURS_PER_WEEK];
        for (cell, id) in schedule.iter() {
            if id == Some(group.id.as_str()) {
                on_duty[cell.hour_of_week()] = true;
            }
        }

        let limit = group.max_consecutive_hours();
        let mut score = 0;
        let mut run = 0usize;
        let mut last_hour: Option<usize> = None;
        for hour in 0..=HOURS_PER_WEEK {
            if hour < HOURS_PER_WEEK && on_duty[hour] {
                if run == 0 {
                    if let Some(last) = last_hour {
                        score += self.rest_score(hour - last - 1);
                    }
                }
                run += 1;
            } else if run > 0 {
                score += self.run_score(run, limit);
                last_hour = Some(hour - 1);
                run = 0;
            }
        }
        score
    }

    fn run_score(&self, run: usize, limit: usize) -> i64 {
        if run <= limit {
            -(run as i64) * self.consecutive_bonus_per_hour
        } else {
            let excess = (run - limit) as i64;
            excess
                .saturating_pow(self.consecutive_penalty_exponent)
                .saturating_mul(self.consecutive_penalty_multiplier)
        }
    }

    fn rest_score(&self, rest: usize) -> i64 {
        if rest < MIN_REST_HOURS {
            (MIN_REST_HOURS - rest) as i64 * self.rest_penalty
        } else if rest < FULL_REST_HOURS {
            self.short_rest_penalty
        } else if rest >= LONG_REST_HOURS {
            -self.long_rest_bonus
        } else {
            0
        }
    }

    /// Score of everything a swap of `a` and `b` can change.
    fn swap_score(
        &self,
        schedule: &WeeklySchedule,
        groups: &[Group],
        a: Cell,
        b: Cell,
        movers: &[&Group],
    ) -> i64 {
        self.region_score(schedule, groups, a, b)
            + movers
                .iter()
                .map(|g| self.sequence_score(schedule, g))
                .sum::<i64>()
    }
}

/// Runs `iterations` rounds of first-improvement swaps.
///
/// Returns the number of accepted swaps.
pub(crate) fn improve<R: Rng + ?Sized>(
    schedule: &mut WeeklySchedule,
    groups: &[Group],
    scoring: LocalScoring,
    iterations: usize,
    rng: &mut R,
) -> usize {
    let movable: Vec<Cell> = Cell::all().filter(|&c| !schedule.is_locked(c)).collect();
    if movable.len() < 2 {
        return 0;
    }

    let mut accepted = 0;
    for _ in 0..iterations {
        let a = movable[rng.random_range(0..movable.len())];
        let b = movable[rng.random_range(0..movable.len())];
        if a == b || schedule.get(a) == schedule.get(b) {
            continue;
        }
        if check_swap(schedule, groups, a, b).is_err() {
            continue;
        }

        let movers: Vec<&Group> = [a, b]
            .into_iter()
            .filter_map(|c| schedule.get(c).and_then(|id| find_group(groups, id)))
            .collect();
        let before = scoring.swap_score(schedule, groups, a, b, &movers);
        let first = schedule.get(a).map(str::to_owned);
        let second = schedule.put(b, first);
        let first = schedule.put(a, second);
        let after = scoring.swap_score(schedule, groups, a, b, &movers);

        if after < before {
            trace!("swap {a} <-> {b}: {before} -> {after}");
            accepted += 1;
        } else {
            let second = schedule.put(a, first);
            schedule.put(b, second);
        }
    }
    accepted
}
