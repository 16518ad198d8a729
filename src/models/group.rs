//! Group model.
//!
//! A group is a staffing unit that takes duty cells. Its workload is set
//! either by a fixed weekly quota or, when no quota is given, by its
//! staffing size relative to the other proportional groups.

use serde::{Deserialize, Serialize};

use super::{Cell, StaffingRule, TimeWindow};

/// Group identifier.
pub type GroupId = String;

/// A staffing unit assignable to duty cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique group identifier.
    pub id: GroupId,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// Headcount used for proportional quota distribution.
    #[serde(default)]
    pub staffing_size: u32,
    /// Fixed number of cells per week. Overrides proportional distribution.
    #[serde(default)]
    pub weekly_quota: Option<u32>,
    /// Windows in which the group can never be assigned.
    #[serde(default)]
    pub unavailability: Vec<TimeWindow>,
    /// Primary-activity windows the scheduler tries to avoid.
    #[serde(default)]
    pub activity_windows: Vec<TimeWindow>,
    /// Whether the group may hold both positions of the same slot.
    #[serde(default = "default_true")]
    pub allow_double_staffing: bool,
    /// Per-window capacity and coupling limits.
    #[serde(default)]
    pub staffing_rules: Vec<StaffingRule>,
}

fn default_true() -> bool {
    true
}

impl Group {
    /// Creates a group with no workload configuration.
    pub fn new(id: impl Into<GroupId>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            staffing_size: 0,
            weekly_quota: None,
            unavailability: Vec::new(),
            activity_windows: Vec::new(),
            allow_double_staffing: true,
            staffing_rules: Vec::new(),
        }
    }

    /// Sets the group name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the staffing size.
    pub fn with_staffing_size(mut self, staffing_size: u32) -> Self {
        self.staffing_size = staffing_size;
        self
    }

    /// Sets a fixed weekly quota.
    pub fn with_weekly_quota(mut self, quota: u32) -> Self {
        self.weekly_quota = Some(quota);
        self
    }

    /// Adds an unavailability window.
    pub fn with_unavailability(mut self, window: TimeWindow) -> Self {
        self.unavailability.push(window);
        self
    }

    /// Adds a primary-activity window.
    pub fn with_activity_window(mut self, window: TimeWindow) -> Self {
        self.activity_windows.push(window);
        self
    }

    /// Forbids holding both positions of one slot.
    pub fn without_double_staffing(mut self) -> Self {
        self.allow_double_staffing = false;
        self
    }

    /// Adds a staffing rule.
    pub fn with_staffing_rule(mut self, rule: StaffingRule) -> Self {
        self.staffing_rules.push(rule);
        self
    }

    /// Whether the group has a fixed quota.
    #[inline]
    pub fn has_fixed_quota(&self) -> bool {
        self.weekly_quota.is_some()
    }

    /// Whether a hard unavailability window covers the cell.
    pub fn is_unavailable_at(&self, cell: Cell) -> bool {
        self.unavailability.iter().any(|w| w.covers(cell))
    }

    /// Whether one of the group's activity windows covers the cell.
    pub fn in_activity_window(&self, cell: Cell) -> bool {
        self.activity_windows.iter().any(|w| w.covers(cell))
    }

    /// Whether a coupling rule covers the cell.
    pub fn requires_coupling_at(&self, cell: Cell) -> bool {
        self.staffing_rules
            .iter()
            .any(|r| r.force_coupling && r.covers(cell))
    }

    /// Capacity-limited rules covering the cell, with their limits.
    pub fn capacity_rules_at(
        &self,
        cell: Cell,
    ) -> impl Iterator<Item = (&StaffingRule, usize)> + '_ {
        self.staffing_rules.iter().filter_map(move |r| match r.max_capacity {
            Some(max) if r.covers(cell) => Some((r, max as usize)),
            _ => None,
        })
    }

    /// Longest run of consecutive duty hours before it counts as excessive.
    ///
    /// Half the staffing size, at least 2. Groups without a staffing size
    /// are treated as four people.
    pub fn max_consecutive_hours(&self) -> usize {
        let staffing = if self.staffing_size == 0 {
            4
        } else {
            self.staffing_size
        };
        (staffing as usize / 2).max(2)
    }

    /// Whether the group may take `cell` given who holds the partner cell.
    ///
    /// Checks the group's own per-cell hard constraints: unavailability,
    /// holding both positions when it forbids double staffing, and sharing
    /// a coupled hour with another group. Capacity rules and the partner
    /// group's coupling rules need the schedule and are checked by callers.
    pub fn can_take(&self, cell: Cell, partner_occupant: Option<&str>) -> bool {
        if self.is_unavailable_at(cell) {
            return false;
        }
        match partner_occupant {
            Some(p) if p == self.id => self.allow_double_staffing,
            Some(_) => !self.requires_coupling_at(cell),
            None => true,
        }
    }
}

/// Finds a group by id.
pub fn find_group<'a>(groups: &'a [Group], id: &str) -> Option<&'a Group> {
    groups.iter().find(|g| g.id == id)
}
