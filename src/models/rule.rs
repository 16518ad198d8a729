//! Staffing rules.
//!
//! A staffing rule attaches extra hard limits to one of a group's time
//! windows:
//! - `max_capacity`: the group holds at most this many cells inside the
//!   window (both positions counted).
//! - `force_coupling`: inside the window the group only takes an hour
//!   together with its partner position, never next to another group.

use serde::{Deserialize, Serialize};

use super::{Cell, TimeWindow};

/// Hard per-window limits for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffingRule {
    /// Window the rule applies to.
    pub window: TimeWindow,
    /// Maximum cells inside the window.
    #[serde(default)]
    pub max_capacity: Option<u32>,
    /// Whether both positions of an hour must hold this group.
    #[serde(default)]
    pub force_coupling: bool,
}

impl StaffingRule {
    /// Creates a rule with no limits.
    pub fn new(window: TimeWindow) -> Self {
        Self {
            window,
            max_capacity: None,
            force_coupling: false,
        }
    }

    /// Caps the cells inside the window.
    pub fn with_max_capacity(mut self, max: u32) -> Self {
        self.max_capacity = Some(max);
        self
    }

    /// Requires both positions of each hour to hold the group.
    pub fn coupled(mut self) -> Self {
        self.force_coupling = true;
        self
    }

    /// Whether the rule applies to a cell.
    #[inline]
    pub fn covers(&self, cell: Cell) -> bool {
        self.window.covers(cell)
    }
}
