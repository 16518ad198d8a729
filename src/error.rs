//! Error and warning types.
//!
//! Nothing in the roster core is fatal. Quota warnings and shortfalls are
//! returned as data; edits that would break a hard constraint are refused
//! with an [`EditError`] and leave the schedule untouched.

use thiserror::Error;

use crate::models::{Cell, GroupId};

/// A malformed time window or cell coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WindowError {
    /// Day index outside `0..7`.
    #[error("day {0} is outside the week (0-6)")]
    InvalidDay(u8),
    /// Empty or out-of-range slot interval.
    #[error("slot range {start}..{end} is invalid (need 0 <= start < end <= {max})")]
    InvalidRange { start: u8, end: u8, max: u8 },
    /// Position index outside the hour's positions.
    #[error("position {0} does not exist")]
    InvalidPosition(u8),
}

/// Inconsistent quota configuration. Computation proceeds with clamped values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuotaWarning {
    /// Fixed quotas alone need more cells than the grid has.
    #[error("fixed quotas total {fixed} but the grid only has {capacity} cells")]
    FixedExceedsCapacity { fixed: usize, capacity: usize },
    /// Cells are left over but no group takes a proportional share.
    #[error("{leftover} cells are not covered by any quota")]
    NoProportionalGroups { leftover: usize },
}

/// Which side of a swap failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapSide {
    /// The group moving from the first cell into the second.
    First,
    /// The group moving from the second cell into the first.
    Second,
}

/// A rejected manual edit. The schedule is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Cell coordinates outside the grid.
    #[error("cell {0} is outside the grid")]
    InvalidCell(Cell),
    /// The group to assign is not in the group list.
    #[error("group '{0}' is not known")]
    UnknownGroup(GroupId),
    /// The moved group is unavailable at its destination.
    #[error("group '{group_id}' is unavailable at {cell} ({side:?} side)")]
    Unavailable {
        group_id: GroupId,
        cell: Cell,
        side: SwapSide,
    },
    /// The moved group would hold both positions of an hour.
    #[error("group '{group_id}' would hold both positions at {cell} ({side:?} side)")]
    DoubleStaffing {
        group_id: GroupId,
        cell: Cell,
        side: SwapSide,
    },
    /// A coupling rule of `group_id` would see another group in its hour.
    #[error("group '{group_id}' must hold both positions at {cell} ({side:?} side)")]
    CouplingRequired {
        group_id: GroupId,
        cell: Cell,
        side: SwapSide,
    },
    /// The moved group would exceed a staffing rule's capacity.
    #[error("group '{group_id}' would exceed {max} cells in its rule window at {cell} ({side:?} side)")]
    CapacityExceeded {
        group_id: GroupId,
        cell: Cell,
        max: usize,
        side: SwapSide,
    },
}

/// Failure to parse a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON for [`crate::config::RosterConfig`].
    #[error("invalid roster config: {0}")]
    Parse(#[from] serde_json::Error),
}
