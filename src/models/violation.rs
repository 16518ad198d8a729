//! Constraint violation records.
//!
//! Violations are recomputed on demand by the validator and never stored
//! inside a schedule.

use serde::{Deserialize, Serialize};

use super::{Cell, GroupId};

/// Classification of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Group assigned inside one of its unavailability windows.
    Hard,
    /// Group holds both positions of a slot although it forbids it.
    DoubleStaffing,
    /// A staffing rule's capacity or coupling is broken.
    StaffingRule,
    /// Cell references a group that no longer exists; reads as empty.
    StaleReference,
    /// Group assigned inside one of its activity windows.
    SoftActivityOverlap,
    /// Group's assigned count is off its target by more than the tolerance.
    QuotaDeviation,
}

impl ViolationKind {
    /// Whether the violation makes the schedule invalid.
    pub fn is_hard(self) -> bool {
        matches!(self, Self::Hard | Self::DoubleStaffing | Self::StaffingRule)
    }

    /// Severity (0-100, higher = worse).
    pub fn severity(self) -> i32 {
        match self {
            Self::Hard => 95,
            Self::DoubleStaffing => 90,
            Self::StaffingRule => 85,
            Self::SoftActivityOverlap => 30,
            Self::StaleReference => 20,
            Self::QuotaDeviation => 10,
        }
    }
}

/// A single violation found in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub kind: ViolationKind,
    /// Offending cell; `None` for per-group findings.
    pub cell: Option<Cell>,
    /// Group involved.
    pub group_id: GroupId,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Creates a cell-level violation.
    pub fn at_cell(
        kind: ViolationKind,
        cell: Cell,
        group_id: impl Into<GroupId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            cell: Some(cell),
            group_id: group_id.into(),
            message: message.into(),
        }
    }

    /// Creates a group-level violation.
    pub fn for_group(
        kind: ViolationKind,
        group_id: impl Into<GroupId>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            cell: None,
            group_id: group_id.into(),
            message: message.into(),
        }
    }

    /// Shorthand for `self.kind.is_hard()`.
    #[inline]
    pub fn is_hard(&self) -> bool {
        self.kind.is_hard()
    }
}
