//! Weekly schedule grid.
//!
//! The grid stores one optional group id per cell and a lock flag per
//! cell. Storage is position-major: each of the two positions is its own
//! contiguous `day × slot` grid. The schedule refers to groups by id only;
//! removing a group from the group list leaves stale ids behind. Every
//! operation treats a stale cell as empty; [`WeeklySchedule::prune_stale`]
//! clears them for good.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::window::{DAYS_PER_WEEK, POSITIONS_PER_SLOT, SLOTS_PER_DAY};
use super::{Cell, Group, GroupId, TimeWindow};
use crate::error::EditError;

/// A full week of duty cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRecord")]
pub struct WeeklySchedule {
    cells: Vec<Option<GroupId>>,
    locked: Vec<bool>,
}

#[derive(Deserialize)]
struct ScheduleRecord {
    cells: Vec<Option<GroupId>>,
    #[serde(default)]
    locked: Vec<bool>,
}

impl TryFrom<ScheduleRecord> for WeeklySchedule {
    type Error = String;

    fn try_from(record: ScheduleRecord) -> Result<Self, Self::Error> {
        if record.cells.len() != Self::CELL_COUNT {
            return Err(format!(
                "schedule has {} cells, expected {}",
                record.cells.len(),
                Self::CELL_COUNT
            ));
        }
        let locked = if record.locked.is_empty() {
            vec![false; Self::CELL_COUNT]
        } else if record.locked.len() == Self::CELL_COUNT {
            record.locked
        } else {
            return Err(format!(
                "schedule has {} lock flags, expected {}",
                record.locked.len(),
                Self::CELL_COUNT
            ));
        };
        Ok(Self {
            cells: record.cells,
            locked,
        })
    }
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl WeeklySchedule {
    /// Number of cells in the grid.
    pub const CELL_COUNT: usize =
        DAYS_PER_WEEK as usize * SLOTS_PER_DAY as usize * POSITIONS_PER_SLOT as usize;

    /// Creates an empty, unlocked schedule.
    pub fn new() -> Self {
        Self {
            cells: vec![None; Self::CELL_COUNT],
            locked: vec![false; Self::CELL_COUNT],
        }
    }

    /// Total capacity (same as [`Self::CELL_COUNT`]).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Group assigned to a cell. `None` for empty or out-of-range cells.
    pub fn get(&self, cell: Cell) -> Option<&str> {
        if !cell.is_valid() {
            return None;
        }
        self.cells[cell.index()].as_deref()
    }

    /// Sets a cell's group without any constraint checks.
    ///
    /// Returns the previous occupant.
    pub fn set(&mut self, cell: Cell, group_id: Option<GroupId>) -> Result<Option<GroupId>, EditError> {
        if !cell.is_valid() {
            return Err(EditError::InvalidCell(cell));
        }
        Ok(self.put(cell, group_id))
    }

    /// Empties a cell. Returns the previous occupant.
    pub fn clear(&mut self, cell: Cell) -> Result<Option<GroupId>, EditError> {
        self.set(cell, None)
    }

    /// Unchecked write for cells known to be in range.
    pub(crate) fn put(&mut self, cell: Cell, group_id: Option<GroupId>) -> Option<GroupId> {
        std::mem::replace(&mut self.cells[cell.index()], group_id)
    }

    /// Whether a cell is locked against automatic changes.
    pub fn is_locked(&self, cell: Cell) -> bool {
        cell.is_valid() && self.locked[cell.index()]
    }

    /// Locks or unlocks a cell.
    pub fn set_locked(&mut self, cell: Cell, locked: bool) -> Result<(), EditError> {
        if !cell.is_valid() {
            return Err(EditError::InvalidCell(cell));
        }
        self.locked[cell.index()] = locked;
        Ok(())
    }

    /// Empties every unlocked cell. Returns how many cells were cleared.
    pub fn clear_unlocked(&mut self) -> usize {
        let mut cleared = 0;
        for (value, &locked) in self.cells.iter_mut().zip(&self.locked) {
            if !locked && value.take().is_some() {
                cleared += 1;
            }
        }
        cleared
    }

    /// All cells with their occupants, in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, Option<&str>)> + '_ {
        Cell::all().map(move |c| (c, self.cells[c.index()].as_deref()))
    }

    /// Cells held by a group, in canonical order.
    pub fn cells_of(&self, group_id: &str) -> Vec<Cell> {
        self.iter()
            .filter(|(_, g)| *g == Some(group_id))
            .map(|(c, _)| c)
            .collect()
    }

    /// Group holding a cell, reading ids missing from `groups` as empty.
    pub fn occupant(&self, cell: Cell, groups: &[Group]) -> Option<&str> {
        self.get(cell).filter(|id| groups.iter().any(|g| g.id == *id))
    }

    /// Number of cells inside `window` held by a group (both positions).
    pub fn count_in_window(&self, group_id: &str, window: &TimeWindow) -> usize {
        (window.start_slot()..window.end_slot())
            .flat_map(|slot| {
                (0..POSITIONS_PER_SLOT).map(move |position| Cell::new(window.day(), slot, position))
            })
            .filter(|&c| self.get(c) == Some(group_id))
            .count()
    }

    /// Empty cells, in canonical order.
    pub fn empty_cells(&self) -> Vec<Cell> {
        self.iter()
            .filter(|(_, g)| g.is_none())
            .map(|(c, _)| c)
            .collect()
    }

    /// Number of assigned cells.
    pub fn assigned_len(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Assigned cell count per group id.
    pub fn assigned_counts(&self) -> HashMap<GroupId, usize> {
        let mut counts: HashMap<GroupId, usize> = HashMap::new();
        for id in self.cells.iter().flatten() {
            *counts.entry(id.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Whether the cell and its partner hold the same group.
    pub fn is_double_staffed(&self, cell: Cell) -> bool {
        match self.get(cell) {
            Some(id) => self.get(cell.partner()) == Some(id),
            None => false,
        }
    }

    /// Empties cells that reference groups missing from `groups`.
    ///
    /// Returns the affected cells in canonical order. Their lock flags are
    /// cleared as well.
    pub fn prune_stale(&mut self, groups: &[Group]) -> Vec<Cell> {
        let known: HashSet<&str> = groups.iter().map(|g| g.id.as_str()).collect();
        let stale: Vec<Cell> = self
            .iter()
            .filter(|(_, g)| matches!(g, Some(id) if !known.contains(id)))
            .map(|(c, _)| c)
            .collect();
        for &cell in &stale {
            self.put(cell, None);
            self.locked[cell.index()] = false;
        }
        stale
    }
}
