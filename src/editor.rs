//! Manual schedule edits.
//!
//! Supports the interactive front end: exchanging two cells (drag and
//! drop), replacing a single cell's group, and locking cells so later
//! automatic passes leave them alone.
//!
//! Every edit checks hard constraints before touching the grid:
//! unavailability, double staffing, coupled hours and staffing-rule
//! capacity. A rejected edit returns an [`EditError`] and leaves the
//! schedule unchanged. Cells naming a group that is no longer in the list
//! are treated as empty.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{EditError, SwapSide};
use crate::models::{find_group, Cell, Group, GroupId, WeeklySchedule};

/// A cell and its occupant after an edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellUpdate {
    /// Edited cell.
    pub cell: Cell,
    /// Occupant after the edit.
    pub group_id: Option<GroupId>,
}

/// Result of an accepted swap: both changed cells, for partial redraws.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOutcome {
    /// First cell after the swap.
    pub first: CellUpdate,
    /// Second cell after the swap.
    pub second: CellUpdate,
}

/// Validated single-cell edits on a [`WeeklySchedule`].
///
/// # Example
///
/// ```
/// use u_roster::editor::ManualEditor;
/// use u_roster::models::{Cell, Group, WeeklySchedule};
///
/// let groups = vec![Group::new("A"), Group::new("B")];
/// let mut schedule = WeeklySchedule::new();
/// let editor = ManualEditor::new(&groups);
///
/// editor.assign(&mut schedule, Cell::new(0, 8, 0), Some("A".into())).unwrap();
/// let outcome = editor.swap(&mut schedule, Cell::new(0, 8, 0), Cell::new(1, 8, 0)).unwrap();
/// assert_eq!(outcome.second.group_id.as_deref(), Some("A"));
/// assert_eq!(schedule.get(Cell::new(0, 8, 0)), None);
/// ```
#[derive(Debug, Clone)]
pub struct ManualEditor<'a> {
    groups: &'a [Group],
    lock_edits: bool,
}

impl<'a> ManualEditor<'a> {
    /// Creates an editor over the current group list.
    pub fn new(groups: &'a [Group]) -> Self {
        Self {
            groups,
            lock_edits: false,
        }
    }

    /// Locks every cell this editor changes.
    pub fn lock_edits(mut self, lock: bool) -> Self {
        self.lock_edits = lock;
        self
    }

    /// Exchanges the occupants of two cells.
    ///
    /// Either cell may be empty. A cell naming a group missing from the
    /// list counts as empty: nothing moves out of it and the stale id is
    /// dropped. Rejects the swap if a moved group would break a hard
    /// constraint at its new cell.
    pub fn swap(
        &self,
        schedule: &mut WeeklySchedule,
        a: Cell,
        b: Cell,
    ) -> Result<SwapOutcome, EditError> {
        if let Err(err) = check_swap(schedule, self.groups, a, b) {
            debug!("swap {a} <-> {b} rejected: {err}");
            return Err(err);
        }

        if a != b && schedule.get(a) != schedule.get(b) {
            let first = schedule.occupant(a, self.groups).map(str::to_owned);
            let second = schedule.occupant(b, self.groups).map(str::to_owned);
            schedule.put(a, second);
            schedule.put(b, first);
        }
        if self.lock_edits {
            schedule.set_locked(a, true)?;
            schedule.set_locked(b, true)?;
        }

        Ok(SwapOutcome {
            first: CellUpdate {
                cell: a,
                group_id: schedule.get(a).map(str::to_owned),
            },
            second: CellUpdate {
                cell: b,
                group_id: schedule.get(b).map(str::to_owned),
            },
        })
    }

    /// Replaces a cell's occupant, or empties it with `None`.
    pub fn assign(
        &self,
        schedule: &mut WeeklySchedule,
        cell: Cell,
        group_id: Option<GroupId>,
    ) -> Result<CellUpdate, EditError> {
        if !cell.is_valid() {
            return Err(EditError::InvalidCell(cell));
        }
        if let Some(id) = group_id.as_deref() {
            let group =
                find_group(self.groups, id).ok_or_else(|| EditError::UnknownGroup(id.to_owned()))?;
            // Re-assigning the current holder leaves its window usage unchanged.
            let vacated = (schedule.get(cell) == Some(id)).then_some(cell);
            check_placement(
                schedule,
                self.groups,
                group,
                cell,
                vacated,
                schedule.occupant(cell.partner(), self.groups),
                SwapSide::First,
            )?;
        }

        schedule.put(cell, group_id.clone());
        // Clearing a cell always releases its lock.
        if group_id.is_none() {
            schedule.set_locked(cell, false)?;
        } else if self.lock_edits {
            schedule.set_locked(cell, true)?;
        }
        Ok(CellUpdate { cell, group_id })
    }

    /// Locks or unlocks a cell.
    pub fn set_lock(
        &self,
        schedule: &mut WeeklySchedule,
        cell: Cell,
        locked: bool,
    ) -> Result<(), EditError> {
        schedule.set_locked(cell, locked)
    }
}

/// Checks whether exchanging `a` and `b` keeps every hard constraint.
///
/// Stale ids count as empty. Does not mutate the schedule.
pub(crate) fn check_swap(
    schedule: &WeeklySchedule,
    groups: &[Group],
    a: Cell,
    b: Cell,
) -> Result<(), EditError> {
    for cell in [a, b] {
        if !cell.is_valid() {
            return Err(EditError::InvalidCell(cell));
        }
    }
    if a == b || schedule.get(a) == schedule.get(b) {
        return Ok(());
    }

    let first = schedule.occupant(a, groups);
    let second = schedule.occupant(b, groups);

    // Occupant of `cell` once the swap is applied.
    let after = |cell: Cell| {
        if cell == a {
            second
        } else if cell == b {
            first
        } else {
            schedule.occupant(cell, groups)
        }
    };

    let moves = [
        (first, a, b, SwapSide::First),
        (second, b, a, SwapSide::Second),
    ];
    for (moved, from, dest, side) in moves {
        let Some(group) = moved.and_then(|id| find_group(groups, id)) else {
            continue;
        };
        check_placement(
            schedule,
            groups,
            group,
            dest,
            Some(from),
            after(dest.partner()),
            side,
        )?;
    }
    Ok(())
}

/// Checks every hard constraint for `group` taking `cell`.
///
/// `vacated` is a cell the group leaves in the same edit; `partner` is the
/// partner cell's occupant once the edit is applied.
pub(crate) fn check_placement(
    schedule: &WeeklySchedule,
    groups: &[Group],
    group: &Group,
    cell: Cell,
    vacated: Option<Cell>,
    partner: Option<&str>,
    side: SwapSide,
) -> Result<(), EditError> {
    if group.is_unavailable_at(cell) {
        return Err(EditError::Unavailable {
            group_id: group.id.clone(),
            cell,
            side,
        });
    }
    if !group.can_take(cell, partner) {
        return Err(if partner == Some(group.id.as_str()) {
            EditError::DoubleStaffing {
                group_id: group.id.clone(),
                cell,
                side,
            }
        } else {
            EditError::CouplingRequired {
                group_id: group.id.clone(),
                cell,
                side,
            }
        });
    }
    let neighbour = partner
        .filter(|&p| p != group.id)
        .and_then(|p| find_group(groups, p));
    if let Some(other) = neighbour.filter(|o| o.requires_coupling_at(cell.partner())) {
        return Err(EditError::CouplingRequired {
            group_id: other.id.clone(),
            cell: cell.partner(),
            side,
        });
    }
    if let Some(max) = exceeded_capacity(schedule, group, cell, vacated, 1) {
        return Err(EditError::CapacityExceeded {
            group_id: group.id.clone(),
            cell,
            max,
            side,
        });
    }
    Ok(())
}

/// Limit of the first capacity rule that `needed` more cells at `cell`
/// would break. Rules that also cover `vacated` are unaffected.
pub(crate) fn exceeded_capacity(
    schedule: &WeeklySchedule,
    group: &Group,
    cell: Cell,
    vacated: Option<Cell>,
    needed: usize,
) -> Option<usize> {
    group
        .capacity_rules_at(cell)
        .filter(|(rule, _)| !vacated.is_some_and(|v| rule.covers(v)))
        .find(|(rule, max)| schedule.count_in_window(&group.id, &rule.window) + needed > *max)
        .map(|(_, max)| max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{StaffingRule, TimeWindow};

    fn groups() -> Vec<Group> {
        vec![
            Group::new("A").with_unavailability(TimeWindow::new(0, 0, 6).unwrap()),
            Group::new("B"),
            Group::new("C").without_double_staffing(),
        ]
    }

    fn filled(cells: &[(Cell, &str)]) -> WeeklySchedule {
        let mut s = WeeklySchedule::new();
        for (c, id) in cells {
            s.set(*c, Some((*id).to_owned())).unwrap();
        }
        s
    }

    #[test]
    fn test_swap_success_changes_only_two_cells() {
        let gs = groups();
        let a = Cell::new(1, 10, 0);
        let b = Cell::new(2, 3, 1);
        let mut s = filled(&[(a, "A"), (b, "B"), (Cell::new(4, 4, 0), "C")]);
        let before = s.clone();

        let out = ManualEditor::new(&gs).swap(&mut s, a, b).unwrap();
        assert_eq!(out.first, CellUpdate { cell: a, group_id: Some("B".into()) });
        assert_eq!(out.second, CellUpdate { cell: b, group_id: Some("A".into()) });

        let changed: Vec<Cell> = Cell::all().filter(|&c| s.get(c) != before.get(c)).collect();
        assert_eq!(changed, vec![a, b]);
    }

    #[test]
    fn test_swap_rejected_is_atomic() {
        let gs = groups();
        let a = Cell::new(1, 10, 0);
        let b = Cell::new(0, 2, 0); // A is unavailable here
        let mut s = filled(&[(a, "A"), (b, "B")]);
        let before = s.clone();

        let err = ManualEditor::new(&gs).swap(&mut s, a, b).unwrap_err();
        assert_eq!(
            err,
            EditError::Unavailable {
                group_id: "A".into(),
                cell: b,
                side: SwapSide::First
            }
        );
        assert_eq!(s, before);
    }

    #[test]
    fn test_swap_reports_second_side() {
        let gs = groups();
        let a = Cell::new(0, 3, 1); // A unavailable here
        let b = Cell::new(5, 3, 1);
        let mut s = filled(&[(a, "B"), (b, "A")]);
        let err = ManualEditor::new(&gs).swap(&mut s, a, b).unwrap_err();
        assert!(matches!(err, EditError::Unavailable { side: SwapSide::Second, .. }));
    }

    #[test]
    fn test_swap_with_empty_cell() {
        let gs = groups();
        let a = Cell::new(3, 3, 0);
        let b = Cell::new(3, 4, 0);
        let mut s = filled(&[(a, "B")]);

        let out = ManualEditor::new(&gs).swap(&mut s, a, b).unwrap();
        assert_eq!(out.first.group_id, None);
        assert_eq!(s.get(a), None);
        assert_eq!(s.get(b), Some("B"));
    }

    #[test]
    fn test_swap_same_group_is_noop() {
        let gs = groups();
        let a = Cell::new(0, 0, 0);
        let b = Cell::new(0, 1, 0);
        // Both hold A even though A is unavailable: no group moves, so nothing is checked.
        let mut s = filled(&[(a, "A"), (b, "A")]);
        let before = s.clone();
        ManualEditor::new(&gs).swap(&mut s, a, b).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn test_swap_cell_with_itself() {
        let gs = groups();
        let a = Cell::new(2, 2, 0);
        let mut s = filled(&[(a, "B")]);
        let before = s.clone();
        ManualEditor::new(&gs).swap(&mut s, a, a).unwrap();
        assert_eq!(s, before);
    }

    #[test]
    fn test_swap_rejects_double_staffing() {
        let gs = groups();
        let a = Cell::new(4, 4, 0);
        let b = Cell::new(2, 9, 0);
        // C already holds the partner of b.
        let mut s = filled(&[(a, "C"), (b, "B"), (b.partner(), "C")]);
        let err = ManualEditor::new(&gs).swap(&mut s, a, b).unwrap_err();
        assert!(matches!(err, EditError::DoubleStaffing { side: SwapSide::First, .. }));
    }

    #[test]
    fn test_swap_between_partner_positions() {
        let gs = groups();
        let a = Cell::new(4, 4, 0);
        let mut s = filled(&[(a, "C"), (a.partner(), "B")]);
        ManualEditor::new(&gs).swap(&mut s, a, a.partner()).unwrap();
        assert_eq!(s.get(a), Some("B"));
        assert_eq!(s.get(a.partner()), Some("C"));
    }

    #[test]
    fn test_swap_into_stale_cell_drops_stale_id() {
        let gs = groups();
        let a = Cell::new(1, 1, 0);
        let stale = Cell::new(1, 2, 0);
        let mut s = filled(&[(a, "B"), (stale, "GONE")]);

        let out = ManualEditor::new(&gs).swap(&mut s, a, stale).unwrap();
        assert_eq!(out.first.group_id, None);
        assert_eq!(out.second.group_id.as_deref(), Some("B"));
        assert_eq!(s.get(a), None);
        assert_eq!(s.get(stale), Some("B"));
    }

    #[test]
    fn test_swap_stale_with_empty_clears_it() {
        let gs = groups();
        let stale = Cell::new(1, 1, 0);
        let empty = Cell::new(1, 2, 0);
        let mut s = filled(&[(stale, "GONE")]);

        ManualEditor::new(&gs).swap(&mut s, stale, empty).unwrap();
        assert_eq!(s.get(stale), None);
        assert_eq!(s.get(empty), None);
    }

    #[test]
    fn test_stale_partner_reads_as_empty() {
        let coupled = StaffingRule::new(TimeWindow::whole_day(2).unwrap()).coupled();
        let gs = vec![Group::new("K").with_staffing_rule(coupled)];
        let cell = Cell::new(2, 5, 0);
        let mut s = filled(&[(cell.partner(), "GONE")]);

        ManualEditor::new(&gs)
            .assign(&mut s, cell, Some("K".into()))
            .unwrap();
        assert_eq!(s.get(cell), Some("K"));
    }

    #[test]
    fn test_coupled_hour_rejects_other_group() {
        let night = StaffingRule::new(TimeWindow::new(3, 20, 24).unwrap()).coupled();
        let gs = vec![Group::new("K").with_staffing_rule(night), Group::new("B")];
        let editor = ManualEditor::new(&gs);
        let hour = Cell::new(3, 21, 0);

        // B may not sit next to K inside K's coupled window.
        let mut s = filled(&[(hour, "K")]);
        let err = editor
            .assign(&mut s, hour.partner(), Some("B".into()))
            .unwrap_err();
        assert_eq!(
            err,
            EditError::CouplingRequired {
                group_id: "K".into(),
                cell: hour,
                side: SwapSide::First
            }
        );
        assert_eq!(s.get(hour.partner()), None);

        // Nor may K join an hour B already holds.
        let mut t = filled(&[(hour.partner(), "B")]);
        let err = editor.assign(&mut t, hour, Some("K".into())).unwrap_err();
        assert!(matches!(err, EditError::CouplingRequired { ref group_id, .. } if group_id == "K"));

        editor
            .assign(&mut s, hour.partner(), Some("K".into()))
            .unwrap();
        assert!(s.is_double_staffed(hour));
    }

    #[test]
    fn test_swap_rejects_breaking_coupled_hour() {
        let night = StaffingRule::new(TimeWindow::new(3, 20, 24).unwrap()).coupled();
        let gs = vec![Group::new("K").with_staffing_rule(night), Group::new("B")];
        let hour = Cell::new(3, 22, 0);
        let away = Cell::new(0, 10, 0);
        let mut s = filled(&[(hour, "K"), (hour.partner(), "K"), (away, "B")]);
        let before = s.clone();

        let err = ManualEditor::new(&gs).swap(&mut s, away, hour).unwrap_err();
        assert!(matches!(err, EditError::CouplingRequired { side: SwapSide::First, .. }));
        assert_eq!(s, before);
    }

    #[test]
    fn test_capacity_rule_limits_moves_into_window() {
        let weekend = StaffingRule::new(TimeWindow::whole_day(5).unwrap()).with_max_capacity(1);
        let gs = vec![Group::new("A").with_staffing_rule(weekend), Group::new("B")];
        let inside = Cell::new(5, 3, 0);
        let also_inside = Cell::new(5, 9, 1);
        let outside = Cell::new(1, 0, 0);
        let mut s = filled(&[(inside, "A"), (also_inside, "B"), (outside, "A")]);
        let editor = ManualEditor::new(&gs);

        let before = s.clone();
        let err = editor.swap(&mut s, outside, also_inside).unwrap_err();
        assert_eq!(
            err,
            EditError::CapacityExceeded {
                group_id: "A".into(),
                cell: also_inside,
                max: 1,
                side: SwapSide::First
            }
        );
        assert_eq!(s, before);

        // Moving inside the window keeps A's count there.
        editor.swap(&mut s, inside, also_inside).unwrap();
        assert_eq!(s.get(also_inside), Some("A"));
        assert_eq!(s.get(inside), Some("B"));
    }

    #[test]
    fn test_swap_invalid_cell() {
        let gs = groups();
        let mut s = WeeklySchedule::new();
        let bad = Cell::new(9, 0, 0);
        let err = ManualEditor::new(&gs)
            .swap(&mut s, Cell::new(0, 0, 0), bad)
            .unwrap_err();
        assert_eq!(err, EditError::InvalidCell(bad));
    }

    #[test]
    fn test_swap_locks_when_requested() {
        let gs = groups();
        let a = Cell::new(1, 1, 0);
        let b = Cell::new(1, 2, 0);
        let mut s = filled(&[(a, "B")]);
        ManualEditor::new(&gs).lock_edits(true).swap(&mut s, a, b).unwrap();
        assert!(s.is_locked(a));
        assert!(s.is_locked(b));
    }

    #[test]
    fn test_assign() {
        let gs = groups();
        let mut s = WeeklySchedule::new();
        let editor = ManualEditor::new(&gs).lock_edits(true);

        let cell = Cell::new(0, 8, 0);
        let upd = editor.assign(&mut s, cell, Some("A".into())).unwrap();
        assert_eq!(upd.group_id.as_deref(), Some("A"));
        assert!(s.is_locked(cell));

        let err = editor.assign(&mut s, Cell::new(0, 1, 0), Some("A".into())).unwrap_err();
        assert!(matches!(err, EditError::Unavailable { .. }));
        assert_eq!(s.get(Cell::new(0, 1, 0)), None);

        editor.assign(&mut s, cell, None).unwrap();
        assert_eq!(s.get(cell), None);
        assert!(!s.is_locked(cell));

        let err = editor.assign(&mut s, cell, Some("Z".into())).unwrap_err();
        assert_eq!(err, EditError::UnknownGroup("Z".into()));
    }
}
