//! Weekly time windows and grid cells.
//!
//! # Time Model
//! A week is 7 days (0 = start of week), each split into 24 hourly slots.
//! Every slot has two concurrent positions, so the grid holds
//! `7 × 24 × 2` cells.
//!
//! Windows are half-open slot intervals on a single day and cover both
//! positions of every slot they contain.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::WindowError;

/// Days per week.
pub const DAYS_PER_WEEK: u8 = 7;
/// Hourly slots per day.
pub const SLOTS_PER_DAY: u8 = 24;
/// Concurrent positions per slot.
pub const POSITIONS_PER_SLOT: u8 = 2;

/// An immutable slot interval `[start_slot, end_slot)` on one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawWindow", into = "RawWindow")]
pub struct TimeWindow {
    day: u8,
    start_slot: u8,
    end_slot: u8,
}

#[derive(Serialize, Deserialize)]
struct RawWindow {
    day: u8,
    start_slot: u8,
    end_slot: u8,
}

impl TryFrom<RawWindow> for TimeWindow {
    type Error = WindowError;

    fn try_from(raw: RawWindow) -> Result<Self, Self::Error> {
        Self::new(raw.day, raw.start_slot, raw.end_slot)
    }
}

impl From<TimeWindow> for RawWindow {
    fn from(w: TimeWindow) -> Self {
        Self {
            day: w.day,
            start_slot: w.start_slot,
            end_slot: w.end_slot,
        }
    }
}

impl TimeWindow {
    /// Creates a window, checking `day < 7` and `start < end <= 24`.
    pub fn new(day: u8, start_slot: u8, end_slot: u8) -> Result<Self, WindowError> {
        if day >= DAYS_PER_WEEK {
            return Err(WindowError::InvalidDay(day));
        }
        if start_slot >= end_slot || end_slot > SLOTS_PER_DAY {
            return Err(WindowError::InvalidRange {
                start: start_slot,
                end: end_slot,
                max: SLOTS_PER_DAY,
            });
        }
        Ok(Self {
            day,
            start_slot,
            end_slot,
        })
    }

    /// A window covering a whole day.
    pub fn whole_day(day: u8) -> Result<Self, WindowError> {
        Self::new(day, 0, SLOTS_PER_DAY)
    }

    /// Day index.
    #[inline]
    pub fn day(&self) -> u8 {
        self.day
    }

    /// First covered slot (inclusive).
    #[inline]
    pub fn start_slot(&self) -> u8 {
        self.start_slot
    }

    /// End slot (exclusive).
    #[inline]
    pub fn end_slot(&self) -> u8 {
        self.end_slot
    }

    /// Number of slots covered.
    #[inline]
    pub fn len(&self) -> u8 {
        self.end_slot - self.start_slot
    }

    /// Always false; windows are non-empty by construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether `(day, slot)` falls inside this window.
    #[inline]
    pub fn contains(&self, day: u8, slot: u8) -> bool {
        self.day == day && slot >= self.start_slot && slot < self.end_slot
    }

    /// Whether a cell falls inside this window (either position).
    #[inline]
    pub fn covers(&self, cell: Cell) -> bool {
        self.contains(cell.day, cell.slot)
    }

    /// Whether two windows share at least one slot.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.day == other.day
            && self.start_slot < other.end_slot
            && other.start_slot < self.end_slot
    }
}

/// A grid coordinate: one position of one hourly slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    /// Day index (0-6).
    pub day: u8,
    /// Slot index within the day (0-23).
    pub slot: u8,
    /// Position within the slot (0 or 1).
    pub position: u8,
}

impl Cell {
    /// Creates a cell without range checks. See [`Cell::checked`].
    pub const fn new(day: u8, slot: u8, position: u8) -> Self {
        Self {
            day,
            slot,
            position,
        }
    }

    /// Creates a cell, rejecting out-of-range coordinates.
    pub fn checked(day: u8, slot: u8, position: u8) -> Result<Self, WindowError> {
        if day >= DAYS_PER_WEEK {
            return Err(WindowError::InvalidDay(day));
        }
        if slot >= SLOTS_PER_DAY {
            return Err(WindowError::InvalidRange {
                start: slot,
                end: slot.saturating_add(1),
                max: SLOTS_PER_DAY,
            });
        }
        if position >= POSITIONS_PER_SLOT {
            return Err(WindowError::InvalidPosition(position));
        }
        Ok(Self::new(day, slot, position))
    }

    /// Whether the coordinates lie inside the grid.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.day < DAYS_PER_WEEK && self.slot < SLOTS_PER_DAY && self.position < POSITIONS_PER_SLOT
    }

    /// The other position of the same slot.
    ///
    /// Out-of-range positions map to another out-of-range position.
    #[inline]
    pub fn partner(&self) -> Self {
        Self::new(self.day, self.slot, self.position ^ 1)
    }

    /// Hour index within the week (`day * 24 + slot`).
    #[inline]
    pub fn hour_of_week(&self) -> usize {
        self.day as usize * SLOTS_PER_DAY as usize + self.slot as usize
    }

    /// All cells in canonical `(day, slot, position)` order.
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..DAYS_PER_WEEK).flat_map(|day| {
            (0..SLOTS_PER_DAY).flat_map(move |slot| {
                (0..POSITIONS_PER_SLOT).map(move |position| Cell::new(day, slot, position))
            })
        })
    }

    /// Flat index into position-major storage: each position is its own
    /// contiguous `day × slot` grid.
    #[inline]
    pub(crate) fn index(&self) -> usize {
        let per_position = DAYS_PER_WEEK as usize * SLOTS_PER_DAY as usize;
        self.position as usize * per_position
            + self.day as usize * SLOTS_PER_DAY as usize
            + self.slot as usize
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day {} {:02}:00 #{}",
            self.day,
            self.slot,
            self.position + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_window() {
        let w = TimeWindow::new(2, 8, 12).unwrap();
        assert_eq!(w.len(), 4);
        assert!(w.contains(2, 8));
        assert!(w.contains(2, 11));
        assert!(!w.contains(2, 12)); // exclusive end
        assert!(!w.contains(3, 9));
    }

    #[test]
    fn test_time_window_rejects_bad_input() {
        assert_eq!(TimeWindow::new(7, 0, 1), Err(WindowError::InvalidDay(7)));
        assert!(TimeWindow::new(0, 5, 5).is_err());
        assert!(TimeWindow::new(0, 6, 5).is_err());
        assert!(TimeWindow::new(0, 0, 25).is_err());
        assert!(TimeWindow::whole_day(6).is_ok());
    }

    #[test]
    fn test_time_window_overlap() {
        let a = TimeWindow::new(1, 0, 10).unwrap();
        let b = TimeWindow::new(1, 5, 15).unwrap();
        let c = TimeWindow::new(1, 10, 20).unwrap(); // touching
        let d = TimeWindow::new(2, 0, 10).unwrap(); // other day
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_window_covers_both_positions() {
        let w = TimeWindow::new(0, 3, 4).unwrap();
        assert!(w.covers(Cell::new(0, 3, 0)));
        assert!(w.covers(Cell::new(0, 3, 1)));
        assert!(!w.covers(Cell::new(0, 4, 0)));
    }

    #[test]
    fn test_window_deserialize_enforces_invariant() {
        let ok: TimeWindow =
            serde_json::from_str(r#"{"day":3,"start_slot":1,"end_slot":4}"#).unwrap();
        assert_eq!(ok.day(), 3);

        let bad = serde_json::from_str::<TimeWindow>(r#"{"day":3,"start_slot":4,"end_slot":1}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_cell_partner_and_checks() {
        let c = Cell::new(4, 10, 0);
        assert_eq!(c.partner(), Cell::new(4, 10, 1));
        assert_eq!(c.partner().partner(), c);
        assert!(Cell::checked(7, 0, 0).is_err());
        assert!(Cell::checked(0, 24, 0).is_err());
        assert_eq!(Cell::checked(0, 0, 2), Err(WindowError::InvalidPosition(2)));
    }

    #[test]
    fn test_partner_of_out_of_range_position() {
        let bad = Cell::new(0, 0, 2);
        let p = bad.partner();
        assert_eq!(p.position, 3);
        assert!(!p.is_valid());
        assert_eq!(p.partner(), bad);
    }

    #[test]
    fn test_hour_of_week() {
        assert_eq!(Cell::new(0, 0, 1).hour_of_week(), 0);
        assert_eq!(Cell::new(1, 2, 0).hour_of_week(), 26);
        assert_eq!(Cell::new(6, 23, 0).hour_of_week(), 167);
    }

    #[test]
    fn test_cell_indices_are_dense() {
        let mut seen: Vec<usize> = Cell::all().map(|c| c.index()).collect();
        assert_eq!(seen.len(), 336);
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 336);
        assert_eq!(*seen.last().unwrap(), 335);
    }
}
