//! Weekly duty rostering for the U-Engine ecosystem.
//!
//! Assigns staffing groups to the cells of a weekly grid (7 days × 24
//! hourly slots × 2 positions), honoring hard unavailability, distributing
//! load against per-group quotas and steering away from each group's
//! primary-activity windows where possible.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `TimeWindow`, `Cell`, `Group`,
//!   `StaffingRule`, `WeeklySchedule`, `Violation`
//! - **`quota`**: Fixed and proportional (largest-remainder) quota targets
//! - **`scheduler`**: Seeded greedy `SlotAssigner`, local search over
//!   activity, pairing, run-length and rest costs, `RosterKpi`
//! - **`validation`**: Group-list checks and the `ConstraintValidator`
//! - **`editor`**: Validated manual swaps and reassignments
//! - **`config`**: Tunables, loadable from JSON
//! - **`error`**: Error and warning types
//!
//! # Flow
//!
//! ```
//! use u_roster::editor::ManualEditor;
//! use u_roster::models::{Cell, Group, TimeWindow};
//! use u_roster::quota::compute_quotas;
//! use u_roster::scheduler::generate_schedule;
//! use u_roster::validation::{has_hard_violations, validate};
//!
//! let groups = vec![
//!     Group::new("A").with_weekly_quota(100),
//!     Group::new("B")
//!         .with_staffing_size(1)
//!         .with_unavailability(TimeWindow::whole_day(0).unwrap()),
//! ];
//! let plan = compute_quotas(&groups);
//! let mut result = generate_schedule(&groups, &plan, 7);
//! assert!(!has_hard_violations(&validate(&result.schedule, &groups)));
//!
//! // Moving B onto day 0 is refused and leaves the grid unchanged.
//! let b_cell = result.schedule.cells_of("B")[0];
//! let before = result.schedule.clone();
//! let editor = ManualEditor::new(&groups);
//! assert!(editor.swap(&mut result.schedule, b_cell, Cell::new(0, 0, 0)).is_err());
//! assert_eq!(result.schedule, before);
//! ```
//!
//! # Architecture
//!
//! This crate sits at Layer 3 (Frameworks) in the U-Engine ecosystem. It
//! holds only rostering logic; rendering, persistence and export live in
//! the applications that consume it. Diagnostics go through the `log`
//! facade; the crate never installs a logger.

pub mod config;
pub mod editor;
pub mod error;
pub mod models;
pub mod quota;
pub mod scheduler;
pub mod validation;
