//! Schedule generation and quality metrics.
//!
//! # Algorithm
//!
//! `SlotAssigner` runs a seeded, randomized greedy pass: cells are visited
//! in a shuffled order and each goes to the eligible group furthest below
//! its quota. An optional swap-based local search then reduces
//! activity-window overlaps without changing any group's count. It is a
//! heuristic and makes no optimality claim.
//!
//! # KPI
//!
//! `RosterKpi` computes coverage, soft-constraint overlaps, paired slots
//! and quota deviation.
//!
//! # References
//!
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review of
//!   applications, methods and models"
//! - Burke et al. (2004), "The State of the Art of Nurse Rostering"

mod assigner;
mod improve;
mod kpi;

pub use assigner::{generate_schedule, GenerationResult, SlotAssigner};
pub use kpi::RosterKpi;
