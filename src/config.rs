//! Roster tuning parameters.
//!
//! The crate never reads files. Callers load a JSON document however they
//! like and hand the text to [`RosterConfig::from_json`]; missing keys fall
//! back to the defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for generation and validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    /// Allowed |assigned - target| before a quota deviation is reported.
    pub quota_tolerance: usize,
    /// Local-search rounds after the greedy fill (0 = greedy only).
    pub improvement_iterations: usize,
    /// Local-search cost of a cell inside its group's activity window.
    pub activity_window_penalty: i64,
    /// Local-search reward when one group holds both positions of a slot.
    pub paired_bonus: i64,
    /// Reward per hour of a duty run within the group's consecutive limit.
    pub consecutive_bonus_per_hour: i64,
    /// Power applied to the hours a run goes over the limit.
    pub consecutive_penalty_exponent: u32,
    /// Multiplier on the powered excess.
    pub consecutive_penalty_multiplier: i64,
    /// Cost per missing hour when rest between runs is under 6 hours.
    pub rest_penalty: i64,
    /// Flat cost when rest between runs is under 16 hours.
    pub short_rest_penalty: i64,
    /// Reward when rest between runs is a full day or more.
    pub long_rest_bonus: i64,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            quota_tolerance: 1,
            improvement_iterations: 0,
            activity_window_penalty: 1000,
            paired_bonus: 200,
            consecutive_bonus_per_hour: 20,
            consecutive_penalty_exponent: 2,
            consecutive_penalty_multiplier: 500,
            rest_penalty: 1000,
            short_rest_penalty: 200,
            long_rest_bonus: 50,
        }
    }
}

impl RosterConfig {
    /// Parses a (possibly partial) JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
