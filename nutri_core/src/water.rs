//! Water intake counter.
//!
//! A flat (glasses, goal) pair. Incrementing past the goal is allowed; the
//! only event of interest is the crossing from below the goal to at-or-above
//! it, which callers use to show an advisory once.

use crate::units::glasses_to_liters;
use crate::{Error, Result, WaterLedger};

pub const DEFAULT_GLASS_ML: u32 = 250;
pub const DEFAULT_GOAL_GLASSES: u32 = 8;

impl Default for WaterLedger {
    fn default() -> Self {
        Self {
            glasses: 0,
            goal_glasses: DEFAULT_GOAL_GLASSES,
        }
    }
}

impl WaterLedger {
    pub fn new(goal_glasses: u32) -> Result<Self> {
        Self::default().set_goal(goal_glasses as i64)
    }

    /// One more glass, with no ceiling
    pub fn increment(self) -> Self {
        Self {
            glasses: self.glasses.saturating_add(1),
            ..self
        }
    }

    /// One glass fewer, never below zero
    pub fn decrement(self) -> Self {
        Self {
            glasses: self.glasses.saturating_sub(1),
            ..self
        }
    }

    /// Replace the daily goal. Rejects goals of zero or less; glasses are kept.
    pub fn set_goal(self, new_goal: i64) -> Result<Self> {
        let goal_glasses = validate_goal(new_goal)?;
        Ok(Self {
            goal_glasses,
            ..self
        })
    }

    /// Back to zero glasses; the goal is kept
    pub fn reset(self) -> Self {
        Self { glasses: 0, ..self }
    }

    pub fn goal_met(&self) -> bool {
        self.glasses >= self.goal_glasses
    }

    /// Fill fraction for display, capped at 1.0
    pub fn fill_fraction(&self) -> f64 {
        if self.goal_glasses == 0 {
            return 1.0;
        }
        (self.glasses as f64 / self.goal_glasses as f64).min(1.0)
    }

    pub fn intake_ml(&self, glass_ml: u32) -> u32 {
        self.glasses.saturating_mul(glass_ml)
    }

    pub fn target_ml(&self, glass_ml: u32) -> u32 {
        self.goal_glasses.saturating_mul(glass_ml)
    }

    pub fn intake_liters(&self, glass_ml: u32) -> f64 {
        glasses_to_liters(self.glasses, glass_ml)
    }
}

/// A goal must be a whole number of glasses, at least one
pub fn validate_goal(goal: i64) -> Result<u32> {
    u32::try_from(goal)
        .ok()
        .filter(|g| *g > 0)
        .ok_or_else(|| Error::invalid(format!("water goal must be at least 1 glass, got {}", goal)))
}

/// True when `after` reached the goal that `before` had not
pub fn crossed_goal(before: &WaterLedger, after: &WaterLedger) -> bool {
    !before.goal_met() && after.goal_met()
}
