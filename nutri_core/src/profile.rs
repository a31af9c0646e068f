//! User profile: display fields, fitness goals and body metrics.

use crate::units::format_feet_inches;
use crate::{BodyMetrics, Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Goals selectable on the profile form
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FitnessGoal {
    GainWeight,
    LoseWeight,
    GainMuscle,
    Maintain,
}

impl FitnessGoal {
    pub fn as_str(&self) -> &'static str {
        match self {
            FitnessGoal::GainWeight => "Gain Weight",
            FitnessGoal::LoseWeight => "Lose Weight",
            FitnessGoal::GainMuscle => "Gain Muscle",
            FitnessGoal::Maintain => "Maintain",
        }
    }

    /// The goal that cannot be held at the same time as this one
    fn conflicts_with(&self) -> Option<FitnessGoal> {
        match self {
            FitnessGoal::GainWeight => Some(FitnessGoal::LoseWeight),
            FitnessGoal::LoseWeight => Some(FitnessGoal::GainWeight),
            _ => None,
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FitnessGoal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "gainweight" => Ok(FitnessGoal::GainWeight),
            "loseweight" => Ok(FitnessGoal::LoseWeight),
            "gainmuscle" => Ok(FitnessGoal::GainMuscle),
            "maintain" => Ok(FitnessGoal::Maintain),
            _ => Err(Error::invalid(format!("unknown goal: {}", s))),
        }
    }
}

/// Persisted user profile
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Default)]
pub struct UserProfile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub goals: Vec<FitnessGoal>,
    #[serde(default)]
    pub metrics: Option<BodyMetrics>,
}

impl UserProfile {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => String::new(),
        }
    }

    /// Set first and last name from a single "full name" field
    pub fn set_full_name(&mut self, full_name: &str) {
        let (first, last) = split_full_name(full_name);
        self.first_name = first;
        self.last_name = last;
    }

    /// Add the goal, or remove it if already selected. Selecting
    /// GainWeight drops LoseWeight and vice versa.
    pub fn toggle_goal(&mut self, goal: FitnessGoal) {
        if let Some(pos) = self.goals.iter().position(|g| *g == goal) {
            self.goals.remove(pos);
            return;
        }
        if let Some(conflict) = goal.conflicts_with() {
            self.goals.retain(|g| *g != conflict);
        }
        self.goals.push(goal);
    }

    /// Height as feet and inches, if metrics are known
    pub fn height_display(&self) -> Option<String> {
        self.metrics.as_ref().map(|m| format_feet_inches(m.height_cm))
    }

    /// Letter shown in the avatar bubble
    pub fn initial(&self) -> char {
        self.username
            .chars()
            .chain(self.first_name.chars())
            .find(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('U')
    }
}

/// First whitespace-separated token is the first name; the rest, joined by
/// single spaces, is the last name.
pub fn split_full_name(full_name: &str) -> (String, String) {
    let mut parts = full_name.split_whitespace();
    let first = parts.next().unwrap_or_default().to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    (first, last)
}
