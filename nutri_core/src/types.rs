//! Core domain types for Nutrilog.
//!
//! This module defines the fundamental types used throughout the system:
//! - Body metrics and BMI classification
//! - Daily energy budgets
//! - Meal and water ledgers
//! - User profile data

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Body Metrics
// ============================================================================

/// Gender as captured on the profile form
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            other => Err(Error::invalid(format!("unknown gender: {}", other))),
        }
    }
}

/// Body measurements entered on the profile or BMI form
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BodyMetrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub gender: Gender,
}

impl BodyMetrics {
    pub fn new(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> Result<Self> {
        ensure_positive("weight", weight_kg)?;
        ensure_positive("height", height_cm)?;
        if age == 0 {
            return Err(Error::invalid("age must be greater than 0"));
        }
        Ok(Self {
            weight_kg,
            height_cm,
            age,
            gender,
        })
    }
}

pub(crate) fn ensure_positive(what: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::invalid(format!(
            "{} must be a positive number, got {}",
            what, value
        )));
    }
    Ok(())
}

// ============================================================================
// BMI
// ============================================================================

/// BMI classification bands (kg/m²)
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BmiCategory {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiCategory {
    pub const ALL: [BmiCategory; 4] = [
        BmiCategory::Underweight,
        BmiCategory::Normal,
        BmiCategory::Overweight,
        BmiCategory::Obese,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Normal => "Normal",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }

    /// Fill fraction of the BMI gauge for this band
    pub fn gauge_fraction(&self) -> f64 {
        match self {
            BmiCategory::Underweight => 0.2,
            BmiCategory::Normal => 0.5,
            BmiCategory::Overweight => 0.75,
            BmiCategory::Obese => 1.0,
        }
    }
}

impl fmt::Display for BmiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BmiCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        BmiCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::invalid(format!("unknown BMI category: {}", s)))
    }
}

/// Result of a BMI computation. `value` is rounded to one decimal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiResult {
    pub value: f64,
    pub category: BmiCategory,
}

// ============================================================================
// Energy Budget
// ============================================================================

/// Daily calorie budget derived from weight and BMI category
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnergyBudget {
    pub maintenance_kcal: i64,
    pub target_kcal: i64,
    /// Short plan name ("Weight Gain", "Maintain", "Weight Loss")
    pub label: String,
    /// One-sentence advisory shown next to the target
    pub advice: String,
}

// ============================================================================
// Meals
// ============================================================================

/// One of the four fixed meal buckets of a day
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl MealSlot {
    pub const ALL: [MealSlot; 4] = [
        MealSlot::Breakfast,
        MealSlot::Lunch,
        MealSlot::Dinner,
        MealSlot::Snacks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "Breakfast",
            MealSlot::Lunch => "Lunch",
            MealSlot::Dinner => "Dinner",
            MealSlot::Snacks => "Snacks",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MealSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" => Ok(MealSlot::Breakfast),
            "lunch" => Ok(MealSlot::Lunch),
            "dinner" => Ok(MealSlot::Dinner),
            "snack" | "snacks" => Ok(MealSlot::Snacks),
            other => Err(Error::invalid(format!("unknown meal slot: {}", other))),
        }
    }
}

/// A single logged food item
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MealEntry {
    pub name: String,
    pub calories: u32,
}

impl MealEntry {
    /// Build an entry from form input. The name must be non-blank and
    /// calories must be zero or more.
    pub fn new(name: impl Into<String>, calories: i64) -> Result<Self> {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid("meal name must not be empty"));
        }
        let calories = u32::try_from(calories)
            .map_err(|_| Error::invalid(format!("calories out of range: {}", calories)))?;
        Ok(Self {
            name: name.to_string(),
            calories,
        })
    }
}

/// Append-only meals of the day, grouped by slot.
///
/// Serialized as `{"Breakfast": [...], "Lunch": [...], ...}`; missing slots
/// deserialize as empty.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct MealLedger {
    #[serde(rename = "Breakfast", default)]
    pub(crate) breakfast: Vec<MealEntry>,
    #[serde(rename = "Lunch", default)]
    pub(crate) lunch: Vec<MealEntry>,
    #[serde(rename = "Dinner", default)]
    pub(crate) dinner: Vec<MealEntry>,
    #[serde(rename = "Snacks", default)]
    pub(crate) snacks: Vec<MealEntry>,
}

// ============================================================================
// Water
// ============================================================================

/// Glasses of water consumed today against a daily goal
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct WaterLedger {
    pub glasses: u32,
    pub goal_glasses: u32,
}

// ============================================================================
// Snapshot
// ============================================================================

/// Last BMI submission as persisted: the rounded value, its band, and the
/// weight it was computed from.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct BmiSnapshot {
    pub bmi: f64,
    pub category: BmiCategory,
    pub weight_kg: f64,
}
