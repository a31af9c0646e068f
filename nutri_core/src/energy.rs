//! Daily energy budget estimation.
//!
//! Maintenance is a fixed-multiplier proxy: `weight × 24 × 1.2`. The daily
//! target adds a per-category adjustment:
//!
//! | category    | adjustment |
//! |-------------|-----------:|
//! | Underweight |       +500 |
//! | Normal      |         +0 |
//! | Overweight  |       −500 |
//! | Obese       |       −750 |
//!
//! The target is not clamped here. Very low weights can produce a target at
//! or below zero; callers that want a floor apply [`EnergyBudget::with_floor`].

use crate::{BmiCategory, EnergyBudget};

/// kcal per kg of body weight per day before the activity factor
pub const KCAL_PER_KG_DAY: f64 = 24.0;
/// Fixed light-activity multiplier
pub const ACTIVITY_FACTOR: f64 = 1.2;
/// Daily goal used when no BMI has been recorded yet
pub const FALLBACK_DAILY_GOAL_KCAL: i64 = 2000;
pub const FALLBACK_LABEL: &str = "Maintain Weight";

/// Adjustment and wording for one BMI category
struct Adjustment {
    kcal: i64,
    label: &'static str,
    advice: &'static str,
}

fn adjustment_for(category: BmiCategory) -> Adjustment {
    match category {
        BmiCategory::Underweight => Adjustment {
            kcal: 500,
            label: "Weight Gain",
            advice: "You are underweight. Focus on nutrient-rich foods to gain weight safely.",
        },
        BmiCategory::Normal => Adjustment {
            kcal: 0,
            label: "Maintain",
            advice: "You have a healthy weight. Maintain it with a balanced diet.",
        },
        BmiCategory::Overweight => Adjustment {
            kcal: -500,
            label: "Weight Loss",
            advice: "You are overweight. Try a slight caloric deficit to lose weight.",
        },
        BmiCategory::Obese => Adjustment {
            kcal: -750,
            label: "Weight Loss",
            advice: "Consult a specialist. A safe caloric deficit is recommended.",
        },
    }
}

/// Maintenance calories for a body weight, rounded to the nearest kcal
pub fn maintenance_kcal(weight_kg: f64) -> i64 {
    (weight_kg * KCAL_PER_KG_DAY * ACTIVITY_FACTOR).round() as i64
}

/// Compute the daily budget for a weight and BMI category
pub fn compute_energy_budget(weight_kg: f64, category: BmiCategory) -> EnergyBudget {
    let maintenance = maintenance_kcal(weight_kg);
    let adjustment = adjustment_for(category);

    EnergyBudget {
        maintenance_kcal: maintenance,
        target_kcal: maintenance + adjustment.kcal,
        label: adjustment.label.to_string(),
        advice: adjustment.advice.to_string(),
    }
}

impl EnergyBudget {
    /// Raise the target to `floor_kcal` if it falls below it
    pub fn with_floor(mut self, floor_kcal: i64) -> Self {
        if self.target_kcal < floor_kcal {
            tracing::debug!(
                "Raising calorie target from {} to floor {}",
                self.target_kcal,
                floor_kcal
            );
            self.target_kcal = floor_kcal;
        }
        self
    }

    /// Fraction of today's target already consumed, capped at 1.0
    pub fn progress(&self, consumed_kcal: u64) -> f64 {
        calorie_progress(consumed_kcal, self.target_kcal)
    }
}

/// Consumed / target, capped at 1.0. A non-positive target counts as met.
pub fn calorie_progress(consumed_kcal: u64, target_kcal: i64) -> f64 {
    if target_kcal <= 0 {
        return 1.0;
    }
    (consumed_kcal as f64 / target_kcal as f64).min(1.0)
}

/// Whole-number percentage of the target consumed (uncapped)
pub fn calorie_percent(consumed_kcal: u64, target_kcal: i64) -> i64 {
    if target_kcal <= 0 {
        return 100;
    }
    (consumed_kcal as f64 / target_kcal as f64 * 100.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obese_reference() {
        let budget = compute_energy_budget(80.0, BmiCategory::Obese);
        assert_eq!(budget.maintenance_kcal, 2304);
        assert_eq!(budget.target_kcal, 1554);
        assert!(budget.advice.contains("specialist"));
    }

    #[test]
    fn test_adjustment_table() {
        let expected = [
            (BmiCategory::Underweight, 500, "Weight Gain"),
            (BmiCategory::Normal, 0, "Maintain"),
            (BmiCategory::Overweight, -500, "Weight Loss"),
            (BmiCategory::Obese, -750, "Weight Loss"),
        ];
        for (category, delta, label) in expected {
            let budget = compute_energy_budget(70.0, category);
            assert_eq!(budget.maintenance_kcal, 2016);
            assert_eq!(budget.target_kcal - budget.maintenance_kcal, delta);
            assert_eq!(budget.label, label);
        }
    }

    #[test]
    fn test_target_is_not_clamped() {
        // 20 kg → 576 maintenance, 576 - 750 < 0
        let budget = compute_energy_budget(20.0, BmiCategory::Obese);
        assert_eq!(budget.target_kcal, 576 - 750);
        assert!(budget.target_kcal < 0);
    }

    #[test]
    fn test_with_floor() {
        let budget = compute_energy_budget(20.0, BmiCategory::Obese).with_floor(1200);
        assert_eq!(budget.target_kcal, 1200);

        let untouched = compute_energy_budget(80.0, BmiCategory::Normal).with_floor(1200);
        assert_eq!(untouched.target_kcal, 2304);
    }

    #[test]
    fn test_progress_caps_at_one() {
        assert_eq!(calorie_progress(1000, 2000), 0.5);
        assert_eq!(calorie_progress(3000, 2000), 1.0);
        assert_eq!(calorie_progress(10, 0), 1.0);
        assert_eq!(calorie_percent(3000, 2000), 150);
    }
}
