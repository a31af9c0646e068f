//! Body Mass Index computation and classification.
//!
//! BMI = weight (kg) / height (m)². Bands are half-open on the lower bound:
//! - < 18.5 → Underweight
//! - 18.5 ..< 25 → Normal
//! - 25 ..< 30 → Overweight
//! - ≥ 30 → Obese

use crate::types::ensure_positive;
use crate::{BmiCategory, BmiResult, Result};

pub const UNDERWEIGHT_BELOW: f64 = 18.5;
pub const OVERWEIGHT_FROM: f64 = 25.0;
pub const OBESE_FROM: f64 = 30.0;

/// Compute BMI from weight in kilograms and height in centimeters.
///
/// Rejects non-positive or non-finite inputs with `Error::InvalidInput`.
/// The category is taken from the unrounded value; `value` is rounded to
/// one decimal for display.
pub fn compute_bmi(weight_kg: f64, height_cm: f64) -> Result<BmiResult> {
    ensure_positive("weight", weight_kg)?;
    ensure_positive("height", height_cm)?;

    let height_m = height_cm / 100.0;
    let raw = weight_kg / (height_m * height_m);

    Ok(BmiResult {
        value: round_one_decimal(raw),
        category: classify(raw),
    })
}

/// Map a BMI value to its band
pub fn classify(bmi: f64) -> BmiCategory {
    if bmi < UNDERWEIGHT_BELOW {
        BmiCategory::Underweight
    } else if bmi < OVERWEIGHT_FROM {
        BmiCategory::Normal
    } else if bmi < OBESE_FROM {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

pub(crate) fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
