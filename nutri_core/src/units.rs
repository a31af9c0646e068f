//! Height and volume unit conversions.

use serde::{Deserialize, Serialize};

pub const CM_PER_INCH: f64 = 2.54;
pub const INCHES_PER_FOOT: u32 = 12;

/// A length stored canonically in centimeters
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
pub struct HeightValue {
    pub cm: f64,
}

impl HeightValue {
    pub fn from_cm(cm: f64) -> Self {
        Self { cm }
    }

    pub fn from_feet_inches(feet: u32, inches: u32) -> Self {
        Self {
            cm: feet_inches_to_cm(feet, inches),
        }
    }

    /// Nearest whole (feet, inches). Lossy: converting back may not give
    /// the original centimeter value.
    pub fn to_feet_inches(&self) -> (u32, u32) {
        cm_to_feet_inches(self.cm)
    }
}

/// Convert centimeters to whole feet and inches.
///
/// Inches are rounded to the nearest integer; a value that rounds up to 12
/// carries into the feet so the result always has `inches < 12`.
pub fn cm_to_feet_inches(cm: f64) -> (u32, u32) {
    if !cm.is_finite() || cm <= 0.0 {
        return (0, 0);
    }
    let total_inches = cm / CM_PER_INCH;
    let mut feet = (total_inches / INCHES_PER_FOOT as f64).floor() as u32;
    let mut inches = (total_inches % INCHES_PER_FOOT as f64).round() as u32;
    if inches == INCHES_PER_FOOT {
        feet += 1;
        inches = 0;
    }
    (feet, inches)
}

/// Convert feet and inches to centimeters
pub fn feet_inches_to_cm(feet: u32, inches: u32) -> f64 {
    (feet as f64 * INCHES_PER_FOOT as f64 + inches as f64) * CM_PER_INCH
}

/// Volume of `glasses` glasses in liters
pub fn glasses_to_liters(glasses: u32, ml_per_glass: u32) -> f64 {
    glasses as f64 * ml_per_glass as f64 / 1000.0
}

/// Liters rendered to one decimal place, e.g. "1.8 L"
pub fn format_liters(liters: f64) -> String {
    format!("{:.1} L", liters)
}

/// Height rendered as feet and inches, e.g. `5'10"`
pub fn format_feet_inches(cm: f64) -> String {
    let (feet, inches) = cm_to_feet_inches(cm);
    format!("{}'{}\"", feet, inches)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_to_feet_inches_exact() {
        assert_eq!(cm_to_feet_inches(177.8), (5, 10));
        assert_eq!(cm_to_feet_inches(152.4), (5, 0));
    }

    #[test]
    fn test_feet_inches_roundtrip() {
        let cm = feet_inches_to_cm(5, 10);
        assert!((cm - 177.8).abs() < 1e-9);
        assert_eq!(cm_to_feet_inches(cm), (5, 10));
    }

    #[test]
    fn test_rounding_to_twelve_carries_into_feet() {
        // 182.8 cm = 71.97 in -> 5 ft 11.97 in, which rounds to 6'0"
        assert_eq!(cm_to_feet_inches(182.8), (6, 0));
    }

    #[test]
    fn test_conversion_is_lossy() {
        let (feet, inches) = cm_to_feet_inches(170.0);
        assert_eq!((feet, inches), (5, 7));
        let back = feet_inches_to_cm(feet, inches);
        assert!((back - 170.0).abs() > 0.1);
    }

    #[test]
    fn test_glasses_to_liters() {
        assert!((glasses_to_liters(8, 250) - 2.0).abs() < 1e-9);
        assert_eq!(format_liters(glasses_to_liters(7, 250)), "1.8 L");
        assert_eq!(format_liters(glasses_to_liters(0, 250)), "0.0 L");
    }

    #[test]
    fn test_height_value() {
        let h = HeightValue::from_feet_inches(6, 1);
        assert_eq!(h.to_feet_inches(), (6, 1));
        assert_eq!(format_feet_inches(h.cm), "6'1\"");
    }
}
