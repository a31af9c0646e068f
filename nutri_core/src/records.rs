//! Typed records over the key-value store.
//!
//! Every stored value is a string. Loading parses defensively: a missing key
//! or a value that fails to parse yields the record's default (or `None`),
//! with a warning for the malformed case. Storage errors still propagate.

use crate::store::KeyValueStore;
use crate::{BmiCategory, BmiSnapshot, MealLedger, Result, WaterLedger};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Storage keys
pub mod keys {
    pub const USER_BMI: &str = "user_bmi";
    pub const USER_CATEGORY: &str = "user_category";
    pub const USER_WEIGHT: &str = "user_weight";
    pub const WATER_INTAKE: &str = "water_intake";
    pub const WATER_GOAL: &str = "water_goal";
    pub const CALORIES_CONSUMED: &str = "calories_consumed";
    pub const MEALS_DATA: &str = "meals_data";
    pub const USER_PROFILE: &str = "user_profile";
    pub const USER_FAVORITES: &str = "user_favorites";
}

/// Read a scalar field, treating missing or malformed values as unset
fn read_field<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            tracing::warn!("Ignoring malformed value for {}: {:?}", key, raw);
            Ok(None)
        }
    }
}

/// Read a JSON field, treating missing or malformed values as unset
fn read_json<T, S>(store: &S, key: &str) -> Result<Option<T>>
where
    T: serde::de::DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<T>(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!("Ignoring malformed JSON for {}: {}", key, e);
            Ok(None)
        }
    }
}

// ============================================================================
// BMI snapshot
// ============================================================================

/// Latest BMI submission. `None` until all three keys hold valid values.
pub fn load_bmi_snapshot<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<BmiSnapshot>> {
    let bmi = read_field::<f64, _>(store, keys::USER_BMI)?;
    let category = read_field::<BmiCategory, _>(store, keys::USER_CATEGORY)?;
    let weight_kg = read_field::<f64, _>(store, keys::USER_WEIGHT)?
        .filter(|w| w.is_finite() && *w > 0.0);

    Ok(match (bmi, category, weight_kg) {
        (Some(bmi), Some(category), Some(weight_kg)) => Some(BmiSnapshot {
            bmi,
            category,
            weight_kg,
        }),
        _ => None,
    })
}

pub fn save_bmi_snapshot<S: KeyValueStore + ?Sized>(
    store: &mut S,
    snapshot: &BmiSnapshot,
) -> Result<()> {
    store.set_many(&[
        (keys::USER_BMI, format!("{:.1}", snapshot.bmi)),
        (keys::USER_CATEGORY, snapshot.category.as_str().to_string()),
        (keys::USER_WEIGHT, snapshot.weight_kg.to_string()),
    ])
}

// ============================================================================
// Water
// ============================================================================

/// Load the water counter. Missing intake is 0; a missing or non-positive
/// goal falls back to `default_goal`.
pub fn load_water<S: KeyValueStore + ?Sized>(store: &S, default_goal: u32) -> Result<WaterLedger> {
    let glasses = read_field::<u32, _>(store, keys::WATER_INTAKE)?.unwrap_or(0);
    let goal_glasses = match read_field::<u32, _>(store, keys::WATER_GOAL)? {
        Some(goal) if goal > 0 => goal,
        Some(_) => {
            tracing::warn!("Stored water goal is zero, using default {}", default_goal);
            default_goal
        }
        None => default_goal,
    };
    Ok(WaterLedger {
        glasses,
        goal_glasses,
    })
}

pub fn save_water<S: KeyValueStore + ?Sized>(store: &mut S, ledger: &WaterLedger) -> Result<()> {
    store.set_many(&[
        (keys::WATER_INTAKE, ledger.glasses.to_string()),
        (keys::WATER_GOAL, ledger.goal_glasses.to_string()),
    ])
}

// ============================================================================
// Meals
// ============================================================================

pub fn load_meals<S: KeyValueStore + ?Sized>(store: &S) -> Result<MealLedger> {
    Ok(read_json::<MealLedger, _>(store, keys::MEALS_DATA)?.unwrap_or_default())
}

/// The only writer of `calories_consumed`: the ledger and its total are
/// always written together.
pub fn save_meals<S: KeyValueStore + ?Sized>(store: &mut S, ledger: &MealLedger) -> Result<()> {
    let blob = serde_json::to_string(ledger)?;
    store.set_many(&[
        (keys::MEALS_DATA, blob),
        (keys::CALORIES_CONSUMED, ledger.total_calories().to_string()),
    ])
}

/// The cached total written by [`save_meals`], 0 when unset
pub fn load_calories_consumed<S: KeyValueStore + ?Sized>(store: &S) -> Result<u64> {
    Ok(read_field::<u64, _>(store, keys::CALORIES_CONSUMED)?.unwrap_or(0))
}

// ============================================================================
// Profile and favorites
// ============================================================================

pub fn load_profile<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<crate::profile::UserProfile>> {
    read_json(store, keys::USER_PROFILE)
}

pub fn save_profile<S: KeyValueStore + ?Sized>(
    store: &mut S,
    profile: &crate::profile::UserProfile,
) -> Result<()> {
    let blob = serde_json::to_string(profile)?;
    store.set(keys::USER_PROFILE, &blob)
}

pub fn load_favorites<S: KeyValueStore + ?Sized>(store: &S) -> Result<BTreeSet<String>> {
    Ok(read_json::<BTreeSet<String>, _>(store, keys::USER_FAVORITES)?.unwrap_or_default())
}

pub fn save_favorites<S: KeyValueStore + ?Sized>(
    store: &mut S,
    favorites: &BTreeSet<String>,
) -> Result<()> {
    let blob = serde_json::to_string(favorites)?;
    store.set(keys::USER_FAVORITES, &blob)
}
