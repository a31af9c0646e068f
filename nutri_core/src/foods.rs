//! Built-in food catalog used for meal entry suggestions.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// A common food with a typical per-serving calorie count
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct FoodItem {
    pub name: String,
    pub calories: u32,
}

/// Built once and reused for every lookup
static DEFAULT_FOODS: Lazy<Vec<FoodItem>> = Lazy::new(build_default_foods);

/// Reference to the cached built-in catalog
pub fn default_foods() -> &'static [FoodItem] {
    &DEFAULT_FOODS
}

fn build_default_foods() -> Vec<FoodItem> {
    [
        ("Apple", 95),
        ("Banana", 105),
        ("Boiled Egg", 78),
        ("Omelette", 250),
        ("Grilled Chicken", 450),
        ("Rice", 200),
        ("Chapati", 120),
        ("Burger", 295),
        ("Pizza Slice", 285),
        ("Salad", 150),
    ]
    .into_iter()
    .map(|(name, calories)| FoodItem {
        name: name.into(),
        calories,
    })
    .collect()
}

/// Foods whose name contains `query`, ignoring case. Empty query → none.
pub fn suggest(query: &str) -> Vec<&'static FoodItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }
    default_foods()
        .iter()
        .filter(|f| f.name.to_lowercase().contains(&needle))
        .collect()
}

/// Exact (case-insensitive) catalog lookup
pub fn lookup(name: &str) -> Option<&'static FoodItem> {
    let name = name.trim();
    default_foods()
        .iter()
        .find(|f| f.name.eq_ignore_ascii_case(name))
}
