//! Tracker: the composition root tying calculators, ledgers and storage.
//!
//! Every mutation is a single read-modify-write against the store:
//! 1. Load the current record (missing/malformed values default)
//! 2. Apply the pure ledger operation
//! 3. Persist, then append an activity event
//!
//! Storage failures never abort an operation. They are logged and reported
//! through [`Recorded::persisted`], while the computed value is still
//! returned so the caller can display it.

use crate::cache::QueryCache;
use crate::energy::{calorie_progress, compute_energy_budget, FALLBACK_LABEL};
use crate::journal::{ActivityEvent, ActivityKind, ActivitySink};
use crate::profile::UserProfile;
use crate::records;
use crate::store::{KeyValueStore, MemoryStore};
use crate::water::{crossed_goal, validate_goal};
use crate::{
    bmi, BmiCategory, BmiResult, BmiSnapshot, Config, EnergyBudget, Error, MealEntry, MealLedger,
    MealSlot, Result, WaterLedger,
};
use std::collections::BTreeSet;

/// Result of a mutation plus whether it reached storage
#[derive(Clone, Debug, PartialEq)]
pub struct Recorded<T> {
    pub value: T,
    pub persisted: bool,
}

/// Water counter after an increment
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaterUpdate {
    pub ledger: WaterLedger,
    /// True only on the increment that first reaches the goal
    pub goal_reached: bool,
}

/// Today's calorie target and where it came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalorieGoal {
    pub target_kcal: i64,
    pub label: String,
    /// Present when derived from a recorded BMI; `None` means fallback
    pub budget: Option<EnergyBudget>,
}

/// Dashboard view of the current day
#[derive(Clone, Debug, PartialEq)]
pub struct DailySummary {
    pub bmi: Option<BmiSnapshot>,
    pub calories_consumed: u64,
    pub calorie_goal: CalorieGoal,
    pub calorie_progress: f64,
    pub water: WaterLedger,
    pub water_ml: u32,
    pub water_target_ml: u32,
    pub water_progress: f64,
}

/// The subset of [`Config`] the tracker needs
#[derive(Clone, Debug)]
pub struct TrackerSettings {
    pub glass_ml: u32,
    pub default_goal_glasses: u32,
    pub fallback_goal_kcal: i64,
    pub min_target_kcal: Option<i64>,
    pub recipe_cache_capacity: usize,
}

impl From<&Config> for TrackerSettings {
    fn from(config: &Config) -> Self {
        Self {
            glass_ml: config.water.glass_ml,
            default_goal_glasses: config.water.default_goal_glasses,
            fallback_goal_kcal: config.energy.fallback_goal_kcal,
            min_target_kcal: config.energy.min_target_kcal,
            recipe_cache_capacity: config.recipes.cache_capacity,
        }
    }
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Single-user tracker over a key-value store.
///
/// Takes `&mut self` for every mutation, so one tracker is one writer.
/// Every read-modify-write runs inside [`KeyValueStore::transact`], so
/// cross-process exclusion is the store's job (see [`crate::store::FileStore`]).
pub struct Tracker<S: KeyValueStore> {
    store: S,
    settings: TrackerSettings,
    journal: Option<Box<dyn ActivitySink>>,
}

impl<S: KeyValueStore> Tracker<S> {
    pub fn new(store: S, settings: TrackerSettings) -> Self {
        Self {
            store,
            settings,
            journal: None,
        }
    }

    /// Append an activity event for each persisted mutation
    pub fn with_journal(mut self, journal: impl ActivitySink + 'static) -> Self {
        self.journal = Some(Box::new(journal));
        self
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ------------------------------------------------------------------
    // Plumbing
    // ------------------------------------------------------------------

    fn read_or<T>(what: &str, result: Result<T>, default: impl FnOnce() -> T) -> T {
        result.unwrap_or_else(|e| {
            tracing::warn!("Failed to load {}: {}. Using defaults.", what, e);
            default()
        })
    }

    fn persist(&mut self, what: &str, write: impl FnOnce(&mut S) -> Result<()>) -> bool {
        match write(&mut self.store) {
            Ok(()) => {
                tracing::debug!("Persisted {}", what);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to persist {}: {}", what, e);
                false
            }
        }
    }

    /// Run `op` as one transaction on the store.
    ///
    /// `value` is `None` when the current state could not be read, in which
    /// case nothing was written. `persisted` is true only if the commit
    /// succeeded.
    fn modify<T>(
        &mut self,
        what: &str,
        op: impl FnOnce(&mut MemoryStore) -> Result<T>,
    ) -> Recorded<Option<T>> {
        let mut op = Some(op);
        let mut value = None;
        let result = self.store.transact(&mut |view| {
            let op = op
                .take()
                .ok_or_else(|| Error::Persistence("transaction body ran twice".into()))?;
            value = Some(op(view)?);
            Ok(())
        });

        let persisted = match result {
            Ok(()) => {
                tracing::debug!("Persisted {}", what);
                true
            }
            Err(e) if value.is_none() => {
                tracing::warn!("Failed to load {}: {}. Change not saved.", what, e);
                false
            }
            Err(e) => {
                tracing::warn!("Failed to persist {}: {}", what, e);
                false
            }
        };
        Recorded { value, persisted }
    }

    fn record_event(&mut self, kind: ActivityKind) {
        if let Some(journal) = self.journal.as_mut() {
            if let Err(e) = journal.append(&ActivityEvent::new(kind)) {
                tracing::warn!("Failed to append activity event: {}", e);
            }
        }
    }

    // ------------------------------------------------------------------
    // BMI and energy
    // ------------------------------------------------------------------

    /// Compute BMI from form input and store it as the latest snapshot
    pub fn record_bmi(&mut self, weight_kg: f64, height_cm: f64) -> Result<Recorded<BmiResult>> {
        let result = bmi::compute_bmi(weight_kg, height_cm)?;
        let snapshot = BmiSnapshot {
            bmi: result.value,
            category: result.category,
            weight_kg,
        };

        let persisted = self.persist("BMI snapshot", |s| records::save_bmi_snapshot(s, &snapshot));
        if persisted {
            tracing::info!("Recorded BMI {:.1} ({})", result.value, result.category);
            self.record_event(ActivityKind::BmiRecorded {
                bmi: snapshot.bmi,
                category: snapshot.category,
                weight_kg,
            });
        }

        Ok(Recorded {
            value: result,
            persisted,
        })
    }

    /// Latest stored BMI; `None` until one has been recorded
    pub fn latest_bmi(&self) -> Option<BmiSnapshot> {
        Self::read_or("BMI snapshot", records::load_bmi_snapshot(&self.store), || None)
    }

    /// Budget from the latest BMI, with the configured floor applied
    pub fn energy_budget(&self) -> Option<EnergyBudget> {
        let snapshot = self.latest_bmi()?;
        Some(self.budget_for(snapshot.weight_kg, snapshot.category))
    }

    /// Budget for a weight and category with the configured floor applied
    pub fn budget_for(&self, weight_kg: f64, category: BmiCategory) -> EnergyBudget {
        let budget = compute_energy_budget(weight_kg, category);
        match self.settings.min_target_kcal {
            Some(floor) => budget.with_floor(floor),
            None => budget,
        }
    }

    pub fn calorie_goal(&self) -> CalorieGoal {
        match self.energy_budget() {
            Some(budget) => CalorieGoal {
                target_kcal: budget.target_kcal,
                label: budget.label.clone(),
                budget: Some(budget),
            },
            None => CalorieGoal {
                target_kcal: self.settings.fallback_goal_kcal,
                label: FALLBACK_LABEL.to_string(),
                budget: None,
            },
        }
    }

    // ------------------------------------------------------------------
    // Meals
    // ------------------------------------------------------------------

    pub fn meals(&self) -> MealLedger {
        Self::read_or("meal ledger", records::load_meals(&self.store), MealLedger::default)
    }

    /// Total computed from the ledger itself
    pub fn calories_consumed(&self) -> u64 {
        self.meals().total_calories()
    }

    /// Append an entry and persist the ledger together with its total.
    ///
    /// If the current ledger cannot be read nothing is written, so a failed
    /// read never overwrites stored meals.
    pub fn log_meal(&mut self, slot: MealSlot, entry: MealEntry) -> Recorded<MealLedger> {
        let attempt = self.modify("meal ledger", |view| {
            let ledger = records::load_meals(view)?.add_entry(slot, entry.clone());
            records::save_meals(view, &ledger)?;
            Ok(ledger)
        });

        let persisted = attempt.persisted;
        let ledger = attempt
            .value
            .unwrap_or_else(|| MealLedger::new().add_entry(slot, entry.clone()));
        if persisted {
            tracing::info!(
                "Logged {} ({} kcal) for {}; total {} kcal",
                entry.name,
                entry.calories,
                slot,
                ledger.total_calories()
            );
            self.record_event(ActivityKind::MealLogged {
                slot,
                name: entry.name,
                calories: entry.calories,
            });
        }

        Recorded {
            value: ledger,
            persisted,
        }
    }

    // ------------------------------------------------------------------
    // Water
    // ------------------------------------------------------------------

    pub fn water(&self) -> WaterLedger {
        let default_goal = self.settings.default_goal_glasses;
        Self::read_or(
            "water ledger",
            records::load_water(&self.store, default_goal),
            || WaterLedger {
                glasses: 0,
                goal_glasses: default_goal,
            },
        )
    }

    fn update_water(
        &mut self,
        op: impl FnOnce(WaterLedger) -> WaterLedger,
    ) -> (WaterLedger, Recorded<WaterLedger>) {
        let default_goal = self.settings.default_goal_glasses;
        let mut op = Some(op);
        let mut apply = |before: WaterLedger| match op.take() {
            Some(op) => op(before),
            None => before,
        };

        let attempt = self.modify("water ledger", |view| {
            let before = records::load_water(view, default_goal)?;
            let after = apply(before);
            records::save_water(view, &after)?;
            Ok((before, after))
        });

        let persisted = attempt.persisted;
        let (before, after) = attempt.value.unwrap_or_else(|| {
            let before = WaterLedger {
                glasses: 0,
                goal_glasses: default_goal,
            };
            (before, apply(before))
        });

        if persisted && after != before {
            self.record_event(ActivityKind::WaterChanged {
                glasses: after.glasses,
                goal_glasses: after.goal_glasses,
            });
        }

        (
            before,
            Recorded {
                value: after,
                persisted,
            },
        )
    }

    /// Add a glass. `goal_reached` is set only when this glass crosses the goal.
    pub fn add_glass(&mut self) -> Recorded<WaterUpdate> {
        let (before, recorded) = self.update_water(WaterLedger::increment);
        let goal_reached = crossed_goal(&before, &recorded.value);
        if goal_reached {
            tracing::info!("Daily water goal of {} glasses reached", recorded.value.goal_glasses);
        }
        Recorded {
            value: WaterUpdate {
                ledger: recorded.value,
                goal_reached,
            },
            persisted: recorded.persisted,
        }
    }

    pub fn remove_glass(&mut self) -> Recorded<WaterLedger> {
        self.update_water(WaterLedger::decrement).1
    }

    /// Replace the daily goal; rejects goals below one glass
    pub fn set_water_goal(&mut self, goal: i64) -> Result<Recorded<WaterLedger>> {
        let goal_glasses = validate_goal(goal)?;
        let (_, recorded) = self.update_water(|w| WaterLedger { goal_glasses, ..w });
        if recorded.persisted {
            tracing::info!("Water goal set to {} glasses", goal_glasses);
        }
        Ok(recorded)
    }

    pub fn reset_water(&mut self) -> Recorded<WaterLedger> {
        self.update_water(WaterLedger::reset).1
    }

    // ------------------------------------------------------------------
    // Profile and favorites
    // ------------------------------------------------------------------

    pub fn profile(&self) -> Option<UserProfile> {
        Self::read_or("profile", records::load_profile(&self.store), || None)
    }

    pub fn save_profile(&mut self, profile: UserProfile) -> Recorded<UserProfile> {
        let persisted = self.persist("profile", |s| records::save_profile(s, &profile));
        if persisted {
            self.record_event(ActivityKind::ProfileUpdated);
        }
        Recorded {
            value: profile,
            persisted,
        }
    }

    pub fn favorites(&self) -> BTreeSet<String> {
        Self::read_or("favorites", records::load_favorites(&self.store), BTreeSet::new)
    }

    /// Flip a recipe in or out of the favorites; value is the new state
    pub fn toggle_favorite(&mut self, recipe_id: &str) -> Recorded<bool> {
        let attempt = self.modify("favorites", |view| {
            let mut favorites = records::load_favorites(view)?;
            let now_favorite = if favorites.remove(recipe_id) {
                false
            } else {
                favorites.insert(recipe_id.to_string());
                true
            };
            records::save_favorites(view, &favorites)?;
            Ok(now_favorite)
        });

        Recorded {
            value: attempt.value.unwrap_or(false),
            persisted: attempt.persisted,
        }
    }

    /// A recipe query cache sized from configuration
    pub fn recipe_cache<V>(&self) -> QueryCache<V> {
        QueryCache::new(self.settings.recipe_cache_capacity)
    }

    // ------------------------------------------------------------------
    // Dashboard
    // ------------------------------------------------------------------

    pub fn summary(&self) -> DailySummary {
        let calories_consumed = self.calories_consumed();
        let calorie_goal = self.calorie_goal();
        let water = self.water();
        let glass_ml = self.settings.glass_ml;

        DailySummary {
            bmi: self.latest_bmi(),
            calories_consumed,
            calorie_progress: calorie_progress(calories_consumed, calorie_goal.target_kcal),
            calorie_goal,
            water,
            water_ml: water.intake_ml(glass_ml),
            water_target_ml: water.target_ml(glass_ml),
            water_progress: water.fill_fraction(),
        }
    }
}
