#![forbid(unsafe_code)]

//! Core domain model and business logic for Nutrilog.
//!
//! This crate provides:
//! - Domain types (body metrics, BMI, energy budget, meal and water ledgers)
//! - Calculators (unit conversion, BMI, daily calorie targets)
//! - Persistence (key-value store, typed records, activity journal)
//! - History rollups and CSV export
//! - Profile, food catalog, scripted assistant and recipe cache
//! - The `Tracker` composition root used by front ends

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod units;
pub mod bmi;
pub mod energy;
pub mod meals;
pub mod water;
pub mod store;
pub mod records;
pub mod profile;
pub mod foods;
pub mod chat;
pub mod cache;
pub mod journal;
pub mod history;
pub mod csv_export;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use bmi::compute_bmi;
pub use energy::compute_energy_budget;
pub use units::{cm_to_feet_inches, feet_inches_to_cm, glasses_to_liters, HeightValue};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use profile::{FitnessGoal, UserProfile};
pub use journal::{ActivityEvent, ActivityKind, ActivitySink, JsonlJournal};
pub use history::{daily_totals, load_recent_events, DayTotals};
pub use tracker::{CalorieGoal, DailySummary, Recorded, Tracker, TrackerSettings, WaterUpdate};
