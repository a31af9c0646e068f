//! Activity history over a trailing window of days.
//!
//! Loads journal events and folds them into per-day totals for the
//! progress view and CSV export.

use crate::journal::{read_events, ActivityEvent, ActivityKind};
use crate::{BmiCategory, Error, Result};
use chrono::{Duration, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Everything logged on one UTC day
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub calories: u64,
    pub meals: usize,
    /// Last water count seen that day
    pub water_glasses: Option<u32>,
    pub water_goal: Option<u32>,
    /// Last BMI recorded that day
    pub bmi: Option<f64>,
    pub bmi_category: Option<BmiCategory>,
}

impl DayTotals {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            calories: 0,
            meals: 0,
            water_glasses: None,
            water_goal: None,
            bmi: None,
            bmi_category: None,
        }
    }
}

/// Events from the last `days` days, newest first.
///
/// Fails with `InvalidInput` for a negative window or one that reaches
/// past the representable date range.
pub fn load_recent_events(journal_path: &Path, days: i64) -> Result<Vec<ActivityEvent>> {
    if days < 0 {
        return Err(Error::invalid(format!(
            "history window must not be negative, got {}",
            days
        )));
    }
    let cutoff = Duration::try_days(days)
        .and_then(|window| Utc::now().checked_sub_signed(window))
        .ok_or_else(|| {
            Error::invalid(format!("history window of {} days is out of range", days))
        })?;

    let mut events: Vec<_> = read_events(journal_path)?
        .into_iter()
        .filter(|e| e.at >= cutoff)
        .collect();

    events.sort_by(|a, b| b.at.cmp(&a.at));

    tracing::info!(
        "Loaded {} events from last {} days",
        events.len(),
        days
    );
    Ok(events)
}

/// Fold events into per-day totals, oldest day first.
///
/// Input order does not matter; within a day the latest water and BMI
/// events win.
pub fn daily_totals(events: &[ActivityEvent]) -> Vec<DayTotals> {
    let mut sorted: Vec<&ActivityEvent> = events.iter().collect();
    sorted.sort_by_key(|e| e.at);

    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    for event in sorted {
        let date = event.at.date_naive();
        let day = days.entry(date).or_insert_with(|| DayTotals::empty(date));

        match &event.kind {
            ActivityKind::MealLogged { calories, .. } => {
                day.calories += *calories as u64;
                day.meals += 1;
            }
            ActivityKind::WaterChanged {
                glasses,
                goal_glasses,
            } => {
                day.water_glasses = Some(*glasses);
                day.water_goal = Some(*goal_glasses);
            }
            ActivityKind::BmiRecorded { bmi, category, .. } => {
                day.bmi = Some(*bmi);
                day.bmi_category = Some(*category);
            }
            ActivityKind::ProfileUpdated => {}
        }
    }

    days.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{ActivitySink, JsonlJournal};
    use crate::MealSlot;
    use chrono::{DateTime, TimeZone};

    fn meal_at(at: DateTime<Utc>, calories: u32) -> ActivityEvent {
        ActivityEvent::at(
            at,
            ActivityKind::MealLogged {
                slot: MealSlot::Lunch,
                name: "Rice".into(),
                calories,
            },
        )
    }

    fn water_at(at: DateTime<Utc>, glasses: u32) -> ActivityEvent {
        ActivityEvent::at(
            at,
            ActivityKind::WaterChanged {
                glasses,
                goal_glasses: 8,
            },
        )
    }

    #[test]
    fn test_load_recent_events_filters_window() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity.jsonl");

        let mut journal = JsonlJournal::new(&path);
        journal.append(&meal_at(Utc::now() - Duration::days(1), 100)).unwrap();
        journal.append(&meal_at(Utc::now() - Duration::days(3), 200)).unwrap();
        journal.append(&meal_at(Utc::now() - Duration::days(10), 300)).unwrap();

        let events = load_recent_events(&path, 7).unwrap();
        assert_eq!(events.len(), 2);
        // Newest first
        assert!(events[0].at > events[1].at);
    }

    #[test]
    fn test_load_recent_events_rejects_bad_window() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity.jsonl");

        for days in [-1, i64::MAX, 200_000_000] {
            let err = load_recent_events(&path, days).unwrap_err();
            assert!(err.is_invalid_input(), "days = {}", days);
        }
        assert!(load_recent_events(&path, 0).unwrap().is_empty());
    }

    #[test]
    fn test_daily_totals_groups_by_day() {
        let day1 = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let day2 = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();

        let events = vec![
            water_at(day1 + Duration::hours(5), 6),
            meal_at(day2, 450),
            meal_at(day1, 300),
            water_at(day1 + Duration::hours(1), 2),
            meal_at(day1 + Duration::hours(4), 200),
        ];

        let totals = daily_totals(&events);
        assert_eq!(totals.len(), 2);

        assert_eq!(totals[0].date, day1.date_naive());
        assert_eq!(totals[0].calories, 500);
        assert_eq!(totals[0].meals, 2);
        assert_eq!(totals[0].water_glasses, Some(6));

        assert_eq!(totals[1].calories, 450);
        assert_eq!(totals[1].water_glasses, None);
    }

    #[test]
    fn test_daily_totals_records_latest_bmi() {
        let day = Utc.with_ymd_and_hms(2026, 3, 1, 8, 0, 0).unwrap();
        let events = vec![
            ActivityEvent::at(
                day + Duration::hours(2),
                ActivityKind::BmiRecorded {
                    bmi: 24.1,
                    category: BmiCategory::Normal,
                    weight_kg: 74.0,
                },
            ),
            ActivityEvent::at(
                day,
                ActivityKind::BmiRecorded {
                    bmi: 25.3,
                    category: BmiCategory::Overweight,
                    weight_kg: 77.5,
                },
            ),
        ];

        let totals = daily_totals(&events);
        assert_eq!(totals[0].bmi, Some(24.1));
        assert_eq!(totals[0].bmi_category, Some(BmiCategory::Normal));
    }
}
