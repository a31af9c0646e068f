//! CSV export of daily history totals.

use crate::history::DayTotals;
use crate::Result;
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    date: String,
    calories: u64,
    meals: usize,
    water_glasses: Option<u32>,
    water_goal: Option<u32>,
    bmi: Option<f64>,
    bmi_category: Option<&'static str>,
}

impl From<&DayTotals> for CsvRow {
    fn from(day: &DayTotals) -> Self {
        CsvRow {
            date: day.date.format("%Y-%m-%d").to_string(),
            calories: day.calories,
            meals: day.meals,
            water_glasses: day.water_glasses,
            water_goal: day.water_goal,
            bmi: day.bmi,
            bmi_category: day.bmi_category.map(|c| c.as_str()),
        }
    }
}

/// Write `totals` to `csv_path`, replacing any previous export.
///
/// The file is synced to disk before returning. Returns the row count.
pub fn write_daily_totals(csv_path: &Path, totals: &[DayTotals]) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(csv_path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(true).from_writer(file);

    for day in totals {
        writer.serialize(CsvRow::from(day))?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} days to {:?}", totals.len(), csv_path);
    Ok(totals.len())
}
