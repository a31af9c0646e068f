//! Append-only activity journal.
//!
//! Each tracker mutation is appended to a JSONL (JSON Lines) file with file
//! locking so that several processes can share one data directory.

use crate::{BmiCategory, MealSlot, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// What happened
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityKind {
    BmiRecorded {
        bmi: f64,
        category: BmiCategory,
        weight_kg: f64,
    },
    MealLogged {
        slot: MealSlot,
        name: String,
        calories: u32,
    },
    WaterChanged {
        glasses: u32,
        goal_glasses: u32,
    },
    ProfileUpdated,
}

/// A journal line
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActivityEvent {
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub kind: ActivityKind,
}

impl ActivityEvent {
    pub fn new(kind: ActivityKind) -> Self {
        Self::at(Utc::now(), kind)
    }

    pub fn at(at: DateTime<Utc>, kind: ActivityKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            at,
            kind,
        }
    }
}

/// Destination for activity events
pub trait ActivitySink {
    fn append(&mut self, event: &ActivityEvent) -> Result<()>;
}

/// JSONL-based journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl ActivitySink for JsonlJournal {
    fn append(&mut self, event: &ActivityEvent) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        // A crash mid-append can leave a torn last line; start on a fresh one
        let needs_newline = !ends_with_newline(&file)?;

        let mut writer = std::io::BufWriter::new(&file);
        if needs_newline {
            tracing::warn!("Journal {:?} ends in a partial line", self.path);
            writer.write_all(b"\n")?;
        }
        let line = serde_json::to_string(event)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended event {} to journal", event.id);
        Ok(())
    }
}

/// True for an empty file or one whose last byte is a newline
fn ends_with_newline(mut file: &File) -> Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

/// Read every event from a journal file, skipping lines that fail to parse
pub fn read_events(path: &Path) -> Result<Vec<ActivityEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ActivityEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse journal line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} events from journal", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water_event(glasses: u32) -> ActivityEvent {
        ActivityEvent::new(ActivityKind::WaterChanged {
            glasses,
            goal_glasses: 8,
        })
    }

    #[test]
    fn test_append_and_read_single_event() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity.jsonl");

        let event = water_event(1);
        let mut journal = JsonlJournal::new(&path);
        journal.append(&event).unwrap();

        let events = read_events(&path).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, event.id);
        assert_eq!(events[0].kind, event.kind);
    }

    #[test]
    fn test_append_multiple_events() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("journal/activity.jsonl");

        let mut journal = JsonlJournal::new(&path);
        for glasses in 1..=5 {
            journal.append(&water_event(glasses)).unwrap();
        }

        let events = read_events(&path).unwrap();
        assert_eq!(events.len(), 5);
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity.jsonl");

        let mut journal = JsonlJournal::new(&path);
        journal.append(&water_event(1)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{ not json").unwrap();
        }
        journal.append(&water_event(2)).unwrap();

        let events = read_events(&path).unwrap();
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn test_append_after_torn_line_starts_fresh_line() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("activity.jsonl");

        let mut journal = JsonlJournal::new(&path);
        journal.append(&water_event(1)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            write!(file, r#"{{"id":"00000000-0000-0000-0000-000000000000","at":"#).unwrap();
        }

        let next = water_event(2);
        journal.append(&next).unwrap();

        let events = read_events(&path).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].id, next.id);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = ActivityEvent::new(ActivityKind::MealLogged {
            slot: MealSlot::Lunch,
            name: "Salad".into(),
            calories: 150,
        });
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"]["type"], "meal_logged");
        assert_eq!(json["kind"]["slot"], "Lunch");
    }

    #[test]
    fn test_read_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let events = read_events(&temp_dir.path().join("nonexistent.jsonl")).unwrap();
        assert!(events.is_empty());
    }
}
