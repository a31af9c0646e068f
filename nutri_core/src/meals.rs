//! Append-only meal ledger operations.

use crate::{MealEntry, MealLedger, MealSlot};

impl MealLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `entry` to `slot`. No dedup and no cap on entry count.
    pub fn add_entry(mut self, slot: MealSlot, entry: MealEntry) -> Self {
        self.slot_mut(slot).push(entry);
        self
    }

    /// Entries logged in a slot, in insertion order
    pub fn entries(&self, slot: MealSlot) -> &[MealEntry] {
        match slot {
            MealSlot::Breakfast => &self.breakfast,
            MealSlot::Lunch => &self.lunch,
            MealSlot::Dinner => &self.dinner,
            MealSlot::Snacks => &self.snacks,
        }
    }

    fn slot_mut(&mut self, slot: MealSlot) -> &mut Vec<MealEntry> {
        match slot {
            MealSlot::Breakfast => &mut self.breakfast,
            MealSlot::Lunch => &mut self.lunch,
            MealSlot::Dinner => &mut self.dinner,
            MealSlot::Snacks => &mut self.snacks,
        }
    }

    /// All entries with their slot, in slot order then insertion order
    pub fn iter(&self) -> impl Iterator<Item = (MealSlot, &MealEntry)> {
        MealSlot::ALL
            .into_iter()
            .flat_map(move |slot| self.entries(slot).iter().map(move |e| (slot, e)))
    }

    pub fn slot_calories(&self, slot: MealSlot) -> u64 {
        self.entries(slot).iter().map(|e| e.calories as u64).sum()
    }

    /// Sum of calories across every slot. Zero for an empty ledger.
    pub fn total_calories(&self) -> u64 {
        self.iter().map(|(_, e)| e.calories as u64).sum()
    }

    pub fn len(&self) -> usize {
        MealSlot::ALL.iter().map(|s| self.entries(*s).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
