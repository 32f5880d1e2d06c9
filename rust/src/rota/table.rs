//! In-memory assignment store keyed by date.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

use crate::models::{Assignment, ShiftType};

/// Date -> (crew id -> shift).
///
/// Invariants: a crew member holds at most one shift per date, and dates with
/// no assignments are never stored. Equality is therefore per-date set equality.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssignmentTable {
    days: BTreeMap<NaiveDate, FxHashMap<String, ShiftType>>,
}

impl AssignmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `crew_id` on `shift` for `date`, replacing any shift they already
    /// hold that day.
    pub fn assign(&mut self, date: NaiveDate, crew_id: impl Into<String>, shift: ShiftType) {
        self.days.entry(date).or_default().insert(crew_id.into(), shift);
    }

    /// Drop the crew member's assignment on `date`. Returns the shift removed.
    pub fn remove(&mut self, date: NaiveDate, crew_id: &str) -> Option<ShiftType> {
        let day = self.days.get_mut(&date)?;
        let removed = day.remove(crew_id);
        if day.is_empty() {
            self.days.remove(&date);
        }
        removed
    }

    /// Assignments on `date`, ordered by shift then crew id.
    pub fn get_by_date(&self, date: NaiveDate) -> Vec<Assignment> {
        let mut assignments: Vec<Assignment> = match self.days.get(&date) {
            Some(day) => day
                .iter()
                .map(|(crew_id, shift)| Assignment {
                    date,
                    crew_id: crew_id.clone(),
                    shift: *shift,
                })
                .collect(),
            None => Vec::new(),
        };
        assignments.sort_by(|a, b| a.shift.cmp(&b.shift).then(a.crew_id.cmp(&b.crew_id)));
        assignments
    }

    pub fn get_by_date_and_shift(&self, date: NaiveDate, shift: ShiftType) -> Vec<Assignment> {
        self.get_by_date(date)
            .into_iter()
            .filter(|a| a.shift == shift)
            .collect()
    }

    /// Remove every assignment on the given dates.
    pub fn clear_range(&mut self, dates: &[NaiveDate]) {
        for date in dates {
            self.days.remove(date);
        }
    }

    pub fn shift_of(&self, date: NaiveDate, crew_id: &str) -> Option<ShiftType> {
        self.days.get(&date)?.get(crew_id).copied()
    }

    pub fn is_assigned(&self, date: NaiveDate, crew_id: &str) -> bool {
        self.shift_of(date, crew_id).is_some()
    }

    /// Crew currently holding `shift` on `date`.
    pub fn headcount(&self, date: NaiveDate, shift: ShiftType) -> usize {
        self.days
            .get(&date)
            .map_or(0, |day| day.values().filter(|s| **s == shift).count())
    }

    /// Crew ids with any shift on `date`.
    pub fn crew_on(&self, date: NaiveDate) -> impl Iterator<Item = (&str, ShiftType)> + '_ {
        self.days
            .get(&date)
            .into_iter()
            .flat_map(|day| day.iter().map(|(id, shift)| (id.as_str(), *shift)))
    }

    /// All assignments, chronologically.
    pub fn assignments(&self) -> Vec<Assignment> {
        self.days
            .keys()
            .flat_map(|date| self.get_by_date(*date))
            .collect()
    }

    /// Dates holding at least one assignment, chronologically.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.days.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(|day| day.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl FromIterator<Assignment> for AssignmentTable {
    fn from_iter<I: IntoIterator<Item = Assignment>>(iter: I) -> Self {
        let mut table = AssignmentTable::new();
        for a in iter {
            table.assign(a.date, a.crew_id, a.shift);
        }
        table
    }
}
