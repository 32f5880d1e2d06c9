//! Per-crew rotation counters derived from the assignment table.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::calendar::{is_next_day, normalize_horizon};
use crate::models::ShiftType;

use super::roster::CrewRoster;
use super::table::AssignmentTable;

/// Assignment counts per shift type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShiftCounts {
    pub morning: u32,
    pub afternoon: u32,
    pub night: u32,
}

impl ShiftCounts {
    pub fn get(&self, shift: ShiftType) -> u32 {
        match shift {
            ShiftType::Morning => self.morning,
            ShiftType::Afternoon => self.afternoon,
            ShiftType::Night => self.night,
        }
    }

    pub fn increment(&mut self, shift: ShiftType) {
        match shift {
            ShiftType::Morning => self.morning += 1,
            ShiftType::Afternoon => self.afternoon += 1,
            ShiftType::Night => self.night += 1,
        }
    }
}

/// Rotation counters for one crew member over a horizon.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrewStats {
    pub total: u32,
    pub per_shift: ShiftCounts,
    /// Current run of calendar-adjacent working days
    pub consecutive_days: u32,
    pub last_assigned_date: Option<NaiveDate>,
    pub last_assigned_shift: Option<ShiftType>,
}

impl CrewStats {
    /// Count an assignment and extend the streak.
    fn record(&mut self, date: NaiveDate, shift: ShiftType) {
        self.total += 1;
        self.per_shift.increment(shift);
        self.extend_streak(date, shift);
    }

    /// Extend the streak for a working day without touching the counts.
    fn extend_streak(&mut self, date: NaiveDate, shift: ShiftType) {
        self.consecutive_days = match self.last_assigned_date {
            Some(last) if is_next_day(last, date) => self.consecutive_days + 1,
            Some(last) if last == date => self.consecutive_days.max(1),
            _ => 1,
        };
        self.last_assigned_date = Some(date);
        self.last_assigned_shift = Some(shift);
    }

    /// End-of-day pass for a member with no assignment on `date`.
    ///
    /// The streak survives one idle day after the last assignment and drops to
    /// zero once the gap exceeds a day.
    fn close_idle_day(&mut self, date: NaiveDate) {
        match self.last_assigned_date {
            Some(last) if (date - last).num_days() <= 1 => {}
            _ => self.consecutive_days = 0,
        }
    }

    /// Whether this member worked the calendar day before `date`.
    pub fn worked_day_before(&self, date: NaiveDate) -> bool {
        self.last_assigned_date
            .is_some_and(|last| is_next_day(last, date))
    }
}

/// Snapshot of `CrewStats` for every roster member.
///
/// Always rebuilt from an `AssignmentTable`; callers never edit counters directly.
#[derive(Clone, Debug, Default)]
pub struct RotationStats {
    crew: FxHashMap<String, CrewStats>,
}

impl RotationStats {
    /// Zeroed stats for every roster member.
    pub fn empty(roster: &CrewRoster) -> Self {
        Self {
            crew: roster
                .iter()
                .map(|member| (member.id.clone(), CrewStats::default()))
                .collect(),
        }
    }

    /// Derive stats from the assignments in `horizon`, walked chronologically.
    ///
    /// Assignments held by ids outside the roster are ignored.
    pub fn from_table(roster: &CrewRoster, table: &AssignmentTable, horizon: &[NaiveDate]) -> Self {
        let mut stats = Self::empty(roster);
        for date in normalize_horizon(horizon) {
            for (crew_id, shift) in table.crew_on(date) {
                stats.record(crew_id, date, shift);
            }
            stats.close_day(date, table);
        }
        stats
    }

    pub fn get(&self, crew_id: &str) -> Option<&CrewStats> {
        self.crew.get(crew_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CrewStats)> + '_ {
        self.crew.iter().map(|(id, stats)| (id.as_str(), stats))
    }

    pub fn into_inner(self) -> FxHashMap<String, CrewStats> {
        self.crew
    }

    pub(crate) fn record(&mut self, crew_id: &str, date: NaiveDate, shift: ShiftType) {
        if let Some(stats) = self.crew.get_mut(crew_id) {
            stats.record(date, shift);
        }
    }

    pub(crate) fn extend_streak(&mut self, crew_id: &str, date: NaiveDate, shift: ShiftType) {
        if let Some(stats) = self.crew.get_mut(crew_id) {
            stats.extend_streak(date, shift);
        }
    }

    /// Streak bookkeeping for every roster member idle on `date`.
    pub(crate) fn close_day(&mut self, date: NaiveDate, table: &AssignmentTable) {
        for (crew_id, stats) in self.crew.iter_mut() {
            if !table.is_assigned(date, crew_id) {
                stats.close_idle_day(date);
            }
        }
    }

    /// Forget streaks and last-assignment markers, keeping the counts.
    pub(crate) fn reset_streaks(&mut self) {
        for stats in self.crew.values_mut() {
            stats.consecutive_days = 0;
            stats.last_assigned_date = None;
            stats.last_assigned_shift = None;
        }
    }

    /// True when working `date` would push the member past `max_consecutive_days`.
    pub fn is_capped(&self, crew_id: &str, date: NaiveDate, max_consecutive_days: u32) -> bool {
        self.crew.get(crew_id).is_some_and(|stats| {
            stats.worked_day_before(date) && stats.consecutive_days >= max_consecutive_days
        })
    }
}
