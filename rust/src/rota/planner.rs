//! Rota session: owns the assignment table, applies edits and keeps one undo slot.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::calendar::{month_horizon, normalize_horizon};
use crate::config::RotaConfig;
use crate::models::{RotaReport, ShiftType, UnfilledSlot};
use crate::log_changes;

use super::assigner::ShiftAssigner;
use super::notify::NotificationGateway;
use super::roster::CrewRoster;
use super::stats::{CrewStats, RotationStats};
use super::table::AssignmentTable;

/// Errors raised by rota edits and inputs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RotaError {
    #[error("Duplicate crew member id: {0}")]
    DuplicateCrewMember(String),
    #[error("Unknown crew member: {0}")]
    UnknownCrewMember(String),
    #[error("{shift} shift on {date} is already full ({required} crew)")]
    ShiftFull {
        date: NaiveDate,
        shift: ShiftType,
        required: usize,
    },
    #[error("Nothing to revert")]
    NothingToRevert,
    #[error("Invalid month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// A crew rota for one roster.
///
/// Every mutation first copies the table into a single snapshot slot, so
/// `revert` toggles between the last two states. It is not an undo stack.
/// Not synchronized: callers serialize mutations.
#[derive(Clone, Debug)]
pub struct DutyRota {
    roster: CrewRoster,
    assigner: ShiftAssigner,
    table: AssignmentTable,
    previous: Option<AssignmentTable>,
}

impl DutyRota {
    pub fn new(roster: CrewRoster, config: RotaConfig, today: NaiveDate) -> Self {
        Self::with_table(roster, config, today, AssignmentTable::new())
    }

    /// Start from an existing table, e.g. one loaded by a persistence layer.
    pub fn with_table(
        roster: CrewRoster,
        config: RotaConfig,
        today: NaiveDate,
        table: AssignmentTable,
    ) -> Self {
        Self {
            roster,
            assigner: ShiftAssigner::new(config, today),
            table,
            previous: None,
        }
    }

    pub fn table(&self) -> &AssignmentTable {
        &self.table
    }

    pub fn roster(&self) -> &CrewRoster {
        &self.roster
    }

    pub fn config(&self) -> &RotaConfig {
        self.assigner.config()
    }

    pub fn has_snapshot(&self) -> bool {
        self.previous.is_some()
    }

    fn snapshot(&mut self) {
        self.previous = Some(self.table.clone());
    }

    /// Manually put a crew member on a shift, replacing their shift that day.
    pub fn assign(
        &mut self,
        date: NaiveDate,
        crew_id: &str,
        shift: ShiftType,
    ) -> Result<(), RotaError> {
        if !self.roster.contains(crew_id) {
            return Err(RotaError::UnknownCrewMember(crew_id.to_string()));
        }
        let required = self.config().headcount(shift);
        let already_on_shift = self.table.shift_of(date, crew_id) == Some(shift);
        if !already_on_shift && self.table.headcount(date, shift) >= required {
            return Err(RotaError::ShiftFull {
                date,
                shift,
                required,
            });
        }

        self.snapshot();
        self.table.assign(date, crew_id, shift);
        log_changes!(self.config().verbosity, "{}: {} -> {} (manual)", date, crew_id, shift);
        Ok(())
    }

    /// Manually take a crew member off duty for a date.
    pub fn remove(&mut self, date: NaiveDate, crew_id: &str) -> Option<ShiftType> {
        self.snapshot();
        self.table.remove(date, crew_id)
    }

    pub fn clear_range(&mut self, dates: &[NaiveDate]) {
        self.snapshot();
        self.table.clear_range(dates);
    }

    /// Remove every assignment in a calendar month.
    pub fn clear_month(&mut self, year: i32, month: u32) -> Result<(), RotaError> {
        let dates = month_horizon(year, month)?;
        self.clear_range(&dates);
        Ok(())
    }

    pub fn regenerate(
        &mut self,
        horizon: &[NaiveDate],
        gateway: &mut dyn NotificationGateway,
    ) -> RotaReport {
        self.snapshot();
        self.assigner
            .regenerate(&mut self.table, horizon, &self.roster, gateway)
    }

    pub fn complete(
        &mut self,
        horizon: &[NaiveDate],
        gateway: &mut dyn NotificationGateway,
    ) -> RotaReport {
        self.snapshot();
        self.assigner
            .complete(&mut self.table, horizon, &self.roster, gateway)
    }

    /// Swap the table with the snapshot. A second call swaps back.
    pub fn revert(&mut self) -> Result<(), RotaError> {
        let previous = self.previous.as_mut().ok_or(RotaError::NothingToRevert)?;
        std::mem::swap(&mut self.table, previous);
        Ok(())
    }

    /// Rotation stats for every roster member over `horizon`.
    pub fn crew_stats(&self, horizon: &[NaiveDate]) -> FxHashMap<String, CrewStats> {
        RotationStats::from_table(&self.roster, &self.table, horizon).into_inner()
    }

    /// Shifts in `horizon` currently below their required headcount.
    pub fn staffing_gaps(&self, horizon: &[NaiveDate]) -> Vec<UnfilledSlot> {
        let config = self.config();
        normalize_horizon(horizon)
            .into_iter()
            .flat_map(|date| {
                ShiftType::ALL.into_iter().filter_map(move |shift| {
                    let required = config.headcount(shift);
                    let filled = self.table.headcount(date, shift);
                    (filled < required).then_some(UnfilledSlot {
                        date,
                        shift,
                        required,
                        filled,
                    })
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CrewMember;
    use crate::rota::RecordingGateway;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn make_rota(ids: &[&str]) -> DutyRota {
        let crew = ids
            .iter()
            .map(|id| CrewMember::new(id.to_string(), id.to_string(), "galley".to_string(), None, None))
            .collect();
        DutyRota::new(
            CrewRoster::new(crew).unwrap(),
            RotaConfig::default(),
            d(2025, 3, 1),
        )
    }

    fn days_from(start: NaiveDate, n: usize) -> Vec<NaiveDate> {
        start.iter_days().take(n).collect()
    }

    #[test]
    fn test_assign_rejects_unknown_crew() {
        let mut rota = make_rota(&["a"]);
        let result = rota.assign(d(2025, 3, 1), "z", ShiftType::Morning);
        assert_eq!(result, Err(RotaError::UnknownCrewMember("z".to_string())));
        assert!(!rota.has_snapshot());
    }

    #[test]
    fn test_assign_respects_headcount() {
        let mut rota = make_rota(&["a", "b", "c"]);
        rota.assign(d(2025, 3, 1), "a", ShiftType::Night).unwrap();
        let result = rota.assign(d(2025, 3, 1), "b", ShiftType::Night);
        assert!(matches!(result, Err(RotaError::ShiftFull { required: 1, .. })));
        // Re-assigning the occupant is allowed
        rota.assign(d(2025, 3, 1), "a", ShiftType::Night).unwrap();
        assert_eq!(rota.table().headcount(d(2025, 3, 1), ShiftType::Night), 1);
    }

    #[test]
    fn test_assign_moves_within_day() {
        let mut rota = make_rota(&["a"]);
        rota.assign(d(2025, 3, 1), "a", ShiftType::Morning).unwrap();
        rota.assign(d(2025, 3, 1), "a", ShiftType::Afternoon).unwrap();
        assert_eq!(rota.table().len(), 1);
        assert_eq!(
            rota.table().shift_of(d(2025, 3, 1), "a"),
            Some(ShiftType::Afternoon)
        );
    }

    #[test]
    fn test_revert_without_snapshot() {
        let mut rota = make_rota(&["a"]);
        assert_eq!(rota.revert(), Err(RotaError::NothingToRevert));
    }

    #[test]
    fn test_revert_toggles() {
        let mut rota = make_rota(&["a", "b", "c", "d", "e"]);
        let horizon = days_from(d(2025, 3, 1), 3);
        rota.assign(d(2025, 3, 1), "a", ShiftType::Night).unwrap();
        let before = rota.table().clone();

        rota.regenerate(&horizon, &mut RecordingGateway::new());
        let after = rota.table().clone();
        assert_ne!(before, after);

        rota.revert().unwrap();
        assert_eq!(rota.table(), &before);
        rota.revert().unwrap();
        assert_eq!(rota.table(), &after);
    }

    #[test]
    fn test_snapshot_is_single_slot() {
        let mut rota = make_rota(&["a", "b"]);
        rota.assign(d(2025, 3, 1), "a", ShiftType::Morning).unwrap();
        let first = rota.table().clone();
        rota.assign(d(2025, 3, 1), "b", ShiftType::Morning).unwrap();
        rota.remove(d(2025, 3, 1), "a");

        rota.revert().unwrap();
        // Only the state before the last edit is reachable
        assert_eq!(rota.table().len(), 2);
        assert_ne!(rota.table(), &first);
    }

    #[test]
    fn test_clear_month() {
        let mut rota = make_rota(&["a"]);
        rota.assign(d(2025, 3, 31), "a", ShiftType::Morning).unwrap();
        rota.assign(d(2025, 4, 1), "a", ShiftType::Morning).unwrap();

        rota.clear_month(2025, 3).unwrap();
        assert!(!rota.table().is_assigned(d(2025, 3, 31), "a"));
        assert!(rota.table().is_assigned(d(2025, 4, 1), "a"));

        rota.revert().unwrap();
        assert!(rota.table().is_assigned(d(2025, 3, 31), "a"));
        assert!(rota.clear_month(2025, 0).is_err());
    }

    #[test]
    fn test_complete_then_revert_restores_partial_rota() {
        let mut rota = make_rota(&["a", "b", "c", "d", "e"]);
        let horizon = days_from(d(2025, 3, 1), 2);
        rota.assign(d(2025, 3, 1), "c", ShiftType::Night).unwrap();
        let partial = rota.table().clone();

        let report = rota.complete(&horizon, &mut RecordingGateway::new());
        assert_eq!(report.assignments_made, 9);
        assert_eq!(rota.table().shift_of(d(2025, 3, 1), "c"), Some(ShiftType::Night));

        rota.revert().unwrap();
        assert_eq!(rota.table(), &partial);
    }

    #[test]
    fn test_staffing_gaps() {
        let mut rota = make_rota(&["a", "b"]);
        rota.assign(d(2025, 3, 1), "a", ShiftType::Morning).unwrap();
        rota.assign(d(2025, 3, 1), "b", ShiftType::Morning).unwrap();

        let gaps = rota.staffing_gaps(&[d(2025, 3, 1)]);
        let shifts: Vec<ShiftType> = gaps.iter().map(|g| g.shift).collect();
        assert_eq!(shifts, vec![ShiftType::Afternoon, ShiftType::Night]);
        assert_eq!(gaps[0].missing(), 2);
    }

    #[test]
    fn test_crew_stats() {
        let mut rota = make_rota(&["a", "b"]);
        rota.assign(d(2025, 3, 1), "a", ShiftType::Morning).unwrap();
        rota.assign(d(2025, 3, 2), "a", ShiftType::Night).unwrap();

        let stats = rota.crew_stats(&days_from(d(2025, 3, 1), 2));
        assert_eq!(stats["a"].total, 2);
        assert_eq!(stats["a"].consecutive_days, 2);
        assert_eq!(stats["b"].total, 0);
    }
}
