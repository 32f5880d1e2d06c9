//! Crew duty-rotation scheduling.
//!
//! Fills daily morning, afternoon and night shifts across a horizon (usually a
//! calendar month) while balancing fatigue, shift-type exposure and total load.
//! The core is plain Rust; a thin PyO3 layer exposes it to the dashboard host.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;

pub mod calendar;
mod config;
pub mod logging;
mod models;
pub mod ranking;
pub mod rota;

pub use calendar::{is_next_day, month_horizon, normalize_horizon};
pub use config::RotaConfig;
pub use models::{
    Assignment, CrewMember, ParseShiftTypeError, RotaReport, RotaResult, ShiftNotification,
    ShiftType, UnfilledSlot,
};
pub use ranking::{rank_candidates, CandidateKey};
pub use rota::{
    AssignmentTable, CrewRoster, CrewStats, DutyRota, NotificationGateway, NotifyError,
    RecordingGateway, RotaError, RotationStats, ShiftAssigner, ShiftCounts,
};

/// Assigner pass selector for one-shot runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotaPass {
    Regenerate,
    Complete,
}

/// Run one assigner pass over plain inputs and collect everything it produced.
///
/// Notifications are recorded rather than delivered; the host decides what to
/// send.
pub fn run_rota_pass(
    pass: RotaPass,
    crew: Vec<CrewMember>,
    horizon: &[NaiveDate],
    assignments: Vec<Assignment>,
    today: NaiveDate,
    config: RotaConfig,
) -> Result<RotaResult, RotaError> {
    let roster = CrewRoster::new(crew)?;
    let mut table: AssignmentTable = assignments.into_iter().collect();
    let mut gateway = RecordingGateway::new();
    let assigner = ShiftAssigner::new(config, today);

    let report = match pass {
        RotaPass::Regenerate => assigner.regenerate(&mut table, horizon, &roster, &mut gateway),
        RotaPass::Complete => assigner.complete(&mut table, horizon, &roster, &mut gateway),
    };

    Ok(RotaResult {
        assignments: table.assignments(),
        notifications: gateway.into_notifications(),
        report,
    })
}

/// Regenerate every shift in the horizon from scratch.
///
/// # Arguments
/// * `crew` - Roster in tie-break order
/// * `horizon` - Dates to schedule (dates before `today` are left alone)
/// * `assignments` - Current assignments
/// * `today` - First date that may be scheduled
/// * `config` - Headcounts and limits (defaults when omitted)
///
/// # Raises
/// * ValueError if crew ids are not unique
#[pyfunction]
#[pyo3(signature = (crew, horizon, assignments, today, config=None))]
fn regenerate_rota(
    crew: Vec<CrewMember>,
    horizon: Vec<NaiveDate>,
    assignments: Vec<Assignment>,
    today: NaiveDate,
    config: Option<RotaConfig>,
) -> PyResult<RotaResult> {
    run_rota_pass(
        RotaPass::Regenerate,
        crew,
        &horizon,
        assignments,
        today,
        config.unwrap_or_default(),
    )
    .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Fill only the vacant shift slots in the horizon, keeping existing assignments.
///
/// Arguments and errors as for `regenerate_rota`.
#[pyfunction]
#[pyo3(signature = (crew, horizon, assignments, today, config=None))]
fn complete_rota(
    crew: Vec<CrewMember>,
    horizon: Vec<NaiveDate>,
    assignments: Vec<Assignment>,
    today: NaiveDate,
    config: Option<RotaConfig>,
) -> PyResult<RotaResult> {
    run_rota_pass(
        RotaPass::Complete,
        crew,
        &horizon,
        assignments,
        today,
        config.unwrap_or_default(),
    )
    .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// Every date of a calendar month.
#[pyfunction]
#[pyo3(name = "month_horizon")]
fn py_month_horizon(year: i32, month: u32) -> PyResult<Vec<NaiveDate>> {
    month_horizon(year, month).map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// The duty_rota Python module.
#[pymodule]
fn duty_rota(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Data types
    m.add_class::<ShiftType>()?;
    m.add_class::<CrewMember>()?;
    m.add_class::<Assignment>()?;
    m.add_class::<ShiftNotification>()?;
    m.add_class::<UnfilledSlot>()?;
    m.add_class::<RotaReport>()?;
    m.add_class::<RotaResult>()?;

    // Config
    m.add_class::<RotaConfig>()?;

    // Algorithms
    m.add_function(wrap_pyfunction!(regenerate_rota, m)?)?;
    m.add_function(wrap_pyfunction!(complete_rota, m)?)?;
    m.add_function(wrap_pyfunction!(py_month_horizon, m)?)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn crew(ids: &[&str]) -> Vec<CrewMember> {
        ids.iter()
            .map(|id| CrewMember::new(id.to_string(), id.to_string(), "deck".to_string(), None, None))
            .collect()
    }

    #[test]
    fn test_run_regenerate_pass() {
        let horizon = vec![d(2025, 3, 1), d(2025, 3, 2)];
        let result = run_rota_pass(
            RotaPass::Regenerate,
            crew(&["a", "b", "c", "d", "e"]),
            &horizon,
            vec![],
            d(2025, 3, 1),
            RotaConfig::default(),
        )
        .unwrap();

        assert_eq!(result.assignments.len(), 10);
        assert_eq!(result.notifications.len(), 10);
        assert!(result.report.is_fully_staffed());
    }

    #[test]
    fn test_run_complete_pass_keeps_existing() {
        let existing = vec![Assignment::new(d(2025, 3, 1), "e".to_string(), ShiftType::Morning)];
        let result = run_rota_pass(
            RotaPass::Complete,
            crew(&["a", "b", "c", "d", "e"]),
            &[d(2025, 3, 1)],
            existing,
            d(2025, 3, 1),
            RotaConfig::default(),
        )
        .unwrap();

        assert_eq!(result.report.assignments_made, 4);
        assert!(result
            .assignments
            .iter()
            .any(|a| a.crew_id == "e" && a.shift == ShiftType::Morning));
    }

    #[test]
    fn test_run_pass_rejects_duplicate_crew() {
        let result = run_rota_pass(
            RotaPass::Regenerate,
            crew(&["a", "a"]),
            &[d(2025, 3, 1)],
            vec![],
            d(2025, 3, 1),
            RotaConfig::default(),
        );
        assert_eq!(result.unwrap_err(), RotaError::DuplicateCrewMember("a".to_string()));
    }
}
