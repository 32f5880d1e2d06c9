//! Configuration types for the duty rota.

use pyo3::prelude::*;

use crate::models::ShiftType;

/// Staffing policy and assigner knobs.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RotaConfig {
    /// Crew required on the morning shift each day
    #[pyo3(get, set)]
    pub morning_headcount: u32,
    /// Crew required on the afternoon shift each day
    #[pyo3(get, set)]
    pub afternoon_headcount: u32,
    /// Crew required on the night shift each day
    #[pyo3(get, set)]
    pub night_headcount: u32,
    /// Longest run of consecutive working days allowed (None = no cap)
    #[pyo3(get, set)]
    pub max_consecutive_days: Option<u32>,
    /// Logging verbosity (0-3), see `crate::logging`
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for RotaConfig {
    fn default() -> Self {
        Self {
            morning_headcount: 2,
            afternoon_headcount: 2,
            night_headcount: 1,
            max_consecutive_days: None,
            verbosity: 0,
        }
    }
}

impl RotaConfig {
    /// Required headcount for a shift.
    pub fn headcount(&self, shift: ShiftType) -> usize {
        let n = match shift {
            ShiftType::Morning => self.morning_headcount,
            ShiftType::Afternoon => self.afternoon_headcount,
            ShiftType::Night => self.night_headcount,
        };
        n as usize
    }

    /// Total crew required across all shifts of one day.
    pub fn daily_headcount(&self) -> usize {
        ShiftType::ALL.iter().map(|s| self.headcount(*s)).sum()
    }
}

#[pymethods]
impl RotaConfig {
    #[new]
    #[pyo3(signature = (
        morning_headcount=None,
        afternoon_headcount=None,
        night_headcount=None,
        max_consecutive_days=None,
        verbosity=None
    ))]
    pub fn new(
        morning_headcount: Option<u32>,
        afternoon_headcount: Option<u32>,
        night_headcount: Option<u32>,
        max_consecutive_days: Option<u32>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            morning_headcount: morning_headcount.unwrap_or(defaults.morning_headcount),
            afternoon_headcount: afternoon_headcount.unwrap_or(defaults.afternoon_headcount),
            night_headcount: night_headcount.unwrap_or(defaults.night_headcount),
            max_consecutive_days: max_consecutive_days.or(defaults.max_consecutive_days),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "RotaConfig(morning={}, afternoon={}, night={}, max_consecutive_days={:?})",
            self.morning_headcount,
            self.afternoon_headcount,
            self.night_headcount,
            self.max_consecutive_days
        )
    }
}
