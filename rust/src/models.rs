//! Core data types for the duty rota.

use chrono::{Datelike, NaiveDate};
use pyo3::prelude::*;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the three daily duty shifts.
///
/// Declaration order is the order in which shifts are staffed each day.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShiftType {
    Morning,
    Afternoon,
    Night,
}

impl ShiftType {
    /// All shifts in staffing order.
    pub const ALL: [ShiftType; 3] = [ShiftType::Morning, ShiftType::Afternoon, ShiftType::Night];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::Morning => "morning",
            ShiftType::Afternoon => "afternoon",
            ShiftType::Night => "night",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a shift.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown shift type: {0}")]
pub struct ParseShiftTypeError(pub String);

impl FromStr for ShiftType {
    type Err = ParseShiftTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(ShiftType::Morning),
            "afternoon" => Ok(ShiftType::Afternoon),
            "night" => Ok(ShiftType::Night),
            _ => Err(ParseShiftTypeError(s.to_string())),
        }
    }
}

/// A crew member as supplied by the crew directory.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrewMember {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub department: String,
    /// Specific dates this member is off
    #[pyo3(get, set)]
    pub off_days: Vec<NaiveDate>,
    /// Weekly days off from the base schedule (0 = Monday .. 6 = Sunday)
    #[pyo3(get, set)]
    pub off_weekdays: Vec<u32>,
}

#[pymethods]
impl CrewMember {
    #[new]
    #[pyo3(signature = (id, name, department, off_days=None, off_weekdays=None))]
    pub fn new(
        id: String,
        name: String,
        department: String,
        off_days: Option<Vec<NaiveDate>>,
        off_weekdays: Option<Vec<u32>>,
    ) -> Self {
        Self {
            id,
            name,
            department,
            off_days: off_days.unwrap_or_default(),
            off_weekdays: off_weekdays.unwrap_or_default(),
        }
    }

    /// Whether the base schedule marks this member off on `date`.
    pub fn is_off(&self, date: NaiveDate) -> bool {
        self.off_days.contains(&date)
            || self
                .off_weekdays
                .contains(&date.weekday().num_days_from_monday())
    }

    fn __repr__(&self) -> String {
        format!(
            "CrewMember(id={:?}, department={:?}, off_days={})",
            self.id,
            self.department,
            self.off_days.len()
        )
    }
}

/// A single crew member working a shift on a date.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Assignment {
    #[pyo3(get, set)]
    pub date: NaiveDate,
    #[pyo3(get, set)]
    pub crew_id: String,
    #[pyo3(get, set)]
    pub shift: ShiftType,
}

#[pymethods]
impl Assignment {
    #[new]
    pub fn new(date: NaiveDate, crew_id: String, shift: ShiftType) -> Self {
        Self {
            date,
            crew_id,
            shift,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Assignment(date={}, crew_id={:?}, shift={})",
            self.date, self.crew_id, self.shift
        )
    }
}

/// A shift change handed to the notification gateway.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShiftNotification {
    #[pyo3(get)]
    pub crew_id: String,
    #[pyo3(get)]
    pub date: NaiveDate,
    #[pyo3(get)]
    pub new_shift: ShiftType,
    #[pyo3(get)]
    pub previous_shift: Option<ShiftType>,
}

#[pymethods]
impl ShiftNotification {
    fn __repr__(&self) -> String {
        format!(
            "ShiftNotification(crew_id={:?}, date={}, new_shift={}, previous_shift={:?})",
            self.crew_id,
            self.date,
            self.new_shift,
            self.previous_shift.map(|s| s.as_str())
        )
    }
}

/// A shift left below its required headcount.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnfilledSlot {
    #[pyo3(get)]
    pub date: NaiveDate,
    #[pyo3(get)]
    pub shift: ShiftType,
    #[pyo3(get)]
    pub required: usize,
    #[pyo3(get)]
    pub filled: usize,
}

#[pymethods]
impl UnfilledSlot {
    /// Number of crew still missing.
    pub fn missing(&self) -> usize {
        self.required.saturating_sub(self.filled)
    }

    fn __repr__(&self) -> String {
        format!(
            "UnfilledSlot(date={}, shift={}, filled={}/{})",
            self.date, self.shift, self.filled, self.required
        )
    }
}

/// Summary of a regenerate or complete pass.
#[pyclass]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RotaReport {
    #[pyo3(get)]
    pub dates_scheduled: usize,
    #[pyo3(get)]
    pub past_dates_skipped: usize,
    #[pyo3(get)]
    pub assignments_made: usize,
    #[pyo3(get)]
    pub unfilled: Vec<UnfilledSlot>,
    #[pyo3(get)]
    pub notifications_sent: usize,
    #[pyo3(get)]
    pub notification_failures: usize,
}

#[pymethods]
impl RotaReport {
    pub fn is_fully_staffed(&self) -> bool {
        self.unfilled.is_empty()
    }

    fn __repr__(&self) -> String {
        format!(
            "RotaReport(dates={}, assigned={}, unfilled={}, notified={})",
            self.dates_scheduled,
            self.assignments_made,
            self.unfilled.len(),
            self.notifications_sent
        )
    }
}

/// Result returned across the Python boundary.
#[pyclass]
#[derive(Clone, Debug, Default)]
pub struct RotaResult {
    #[pyo3(get)]
    pub assignments: Vec<Assignment>,
    #[pyo3(get)]
    pub notifications: Vec<ShiftNotification>,
    #[pyo3(get)]
    pub report: RotaReport,
}

#[pymethods]
impl RotaResult {
    fn __repr__(&self) -> String {
        format!(
            "RotaResult(assignments={}, notifications={})",
            self.assignments.len(),
            self.notifications.len()
        )
    }
}
