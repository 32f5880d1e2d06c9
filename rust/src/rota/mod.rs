//! Duty rota: crew roster, assignment table, rotation stats and the shift assigner.
//!
//! Data flows roster + table -> stats -> assigner -> table -> notification gateway.
//! `DutyRota` wraps the table with manual edits and a single-slot undo.

mod assigner;
mod notify;
mod planner;
mod roster;
mod stats;
mod table;

pub use assigner::ShiftAssigner;
pub use notify::{NotificationGateway, NotifyError, RecordingGateway};
pub use planner::{DutyRota, RotaError};
pub use roster::CrewRoster;
pub use stats::{CrewStats, RotationStats, ShiftCounts};
pub use table::AssignmentTable;
