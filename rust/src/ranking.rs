//! Candidate ranking for shift slots.
//!
//! Candidates are ordered ascending by a composite key:
//! 1. consecutive days worked (spreads fatigue)
//! 2. prior assignments to the shift being filled (spreads shift-type exposure)
//! 3. total assignments (spreads overall load)
//! 4. roster position (stable tie-break)

use std::cmp::Ordering;

use crate::models::ShiftType;
use crate::rota::{CrewRoster, CrewStats, RotationStats};

/// Sort key for one candidate and one shift. Lower = picked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateKey {
    pub consecutive_days: u32,
    pub shift_count: u32,
    pub total: u32,
    pub roster_index: usize,
}

impl CandidateKey {
    pub fn new(roster_index: usize, stats: &CrewStats, shift: ShiftType) -> Self {
        Self {
            consecutive_days: stats.consecutive_days,
            shift_count: stats.per_shift.get(shift),
            total: stats.total,
            roster_index,
        }
    }
}

impl Ord for CandidateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.consecutive_days
            .cmp(&other.consecutive_days)
            .then(self.shift_count.cmp(&other.shift_count))
            .then(self.total.cmp(&other.total))
            .then(self.roster_index.cmp(&other.roster_index))
    }
}

impl PartialOrd for CandidateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Rank roster indices for `shift`, best candidate first.
///
/// Indices outside the roster are dropped.
pub fn rank_candidates(
    candidates: &[usize],
    roster: &CrewRoster,
    stats: &RotationStats,
    shift: ShiftType,
) -> Vec<CandidateKey> {
    let empty = CrewStats::default();
    let mut keys: Vec<CandidateKey> = candidates
        .iter()
        .filter_map(|&idx| {
            let member = roster.get(idx)?;
            let crew_stats = stats.get(&member.id).unwrap_or(&empty);
            Some(CandidateKey::new(idx, crew_stats, shift))
        })
        .collect();

    keys.sort();
    keys
}
