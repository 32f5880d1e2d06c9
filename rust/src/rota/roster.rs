//! Read-only crew snapshot supplied by the crew directory.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

use crate::models::CrewMember;

use super::planner::RotaError;

/// Ordered crew list. Position in the roster is the final ranking tie-break.
#[derive(Clone, Debug, Default)]
pub struct CrewRoster {
    members: Vec<CrewMember>,
    index: FxHashMap<String, usize>,
}

impl CrewRoster {
    /// Build a roster, rejecting duplicate crew ids.
    pub fn new(members: Vec<CrewMember>) -> Result<Self, RotaError> {
        let mut index = FxHashMap::default();
        for (idx, member) in members.iter().enumerate() {
            if index.insert(member.id.clone(), idx).is_some() {
                return Err(RotaError::DuplicateCrewMember(member.id.clone()));
            }
        }
        Ok(Self { members, index })
    }

    pub fn get(&self, idx: usize) -> Option<&CrewMember> {
        self.members.get(idx)
    }

    pub fn index_of(&self, crew_id: &str) -> Option<usize> {
        self.index.get(crew_id).copied()
    }

    pub fn contains(&self, crew_id: &str) -> bool {
        self.index.contains_key(crew_id)
    }

    pub fn members(&self) -> &[CrewMember] {
        &self.members
    }

    pub fn iter(&self) -> impl Iterator<Item = &CrewMember> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Roster indices of crew not marked off on `date`, in roster order.
    pub fn available_on(&self, date: NaiveDate) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, member)| !member.is_off(date))
            .map(|(idx, _)| idx)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn member(id: &str, off_days: Vec<NaiveDate>) -> CrewMember {
        CrewMember::new(
            id.to_string(),
            id.to_uppercase(),
            "interior".to_string(),
            Some(off_days),
            None,
        )
    }

    #[test]
    fn test_lookup_by_id() {
        let roster = CrewRoster::new(vec![member("a", vec![]), member("b", vec![])]).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.index_of("b"), Some(1));
        assert!(roster.contains("a"));
        assert!(!roster.contains("z"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let result = CrewRoster::new(vec![member("a", vec![]), member("a", vec![])]);
        assert!(matches!(result, Err(RotaError::DuplicateCrewMember(id)) if id == "a"));
    }

    #[test]
    fn test_available_on_skips_off_days() {
        let roster = CrewRoster::new(vec![
            member("a", vec![d(2025, 3, 2)]),
            member("b", vec![]),
            member("c", vec![d(2025, 3, 1)]),
        ])
        .unwrap();
        assert_eq!(roster.available_on(d(2025, 3, 1)), vec![0, 1]);
        assert_eq!(roster.available_on(d(2025, 3, 2)), vec![1, 2]);
    }
}
