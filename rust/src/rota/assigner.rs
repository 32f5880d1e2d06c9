//! Shift assigner: fills daily shift slots across a horizon.
//!
//! Dates are walked chronologically. For each date, shifts are staffed in
//! `ShiftType::ALL` order, each from the pool of available crew ranked by
//! `ranking::CandidateKey`. A member works at most one shift per date.
//! Shortfalls leave the shift understaffed and are listed in the report.

use chrono::NaiveDate;

use crate::calendar::normalize_horizon;
use crate::config::RotaConfig;
use crate::models::{RotaReport, ShiftType, UnfilledSlot};
use crate::ranking::rank_candidates;
use crate::{log_changes, log_checks, log_debug};

use super::notify::NotificationGateway;
use super::roster::CrewRoster;
use super::stats::RotationStats;
use super::table::AssignmentTable;

/// Deterministic duty-rotation heuristic.
///
/// Never schedules a date earlier than `today`.
#[derive(Clone, Debug)]
pub struct ShiftAssigner {
    config: RotaConfig,
    today: NaiveDate,
}

impl ShiftAssigner {
    pub fn new(config: RotaConfig, today: NaiveDate) -> Self {
        Self { config, today }
    }

    pub fn config(&self) -> &RotaConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Discard assignments on every schedulable horizon date and rebuild them.
    ///
    /// Stats start from zero, as if the horizon were empty. Dates before
    /// `today` keep whatever they hold.
    pub fn regenerate(
        &self,
        table: &mut AssignmentTable,
        horizon: &[NaiveDate],
        roster: &CrewRoster,
        gateway: &mut dyn NotificationGateway,
    ) -> RotaReport {
        let verbosity = self.config.verbosity;
        let previous = table.clone();
        let mut report = RotaReport::default();

        let dates = self.schedulable_dates(horizon, &mut report);
        table.clear_range(&dates);

        let mut stats = RotationStats::empty(roster);
        for date in dates {
            self.fill_date(table, &previous, roster, &mut stats, date, gateway, &mut report);
            stats.close_day(date, table);
        }

        log_changes!(
            verbosity,
            "Regenerated {} dates: {} assignments, {} unfilled shifts",
            report.dates_scheduled,
            report.assignments_made,
            report.unfilled.len()
        );
        report
    }

    /// Fill only the vacancies on schedulable horizon dates.
    ///
    /// Counts are seeded from everything already in the horizon. Streaks are
    /// rebuilt on the walk, so occupants of earlier dates (past ones included)
    /// shape the ranking of later ones.
    pub fn complete(
        &self,
        table: &mut AssignmentTable,
        horizon: &[NaiveDate],
        roster: &CrewRoster,
        gateway: &mut dyn NotificationGateway,
    ) -> RotaReport {
        let verbosity = self.config.verbosity;
        let previous = table.clone();
        let mut report = RotaReport::default();

        let horizon = normalize_horizon(horizon);
        let mut stats = RotationStats::from_table(roster, table, &horizon);
        stats.reset_streaks();

        for date in horizon {
            let occupants: Vec<(String, ShiftType)> = table
                .crew_on(date)
                .map(|(crew_id, shift)| (crew_id.to_string(), shift))
                .collect();
            for (crew_id, shift) in &occupants {
                stats.extend_streak(crew_id, date, *shift);
            }

            if date < self.today {
                report.past_dates_skipped += 1;
                log_checks!(verbosity, "{}: in the past, not filled", date);
            } else {
                report.dates_scheduled += 1;
                self.fill_date(table, &previous, roster, &mut stats, date, gateway, &mut report);
            }
            stats.close_day(date, table);
        }

        log_changes!(
            verbosity,
            "Completed {} dates: {} assignments, {} unfilled shifts",
            report.dates_scheduled,
            report.assignments_made,
            report.unfilled.len()
        );
        report
    }

    /// Normalized horizon dates on or after `today`.
    fn schedulable_dates(&self, horizon: &[NaiveDate], report: &mut RotaReport) -> Vec<NaiveDate> {
        let all = normalize_horizon(horizon);
        let total = all.len();
        let dates: Vec<NaiveDate> = all.into_iter().filter(|date| *date >= self.today).collect();

        report.dates_scheduled = dates.len();
        report.past_dates_skipped = total - dates.len();
        if report.past_dates_skipped > 0 {
            log_checks!(
                self.config.verbosity,
                "Skipping {} dates before {}",
                report.past_dates_skipped,
                self.today
            );
        }
        dates
    }

    fn is_capped(&self, stats: &RotationStats, crew_id: &str, date: NaiveDate) -> bool {
        self.config
            .max_consecutive_days
            .is_some_and(|max| stats.is_capped(crew_id, date, max))
    }

    /// Staff every shift of one date up to its headcount.
    #[allow(clippy::too_many_arguments)]
    fn fill_date(
        &self,
        table: &mut AssignmentTable,
        previous: &AssignmentTable,
        roster: &CrewRoster,
        stats: &mut RotationStats,
        date: NaiveDate,
        gateway: &mut dyn NotificationGateway,
        report: &mut RotaReport,
    ) {
        let verbosity = self.config.verbosity;

        let mut available: Vec<usize> = roster
            .available_on(date)
            .into_iter()
            .filter(|&idx| {
                roster.get(idx).is_some_and(|member| {
                    !table.is_assigned(date, &member.id) && !self.is_capped(stats, &member.id, date)
                })
            })
            .collect();
        log_checks!(verbosity, "{}: {} crew available", date, available.len());

        let mut placed_today: Vec<(String, ShiftType)> = Vec::new();

        for shift in ShiftType::ALL {
            let required = self.config.headcount(shift);
            let filled = table.headcount(date, shift);
            let vacancy = required.saturating_sub(filled);

            let mut placed = 0;
            if vacancy > 0 {
                let ranked = rank_candidates(&available, roster, stats, shift);
                for key in ranked.into_iter().take(vacancy) {
                    let Some(member) = roster.get(key.roster_index) else {
                        continue;
                    };
                    log_debug!(verbosity, "  {} {} key={:?}", date, member.id, key);

                    table.assign(date, member.id.clone(), shift);
                    stats.record(&member.id, date, shift);
                    available.retain(|&idx| idx != key.roster_index);
                    placed_today.push((member.id.clone(), shift));
                    placed += 1;

                    log_changes!(verbosity, "{}: {} -> {}", date, member.id, shift);
                }
            }

            if filled + placed < required {
                log_checks!(
                    verbosity,
                    "{}: {} understaffed ({}/{})",
                    date,
                    shift,
                    filled + placed,
                    required
                );
                report.unfilled.push(UnfilledSlot {
                    date,
                    shift,
                    required,
                    filled: filled + placed,
                });
            }
        }

        report.assignments_made += placed_today.len();

        for (crew_id, shift) in placed_today {
            let previous_shift = previous.shift_of(date, &crew_id);
            if previous_shift == Some(shift) {
                continue;
            }
            match gateway.notify_shift_change(&crew_id, date, shift, previous_shift) {
                Ok(()) => report.notifications_sent += 1,
                Err(err) => {
                    report.notification_failures += 1;
                    log_changes!(verbosity, "{}: {}", date, err);
                }
            }
        }
    }
}
