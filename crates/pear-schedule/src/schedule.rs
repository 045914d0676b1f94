//! Per-day availability and lapse checks against the weekly match cycle.
//!
//! A slot has lapsed when its next occurrence lands on or after the start of
//! the next match cycle: matches for the current week are already assigned
//! by then, so the slot can no longer be offered.

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScheduleError;
use crate::resolver::{next_cycle_start, next_occurrence, MATCH_CYCLE_DAY};
use crate::time_slot::TimeOfDay;
use crate::weekday::Weekday;

/// The slots a user marked available on one weekday.
///
/// `day` is kept as received, so a schedule with an unknown day name still
/// deserializes and is simply never considered lapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub day: String,
    pub times: Vec<TimeOfDay>,
}

impl DaySchedule {
    pub fn new(day: impl Into<String>, times: Vec<TimeOfDay>) -> Self {
        DaySchedule {
            day: day.into(),
            times,
        }
    }

    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidWeekday`] if `day` is not a weekday name.
    pub fn weekday(&self) -> Result<Weekday, ScheduleError> {
        self.day.parse()
    }

    /// The last slot of the day, if any.
    pub fn latest_time(&self) -> Option<TimeOfDay> {
        self.times.iter().copied().max()
    }

    /// Slot labels in clock order.
    pub fn labels(&self) -> Vec<String> {
        let mut times = self.times.clone();
        times.sort();
        times.into_iter().map(TimeOfDay::label).collect()
    }

    /// The next concrete datetime of every slot, in chronological order.
    /// Empty when `day` does not parse.
    pub fn next_slots<T: TimeZone>(&self, reference: &DateTime<T>) -> Vec<DateTime<T>> {
        let Ok(weekday) = self.weekday() else {
            return Vec::new();
        };
        let mut slots: Vec<DateTime<T>> = self
            .times
            .iter()
            .map(|time| next_occurrence(weekday, *time, reference))
            .collect();
        slots.sort();
        slots
    }

    pub fn has_lapsed<T: TimeZone>(&self, reference: &DateTime<T>) -> bool {
        has_schedule_lapsed(&self.day, &self.times, reference)
    }
}

/// Whether the latest of `times` on `day` is already past the current match
/// cycle, i.e. its next occurrence is on or after the next Sunday at midnight.
///
/// Returns `false` when `day` is not a weekday name or `times` is empty.
pub fn has_schedule_lapsed<T: TimeZone>(
    day: &str,
    times: &[TimeOfDay],
    reference: &DateTime<T>,
) -> bool {
    has_schedule_lapsed_for_cycle(day, times, MATCH_CYCLE_DAY, reference)
}

/// [`has_schedule_lapsed`] for a cycle starting on `cycle_day`.
pub fn has_schedule_lapsed_for_cycle<T: TimeZone>(
    day: &str,
    times: &[TimeOfDay],
    cycle_day: Weekday,
    reference: &DateTime<T>,
) -> bool {
    let weekday = match day.parse::<Weekday>() {
        Ok(weekday) => weekday,
        Err(e) => {
            debug!(error = %e, "treating schedule as not lapsed");
            return false;
        }
    };
    let Some(latest) = times.iter().copied().max() else {
        return false;
    };

    next_occurrence(weekday, latest, reference) >= next_cycle_start(cycle_day, reference)
}

/// Schedules that can still be offered this cycle: the day parses, at least
/// one slot is set, and the schedule has not lapsed.
pub fn active_schedules<'a, T: TimeZone>(
    schedules: &'a [DaySchedule],
    reference: &DateTime<T>,
) -> Vec<&'a DaySchedule> {
    active_schedules_for_cycle(schedules, MATCH_CYCLE_DAY, reference)
}

/// [`active_schedules`] for a cycle starting on `cycle_day`.
pub fn active_schedules_for_cycle<'a, T: TimeZone>(
    schedules: &'a [DaySchedule],
    cycle_day: Weekday,
    reference: &DateTime<T>,
) -> Vec<&'a DaySchedule> {
    schedules
        .iter()
        .filter(|schedule| schedule.weekday().is_ok() && !schedule.times.is_empty())
        .filter(|schedule| {
            !has_schedule_lapsed_for_cycle(&schedule.day, &schedule.times, cycle_day, reference)
        })
        .collect()
}
