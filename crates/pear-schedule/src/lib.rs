//! # pear-schedule
//!
//! Scheduling time arithmetic for Pear coffee chats.
//!
//! Users mark half-hour availability slots per weekday, and matches are
//! assigned once a week on Sunday. This crate turns those slots into concrete
//! datetimes and answers whether a slot still fits in the current match
//! cycle. Every computation takes the reference "now" explicitly.
//!
//! ## Modules
//!
//! - [`weekday`] — Sunday-first weekday enumeration and parsing
//! - [`time_slot`] — Half-hour slots, `"H:MM"` labels, AM/PM tables
//! - [`resolver`] — Next/previous weekday occurrence, match-cycle queries
//! - [`schedule`] — Per-day availability and lapse checks
//! - [`error`] — Error types

pub mod error;
pub mod resolver;
pub mod schedule;
pub mod time_slot;
pub mod weekday;

pub use error::ScheduleError;
pub use resolver::{
    days_since_cycle_start, days_since_last_match_cycle, find_weekday_occurrence,
    is_within_next_calendar_day, next_cycle_start, next_match_cycle, next_occurrence,
    parse_rfc3339, parse_timezone, resolve_weekday_occurrence, ResolvedOccurrence,
    ResolverOptions, SearchDirection, WeekdayTimeResolver, MATCH_CYCLE_DAY,
};
pub use schedule::{
    active_schedules, active_schedules_for_cycle, has_schedule_lapsed,
    has_schedule_lapsed_for_cycle, DaySchedule,
};
pub use time_slot::{
    float_time_to_display_hours_minutes, float_time_to_hours_minutes, float_to_string_time,
    is_am, is_pm, meridiem_of_label, string_time_to_float, Meridiem, TimeOfDay, AM_LABELS,
    PM_LABELS,
};
pub use weekday::Weekday;
