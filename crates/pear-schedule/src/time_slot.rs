//! Half-hour availability slots.
//!
//! Slots travel over the wire as fractional hours in 24-hour form
//! (`13.5` is 1:30 PM) and are shown to users as 12-hour labels without an
//! AM/PM suffix (`"1:30"`). This module converts between the two.
//!
//! # Label tables
//!
//! Which labels are afternoon slots is decided by two fixed tables,
//! [`AM_LABELS`] and [`PM_LABELS`], rather than by parsing: `"1:30"` only
//! becomes `13.5` because it appears in the PM table. The tables are the
//! authority for the legacy `"H:MM"` label format. [`TimeOfDay::meridiem`]
//! derives the same information arithmetically for callers that start from
//! a number instead of a label.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Morning slot labels offered during onboarding.
pub const AM_LABELS: [&str; 6] = ["9:00", "9:30", "10:00", "10:30", "11:00", "11:30"];

/// Afternoon and evening slot labels offered during onboarding.
pub const PM_LABELS: [&str; 18] = [
    "12:00", "12:30", "1:00", "1:30", "2:00", "2:30", "3:00", "3:30", "4:00", "4:30", "5:00",
    "5:30", "6:00", "6:30", "7:00", "7:30", "8:00", "8:30",
];

/// Labels with an hour below this are shifted into the afternoon when they
/// appear in [`PM_LABELS`].
const FIRST_MORNING_HOUR: u32 = 9;

// ── TimeOfDay ───────────────────────────────────────────────────────────────

/// A wall-clock time at half-hour resolution.
///
/// Holds the number of half hours since midnight, so `13.5` is stored as
/// `27`. Serializes as the fractional hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct TimeOfDay {
    half_hours: u8,
}

impl TimeOfDay {
    /// Midnight, the hour the weekly match cycle starts at.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay { half_hours: 0 };

    /// Validate a fractional hour.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTimeOfDay`] unless `hours` is a
    /// multiple of 0.5 in `[0, 24)`.
    pub fn new(hours: f64) -> Result<Self, ScheduleError> {
        let doubled = hours * 2.0;
        if !hours.is_finite() || !(0.0..24.0).contains(&hours) || doubled.fract() != 0.0 {
            return Err(ScheduleError::InvalidTimeOfDay(format!(
                "{hours} (expected a multiple of 0.5 in [0, 24))"
            )));
        }
        Ok(TimeOfDay {
            half_hours: doubled as u8,
        })
    }

    /// Build from a 24-hour clock hour and a minute of 0 or 30.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour >= 24 || !matches!(minute, 0 | 30) {
            return None;
        }
        let half_hours = hour * 2 + minute / 30;
        Some(TimeOfDay {
            half_hours: half_hours as u8,
        })
    }

    /// The fractional hour (`13.5` for 1:30 PM).
    pub fn as_hours(self) -> f64 {
        f64::from(self.half_hours) / 2.0
    }

    /// 24-hour clock hour and minute.
    pub fn hours_minutes(self) -> (u32, u32) {
        float_time_to_hours_minutes(self.as_hours())
    }

    /// 12-hour display hour and minute (midnight shows as 12).
    pub fn display_hours_minutes(self) -> (u32, u32) {
        float_time_to_display_hours_minutes(self.as_hours())
    }

    /// AM/PM derived from the hour.
    pub fn meridiem(self) -> Meridiem {
        if self.half_hours < 24 {
            Meridiem::Am
        } else {
            Meridiem::Pm
        }
    }

    /// The `"H:MM"` label for this slot.
    pub fn label(self) -> String {
        float_to_string_time(self.as_hours())
    }

    pub fn to_naive_time(self) -> NaiveTime {
        let (hour, minute) = self.hours_minutes();
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
    }
}

impl TryFrom<f64> for TimeOfDay {
    type Error = ScheduleError;

    fn try_from(hours: f64) -> Result<Self, Self::Error> {
        TimeOfDay::new(hours)
    }
}

impl From<TimeOfDay> for f64 {
    fn from(time: TimeOfDay) -> Self {
        time.as_hours()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ── Meridiem ────────────────────────────────────────────────────────────────

/// Morning or afternoon half of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Meridiem {
    Am,
    Pm,
}

// ── Conversions ─────────────────────────────────────────────────────────────

/// Split a fractional hour into a 24-hour clock hour and a minute.
///
/// The minute is 30 whenever the value has a fractional part and 0
/// otherwise. Inputs finer than half an hour are not rejected: `9.25`
/// splits to `(9, 30)`. Use [`TimeOfDay::new`] to validate first.
pub fn float_time_to_hours_minutes(time: f64) -> (u32, u32) {
    let hours = time.trunc() as u32;
    let minutes = if time.ceil() != time { 30 } else { 0 };
    (hours, minutes)
}

/// Like [`float_time_to_hours_minutes`] but maps hour 0 to 12, for labels.
pub fn float_time_to_display_hours_minutes(time: f64) -> (u32, u32) {
    match float_time_to_hours_minutes(time) {
        (0, minutes) => (12, minutes),
        split => split,
    }
}

/// Whether `label` is one of the morning slot labels.
pub fn is_am(label: &str) -> bool {
    AM_LABELS.contains(&label)
}

/// Whether `label` is one of the afternoon slot labels.
pub fn is_pm(label: &str) -> bool {
    PM_LABELS.contains(&label)
}

/// Table lookup of a label's half of the day. `None` for unlisted labels.
pub fn meridiem_of_label(label: &str) -> Option<Meridiem> {
    if is_am(label) {
        Some(Meridiem::Am)
    } else if is_pm(label) {
        Some(Meridiem::Pm)
    } else {
        None
    }
}

/// Parse an `"H:MM"` label into a slot.
///
/// Labels listed in [`PM_LABELS`] with an hour below 9 are moved into the
/// afternoon, so `"1:30"` is `13.5` while `"9:00"` and `"12:00"` are left as
/// they are.
///
/// # Errors
///
/// Returns [`ScheduleError::InvalidTimeLabel`] if the label is not an hour
/// in 1..=12 followed by `:00` or `:30`.
pub fn string_time_to_float(label: &str) -> Result<TimeOfDay, ScheduleError> {
    let label = label.trim();
    let invalid = || ScheduleError::InvalidTimeLabel(format!("'{label}'"));

    let (hour_str, minute_str) = label.split_once(':').ok_or_else(invalid)?;
    if hour_str.is_empty() || !hour_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let hour: u32 = hour_str.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&hour) {
        return Err(invalid());
    }
    let minute = match minute_str {
        "00" => 0,
        "30" => 30,
        _ => return Err(invalid()),
    };

    let hour = if is_pm(label) && hour < FIRST_MORNING_HOUR {
        hour + 12
    } else {
        hour
    };
    TimeOfDay::from_hm(hour, minute).ok_or_else(invalid)
}

/// Format a fractional hour as a 12-hour `"H:MM"` label with no suffix.
pub fn float_to_string_time(time: f64) -> String {
    let (hours, minutes) = float_time_to_display_hours_minutes(time);
    let hours = if hours > 12 { hours - 12 } else { hours };
    format!("{hours}:{minutes:02}")
}
