//! Error types for pear-schedule parsing boundaries.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScheduleError {
    #[error("Invalid weekday: {0}")]
    InvalidWeekday(String),

    #[error("Invalid time of day: {0}")]
    InvalidTimeOfDay(String),

    #[error("Invalid time label: {0}")]
    InvalidTimeLabel(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
