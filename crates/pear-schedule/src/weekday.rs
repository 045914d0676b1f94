//! Days of the week, numbered Sunday-first.
//!
//! Availability payloads name days as lowercase strings (`"monday"`), while
//! calendar arithmetic needs a 1-based index where Sunday is 1 and Saturday
//! is 7. [`Weekday`] is the bridge between the two and converts losslessly to
//! and from [`chrono::Weekday`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// A day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// All days in Sunday-first order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// The 1-based Sunday-first index (Sunday = 1, Saturday = 7).
    pub const fn index(self) -> u8 {
        match self {
            Weekday::Sunday => 1,
            Weekday::Monday => 2,
            Weekday::Tuesday => 3,
            Weekday::Wednesday => 4,
            Weekday::Thursday => 5,
            Weekday::Friday => 6,
            Weekday::Saturday => 7,
        }
    }

    /// Inverse of [`Weekday::index`]. Returns `None` outside 1..=7.
    pub const fn from_index(index: u8) -> Option<Weekday> {
        match index {
            1 => Some(Weekday::Sunday),
            2 => Some(Weekday::Monday),
            3 => Some(Weekday::Tuesday),
            4 => Some(Weekday::Wednesday),
            5 => Some(Weekday::Thursday),
            6 => Some(Weekday::Friday),
            7 => Some(Weekday::Saturday),
            _ => None,
        }
    }

    /// Lowercase full name, as used in availability payloads.
    pub const fn name(self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ScheduleError;

    /// Case-insensitive; accepts full names and common abbreviations.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sunday" | "sun" => Ok(Weekday::Sunday),
            "monday" | "mon" => Ok(Weekday::Monday),
            "tuesday" | "tue" | "tues" => Ok(Weekday::Tuesday),
            "wednesday" | "wed" => Ok(Weekday::Wednesday),
            "thursday" | "thu" | "thurs" => Ok(Weekday::Thursday),
            "friday" | "fri" => Ok(Weekday::Friday),
            "saturday" | "sat" => Ok(Weekday::Saturday),
            _ => Err(ScheduleError::InvalidWeekday(format!("'{}'", s.trim()))),
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Sun => Weekday::Sunday,
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
        }
    }
}

impl From<Weekday> for chrono::Weekday {
    fn from(day: Weekday) -> Self {
        match day {
            Weekday::Sunday => chrono::Weekday::Sun,
            Weekday::Monday => chrono::Weekday::Mon,
            Weekday::Tuesday => chrono::Weekday::Tue,
            Weekday::Wednesday => chrono::Weekday::Wed,
            Weekday::Thursday => chrono::Weekday::Thu,
            Weekday::Friday => chrono::Weekday::Fri,
            Weekday::Saturday => chrono::Weekday::Sat,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_sunday_first() {
        assert_eq!(Weekday::Sunday.index(), 1);
        assert_eq!(Weekday::Wednesday.index(), 4);
        assert_eq!(Weekday::Saturday.index(), 7);
    }

    #[test]
    fn test_index_round_trips_for_every_day() {
        for day in Weekday::ALL {
            assert_eq!(Weekday::from_index(day.index()), Some(day));
        }
        assert_eq!(Weekday::from_index(0), None);
        assert_eq!(Weekday::from_index(8), None);
    }

    #[test]
    fn test_index_matches_chrono_sunday_numbering() {
        for day in Weekday::ALL {
            let chrono_day: chrono::Weekday = day.into();
            assert_eq!(chrono_day.number_from_sunday(), u32::from(day.index()));
            assert_eq!(Weekday::from(chrono_day), day);
        }
    }

    #[test]
    fn test_parse_full_names_case_insensitive() {
        assert_eq!("monday".parse::<Weekday>().unwrap(), Weekday::Monday);
        assert_eq!("Friday".parse::<Weekday>().unwrap(), Weekday::Friday);
        assert_eq!(" SUNDAY ".parse::<Weekday>().unwrap(), Weekday::Sunday);
    }

    #[test]
    fn test_parse_abbreviations() {
        assert_eq!("tues".parse::<Weekday>().unwrap(), Weekday::Tuesday);
        assert_eq!("thu".parse::<Weekday>().unwrap(), Weekday::Thursday);
        assert_eq!("sat".parse::<Weekday>().unwrap(), Weekday::Saturday);
    }

    #[test]
    fn test_parse_unknown_returns_error() {
        let err = "notaday".parse::<Weekday>().unwrap_err().to_string();
        assert!(err.contains("Invalid weekday"), "got: {err}");
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Weekday::Thursday).unwrap();
        assert_eq!(json, "\"thursday\"");
        let day: Weekday = serde_json::from_str("\"saturday\"").unwrap();
        assert_eq!(day, Weekday::Saturday);
    }
}
