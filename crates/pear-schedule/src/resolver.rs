//! Weekday occurrence resolution against an explicit reference instant.
//!
//! Every function here takes the reference "now" as an argument instead of
//! reading the system clock, so results are reproducible. The only clock
//! reads live in the `*_now` helpers on [`WeekdayTimeResolver`].
//!
//! # Search rules
//!
//! [`resolve_weekday_occurrence`] first checks whether the reference's own
//! calendar day already satisfies the search (right weekday, slot time
//! strictly after the reference going forward, strictly before going
//! backward). Otherwise it walks day by day in the search direction until
//! the weekday matches. Local times that fall in a DST gap resolve to the
//! nearest valid moment in the search direction. Local times that occur
//! twice prefer the earlier instant going forward and the later instant
//! going backward.

use chrono::{DateTime, Datelike, Days, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::ScheduleError;
use crate::schedule::{self, DaySchedule};
use crate::time_slot::TimeOfDay;
use crate::weekday::Weekday;

/// The weekday weekly matches are assigned on.
pub const MATCH_CYCLE_DAY: Weekday = Weekday::Sunday;

/// Days scanned before giving up. One week always suffices; the slack
/// covers zones whose transitions skip whole days.
const SEARCH_WINDOW_DAYS: u64 = 14;

/// Upper bound on how far a DST gap is walked, in minutes.
const MAX_GAP_MINUTES: i64 = 24 * 60;

/// Which way to search from the reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDirection {
    Forward,
    Backward,
}

impl SearchDirection {
    /// Whether `candidate` lies strictly on the search side of `reference`.
    fn is_beyond<A: TimeZone, B: TimeZone>(
        self,
        candidate: &DateTime<A>,
        reference: &DateTime<B>,
    ) -> bool {
        match self {
            SearchDirection::Forward => candidate > reference,
            SearchDirection::Backward => candidate < reference,
        }
    }
}

// ── Core search ─────────────────────────────────────────────────────────────

/// Find the nearest `weekday` at `time` strictly after (forward) or strictly
/// before (backward) `reference`, in the reference's timezone.
///
/// Returns `None` only if the calendar cannot produce a date, which does not
/// happen for representable Gregorian dates away from the chrono bounds.
pub fn find_weekday_occurrence<T: TimeZone>(
    direction: SearchDirection,
    weekday: Weekday,
    time: TimeOfDay,
    reference: &DateTime<T>,
) -> Option<DateTime<T>> {
    let tz = reference.timezone();
    let target: chrono::Weekday = weekday.into();
    let start = reference.date_naive();
    let clock = time.to_naive_time();

    for offset in 0..=SEARCH_WINDOW_DAYS {
        let date = match direction {
            SearchDirection::Forward => start.checked_add_days(Days::new(offset))?,
            SearchDirection::Backward => start.checked_sub_days(Days::new(offset))?,
        };
        if date.weekday() != target {
            continue;
        }
        let found = local_candidates(&tz, date.and_time(clock), direction)
            .into_iter()
            .find(|candidate| direction.is_beyond(candidate, reference));
        if found.is_some() {
            if offset == 0 {
                debug!(%weekday, time = %time, ?direction, "reference day satisfies search");
            }
            return found;
        }
    }
    None
}

/// Like [`find_weekday_occurrence`], but falls back to `reference` itself
/// when no date can be constructed. The fallback is logged, never raised.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use pear_schedule::{resolve_weekday_occurrence, SearchDirection, TimeOfDay, Weekday};
///
/// // Wednesday afternoon
/// let now = Utc.with_ymd_and_hms(2026, 2, 18, 15, 0, 0).unwrap();
/// let slot = TimeOfDay::new(2.0).unwrap();
/// let next = resolve_weekday_occurrence(SearchDirection::Forward, Weekday::Sunday, slot, &now);
/// assert_eq!(next, Utc.with_ymd_and_hms(2026, 2, 22, 2, 0, 0).unwrap());
/// ```
pub fn resolve_weekday_occurrence<T: TimeZone>(
    direction: SearchDirection,
    weekday: Weekday,
    time: TimeOfDay,
    reference: &DateTime<T>,
) -> DateTime<T> {
    find_weekday_occurrence(direction, weekday, time, reference).unwrap_or_else(|| {
        warn!(
            %weekday,
            time = %time,
            ?direction,
            "no matching date could be computed; falling back to the reference instant"
        );
        reference.clone()
    })
}

/// The next `weekday` at `time` after `reference`.
pub fn next_occurrence<T: TimeZone>(
    weekday: Weekday,
    time: TimeOfDay,
    reference: &DateTime<T>,
) -> DateTime<T> {
    resolve_weekday_occurrence(SearchDirection::Forward, weekday, time, reference)
}

/// Start (midnight) of the next cycle that begins on `cycle_day`.
pub fn next_cycle_start<T: TimeZone>(cycle_day: Weekday, reference: &DateTime<T>) -> DateTime<T> {
    next_occurrence(cycle_day, TimeOfDay::MIDNIGHT, reference)
}

/// Start (midnight) of the next weekly match cycle.
pub fn next_match_cycle<T: TimeZone>(reference: &DateTime<T>) -> DateTime<T> {
    next_cycle_start(MATCH_CYCLE_DAY, reference)
}

/// Whole days elapsed since the most recent midnight of `cycle_day`.
pub fn days_since_cycle_start<T: TimeZone>(cycle_day: Weekday, reference: &DateTime<T>) -> i64 {
    let last = resolve_weekday_occurrence(
        SearchDirection::Backward,
        cycle_day,
        TimeOfDay::MIDNIGHT,
        reference,
    );
    (reference.naive_local() - last.naive_local()).num_days()
}

/// Whole days elapsed since the last weekly match cycle began.
pub fn days_since_last_match_cycle<T: TimeZone>(reference: &DateTime<T>) -> i64 {
    days_since_cycle_start(MATCH_CYCLE_DAY, reference)
}

/// Whether `date` falls on the reference's calendar day or the day after.
///
/// Both instants are reduced to calendar days in the reference's timezone.
/// Dates on earlier days also count, since only the upper bound is checked.
pub fn is_within_next_calendar_day<A: TimeZone, T: TimeZone>(
    date: &DateTime<A>,
    reference: &DateTime<T>,
) -> bool {
    let day = date.with_timezone(&reference.timezone()).date_naive();
    (day - reference.date_naive()).num_days() <= 1
}

/// Map a local wall-clock time to instants, in order of preference.
fn local_candidates<T: TimeZone>(
    tz: &T,
    naive: NaiveDateTime,
    direction: SearchDirection,
) -> Vec<DateTime<T>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => vec![dt],
        LocalResult::Ambiguous(earliest, latest) => match direction {
            SearchDirection::Forward => vec![earliest, latest],
            SearchDirection::Backward => vec![latest, earliest],
        },
        LocalResult::None => skip_gap(tz, naive, direction).into_iter().collect(),
    }
}

/// Walk out of a DST gap minute by minute in the search direction.
fn skip_gap<T: TimeZone>(
    tz: &T,
    naive: NaiveDateTime,
    direction: SearchDirection,
) -> Option<DateTime<T>> {
    let step = match direction {
        SearchDirection::Forward => chrono::Duration::minutes(1),
        SearchDirection::Backward => chrono::Duration::minutes(-1),
    };
    let mut probe = naive;
    for _ in 0..MAX_GAP_MINUTES {
        probe = probe.checked_add_signed(step)?;
        let mapped = tz.from_local_datetime(&probe);
        let resolved = match direction {
            SearchDirection::Forward => mapped.earliest(),
            SearchDirection::Backward => mapped.latest(),
        };
        if resolved.is_some() {
            return resolved;
        }
    }
    None
}

// ── Resolver with configuration ─────────────────────────────────────────────

/// Options for [`WeekdayTimeResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// IANA timezone whose calendar days and wall clock are used.
    pub timezone: Tz,
    /// Weekday the weekly match cycle starts on.
    pub match_cycle_day: Weekday,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        ResolverOptions {
            timezone: chrono_tz::America::New_York,
            match_cycle_day: MATCH_CYCLE_DAY,
        }
    }
}

impl ResolverOptions {
    /// Replace the timezone by IANA name.
    ///
    /// # Errors
    ///
    /// Returns [`ScheduleError::InvalidTimezone`] for unknown names.
    pub fn with_timezone(mut self, name: &str) -> Result<Self, ScheduleError> {
        self.timezone = parse_timezone(name)?;
        Ok(self)
    }

    pub fn with_match_cycle_day(mut self, day: Weekday) -> Self {
        self.match_cycle_day = day;
        self
    }
}

/// A resolved occurrence, ready for display or serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedOccurrence {
    /// The instant in UTC (RFC 3339).
    pub resolved_utc: String,
    /// The instant in the resolver's timezone (RFC 3339 with offset).
    pub resolved_local: String,
    /// The IANA timezone name used.
    pub timezone: String,
    /// Human-readable form (e.g., "Sunday, February 22, 2026 at 2:00 AM EST").
    pub interpretation: String,
    /// True when no date could be computed and the anchor was returned.
    pub fell_back: bool,
}

impl ResolvedOccurrence {
    fn new(dt: &DateTime<Tz>, fell_back: bool) -> Self {
        ResolvedOccurrence {
            resolved_utc: dt.with_timezone(&Utc).to_rfc3339(),
            resolved_local: dt.to_rfc3339(),
            timezone: dt.timezone().name().to_string(),
            interpretation: dt.format("%A, %B %-d, %Y at %-I:%M %p %Z").to_string(),
            fell_back,
        }
    }
}

/// Scheduling queries bound to a timezone and match-cycle weekday.
#[derive(Debug, Clone, Default)]
pub struct WeekdayTimeResolver {
    options: ResolverOptions,
}

impl WeekdayTimeResolver {
    pub fn new(options: ResolverOptions) -> Self {
        WeekdayTimeResolver { options }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// The anchor expressed in the configured timezone.
    pub fn local(&self, anchor: DateTime<Utc>) -> DateTime<Tz> {
        anchor.with_timezone(&self.options.timezone)
    }

    pub fn resolve(
        &self,
        direction: SearchDirection,
        weekday: Weekday,
        time: TimeOfDay,
        anchor: DateTime<Utc>,
    ) -> DateTime<Tz> {
        resolve_weekday_occurrence(direction, weekday, time, &self.local(anchor))
    }

    /// Resolve and package the result, recording whether the fallback fired.
    pub fn occurrence(
        &self,
        direction: SearchDirection,
        weekday: Weekday,
        time: TimeOfDay,
        anchor: DateTime<Utc>,
    ) -> ResolvedOccurrence {
        let local = self.local(anchor);
        match find_weekday_occurrence(direction, weekday, time, &local) {
            Some(dt) => ResolvedOccurrence::new(&dt, false),
            None => {
                warn!(%weekday, time = %time, ?direction, "falling back to the anchor instant");
                ResolvedOccurrence::new(&local, true)
            }
        }
    }

    pub fn next_occurrence(
        &self,
        weekday: Weekday,
        time: TimeOfDay,
        anchor: DateTime<Utc>,
    ) -> DateTime<Tz> {
        self.resolve(SearchDirection::Forward, weekday, time, anchor)
    }

    pub fn next_occurrence_now(&self, weekday: Weekday, time: TimeOfDay) -> DateTime<Tz> {
        self.next_occurrence(weekday, time, Utc::now())
    }

    pub fn next_match_cycle(&self, anchor: DateTime<Utc>) -> DateTime<Tz> {
        next_cycle_start(self.options.match_cycle_day, &self.local(anchor))
    }

    pub fn days_since_last_match_cycle(&self, anchor: DateTime<Utc>) -> i64 {
        days_since_cycle_start(self.options.match_cycle_day, &self.local(anchor))
    }

    pub fn days_since_last_match_cycle_now(&self) -> i64 {
        self.days_since_last_match_cycle(Utc::now())
    }

    pub fn is_within_next_calendar_day(&self, date: DateTime<Utc>, anchor: DateTime<Utc>) -> bool {
        is_within_next_calendar_day(&date, &self.local(anchor))
    }

    pub fn has_schedule_lapsed(&self, day: &str, times: &[TimeOfDay], anchor: DateTime<Utc>) -> bool {
        schedule::has_schedule_lapsed_for_cycle(
            day,
            times,
            self.options.match_cycle_day,
            &self.local(anchor),
        )
    }

    pub fn has_schedule_lapsed_now(&self, day: &str, times: &[TimeOfDay]) -> bool {
        self.has_schedule_lapsed(day, times, Utc::now())
    }

    /// Schedules that are still bookable in the current match cycle.
    pub fn active_schedules<'a>(
        &self,
        schedules: &'a [DaySchedule],
        anchor: DateTime<Utc>,
    ) -> Vec<&'a DaySchedule> {
        schedule::active_schedules_for_cycle(
            schedules,
            self.options.match_cycle_day,
            &self.local(anchor),
        )
    }
}

// ── Parsing helpers ─────────────────────────────────────────────────────────

/// Parse an RFC 3339 datetime string into `DateTime<Utc>`.
pub fn parse_rfc3339(s: &str) -> Result<DateTime<Utc>, ScheduleError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ScheduleError::InvalidDatetime(format!("'{}': {}", s, e)))
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz, ScheduleError> {
    s.parse::<Tz>()
        .map_err(|_| ScheduleError::InvalidTimezone(format!("'{}'", s)))
}
