use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};
use pear_schedule::{
    meridiem_of_label, parse_rfc3339, string_time_to_float, Meridiem, ResolverOptions,
    SearchDirection, TimeOfDay, Weekday, WeekdayTimeResolver,
};
use serde::Serialize;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(
    name = "pear-schedule",
    version,
    about = "Resolve Pear availability slots against the weekly match cycle"
)]
struct Cli {
    /// Reference instant as RFC 3339 (defaults to the current time)
    #[arg(long, global = true)]
    at: Option<String>,

    /// IANA timezone for calendar days and wall-clock times
    #[arg(long, global = true, env = "PEAR_TIMEZONE")]
    timezone: Option<String>,

    /// Weekday the weekly match cycle starts on
    #[arg(long, global = true)]
    match_day: Option<String>,

    /// JSON file with resolver options
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Next occurrence of a weekday at a slot time
    Next {
        /// Weekday name (e.g. "monday")
        day: String,
        /// Slot as a fractional hour ("13.5") or label ("1:30")
        time: String,
    },
    /// Most recent occurrence of a weekday at a slot time
    Previous {
        /// Weekday name (e.g. "monday")
        day: String,
        /// Slot as a fractional hour ("13.5") or label ("1:30")
        time: String,
    },
    /// Whole days since the last match cycle started
    DaysSinceMatch,
    /// Start of the next match cycle
    NextMatch,
    /// Whether a day's slots fall past the current match cycle
    Lapsed {
        /// Day name as stored in the schedule
        day: String,
        /// Slots as fractional hours or labels
        times: Vec<String>,
    },
    /// Whether a date is today or tomorrow
    WithinDay {
        /// RFC 3339 datetime
        date: String,
    },
    /// Convert an "H:MM" label to a fractional hour
    Label {
        label: String,
    },
    /// Convert a fractional hour to an "H:MM" label
    Format {
        time: f64,
    },
}

#[derive(Serialize)]
struct DaysOutput {
    days: i64,
}

#[derive(Serialize)]
struct LapsedOutput<'a> {
    day: &'a str,
    times: Vec<TimeOfDay>,
    lapsed: bool,
}

#[derive(Serialize)]
struct WithinDayOutput<'a> {
    date: &'a str,
    within_next_day: bool,
}

#[derive(Serialize)]
struct LabelOutput<'a> {
    label: &'a str,
    time: TimeOfDay,
    meridiem: Option<Meridiem>,
}

#[derive(Serialize)]
struct FormatOutput {
    time: TimeOfDay,
    label: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let options = load_options(&cli)?;
    debug!(
        timezone = %options.timezone.name(),
        match_day = %options.match_cycle_day,
        "resolver options"
    );
    let resolver = WeekdayTimeResolver::new(options);
    let anchor = resolve_anchor(cli.at.as_deref())?;

    match &cli.command {
        Command::Next { day, time } => {
            let occurrence = resolver.occurrence(
                SearchDirection::Forward,
                parse_weekday(day)?,
                parse_time(time)?,
                anchor,
            );
            print_json(&occurrence)
        }
        Command::Previous { day, time } => {
            let occurrence = resolver.occurrence(
                SearchDirection::Backward,
                parse_weekday(day)?,
                parse_time(time)?,
                anchor,
            );
            print_json(&occurrence)
        }
        Command::DaysSinceMatch => print_json(&DaysOutput {
            days: resolver.days_since_last_match_cycle(anchor),
        }),
        Command::NextMatch => {
            let cycle_day = resolver.options().match_cycle_day;
            let occurrence = resolver.occurrence(
                SearchDirection::Forward,
                cycle_day,
                TimeOfDay::MIDNIGHT,
                anchor,
            );
            print_json(&occurrence)
        }
        Command::Lapsed { day, times } => {
            let times = times
                .iter()
                .map(String::as_str)
                .map(parse_time)
                .collect::<Result<Vec<_>>>()?;
            let lapsed = resolver.has_schedule_lapsed(day, &times, anchor);
            print_json(&LapsedOutput { day, times, lapsed })
        }
        Command::WithinDay { date } => {
            let parsed = parse_rfc3339(date)?;
            print_json(&WithinDayOutput {
                date,
                within_next_day: resolver.is_within_next_calendar_day(parsed, anchor),
            })
        }
        Command::Label { label } => {
            let time = string_time_to_float(label)?;
            print_json(&LabelOutput {
                label,
                time,
                meridiem: meridiem_of_label(label.trim()),
            })
        }
        Command::Format { time } => {
            let time = TimeOfDay::new(*time)?;
            print_json(&FormatOutput {
                time,
                label: time.label(),
            })
        }
    }
}

fn setup_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set default tracing subscriber")
}

fn load_options(cli: &Cli) -> Result<ResolverOptions> {
    let mut options = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<ResolverOptions>(&raw)
                .with_context(|| format!("invalid config {}", path.display()))?
        }
        None => ResolverOptions::default(),
    };
    if let Some(tz) = &cli.timezone {
        options = options.with_timezone(tz)?;
    }
    if let Some(day) = &cli.match_day {
        options = options.with_match_cycle_day(parse_weekday(day)?);
    }
    Ok(options)
}

fn resolve_anchor(at: Option<&str>) -> Result<DateTime<Utc>> {
    match at {
        Some(s) => Ok(parse_rfc3339(s)?),
        None => Ok(Utc::now()),
    }
}

fn parse_weekday(s: &str) -> Result<Weekday> {
    Ok(s.parse::<Weekday>()?)
}

/// Labels contain a colon; anything else is read as a fractional hour.
fn parse_time(s: &str) -> Result<TimeOfDay> {
    if s.contains(':') {
        return Ok(string_time_to_float(s)?);
    }
    let hours: f64 = s
        .trim()
        .parse()
        .with_context(|| format!("invalid time '{s}'"))?;
    Ok(TimeOfDay::new(hours)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}
