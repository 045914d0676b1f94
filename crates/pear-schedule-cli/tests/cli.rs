use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

// Wednesday, February 18, 2026, 15:00 UTC (10:00 EST)
const ANCHOR: &str = "2026-02-18T15:00:00Z";

fn pear() -> Command {
    let mut cmd = Command::cargo_bin("pear-schedule").unwrap();
    cmd.env_remove("PEAR_TIMEZONE");
    cmd
}

fn run_json(args: &[&str]) -> Value {
    let output = pear().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_next_resolves_in_default_timezone() {
    let json = run_json(&["next", "sunday", "14", "--at", ANCHOR]);
    assert_eq!(json["resolved_utc"], "2026-02-22T19:00:00+00:00");
    assert_eq!(json["resolved_local"], "2026-02-22T14:00:00-05:00");
    assert_eq!(json["timezone"], "America/New_York");
    assert_eq!(json["fell_back"], false);
}

#[test]
fn test_next_accepts_labels() {
    let json = run_json(&["next", "thursday", "1:30", "--timezone", "UTC", "--at", ANCHOR]);
    assert_eq!(json["resolved_utc"], "2026-02-19T13:30:00+00:00");
}

#[test]
fn test_previous_resolves_backward() {
    let json = run_json(&["previous", "monday", "9.5", "--timezone", "UTC", "--at", ANCHOR]);
    assert_eq!(json["resolved_utc"], "2026-02-16T09:30:00+00:00");
}

#[test]
fn test_timezone_from_env() {
    let output = pear()
        .env("PEAR_TIMEZONE", "Asia/Tokyo")
        .args(["next", "thursday", "9", "--at", ANCHOR])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["timezone"], "Asia/Tokyo");
    // The anchor is already Thursday 00:00 in Tokyo, so 9:00 is later today.
    assert_eq!(json["resolved_local"], "2026-02-19T09:00:00+09:00");
}

#[test]
fn test_days_since_match() {
    let json = run_json(&["days-since-match", "--timezone", "UTC", "--at", ANCHOR]);
    assert_eq!(json["days"], 3);
}

#[test]
fn test_next_match_with_custom_day() {
    let json = run_json(&[
        "next-match",
        "--timezone",
        "UTC",
        "--match-day",
        "friday",
        "--at",
        ANCHOR,
    ]);
    assert_eq!(json["resolved_utc"], "2026-02-20T00:00:00+00:00");
}

#[test]
fn test_lapsed() {
    let json = run_json(&["lapsed", "monday", "10", "--at", ANCHOR]);
    assert_eq!(json["lapsed"], true);
    let json = run_json(&["lapsed", "thursday", "9", "2:30", "--at", ANCHOR]);
    assert_eq!(json["lapsed"], false);
    assert_eq!(json["times"], serde_json::json!([9.0, 14.5]));
}

#[test]
fn test_lapsed_unknown_day_or_no_times_is_false() {
    let json = run_json(&["lapsed", "notaday", "9", "--at", ANCHOR]);
    assert_eq!(json["lapsed"], false);
    let json = run_json(&["lapsed", "monday", "--at", ANCHOR]);
    assert_eq!(json["lapsed"], false);
}

#[test]
fn test_within_day() {
    let json = run_json(&[
        "within-day",
        "2026-02-19T20:00:00Z",
        "--timezone",
        "UTC",
        "--at",
        ANCHOR,
    ]);
    assert_eq!(json["within_next_day"], true);
    let json = run_json(&[
        "within-day",
        "2026-02-20T20:00:00Z",
        "--timezone",
        "UTC",
        "--at",
        ANCHOR,
    ]);
    assert_eq!(json["within_next_day"], false);
}

#[test]
fn test_label_and_format() {
    let json = run_json(&["label", "1:30"]);
    assert_eq!(json["time"], 13.5);
    assert_eq!(json["meridiem"], "PM");
    let json = run_json(&["format", "13.5"]);
    assert_eq!(json["label"], "1:30");
}

#[test]
fn test_config_file() {
    let dir = std::env::temp_dir().join(format!("pear-schedule-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("options.json");
    std::fs::write(
        &path,
        r#"{"timezone": "Europe/London", "match_cycle_day": "monday"}"#,
    )
    .unwrap();

    let json = run_json(&[
        "days-since-match",
        "--config",
        path.to_str().unwrap(),
        "--at",
        ANCHOR,
    ]);
    assert_eq!(json["days"], 2);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn test_invalid_weekday_fails() {
    pear()
        .args(["next", "someday", "9", "--at", ANCHOR])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid weekday"));
}

#[test]
fn test_invalid_time_fails() {
    pear()
        .args(["format", "9.25"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time of day"));
    pear()
        .args(["label", "9:15"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time label"));
}

#[test]
fn test_invalid_timezone_fails() {
    pear()
        .args(["days-since-match", "--timezone", "Invalid/Zone", "--at", ANCHOR])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_invalid_anchor_fails() {
    pear()
        .args(["days-since-match", "--at", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid datetime"));
}
