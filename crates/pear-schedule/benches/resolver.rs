use chrono::{TimeZone, Utc};
use chrono_tz::America::New_York;
use criterion::{criterion_group, criterion_main, Criterion};
use pear_schedule::{
    active_schedules, next_occurrence, resolve_weekday_occurrence, DaySchedule, SearchDirection,
    TimeOfDay, Weekday,
};
use std::hint::black_box;

fn bench_resolve(c: &mut Criterion) {
    let reference = New_York.with_ymd_and_hms(2026, 3, 7, 12, 0, 0).unwrap();
    let slot = TimeOfDay::new(2.5).unwrap();

    c.bench_function("next_occurrence_utc", |b| {
        let utc = Utc.with_ymd_and_hms(2026, 2, 18, 15, 0, 0).unwrap();
        b.iter(|| next_occurrence(black_box(Weekday::Sunday), black_box(slot), black_box(&utc)))
    });

    // Crosses the spring-forward gap.
    c.bench_function("next_occurrence_dst_gap", |b| {
        b.iter(|| next_occurrence(black_box(Weekday::Sunday), black_box(slot), black_box(&reference)))
    });

    c.bench_function("previous_occurrence_tz", |b| {
        b.iter(|| {
            resolve_weekday_occurrence(
                SearchDirection::Backward,
                black_box(Weekday::Monday),
                black_box(slot),
                black_box(&reference),
            )
        })
    });
}

fn bench_active_schedules(c: &mut Criterion) {
    let reference = Utc.with_ymd_and_hms(2026, 2, 18, 15, 0, 0).unwrap();
    let times: Vec<TimeOfDay> = (18..42)
        .map(|half| TimeOfDay::new(f64::from(half) / 2.0).unwrap())
        .collect();
    let schedules: Vec<DaySchedule> = Weekday::ALL
        .iter()
        .map(|day| DaySchedule::new(day.name(), times.clone()))
        .collect();

    c.bench_function("active_schedules_full_week", |b| {
        b.iter(|| active_schedules(black_box(&schedules), black_box(&reference)))
    });
}

criterion_group!(benches, bench_resolve, bench_active_schedules);
criterion_main!(benches);
