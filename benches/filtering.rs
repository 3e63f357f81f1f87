use bikestat::{
    filters::{FilterCriteria, WorkingDayFilter, apply_filters},
    types::{RentalRecord, WeatherCategory},
};
use chrono::{Datelike, Duration, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn create_test_records() -> Vec<RentalRecord> {
    let start = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
    (0..731 * 24)
        .map(|i| {
            let date = start + Duration::days(i as i64 / 24);
            let weekday = date.weekday().num_days_from_sunday() as u8;
            RentalRecord::new(
                date,
                (date.year() - 2011) as u8,
                date.month() as u8,
                (i % 24) as u8,
                weekday,
                weekday != 0 && weekday != 6,
                WeatherCategory::ALL[i % 4],
                (i % 50) as u64,
                (i % 300) as u64,
                (i % 50 + i % 300) as u64,
            )
            .unwrap()
        })
        .collect()
}

fn benchmark_filters(c: &mut Criterion) {
    let records = create_test_records();

    c.bench_function("filter unrestricted", |b| {
        let criteria = FilterCriteria::new();
        b.iter(|| apply_filters(black_box(&records), &criteria).unwrap())
    });

    c.bench_function("filter all clauses", |b| {
        let criteria = FilterCriteria::new()
            .with_year(1)
            .with_months([6, 7, 8])
            .with_working_day(WorkingDayFilter::Working)
            .with_weather([WeatherCategory::Clear, WeatherCategory::Mist])
            .with_date_range(
                NaiveDate::from_ymd_opt(2012, 6, 15).unwrap(),
                NaiveDate::from_ymd_opt(2012, 8, 15).unwrap(),
            );
        b.iter(|| apply_filters(black_box(&records), &criteria).unwrap())
    });
}

criterion_group!(benches, benchmark_filters);
criterion_main!(benches);
