use chrono::{Duration, NaiveDate};
use coin_core::{DebtService, FixedClock, LedgerService, SummaryService};
use coin_domain::{AppData, GoalTier, RecordMode, Settings};
use coin_storage_json::{load_app_data_from_path, save_app_data_to_path};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tempfile::tempdir;

/// Two readings a day, an earning followed by a spend.
fn build_sample_ledger(days: usize) -> AppData {
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let clock = FixedClock::at_date(start);
    let mut data = LedgerService::initialize(10_000);
    let mut settings = Settings::default();
    settings.set_weekday_goals(GoalTier::Primary, [300, 500, 500, 500, 500, 500, 800]);
    data.settings = settings;

    let mut balance = 10_000;
    for idx in 0..days {
        let date = start + Duration::days(idx as i64);
        balance += 200 + (idx % 7) as i64 * 90;
        data = LedgerService::add_record(&data, date, balance, RecordMode::Add, &clock)
            .unwrap()
            .0;
        balance -= 50 + (idx % 5) as i64 * 20;
        let mode = [RecordMode::Premium, RecordMode::Pick, RecordMode::Serebo][idx % 3];
        data = LedgerService::add_record(&data, date, balance, mode, &clock)
            .unwrap()
            .0;
    }
    data
}

fn bench_debt(c: &mut Criterion) {
    let data = build_sample_ledger(black_box(1_500));
    let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

    c.bench_function("debt_3k_records", |b| {
        b.iter(|| {
            black_box(DebtService::calculate_debt(
                &data.records,
                &data.settings,
                today,
            ))
        })
    });
}

fn bench_summaries(c: &mut Criterion) {
    let data = build_sample_ledger(black_box(1_500));
    let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();

    c.bench_function("weekly_and_monthly_3k_records", |b| {
        b.iter(|| {
            black_box(SummaryService::weekly_stats(&data.records));
            black_box(SummaryService::monthly_stats(&data.records));
        })
    });

    c.bench_function("recent_days_30", |b| {
        b.iter(|| {
            black_box(SummaryService::recent_days(
                &data.records,
                &data.settings,
                today,
                30,
            ))
        })
    });
}

fn bench_store_io(c: &mut Criterion) {
    let data = build_sample_ledger(black_box(1_500));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("coin_ledger.json");

    c.bench_function("store_save_3k_records", |b| {
        b.iter(|| save_app_data_to_path(&data, &file_path).expect("save"))
    });

    save_app_data_to_path(&data, &file_path).expect("seed");

    c.bench_function("store_load_3k_records", |b| {
        b.iter(|| black_box(load_app_data_from_path(&file_path).expect("load")))
    });
}

criterion_group!(benches, bench_debt, bench_summaries, bench_store_io);
criterion_main!(benches);
