//! Performance benchmarks for the billing engine.
//!
//! Covers the per-record calculation, batch billing at increasing sizes and
//! the annexure layout of a billed batch.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use billing_engine::annexure::build_annexures;
use billing_engine::calculation::{
    bill_record, run_billing, BillingContext, ChargeDefaults, ChargeResolver,
};
use billing_engine::models::{AttendanceRecord, BillingMonth, ChargeRule};

const CLIENTS: [&str; 4] = ["Ravi Kumar", "Meera Iyer", "Anita Desai", "Sunil Rao"];

fn billing_month() -> BillingMonth {
    BillingMonth::new(2026, 2).unwrap()
}

fn create_charges() -> ChargeResolver {
    let rules = CLIENTS
        .iter()
        .map(|party| ChargeRule {
            responsible_party: party.to_string(),
            position: String::new(),
            charge_type: Some("Percent".to_string()),
            charge_value: Decimal::new(8, 0),
            application_mode: Some("Proportionate".to_string()),
        })
        .collect();
    ChargeResolver::new(rules, ChargeDefaults::recurring())
}

/// A balanced February 2026 record on a "21-20" cycle with a five-day week.
///
/// 21 Jan to 20 Feb spans 31 days with 8 weekend days, so present days plus
/// holidays must come to 23.
fn create_record(index: usize) -> AttendanceRecord {
    let party = CLIENTS[index % CLIENTS.len()];
    let company = format!("Client {:02}", index % 20);
    let mut record = AttendanceRecord::new(
        party,
        &company,
        &format!("E{:05}", index),
        &format!("Employee {}", index),
        Decimal::from(25_000 + (index % 50) as i64 * 500),
    );
    record.billing_cycle = "21-20".to_string();
    record.workweek = "5 days".to_string();
    record.present_days = Decimal::from(22);
    record.holidays = Decimal::ONE;
    record.tax_jurisdiction = Some(if index % 3 == 0 { "IGST" } else { "CGST/SGST" }.to_string());
    record
}

fn create_records(count: usize) -> Vec<AttendanceRecord> {
    (0..count).map(create_record).collect()
}

/// Benchmark: Single record calculation.
fn bench_single_record(c: &mut Criterion) {
    let charges = create_charges();
    let ctx = BillingContext::new(billing_month(), &charges);
    let record = create_record(1);

    c.bench_function("single_record", |b| {
        b.iter(|| black_box(bill_record(black_box(&record), &ctx)))
    });
}

/// Benchmark: Batch billing at increasing sizes.
fn bench_batch(c: &mut Criterion) {
    let charges = create_charges();
    let ctx = BillingContext::new(billing_month(), &charges);

    let mut group = c.benchmark_group("batch_billing");

    for count in [10, 100, 1000].iter() {
        let records = create_records(*count);

        group.throughput(Throughput::Elements(*count as u64));
        group.bench_with_input(BenchmarkId::new("records", count), count, |b, _| {
            b.iter(|| black_box(run_billing(&records, &ctx)))
        });
    }

    group.finish();
}

/// Benchmark: Annexure layout for a billed batch of 1000 records.
fn bench_annexures(c: &mut Criterion) {
    let charges = create_charges();
    let ctx = BillingContext::new(billing_month(), &charges);
    let run = run_billing(&create_records(1000), &ctx);

    let mut group = c.benchmark_group("annexure_layout");
    group.throughput(Throughput::Elements(run.line_items.len() as u64));
    group.sample_size(20);

    group.bench_function("build_annexures_1000", |b| {
        b.iter(|| black_box(build_annexures(&run.line_items)))
    });

    group.finish();
}

criterion_group!(benches, bench_single_record, bench_batch, bench_annexures);
criterion_main!(benches);
