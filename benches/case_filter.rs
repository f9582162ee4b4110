//! Benchmarks for the case list filter and export table shaping.

use casedesk::backend::{Case, CaseStatus, ExportRow};
use casedesk::export::ExportTable;
use casedesk::state::filter::{CaseFilter, StatusFilter};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fake::{Fake, Faker};
use serde_json::json;

fn cases(count: usize) -> Vec<Case> {
    (0..count)
        .map(|i| Case {
            title: format!("Case {} {}", i, Faker.fake::<String>()),
            status: CaseStatus::ALL[i % CaseStatus::ALL.len()],
            ..Faker.fake()
        })
        .collect()
}

fn bench_visible_cases(c: &mut Criterion) {
    let cases = cases(5_000);

    let mut by_status = CaseFilter::default();
    by_status.set_status_filter(StatusFilter::Only(CaseStatus::Pending));
    c.bench_function("visible_cases_status_5000", |b| {
        b.iter(|| by_status.visible_cases(black_box(&cases)).len())
    });

    let mut by_search = CaseFilter::default();
    by_search.set_search_text("case 12");
    c.bench_function("visible_cases_search_5000", |b| {
        b.iter(|| by_search.visible_cases(black_box(&cases)).len())
    });
}

fn bench_export_table(c: &mut Criterion) {
    let columns: Vec<String> = ["id", "title", "status", "location", "created_at"]
        .iter()
        .map(|key| key.to_string())
        .collect();
    let rows: Vec<ExportRow> = (0..1_000)
        .map(|i| {
            json!({
                "id": i,
                "title": format!("Case {}", i),
                "status": "pending",
                "location": null,
                "created_at": "2025-05-03T14:07:59Z",
            })
            .as_object()
            .cloned()
            .unwrap_or_default()
        })
        .collect();
    c.bench_function("export_table_build_1000", |b| {
        b.iter(|| ExportTable::build(black_box(&columns), black_box(&rows)))
    });
}

criterion_group!(benches, bench_visible_cases, bench_export_table);
criterion_main!(benches);
