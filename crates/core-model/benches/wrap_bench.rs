use core_model::wrap::{LayoutRequest, WrapMode, cursor_display_row, layout};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn sample_text() -> String {
    (0..2_000)
        .map(|i| format!("line {i}: {}\n", "lorem ipsum dolor sit amet ".repeat(i % 7)))
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let text = sample_text();
    let split = text.chars().count() / 2;
    let before: Vec<char> = text.chars().take(split).collect();
    let after: Vec<char> = text.chars().skip(split).collect();

    c.bench_function("wrap_layout_mid_document", |b| {
        let req = LayoutRequest {
            top_row: 3_000,
            ..LayoutRequest::new(80, 40, WrapMode::Wrap)
        };
        b.iter(|| {
            layout(
                black_box(&req),
                before.iter().copied(),
                after.iter().copied(),
            )
        })
    });

    c.bench_function("nowrap_layout_mid_document", |b| {
        let req = LayoutRequest {
            top_row: 980,
            left_offset: 20,
            ..LayoutRequest::new(80, 40, WrapMode::NoWrap)
        };
        b.iter(|| {
            layout(
                black_box(&req),
                before.iter().copied(),
                after.iter().copied(),
            )
        })
    });

    c.bench_function("cursor_display_row", |b| {
        b.iter(|| cursor_display_row(before.iter().copied(), black_box(80), WrapMode::Wrap))
    });
}

criterion_group!(benches, bench_layout);
criterion_main!(benches);
