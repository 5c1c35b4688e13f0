use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use cardflow::figure::{Card, FigureSpec, Flow, MergeGroup, ProcessSpec};
use cardflow::geometry::{PathOptions, Rect, curved_connector};
use cardflow::layout::compute_layout;
use cardflow::render::render_svg;
use cardflow::theme::Theme;
use cardflow::LayoutConfig;

fn wide_process(columns: usize, rows: usize) -> FigureSpec {
    let mut spec = ProcessSpec {
        title: Some("bench".to_string()),
        ..ProcessSpec::default()
    };
    for col in 0..columns {
        let cards = (0..rows)
            .map(|row| Card::new(&format!("c{col}r{row}"), &format!("Stage {col}.{row}")))
            .collect();
        spec.columns.push(cards);
    }
    for col in 0..columns.saturating_sub(1) {
        for row in 0..rows {
            spec.flows
                .push(Flow::new(&format!("c{col}r{row}"), &format!("c{}r{row}", col + 1)));
        }
    }
    if columns >= 2 && rows >= 2 {
        spec.merges.push(MergeGroup {
            sources: (0..rows).map(|row| format!("c0r{row}")).collect(),
            target: "c1r0".to_string(),
            gap: 10.0,
        });
    }
    FigureSpec::Process(spec)
}

fn bench_connectors(c: &mut Criterion) {
    let from = Rect::new(0.0, 0.0, 140.0, 48.0);
    let to = Rect::new(380.0, 120.0, 140.0, 48.0);
    let options = PathOptions::default();
    c.bench_function("curved_connector", |b| {
        b.iter(|| {
            let path = curved_connector(black_box(Some(from)), black_box(Some(to)), &options);
            black_box(path.to_string())
        })
    });
}

fn bench_process_figure(c: &mut Criterion) {
    let theme = Theme::modern();
    let config = LayoutConfig::default();
    let spec = wide_process(6, 4);
    c.bench_function("process_layout_and_render", |b| {
        b.iter(|| {
            let layout = compute_layout(black_box(&spec), &theme, &config);
            black_box(render_svg(&layout, &theme, &config))
        })
    });
}

criterion_group!(benches, bench_connectors, bench_process_figure);
criterion_main!(benches);
