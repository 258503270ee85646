//! Benchmarks for viewport rendering.

use std::hint::black_box;
use std::rc::Rc;

use criterion::{Criterion, criterion_group, criterion_main};
use kestrel::editor::TextBuffer;
use kestrel::highlight::CFamilyTokenizer;
use kestrel::terminal::{Terminal, TuiTerminal};
use kestrel::ui::viewport::Viewport;
use ratatui::backend::TestBackend;

fn sample_source(lines: usize) -> String {
    (0..lines)
        .map(|i| format!("int value_{i} = compute({i}, \"label\"); // line {i}"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_render_viewport(c: &mut Criterion) {
    let buffer = TextBuffer::from_text(&sample_source(500));
    let mut terminal = TuiTerminal::new(TestBackend::new(120, 40)).unwrap();
    terminal.initialize().unwrap();

    let mut plain = Viewport::new(39, 120);
    c.bench_function("render_plain", |b| {
        b.iter(|| plain.render(black_box(&buffer), &mut terminal))
    });

    let mut highlighted = Viewport::new(39, 120);
    highlighted.set_tokenizer(Some(Rc::new(CFamilyTokenizer::new())));
    c.bench_function("render_highlighted", |b| {
        b.iter(|| highlighted.render(black_box(&buffer), &mut terminal))
    });
}

criterion_group!(benches, bench_render_viewport);
criterion_main!(benches);
