use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use livetree_engine::{FormatKind, MarkdownRange, MarkdownStyle, parse_ranges_to_tree};

fn inline_heavy_input() -> (String, Vec<MarkdownRange>) {
    let mut text = String::new();
    let mut ranges = Vec::new();
    for _ in 0..200 {
        let base = text.len();
        text.push_str("tell @here that *status* is fine\n");
        ranges.push(MarkdownRange::new(FormatKind::MentionHere, base + 5, 5));
        ranges.push(MarkdownRange::new(FormatKind::Syntax, base + 16, 1));
        ranges.push(MarkdownRange::new(FormatKind::Bold, base + 17, 6));
        ranges.push(MarkdownRange::new(FormatKind::Syntax, base + 23, 1));
    }
    (text, ranges)
}

fn multiline_heavy_input() -> (String, Vec<MarkdownRange>) {
    // many short lines fully covered by overlapping blockquote spans, the
    // worst case for the merger
    let mut text = String::new();
    for _ in 0..400 {
        text.push_str("> quoted\n");
    }
    text.pop();
    let len = text.len();
    let ranges = vec![
        MarkdownRange::new(FormatKind::Blockquote, 0, len / 2),
        MarkdownRange::new(FormatKind::Blockquote, len / 4, len - len / 4),
    ];
    (text, ranges)
}

fn bench_compile(c: &mut Criterion) {
    let style = MarkdownStyle::default_style();

    let (text, ranges) = inline_heavy_input();
    c.bench_function("compile_inline_heavy", |b| {
        b.iter(|| parse_ranges_to_tree(black_box(&text), black_box(&ranges), &style, false))
    });

    let (text, ranges) = multiline_heavy_input();
    c.bench_function("compile_multiline_merge", |b| {
        b.iter(|| parse_ranges_to_tree(black_box(&text), black_box(&ranges), &style, false))
    });

    let plain: String = "plain text with no formatting at all\n".repeat(500);
    c.bench_function("compile_no_ranges_fast_path", |b| {
        b.iter(|| parse_ranges_to_tree(black_box(&plain), &[], &style, false))
    });
}

criterion_group!(benches, bench_compile);
criterion_main!(benches);
