use std::fs;
use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gcode_model::{parse_line, render, Document, ParsedLine, ParsedLines};

/// Generate G-code content of different patterns for benchmarking
fn generate_gcode_content(lines: usize, pattern: &str) -> String {
    let mut content = String::new();

    match pattern {
        "movement_heavy" => {
            for i in 0..lines {
                content.push_str(&format!(
                    "G1 X{:.3} Y{:.3} Z{:.3} E{:.3} F1500\n",
                    (i as f32) * 0.1,
                    (i as f32) * 0.2,
                    (i as f32) * 0.05,
                    (i as f32) * 0.02
                ));
            }
        }
        "field_heavy" => {
            for i in 0..lines {
                content.push_str(&format!(
                    "M205 S{} T{} B20000 X{:.1} Y{:.1} Z0.4 E4.5\n",
                    i % 10,
                    i % 5,
                    (i % 10) as f32,
                    (i % 8) as f32,
                ));
            }
        }
        "comment_heavy" => {
            for i in 0..lines {
                content.push_str(&format!(
                    "G1 X{:.1} Y{:.1} ; Move to position {}, layer {}\n",
                    (i as f32) * 0.1,
                    (i as f32) * 0.1,
                    i,
                    i / 100
                ));
            }
        }
        "mixed" => {
            for i in 0..lines {
                match i % 5 {
                    0 => content.push_str(&format!(
                        "G1 X{:.3} Y{:.3} F1500\n",
                        (i as f32) * 0.1,
                        (i as f32) * 0.2
                    )),
                    1 => content.push_str(&format!(";LAYER:{}\n", i / 5)),
                    2 => content.push_str(&format!("M104 S{} T{}\n", 200 + (i % 50), i % 2)),
                    3 => content.push_str(&format!("M73 P{} R{}\n", i % 100, 100 - i % 100)),
                    4 => content.push_str(&format!("T{}\n", i % 4)),
                    _ => unreachable!(),
                }
            }
        }
        _ => {
            for i in 0..lines {
                content.push_str(&format!("G1 X{} Y{}\n", i, i));
            }
        }
    }

    content
}

/// Benchmark parsing single lines with different patterns
fn bench_single_line_parsing(c: &mut Criterion) {
    let test_lines = vec![
        ("simple_move", "G1 X10 Y20"),
        ("complex_move", "G1 X123.456 Y789.012 Z0.3 E2.85714 F1500"),
        ("field_heavy", "M205 S0 T0 B20000 X10 Y10 Z0.4 E4.5"),
        ("with_comment", "G1 X10 Y20 ; Move to next position"),
        (
            "comment_only",
            "; This is a comment line with some detailed information",
        ),
        ("temperature", "M104 S210 T0"),
        ("home_command", "G28 X Y Z"),
        ("tool_change", "Tx"),
        ("unknown", "M999 X1 Y2"),
    ];

    let mut group = c.benchmark_group("single_line_parsing");

    for (name, line) in test_lines {
        group.bench_with_input(BenchmarkId::new("parse_line", name), &line, |b, line| {
            b.iter(|| black_box(parse_line(black_box(line))))
        });
    }

    group.finish();
}

/// Benchmark parsing files of different sizes
fn bench_file_parsing(c: &mut Criterion) {
    let file_sizes = vec![100, 1_000, 10_000, 100_000];
    let patterns = vec!["movement_heavy", "field_heavy", "comment_heavy", "mixed"];

    let mut group = c.benchmark_group("file_parsing");

    for &size in &file_sizes {
        for pattern in &patterns {
            let content = generate_gcode_content(size, pattern);

            group.throughput(Throughput::Elements(size as u64));
            group.bench_with_input(
                BenchmarkId::new(format!("{}_{}", pattern, size), size),
                &content,
                |b, content| b.iter(|| black_box(Document::parse(black_box(content)))),
            );
        }
    }

    group.finish();
}

/// Benchmark streaming through a reader against batching the whole file
fn bench_streaming(c: &mut Criterion) {
    let content = generate_gcode_content(10_000, "mixed");

    let mut group = c.benchmark_group("streaming");
    group.throughput(Throughput::Bytes(content.len() as u64));

    group.bench_function("parsed_lines", |b| {
        b.iter(|| {
            let count = ParsedLines::new(Cursor::new(content.as_bytes()))
                .filter_map(Result::ok)
                .filter(|line| matches!(line, ParsedLine::Command(_)))
                .count();
            black_box(count)
        })
    });
    group.bench_function("document", |b| {
        b.iter(|| black_box(Document::parse(black_box(&content)).commands().count()))
    });

    group.finish();
}

/// Benchmark canonical rendering of parsed commands
fn bench_rendering(c: &mut Criterion) {
    let content = generate_gcode_content(10_000, "mixed");
    let document = Document::parse(&content);

    let mut group = c.benchmark_group("rendering");
    group.throughput(Throughput::Elements(document.len() as u64));

    group.bench_function("render_commands", |b| {
        b.iter(|| {
            for command in document.commands() {
                black_box(render(command));
            }
        })
    });
    group.bench_function("render_document", |b| b.iter(|| black_box(document.render())));

    group.finish();
}

/// Benchmark parsing real G-code files from the fixtures
fn bench_real_files(c: &mut Criterion) {
    let fixture_files = vec!["tests/fixtures/sample_prusa.gcode"];

    let mut group = c.benchmark_group("real_files");

    for file_path in fixture_files {
        if let Ok(content) = fs::read_to_string(file_path) {
            let file_name = file_path.split('/').next_back().unwrap_or("unknown");

            group.throughput(Throughput::Bytes(content.len() as u64));
            group.bench_with_input(
                BenchmarkId::new("real_file", file_name),
                &content,
                |b, content| b.iter(|| black_box(Document::parse(black_box(content)))),
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_line_parsing,
    bench_file_parsing,
    bench_streaming,
    bench_rendering,
    bench_real_files
);
criterion_main!(benches);
