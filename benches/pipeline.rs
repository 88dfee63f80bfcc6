//! Benchmarks for the dusk pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use dusk::config::Config;
use dusk::css::parse_stylesheet;
use dusk::transform::transform;

/// A small handwritten stylesheet, a few rules with mixed literals.
const SMALL: &str = "\
body { color: #333; background: #fff; }
a { color: #06c; text-decoration: none; }
.card { box-shadow: 0 1px 2px rgba(0, 0, 0, 0.3); border: 1px solid #ccc; }
.overlay { background: rgba(255, 255, 255, 0.75); }
";

/// Generate a stylesheet with `rules` rules cycling through grayscale
/// hex codes, named colors, rgba() overlays, and nested media blocks.
fn synthetic_stylesheet(rules: usize) -> String {
    let mut css = String::new();
    for i in 0..rules {
        let shade = (i * 7) % 256;
        match i % 4 {
            0 => css.push_str(&format!(
                ".c{i} {{ color: #{shade:02x}{shade:02x}{shade:02x}; margin: 0 auto; }}\n"
            )),
            1 => css.push_str(&format!(
                ".c{i} {{ background: rgba({shade}, {shade}, {shade}, 0.8); }}\n"
            )),
            2 => css.push_str(&format!(
                ".c{i} {{ border: 1px solid silver; box-shadow: 0 1px 2px #000; }}\n"
            )),
            _ => css.push_str(&format!(
                "@media (min-width: 40em) {{ .c{i} {{ color: #{shade:02x}{shade:02x}{shade:02x}; }} }}\n"
            )),
        }
    }
    css
}

fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");

    let medium = synthetic_stylesheet(200);

    group.bench_function("parse_small", |b| {
        b.iter(|| parse_stylesheet(black_box(SMALL)).unwrap())
    });

    group.bench_function("parse_medium", |b| {
        b.iter(|| parse_stylesheet(black_box(&medium)).unwrap())
    });

    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");

    let config = Config::default();
    let hsl_config = Config {
        use_hsl_variables: true,
        ..Config::default()
    };
    let medium = synthetic_stylesheet(200);
    let large = synthetic_stylesheet(2000);

    group.bench_function("transform_small", |b| {
        b.iter(|| transform(black_box(SMALL), &config))
    });

    group.bench_function("transform_medium", |b| {
        b.iter(|| transform(black_box(&medium), &config))
    });

    group.bench_function("transform_medium_hsl", |b| {
        b.iter(|| transform(black_box(&medium), &hsl_config))
    });

    group.bench_function("transform_large", |b| {
        b.iter(|| transform(black_box(&large), &config))
    });

    group.finish();
}

criterion_group!(benches, bench_parsing, bench_transform);
criterion_main!(benches);
