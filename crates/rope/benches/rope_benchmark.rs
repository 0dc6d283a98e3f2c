use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rope::Rope;
use std::hint::black_box;

const SIZES: [usize; 3] = [1_000, 10_000, 100_000];

fn sample_text(size: usize) -> String {
    "lorem ipsum dolor\n".repeat(size / 18 + 1)[..size].to_string()
}

fn bench_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("creation");

    for size in SIZES {
        let text = sample_text(size);
        group.throughput(Throughput::Bytes(size as u64));

        group.bench_with_input(BenchmarkId::new("rope", size), &text, |b, text| {
            b.iter(|| black_box(Rope::from(black_box(text.as_str()))))
        });
        group.bench_with_input(BenchmarkId::new("ropey", size), &text, |b, text| {
            b.iter(|| black_box(ropey::Rope::from_str(black_box(text.as_str()))))
        });
    }
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(1));

    for size in SIZES {
        let text = sample_text(size);
        for (place, index) in [("beginning", 0), ("middle", size / 2), ("end", size)] {
            group.bench_function(BenchmarkId::new(format!("rope_{place}"), size), |b| {
                b.iter_batched(
                    || Rope::from(text.as_str()),
                    |mut rope| {
                        rope.insert(black_box(index), black_box("INSERTED")).unwrap();
                        rope
                    },
                    BatchSize::SmallInput,
                )
            });
            group.bench_function(BenchmarkId::new(format!("ropey_{place}"), size), |b| {
                b.iter_batched(
                    || ropey::Rope::from_str(text.as_str()),
                    |mut ropey| {
                        ropey.insert(black_box(index), black_box("INSERTED"));
                        ropey
                    },
                    BatchSize::SmallInput,
                )
            });
            group.bench_function(BenchmarkId::new(format!("string_{place}"), size), |b| {
                b.iter_batched(
                    || text.clone(),
                    |mut string| {
                        string.insert_str(black_box(index), black_box("INSERTED"));
                        string
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("remove");

    for size in SIZES {
        let text = sample_text(size);
        let span = size / 10;
        let range = size / 2 - span / 2..size / 2 + span / 2;
        group.throughput(Throughput::Elements(span as u64));

        group.bench_function(BenchmarkId::new("rope_middle", size), |b| {
            b.iter_batched(
                || Rope::from(text.as_str()),
                |mut rope| {
                    rope.remove(black_box(range.clone())).unwrap();
                    rope
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(BenchmarkId::new("ropey_middle", size), |b| {
            b.iter_batched(
                || ropey::Rope::from_str(text.as_str()),
                |mut ropey| {
                    ropey.remove(black_box(range.clone()));
                    ropey
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_function(BenchmarkId::new("string_middle", size), |b| {
            b.iter_batched(
                || text.clone(),
                |mut string| {
                    string.replace_range(black_box(range.clone()), "");
                    string
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_lines(c: &mut Criterion) {
    let mut group = c.benchmark_group("line_start");

    for size in SIZES {
        let text = sample_text(size);
        let rope = Rope::from(text.as_str());
        let ropey = ropey::Rope::from_str(text.as_str());
        let line = rope.line_count() / 2;

        group.bench_with_input(BenchmarkId::new("rope", size), &rope, |b, rope| {
            b.iter(|| black_box(rope.line_start(black_box(line)).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("ropey", size), &ropey, |b, ropey| {
            b.iter(|| black_box(ropey.line_to_char(black_box(line))))
        });
    }
    group.finish();
}

fn bench_typing(c: &mut Criterion) {
    let mut group = c.benchmark_group("typing");

    // one character at a time in the middle, with and without a final rebalance
    for rebalance in [false, true] {
        let name = if rebalance { "rope_rebalanced" } else { "rope" };
        group.bench_function(name, |b| {
            b.iter_batched(
                || Rope::from(sample_text(10_000).as_str()),
                |mut rope| {
                    for i in 0..500 {
                        rope.insert(5_000 + i, "x").unwrap();
                    }
                    if rebalance {
                        rope.rebalance();
                    }
                    black_box(rope.substring(4_900..5_600).unwrap())
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_creation,
    bench_insert,
    bench_remove,
    bench_lines,
    bench_typing
);
criterion_main!(benches);
