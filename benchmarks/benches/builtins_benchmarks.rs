use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rython_runtime::builtins::{self, MinMaxOptions};
use rython_runtime::collections::{Dict, List};
use rython_runtime::{Args, BuiltinId, Value, call_builtin, call_method};

fn int_list(len: i64) -> Value {
    Value::list((0..len).map(|n| Value::from((n * 7919) % 1000)))
}

// ============================================================================
// Aggregation Benchmarks
// ============================================================================

fn benchmark_aggregation(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregation");

    for size in [100, 10_000] {
        let xs = int_list(size);
        group.bench_with_input(BenchmarkId::new("sum", size), &xs, |b, xs| {
            b.iter(|| builtins::sum(black_box(xs), Value::from(0)).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("max", size), &xs, |b, xs| {
            b.iter(|| {
                builtins::max(std::slice::from_ref(black_box(xs)), &MinMaxOptions::default())
                    .unwrap()
            });
        });
        group.bench_with_input(BenchmarkId::new("sorted", size), &xs, |b, xs| {
            b.iter(|| builtins::sorted(black_box(xs), None, false).unwrap());
        });
    }

    // Key function goes through dynamic dispatch for every element
    let words = Value::list((0..1000).map(|n| Value::from("x".repeat(n % 17))));
    let key = rython_runtime::Callable::builtin(BuiltinId::Len);
    group.bench_function("sorted_key_len", |b| {
        b.iter(|| builtins::sorted(black_box(&words), Some(&key), false).unwrap());
    });

    group.finish();
}

// ============================================================================
// Iteration Benchmarks
// ============================================================================

fn benchmark_iteration(c: &mut Criterion) {
    let mut group = c.benchmark_group("iteration");

    let range = builtins::range(&[Value::from(10_000)]).unwrap();
    group.bench_function("list_of_range", |b| {
        b.iter(|| builtins::make_list(Some(black_box(&range))).unwrap());
    });

    let xs = int_list(10_000);
    group.bench_function("enumerate_zip", |b| {
        b.iter(|| {
            let pairs = builtins::enumerate(black_box(&xs), &Value::from(0)).unwrap();
            let zipped = builtins::zip(&[pairs, xs.clone()]).unwrap();
            builtins::make_list(Some(&zipped)).unwrap()
        });
    });

    group.finish();
}

// ============================================================================
// Container Benchmarks
// ============================================================================

fn benchmark_containers(c: &mut Criterion) {
    let mut group = c.benchmark_group("containers");

    group.bench_function("list_append_10k", |b| {
        b.iter(|| {
            let list = List::new();
            for n in 0..10_000 {
                list.append(Value::from(n));
            }
            list
        });
    });

    group.bench_function("dict_insert_lookup_1k", |b| {
        b.iter(|| {
            let dict = Dict::new();
            for n in 0..1000 {
                dict.set_item(Value::from(format!("key{n}")), Value::from(n)).unwrap();
            }
            for n in 0..1000 {
                black_box(dict.get_item(&Value::from(format!("key{n}"))).unwrap());
            }
        });
    });

    let nested = Value::list((0..200).map(|n| {
        Value::tuple([Value::from(n), Value::from(format!("item {n}")), Value::from(0.5)])
    }));
    group.bench_function("repr_nested", |b| {
        b.iter(|| black_box(&nested).repr());
    });

    group.finish();
}

// ============================================================================
// Dynamic Dispatch Benchmarks
// ============================================================================

fn benchmark_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    let text = Value::from("  alpha beta gamma delta  ");
    group.bench_function("call_builtin_len", |b| {
        b.iter(|| call_builtin(BuiltinId::Len, Args::new(vec![black_box(text.clone())])).unwrap());
    });
    group.bench_function("call_builtin_print_keywords", |b| {
        let sink = Box::new(std::io::sink());
        let previous = builtins::redirect_stdout(sink);
        b.iter(|| {
            let args = Args::new(vec![text.clone(), Value::from(1)])
                .keyword("sep", ",")
                .keyword("end", "");
            call_builtin(BuiltinId::Print, black_box(args)).unwrap()
        });
        builtins::restore_stdout();
        if let Some(previous) = previous {
            builtins::redirect_stdout(previous);
        }
    });
    group.bench_function("int_parse", |b| {
        let literal = Value::from("-1_234_567");
        b.iter(|| builtins::to_int(black_box(&literal), None).unwrap());
    });
    group.bench_function("str_split_method", |b| {
        b.iter(|| call_method(black_box(&text), "split", Args::default()).unwrap());
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_aggregation,
    benchmark_iteration,
    benchmark_containers,
    benchmark_dispatch
);
criterion_main!(benches);
