//! Transpile pipeline benchmarks.
//!
//! Measures parse + lower + passes + print for marker-heavy sources.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use idx_emitter::{EmitOptions, PassOrder, transpile};

const SIMPLE_SOURCE: &str = r#"
import idx from 'idx';
const name = idx(props, _ => _.user.profile.name);
const first = idx(props, _ => _.items[0].label);
"#;

const ASYNC_SOURCE: &str = r#"
import idx from 'idx';
async function load(api, id) {
    const response = await api.fetch(id);
    const body = await idx(response, _ => _.body.json());
    return idx(body, _ => _.data.attributes[id].value);
}
const render = async (props) => idx(await props, _ => _.view.render(...props.args)());
"#;

/// Generate a file with `functions` functions, each holding one chain of
/// `depth` links.
fn generate_marker_source(functions: usize, depth: usize) -> String {
    let mut source = String::with_capacity(functions * (depth * 4 + 64));
    source.push_str("import idx from 'idx';\n\n");
    for f in 0..functions {
        source.push_str(&format!("function get{f}(props) {{\n    return idx(props, _ => _"));
        for d in 0..depth {
            match d % 3 {
                0 => source.push_str(&format!(".p{d}")),
                1 => source.push_str(&format!("[k{d}]")),
                _ => source.push_str("()"),
            }
        }
        source.push_str(");\n}\n\n");
    }
    source
}

fn bench_transpile_simple(c: &mut Criterion) {
    let options = EmitOptions::default();
    c.bench_function("transpile_simple", |b| {
        b.iter(|| black_box(transpile("bench.js", SIMPLE_SOURCE, &options)))
    });
}

fn bench_transpile_async(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpile_async");
    for order in [PassOrder::IdxFirst, PassOrder::AsyncFirst] {
        let options = EmitOptions {
            lower_async: true,
            pass_order: order,
            ..EmitOptions::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(order), &options, |b, options| {
            b.iter(|| black_box(transpile("bench.js", ASYNC_SOURCE, options)))
        });
    }
    group.finish();
}

fn bench_transpile_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpile_throughput");
    let options = EmitOptions::default();
    for functions in [10, 100, 1000] {
        let source = generate_marker_source(functions, 12);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(functions), &source, |b, source| {
            b.iter(|| black_box(transpile("bench.js", source, &options)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_transpile_simple,
    bench_transpile_async,
    bench_transpile_throughput
);
criterion_main!(benches);
