use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use ansiblereg_inventory::{encode, Group, Host, Registry};

/// Registry with `groups` groups of `hosts` hosts each, plus one children group
/// referencing every group by value.
fn build_registry(groups: usize, hosts: usize) -> Registry {
    let mut registry = Registry::new();
    let mut children = Group::new("cluster:children");

    for g in 0..groups {
        let mut group = Group::new(format!("group-{g}"));
        for h in 0..hosts {
            let mut host = Host::new(format!("10.{g}.0.{h}"));
            host.set_variable("ansible_user", "ubuntu");
            host.set_variable("index", h as u64);
            group.add_entity(host).unwrap();
        }
        children.add_entity(group.clone()).unwrap();
        registry.add_group(group).unwrap();
    }

    registry.add_group(children).unwrap();
    registry
}

fn bench_commit_serialization(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_serialization");

    for size in [1usize, 10, 50].iter() {
        let registry = build_registry(*size, 20);
        group.throughput(Throughput::Elements((*size * 20) as u64));

        group.bench_with_input(BenchmarkId::new("to_json", size), &registry, |b, registry| {
            b.iter(|| black_box(serde_json::to_string_pretty(registry).unwrap()));
        });

        let text = serde_json::to_string_pretty(&registry).unwrap();
        group.bench_with_input(BenchmarkId::new("from_json", size), &text, |b, text| {
            b.iter(|| black_box(serde_json::from_str::<Registry>(text).unwrap()));
        });
    }

    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("inventory_encode");

    for size in [1usize, 10, 50].iter() {
        let registry = build_registry(*size, 20);
        group.throughput(Throughput::Elements((*size * 20) as u64));
        group.bench_with_input(BenchmarkId::new("encode", size), &registry, |b, registry| {
            b.iter(|| black_box(encode(registry).unwrap()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_commit_serialization, bench_encode);
criterion_main!(benches);
