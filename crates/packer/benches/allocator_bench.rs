//! Benchmarks for greedy allocation.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use u_binfit_packer::{Allocation, Allocator, Bin, GreedyPacker, Shipment};

fn workload() -> (Vec<Shipment>, Vec<Bin>) {
    let shipments: Vec<Shipment> = (0..20)
        .map(|i| {
            let side = 1.0 + (i % 5) as f64;
            Shipment::new(format!("S{}", i), side, side, side)
                .with_weight(2.0)
                .with_quantity(25)
        })
        .collect();

    let bins: Vec<Bin> = (0..10)
        .map(|i| Bin::new(format!("B{}", i), 10.0, 10.0, 10.0).with_max_weight(200.0))
        .collect();

    (shipments, bins)
}

fn allocator_benchmark(c: &mut Criterion) {
    let (shipments, bins) = workload();
    let packer = GreedyPacker::default_config();

    c.bench_function("allocate_500_units_10_bins", |b| {
        b.iter(|| {
            let result = packer.allocate(black_box(&shipments), black_box(&bins));
            black_box(result)
        })
    });

    c.bench_function("snapshots_500_units_10_bins", |b| {
        b.iter(|| {
            let mut allocation =
                Allocation::new(shipments.clone(), bins.clone()).expect("valid workload");
            black_box(allocation.snapshots().count())
        })
    });
}

criterion_group!(benches, allocator_benchmark);
criterion_main!(benches);
