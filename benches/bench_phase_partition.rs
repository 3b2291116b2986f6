// benches/bench_phase_partition.rs

use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use std::time::Duration;

use traffic_scheduler::{partition_phases, ConflictGraph, Direction, RoadNetwork};

// Builds a synthetic universe of `size` movements fanning out of four
// approaches, with a ring of conflicts (movement i conflicts with i+1) so
// the partitioner has real work to do.
fn build_universe(size: usize) -> (RoadNetwork, ConflictGraph) {
    let mut network = RoadNetwork::new();
    let directions = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];
    let mut movements = Vec::with_capacity(size);
    for i in 0..size {
        let from = network.register_lane(directions[i % 4], (i / 4) as u32);
        let to = network.register_lane(directions[(i + 1) % 4], (i / 4) as u32);
        movements.push(network.register_movement(from, to));
    }
    let mut conflicts = ConflictGraph::new(network.movement_count());
    for i in 0..size {
        conflicts
            .declare(movements[i], movements[(i + 1) % size])
            .unwrap();
    }
    (network, conflicts)
}

fn bench_partition(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_phases");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &size in [50, 100, 200].iter() {
        let (network, conflicts) = build_universe(size);
        group.bench_function(format!("size_{size}"), |b| {
            b.iter(|| black_box(partition_phases(&network, &conflicts)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_partition);
criterion_main!(benches);
