// benches/bench_discharge_model.rs

use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::time::Duration;

use traffic_scheduler::{DischargeModel, TimingConfig};

// Benchmark discharge sampling for increasingly long phase budgets. The loop
// count grows linearly with the budget, so this doubles as a sanity check
// that the sampling stays cheap.
fn bench_cars_through(c: &mut Criterion) {
    let mut group = c.benchmark_group("cars_through");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    for &phase_seconds in [30.0, 120.0, 600.0].iter() {
        let model = DischargeModel::new(TimingConfig {
            phase_seconds,
            ..TimingConfig::default()
        });
        group.bench_function(format!("phase_{phase_seconds}s"), |b| {
            let mut rng = SmallRng::seed_from_u64(42);
            b.iter(|| black_box(model.cars_through(&mut rng)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cars_through);
criterion_main!(benches);
