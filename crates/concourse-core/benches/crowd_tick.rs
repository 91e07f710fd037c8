use concourse_core::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use std::time::Duration;

fn bench_crowd_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("crowd_tick");
    group.measurement_time(Duration::from_secs(5));

    // Ticks per bench iteration (can override via CONCOURSE_BENCH_TICKS)
    let ticks: usize = std::env::var("CONCOURSE_BENCH_TICKS")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(60);

    for &agents in &[100_usize, 1000, 5000] {
        group.bench_function(format!("ticks{}_agents{}", ticks, agents), |b| {
            b.iter_batched(
                || {
                    let config = CrowdConfig {
                        agent_count: agents,
                        seed: 0xBEEF,
                        ..CrowdConfig::default()
                    };
                    CrowdSimulation::new(config).expect("default lounge config is valid")
                },
                |mut sim| {
                    for _ in 0..ticks {
                        sim.tick(black_box(1.0 / 60.0));
                    }
                    sim
                },
                BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn bench_pose(c: &mut Criterion) {
    let mut sim = CrowdSimulation::new(CrowdConfig::default()).expect("default lounge config is valid");
    for _ in 0..60 {
        sim.tick(1.0 / 60.0);
    }
    c.bench_function("pose_all_agents", |b| {
        b.iter(|| {
            for i in 0..sim.agent_count() {
                black_box(sim.pose(i));
            }
        })
    });
}

criterion_group!(benches, bench_crowd_ticks, bench_pose);
criterion_main!(benches);
