use criterion::{black_box, criterion_group, criterion_main, Criterion};

use autoscale_rl_env::{
    transition, AllocationState, CloudEnv, CloudEnvConfig, DiurnalWorkload, Environment, ScalingAction,
    ScalingReward, WorkloadConfig,
};

fn bench_transition(c: &mut Criterion) {
    let config = CloudEnvConfig::default();
    let reward = ScalingReward::default();
    let mut workload = DiurnalWorkload::seeded(WorkloadConfig::default(), Some(1)).unwrap();
    let state = AllocationState::new(5, 0.6, 12, 10).unwrap();

    c.bench_function("transition", |b| {
        b.iter(|| {
            transition(
                black_box(&config),
                &reward,
                black_box(&state),
                ScalingAction::ScaleUp,
                &mut workload,
            )
        });
    });
}

fn bench_episode(c: &mut Criterion) {
    let mut env = CloudEnv::from_config(CloudEnvConfig {
        seed: Some(1),
        ..CloudEnvConfig::default()
    })
    .unwrap();

    c.bench_function("full_episode_noop", |b| {
        b.iter(|| {
            env.reset().unwrap();
            loop {
                let step = env.step(ScalingAction::NoOp).unwrap();
                if step.truncated {
                    break black_box(step.reward);
                }
            }
        });
    });
}

criterion_group!(benches, bench_transition, bench_episode);
criterion_main!(benches);
