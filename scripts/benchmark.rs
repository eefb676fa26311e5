// scripts/benchmark.rs
//! Wall-clock benchmark for the path engines.
//!
//! Run with `cargo run --release --bin benchmark`. Compares the CPU and
//! lane targets over both schemes at several ensemble sizes.

use sde_paths::models::GeometricBrownianMotion;
use sde_paths::numerics::Timer;
use sde_paths::{simulate, Scheme, SimConfig, Target, TimeSpec};

fn bench_case(target: Target, scheme: Scheme, iterations: usize, steps: usize) -> (f64, f64) {
    let gbm = GeometricBrownianMotion::new(0.05, 0.2, 100.0).expect("valid parameters");
    let sde = gbm.sde();
    let time = TimeSpec::Uniform {
        horizon: 1.0,
        steps,
    };
    let config = SimConfig {
        scheme,
        target,
        iterations,
        seed: Some(42),
        ..Default::default()
    };

    let mut timer = Timer::new();
    timer.start();
    let ensemble = simulate(&sde, &time, &config).expect("valid configuration");
    let elapsed_s = timer.elapsed_ms() / 1000.0;

    let paths_per_sec = ensemble.iterations() as f64 / elapsed_s;
    (elapsed_s, paths_per_sec)
}

fn main() {
    println!("sde-paths benchmark");
    println!("CPU cores: {}\n", num_cpus::get());

    let steps = 360;
    println!(
        "{:<8} {:<10} {:>10} {:>12} {:>16}",
        "target", "scheme", "paths", "seconds", "paths/sec"
    );

    for &iterations in &[10_000usize, 100_000, 500_000] {
        for target in [Target::Cpu, Target::Batch] {
            for scheme in [Scheme::Euler, Scheme::Milstein] {
                let (elapsed, throughput) = bench_case(target, scheme, iterations, steps);
                println!(
                    "{:<8} {:<10} {:>10} {:>12.3} {:>16.0}",
                    format!("{:?}", target),
                    format!("{:?}", scheme),
                    iterations,
                    elapsed,
                    throughput
                );
            }
        }
    }
}
