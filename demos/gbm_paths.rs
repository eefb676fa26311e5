// demos/gbm_paths.rs
use sde_paths::models::GeometricBrownianMotion;
use sde_paths::numerics::Timer;
use sde_paths::summary;
use sde_paths::{simulate, Scheme, SimConfig, Target, TimeSpec};

fn main() {
    println!("Running sde-paths GBM demo\n");

    let gbm = GeometricBrownianMotion::new(0.05, 0.01, 100.0).expect("valid parameters");
    let sde = gbm.sde();
    let time = TimeSpec::Uniform {
        horizon: 1.0,
        steps: 720,
    };
    let iterations = 70_000;

    for target in [Target::Cpu, Target::Batch] {
        for scheme in [Scheme::Euler, Scheme::Milstein] {
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
            let elapsed = timer.elapsed_ms();

            let mean = summary::terminal_mean(&ensemble);
            let terminals = ensemble.terminal_values();
            let stderr = summary::standard_error(&terminals);

            println!(
                "{:?} / {:?}: {} paths in {:.1} ms, terminal mean {:.4} ± {:.4}",
                target, scheme, iterations, elapsed, mean, stderr
            );
        }
    }

    println!(
        "\nAnalytic terminal mean: {:.4}",
        summary::gbm_terminal_mean(100.0, 0.05, 1.0)
    );

    // A few generated values, as a sanity check
    let config = SimConfig {
        scheme: Scheme::Milstein,
        target: Target::Batch,
        iterations: 5,
        ..Default::default()
    };
    let ensemble = simulate(&sde, &time, &config).expect("valid configuration");
    println!("\nFirst values of the first paths:");
    for (i, path) in ensemble.paths().enumerate() {
        let head: Vec<String> = path.iter().take(6).map(|x| format!("{:.4}", x)).collect();
        println!("path {}: {}, ...", i, head.join(", "));
    }
}
