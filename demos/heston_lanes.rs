// demos/heston_lanes.rs
use sde_paths::models::HestonModel;
use sde_paths::numerics::Timer;
use sde_paths::summary;
use sde_paths::{simulate_two_factor, Scheme, SimConfig, Target, TimeSpec};

fn main() {
    println!("Running sde-paths Heston lane-engine demo\n");

    // Domestic/foreign rate spread as the asset drift
    let r_d = 0.05;
    let r_f = 0.01;
    let heston = HestonModel::new(r_d - r_f, 0.01, 0.12, 0.015, 0.012, 100.0, 0.025)
        .expect("valid parameters");
    let sdes = heston.sdes();
    let rho = 0.8;

    let time = TimeSpec::Uniform {
        horizon: 1.0,
        steps: 720,
    };

    for scheme in [Scheme::Euler, Scheme::Milstein] {
        let config = SimConfig {
            scheme,
            target: Target::Batch,
            iterations: 70_000,
            ..Default::default()
        };

        let mut timer = Timer::new();
        timer.start();
        let ensemble =
            simulate_two_factor(&sdes, rho, &time, &config).expect("valid configuration");
        let elapsed = timer.elapsed_ms();

        println!(
            "{:?}: {} lanes in {:.1} ms, terminal mean {:.4}",
            scheme,
            ensemble.iterations(),
            elapsed,
            summary::terminal_mean(&ensemble)
        );
    }

    // The CPU target deliberately has no two-factor kernels
    let cpu_config = SimConfig {
        target: Target::Cpu,
        iterations: 10,
        ..Default::default()
    };
    match simulate_two_factor(&sdes, rho, &time, &cpu_config) {
        Err(err) => println!("\nCPU target: {}", err),
        Ok(_) => unreachable!("two-factor CPU kernels do not exist"),
    }
}
