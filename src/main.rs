use velocity_pid::logger;
use velocity_pid::{run_closed_loop, PidConfig, VelocityPidController, VelocityPlant};

const SET_POINT: f64 = 10.0; // Target velocity
const STEPS: usize = 50; // Simulated control cycles

fn main() -> anyhow::Result<()> {
    let filter = logger::filter_from_env(std::env::var("RUST_LOG").ok().as_deref());
    logger::init(filter)?;

    let config = PidConfig::default();
    let mut pid = VelocityPidController::from_config(config)?;
    log::info!(
        "Gains: {:?}, sampling time: {}",
        pid.gains(),
        pid.sampling_time()
    );

    // Two scripted steps.
    for (set_point, current) in [(SET_POINT, 0.0), (SET_POINT, 5.0)] {
        let output = pid.compute_output(set_point, current)?;
        log::info!("Set point {set_point}, current {current}: output {output:.4}");
    }

    pid.reset();

    log::info!("Start closed loop...");

    let mut plant = VelocityPlant::default();
    let trace = run_closed_loop(&mut pid, &mut plant, SET_POINT, STEPS)?;
    let last = trace.last().copied().unwrap_or_default();

    log::info!(
        "Velocity after {} steps: {:.4} (error {:.6})",
        trace.len(),
        last,
        SET_POINT - last
    );

    Ok(())
}
