//! First-order velocity plant for exercising the controller off-target.

use crate::pid::{PidError, VelocityPidController};

const DEFAULT_ALPHA: f64 = 0.7; // Filtering coefficient
const DEFAULT_GAIN: f64 = 1.0; // Steady-state velocity per unit of command

/// Simulated velocity plant.
///
/// Each step the velocity moves toward `gain * command` with low-pass
/// smoothing: `v = alpha * v + (1 - alpha) * gain * command`.
#[derive(Debug, Clone)]
pub struct VelocityPlant {
    alpha: f64,
    gain: f64,
    velocity: f64,
}

impl Default for VelocityPlant {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA, DEFAULT_GAIN)
    }
}

impl VelocityPlant {
    /// Create a plant at rest. `alpha` is clamped to `0.0 ~ 1.0`.
    pub fn new(alpha: f64, gain: f64) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            gain,
            velocity: 0.0,
        }
    }

    /// Apply a command for one sampling interval and return the new velocity.
    pub fn apply(&mut self, command: f64) -> f64 {
        self.velocity = self.alpha * self.velocity + (1.0 - self.alpha) * self.gain * command;
        self.velocity
    }

    /// Get the current velocity.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }
}

/// Drive `plant` toward `set_point` for `steps` cycles.
///
/// Returns the velocity measured after every cycle.
pub fn run_closed_loop(
    pid: &mut VelocityPidController,
    plant: &mut VelocityPlant,
    set_point: f64,
    steps: usize,
) -> Result<Vec<f64>, PidError> {
    let mut trace = Vec::with_capacity(steps);
    for step in 0..steps {
        let command = pid.compute_output(set_point, plant.velocity())?;
        let velocity = plant.apply(command);
        log::debug!("Step {step}: command {command:.4}, velocity {velocity:.4}");
        trace.push(velocity);
    }
    Ok(trace)
}
