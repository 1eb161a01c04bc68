use crate::config::{PidConfig, PidConfigError};
use thiserror::Error;

/// PID controller error.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PidError {
    #[error("Pid config error: {0}")]
    Config(#[from] PidConfigError),
    #[error("Non-finite input: set point {set_point}, current value {current_value}")]
    NonFiniteInput { set_point: f64, current_value: f64 },
    #[error("Non-finite output: set point {set_point}, current value {current_value}")]
    NonFiniteOutput { set_point: f64, current_value: f64 },
}

/// Velocity PID controller structure.
///
/// The controller runs at a fixed sampling interval: the caller is expected to
/// invoke [`compute_output`](Self::compute_output) once per interval. Stepping
/// takes `&mut self`, so one instance has a single writer at a time. Wrap it in
/// a `Mutex` to share it between threads.
#[derive(Debug, Clone)]
pub struct VelocityPidController {
    kp: f64,             // Proportional coefficient
    ki: f64,             // Integral coefficient
    kd: f64,             // Derivative coefficient
    sampling_time: f64,  // Fixed interval between updates
    previous_error: f64, // Error of the previous step
    integral_error: f64, // Accumulated error * sampling time
    last_output: f64,    // Last computed output
}

impl VelocityPidController {
    /// Create a new PID controller with a sampling time of 1.0.
    ///
    /// Gains are taken as given. Unlike [`from_config`](Self::from_config),
    /// non-finite gains are not rejected here and only trip a debug assertion.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        let config = PidConfig::new(kp, ki, kd);
        debug_assert!(config.validate().is_ok(), "invalid pid gains: {config:?}");
        log::debug!("New velocity pid: {:?}", config);
        Self::build(config)
    }

    /// Create a PID controller from a validated configuration.
    pub fn from_config(config: PidConfig) -> Result<Self, PidError> {
        config.validate()?;
        log::debug!("New velocity pid: {:?}", config);
        Ok(Self::build(config))
    }

    fn build(config: PidConfig) -> Self {
        Self {
            kp: config.kp,
            ki: config.ki,
            kd: config.kd,
            sampling_time: config.sampling_time,
            previous_error: 0.0,
            integral_error: 0.0,
            last_output: 0.0,
        }
    }

    /// Calculate PID output.
    ///
    /// Non-finite inputs, and finite inputs whose terms overflow, are rejected
    /// and leave the controller untouched.
    pub fn compute_output(&mut self, set_point: f64, current_value: f64) -> Result<f64, PidError> {
        if !set_point.is_finite() || !current_value.is_finite() {
            log::warn!(
                "Rejected pid step: set point {}, current value {}",
                set_point,
                current_value
            );
            return Err(PidError::NonFiniteInput {
                set_point,
                current_value,
            });
        }

        let error = set_point - current_value;

        // No anti-windup: the integral keeps growing under a steady error.
        let integral_error = self.integral_error + error * self.sampling_time;
        let derivative_error = (error - self.previous_error) / self.sampling_time;

        let p = self.kp * error;
        let i = self.ki * integral_error;
        let d = self.kd * derivative_error;
        let output = p + i + d;

        log::trace!(
            "error: {:.4}, p: {:.4}, i: {:.4}, d: {:.4}, output: {:.4}",
            error,
            p,
            i,
            d,
            output
        );

        // A zero gain hides an overflowed term from the output, so check each one.
        if ![error, integral_error, derivative_error, output]
            .iter()
            .all(|v| v.is_finite())
        {
            log::warn!(
                "Rejected pid step: terms overflow at set point {}, current value {}",
                set_point,
                current_value
            );
            return Err(PidError::NonFiniteOutput {
                set_point,
                current_value,
            });
        }

        self.integral_error = integral_error;
        self.previous_error = error;
        self.last_output = output;

        Ok(output)
    }

    /// Get the sampling time.
    pub fn sampling_time(&self) -> f64 {
        self.sampling_time
    }

    /// Get the gains as `(kp, ki, kd)`.
    pub fn gains(&self) -> (f64, f64, f64) {
        (self.kp, self.ki, self.kd)
    }

    /// Get the output of the last step, 0.0 before the first one.
    pub fn last_output(&self) -> f64 {
        self.last_output
    }

    /// Get the error of the last step.
    pub fn previous_error(&self) -> f64 {
        self.previous_error
    }

    /// Get the accumulated integral error.
    pub fn integral_error(&self) -> f64 {
        self.integral_error
    }

    /// Clear the running state, keeping gains and sampling time.
    pub fn reset(&mut self) {
        log::debug!("Reset velocity pid");
        self.previous_error = 0.0;
        self.integral_error = 0.0;
        self.last_output = 0.0;
    }
}
