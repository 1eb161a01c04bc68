use thiserror::Error;

const DEFAULT_KP: f64 = 1.2; // Proportional coefficient
const DEFAULT_KI: f64 = 0.4; // Integral coefficient
const DEFAULT_KD: f64 = 0.2; // Derivative coefficient
const DEFAULT_SAMPLING_TIME: f64 = 1.0;

/// Controller configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum PidConfigError {
    #[error("Sampling time must be positive and finite, got {0}")]
    InvalidSamplingTime(f64),
    #[error("Gain {name} must be finite, got {value}")]
    NonFiniteGain { name: &'static str, value: f64 },
}

/// PID controller configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidConfig {
    pub kp: f64,            // Proportional coefficient
    pub ki: f64,            // Integral coefficient
    pub kd: f64,            // Derivative coefficient
    pub sampling_time: f64, // Interval between two control updates
}

impl Default for PidConfig {
    fn default() -> Self {
        Self {
            kp: DEFAULT_KP,
            ki: DEFAULT_KI,
            kd: DEFAULT_KD,
            sampling_time: DEFAULT_SAMPLING_TIME,
        }
    }
}

impl PidConfig {
    /// Create a configuration with the given gains and the default sampling time.
    pub fn new(kp: f64, ki: f64, kd: f64) -> Self {
        Self {
            kp,
            ki,
            kd,
            sampling_time: DEFAULT_SAMPLING_TIME,
        }
    }

    /// Set the sampling time.
    pub fn sampling_time(mut self, sampling_time: f64) -> Self {
        self.sampling_time = sampling_time;
        self
    }

    /// Set the proportional gain.
    pub fn kp(mut self, kp: f64) -> Self {
        self.kp = kp;
        self
    }

    /// Set the integral gain.
    pub fn ki(mut self, ki: f64) -> Self {
        self.ki = ki;
        self
    }

    /// Set the derivative gain.
    pub fn kd(mut self, kd: f64) -> Self {
        self.kd = kd;
        self
    }

    /// Check that the configuration can drive a controller.
    ///
    /// Gains may take any finite value, zero and negative included. The
    /// sampling time divides the derivative term and must be a positive normal
    /// number, since a subnormal one overflows the quotient.
    pub fn validate(&self) -> Result<(), PidConfigError> {
        for (name, value) in [("kp", self.kp), ("ki", self.ki), ("kd", self.kd)] {
            if !value.is_finite() {
                return Err(PidConfigError::NonFiniteGain { name, value });
            }
        }

        if !self.sampling_time.is_finite() || self.sampling_time < f64::MIN_POSITIVE {
            return Err(PidConfigError::InvalidSamplingTime(self.sampling_time));
        }

        Ok(())
    }
}
