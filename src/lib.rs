pub mod config;
pub mod logger;
pub mod pid;
pub mod sim;

pub use config::{PidConfig, PidConfigError};
pub use pid::{PidError, VelocityPidController};
pub use sim::{run_closed_loop, VelocityPlant};
