//! Console logger for the [`log`] facade.
//!
//! Each line carries the level, the time elapsed since the logger was
//! installed, the target and the message:
//!
//! ```text
//! INFO [1s 20ms] velocity_pid - Step 3: output 7.9740
//! ```
//!
//! Levels follow `RUST_LOG`-style directives: a bare level sets the default,
//! `target=level` overrides it for a module path and everything below it,
//! e.g. `warn,velocity_pid::sim=debug`.

use std::str::FromStr;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use humantime::format_duration;
use log::{LevelFilter, Metadata, Record, SetLoggerError};

/// Per-target level filter parsed from a directive string.
#[derive(Debug, Clone, PartialEq)]
pub struct LogFilter {
    default: LevelFilter,
    directives: Vec<(String, LevelFilter)>, // Sorted longest target first
}

impl Default for LogFilter {
    fn default() -> Self {
        Self::new(LevelFilter::Info)
    }
}

impl LogFilter {
    /// Create a filter with a single level for every target.
    pub fn new(default: LevelFilter) -> Self {
        Self {
            default,
            directives: Vec::new(),
        }
    }

    /// Parse comma-separated directives, skipping the ones that do not parse.
    ///
    /// Without a bare level the default stays `Info`.
    pub fn parse(spec: &str) -> Self {
        let mut filter = Self::default();
        for directive in spec.split(',').map(str::trim).filter(|d| !d.is_empty()) {
            match directive.split_once('=') {
                Some((target, level)) => match LevelFilter::from_str(level.trim()) {
                    Ok(level) => filter.directives.push((target.trim().to_string(), level)),
                    Err(_) => eprintln!("Ignoring log directive: {directive}"),
                },
                None => match LevelFilter::from_str(directive) {
                    Ok(level) => filter.default = level,
                    // A bare target enables everything for it.
                    Err(_) => filter
                        .directives
                        .push((directive.to_string(), LevelFilter::Trace)),
                },
            }
        }
        filter.directives.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        filter
    }

    /// Level in effect for `target`.
    pub fn level_for(&self, target: &str) -> LevelFilter {
        self.directives
            .iter()
            .find(|(prefix, _)| {
                target == prefix.as_str()
                    || target
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with("::"))
            })
            .map(|(_, level)| *level)
            .unwrap_or(self.default)
    }

    /// Most verbose level any target can reach.
    pub fn max_level(&self) -> LevelFilter {
        self.directives
            .iter()
            .map(|(_, level)| *level)
            .fold(self.default, std::cmp::max)
    }
}

/// Logger writing to stderr.
pub struct ConsoleLogger {
    started: Instant,
    filter: LogFilter,
}

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter.level_for(metadata.target())
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "{} [{}] {} - {}",
                record.level(),
                format_duration(truncate_to_millis(self.started.elapsed())),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

// Millisecond resolution keeps the prefix short.
fn truncate_to_millis(elapsed: Duration) -> Duration {
    Duration::new(elapsed.as_secs(), elapsed.subsec_millis() * 1_000_000)
}

static LOGGER: OnceLock<ConsoleLogger> = OnceLock::new();

/// Install the console logger.
///
/// Returns [`SetLoggerError`] if a logger has already been set.
pub fn init(filter: LogFilter) -> Result<(), SetLoggerError> {
    let max_level = filter.max_level();
    let logger = LOGGER.get_or_init(|| ConsoleLogger {
        started: Instant::now(),
        filter,
    });
    log::set_logger(logger).map(|()| log::set_max_level(max_level))
}

/// Build the filter from a `RUST_LOG` value, `Info` when unset.
pub fn filter_from_env(value: Option<&str>) -> LogFilter {
    value.map(LogFilter::parse).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_level() {
        assert_eq!(
            LogFilter::parse("trace").level_for("velocity_pid"),
            LevelFilter::Trace
        );
        assert_eq!(LogFilter::parse(" WARN ").level_for("other"), LevelFilter::Warn);
        assert_eq!(LogFilter::parse("off").max_level(), LevelFilter::Off);
    }

    #[test]
    fn falls_back_to_info() {
        assert_eq!(filter_from_env(None), LogFilter::new(LevelFilter::Info));
        assert_eq!(
            LogFilter::parse("velocity_pid=loud").level_for("velocity_pid"),
            LevelFilter::Info
        );
    }

    #[test]
    fn honours_target_directives() {
        let filter = LogFilter::parse("velocity_pid=debug");
        assert_eq!(filter.level_for("velocity_pid"), LevelFilter::Debug);
        assert_eq!(filter.level_for("velocity_pid::pid"), LevelFilter::Debug);
        assert_eq!(filter.level_for("velocity_pid_other"), LevelFilter::Info);
        assert_eq!(filter.level_for("other"), LevelFilter::Info);
        assert_eq!(filter.max_level(), LevelFilter::Debug);
    }

    #[test]
    fn longest_target_wins() {
        let filter = LogFilter::parse("error,velocity_pid=info,velocity_pid::sim=trace");
        assert_eq!(filter.level_for("velocity_pid::sim"), LevelFilter::Trace);
        assert_eq!(filter.level_for("velocity_pid::pid"), LevelFilter::Info);
        assert_eq!(filter.level_for("other"), LevelFilter::Error);
        assert_eq!(filter.max_level(), LevelFilter::Trace);
    }

    #[test]
    fn bare_target_enables_all_levels() {
        let filter = LogFilter::parse("velocity_pid");
        assert_eq!(filter.level_for("velocity_pid::pid"), LevelFilter::Trace);
        assert_eq!(filter.level_for("other"), LevelFilter::Info);
    }

    #[test]
    fn elapsed_keeps_whole_milliseconds() {
        let elapsed = Duration::new(5, 123_456_789);
        assert_eq!(truncate_to_millis(elapsed), Duration::new(5, 123_000_000));

        // Far past the range of u64 milliseconds.
        let elapsed = Duration::new(u64::MAX, 999_999_999);
        assert_eq!(truncate_to_millis(elapsed), Duration::new(u64::MAX, 999_000_000));
    }

    #[test]
    fn second_init_fails() {
        // Either this call or one from another test installs first.
        let _ = init(LogFilter::new(LevelFilter::Debug));
        assert!(init(LogFilter::new(LevelFilter::Debug)).is_err());
        assert!(log::logger().enabled(
            &Metadata::builder()
                .level(log::Level::Error)
                .target("test")
                .build()
        ));
    }
}
