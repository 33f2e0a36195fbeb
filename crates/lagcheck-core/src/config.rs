use crate::types::{PayloadPattern, PayloadSize};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::time::Duration;

    /// The default value for `sample-count`.
    pub const DEFAULT_SAMPLE_COUNT: usize = 50;

    /// The default value for `probe-timeout`.
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(1000);

    /// The default value for `payload-size`.
    pub const DEFAULT_PAYLOAD_SIZE: u16 = 59;

    /// The default value for `payload-pattern`.
    pub const DEFAULT_PAYLOAD_PATTERN: u8 = 0x51;

    /// The default value for `rounds-per-match`.
    pub const DEFAULT_ROUNDS_PER_MATCH: usize = 10;

    /// The default value for `games-per-trial`.
    pub const DEFAULT_GAMES_PER_TRIAL: usize = 100;

    /// The default value for `lag-step-ms`.
    pub const DEFAULT_LAG_STEP_MS: f64 = 0.1;

    /// The default value for `max-lag-ms`.
    pub const DEFAULT_MAX_LAG_MS: f64 = 30.0;

    /// The default value for `weak-win-rate`.
    pub const DEFAULT_WEAK_WIN_RATE: f64 = 0.80;

    /// The default value for `strong-win-rate`.
    pub const DEFAULT_STRONG_WIN_RATE: f64 = 0.90;
}

/// Echo probe configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeConfig {
    pub target_addr: Ipv4Addr,
    pub timeout: Duration,
    pub payload_size: PayloadSize,
    pub payload_pattern: PayloadPattern,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target_addr: Ipv4Addr::UNSPECIFIED,
            timeout: defaults::DEFAULT_PROBE_TIMEOUT,
            payload_size: PayloadSize(defaults::DEFAULT_PAYLOAD_SIZE),
            payload_pattern: PayloadPattern(defaults::DEFAULT_PAYLOAD_PATTERN),
        }
    }
}

/// Outcome simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimConfig {
    pub rounds_per_match: usize,
    pub games_per_trial: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            rounds_per_match: defaults::DEFAULT_ROUNDS_PER_MATCH,
            games_per_trial: defaults::DEFAULT_GAMES_PER_TRIAL,
        }
    }
}

/// Speed limit search configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchConfig {
    pub lag_step_ms: f64,
    pub max_lag_ms: f64,
    pub weak_win_rate: f64,
    pub strong_win_rate: f64,
    pub sim: SimConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            lag_step_ms: defaults::DEFAULT_LAG_STEP_MS,
            max_lag_ms: defaults::DEFAULT_MAX_LAG_MS,
            weak_win_rate: defaults::DEFAULT_WEAK_WIN_RATE,
            strong_win_rate: defaults::DEFAULT_STRONG_WIN_RATE,
            sim: SimConfig::default(),
        }
    }
}
