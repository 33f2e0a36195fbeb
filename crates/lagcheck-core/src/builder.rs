use crate::config::{ProbeConfig, SearchConfig, SimConfig};
use crate::constants::MAX_PAYLOAD_SIZE;
use crate::error::Result;
use crate::types::{PayloadPattern, PayloadSize};
use crate::{defaults, Error, Session};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Build a session.
///
/// This is a convenience builder to simplify the creation and execution of a
/// session.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use lagcheck_core::Builder;
///
/// let addr = std::net::Ipv4Addr::new(1, 2, 3, 4);
/// let session = Builder::new(addr)
///     .sample_count(20)
///     .probe_timeout(std::time::Duration::from_millis(500))
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Session`] - A latency measurement and speed limit search session.
#[derive(Debug)]
pub struct Builder {
    target_addr: Ipv4Addr,
    sample_count: usize,
    probe_timeout: Duration,
    payload_size: PayloadSize,
    payload_pattern: PayloadPattern,
    rounds_per_match: usize,
    games_per_trial: usize,
    lag_step_ms: f64,
    max_lag_ms: f64,
    weak_win_rate: f64,
    strong_win_rate: f64,
    seed: Option<u64>,
}

impl Builder {
    /// Build a session builder for a given target.
    ///
    /// # Examples
    ///
    /// Basic usage:
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use lagcheck_core::Builder;
    ///
    /// let addr = std::net::Ipv4Addr::new(1, 1, 1, 1);
    /// let session = Builder::new(addr).build()?;
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn new(target_addr: Ipv4Addr) -> Self {
        Self {
            target_addr,
            sample_count: defaults::DEFAULT_SAMPLE_COUNT,
            probe_timeout: defaults::DEFAULT_PROBE_TIMEOUT,
            payload_size: PayloadSize(defaults::DEFAULT_PAYLOAD_SIZE),
            payload_pattern: PayloadPattern(defaults::DEFAULT_PAYLOAD_PATTERN),
            rounds_per_match: defaults::DEFAULT_ROUNDS_PER_MATCH,
            games_per_trial: defaults::DEFAULT_GAMES_PER_TRIAL,
            lag_step_ms: defaults::DEFAULT_LAG_STEP_MS,
            max_lag_ms: defaults::DEFAULT_MAX_LAG_MS,
            weak_win_rate: defaults::DEFAULT_WEAK_WIN_RATE,
            strong_win_rate: defaults::DEFAULT_STRONG_WIN_RATE,
            seed: None,
        }
    }

    /// Set the number of samples to collect.
    #[must_use]
    pub fn sample_count(self, sample_count: usize) -> Self {
        Self {
            sample_count,
            ..self
        }
    }

    /// Set the per-probe timeout.
    #[must_use]
    pub fn probe_timeout(self, probe_timeout: Duration) -> Self {
        Self {
            probe_timeout,
            ..self
        }
    }

    /// Set the probe payload size in bytes.
    #[must_use]
    pub fn payload_size(self, payload_size: u16) -> Self {
        Self {
            payload_size: PayloadSize(payload_size),
            ..self
        }
    }

    /// Set the byte which fills the probe payload.
    #[must_use]
    pub fn payload_pattern(self, payload_pattern: u8) -> Self {
        Self {
            payload_pattern: PayloadPattern(payload_pattern),
            ..self
        }
    }

    /// Set the number of rounds per simulated match.
    #[must_use]
    pub fn rounds_per_match(self, rounds_per_match: usize) -> Self {
        Self {
            rounds_per_match,
            ..self
        }
    }

    /// Set the number of matches per simulation trial.
    #[must_use]
    pub fn games_per_trial(self, games_per_trial: usize) -> Self {
        Self {
            games_per_trial,
            ..self
        }
    }

    /// Set the search resolution in milliseconds.
    #[must_use]
    pub fn lag_step_ms(self, lag_step_ms: f64) -> Self {
        Self {
            lag_step_ms,
            ..self
        }
    }

    /// Set the search bound in milliseconds.
    #[must_use]
    pub fn max_lag_ms(self, max_lag_ms: f64) -> Self {
        Self { max_lag_ms, ..self }
    }

    /// Set the weak win rate target.
    #[must_use]
    pub fn weak_win_rate(self, weak_win_rate: f64) -> Self {
        Self {
            weak_win_rate,
            ..self
        }
    }

    /// Set the strong win rate target.
    #[must_use]
    pub fn strong_win_rate(self, strong_win_rate: f64) -> Self {
        Self {
            strong_win_rate,
            ..self
        }
    }

    /// Set the simulation seed.
    ///
    /// If not set the simulation is seeded from entropy on each run.
    #[must_use]
    pub fn seed(self, seed: Option<u64>) -> Self {
        Self { seed, ..self }
    }

    /// Build the session.
    pub fn build(self) -> Result<Session> {
        if self.sample_count == 0 {
            return Err(Error::BadConfig(String::from(
                "sample_count must be greater than zero",
            )));
        }
        if self.probe_timeout.is_zero() {
            return Err(Error::BadConfig(String::from(
                "probe_timeout must be greater than zero",
            )));
        }
        if self.payload_size.0 > MAX_PAYLOAD_SIZE {
            return Err(Error::BadConfig(format!(
                "payload_size must not exceed {MAX_PAYLOAD_SIZE}",
            )));
        }
        if self.rounds_per_match == 0 || self.games_per_trial == 0 {
            return Err(Error::BadConfig(String::from(
                "rounds_per_match and games_per_trial must be greater than zero",
            )));
        }
        if self.lag_step_ms <= 0.0 {
            return Err(Error::BadConfig(String::from(
                "lag_step_ms must be greater than zero",
            )));
        }
        if self.max_lag_ms < self.lag_step_ms {
            return Err(Error::BadConfig(String::from(
                "max_lag_ms must not be less than lag_step_ms",
            )));
        }
        if !(0.0..=1.0).contains(&self.weak_win_rate)
            || !(0.0..=1.0).contains(&self.strong_win_rate)
        {
            return Err(Error::BadConfig(String::from(
                "win rate targets must be in the range [0, 1]",
            )));
        }
        if self.weak_win_rate > self.strong_win_rate {
            return Err(Error::BadConfig(String::from(
                "weak_win_rate must not exceed strong_win_rate",
            )));
        }
        let probe = ProbeConfig {
            target_addr: self.target_addr,
            timeout: self.probe_timeout,
            payload_size: self.payload_size,
            payload_pattern: self.payload_pattern,
        };
        let search = SearchConfig {
            lag_step_ms: self.lag_step_ms,
            max_lag_ms: self.max_lag_ms,
            weak_win_rate: self.weak_win_rate,
            strong_win_rate: self.strong_win_rate,
            sim: SimConfig {
                rounds_per_match: self.rounds_per_match,
                games_per_trial: self.games_per_trial,
            },
        };
        Ok(Session::new(probe, search, self.sample_count, self.seed))
    }
}
