use crate::config::SearchConfig;
use crate::error::{Error, Result};
use crate::sample::SampleSet;
use crate::sim::simulate;
use rand::Rng;
use tracing::instrument;

/// The result of a speed limit search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedLimit {
    /// The added lag in milliseconds.
    pub added_lag_ms: f64,
    /// The estimated win rate at that lag.
    pub win_rate: f64,
    /// Did the search reach the strong (90%) win rate target?
    pub reached_90: bool,
}

/// Find the smallest added lag which meets the win rate targets.
///
/// Scans linearly from zero in `lag_step_ms` steps up to `max_lag_ms`. The
/// scan returns as soon as a step reaches the strong target. A step which
/// reaches only the weak target is remembered and the scan continues hunting
/// for the strong target; the remembered step is returned if the strong
/// target is never reached. If neither target is reached the sentinel
/// `(max_lag_ms, 0.5, false)` is returned.
///
/// The scan is linear rather than binary as the Monte Carlo win rate
/// estimates are not monotonic in lag at fine resolution.
///
/// # Errors
///
/// Returns [`Error::InsufficientSamples`] if `samples` is empty, in which
/// case no randomness is drawn.
#[instrument(skip(rng, samples), level = "trace")]
pub fn search<R: Rng>(
    rng: &mut R,
    samples: &SampleSet,
    config: &SearchConfig,
) -> Result<SpeedLimit> {
    if samples.is_empty() {
        return Err(Error::InsufficientSamples);
    }
    let mut weak: Option<SpeedLimit> = None;
    let mut added_lag_ms = 0.0;
    while added_lag_ms <= config.max_lag_ms {
        let win_rate = simulate(rng, samples, added_lag_ms, &config.sim)?;
        tracing::debug!(added_lag_ms, win_rate);
        if win_rate >= config.strong_win_rate {
            return Ok(SpeedLimit {
                added_lag_ms,
                win_rate,
                reached_90: true,
            });
        }
        if weak.is_none() && win_rate >= config.weak_win_rate {
            weak = Some(SpeedLimit {
                added_lag_ms,
                win_rate,
                reached_90: false,
            });
        }
        added_lag_ms += config.lag_step_ms;
    }
    Ok(weak.unwrap_or(SpeedLimit {
        added_lag_ms: config.max_lag_ms,
        win_rate: 0.5,
        reached_90: false,
    }))
}
