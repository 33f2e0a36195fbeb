use crate::config::SimConfig;
use crate::error::{Error, Result};
use crate::sample::SampleSet;
use rand::Rng;

/// The outcome of a single simulated match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Rounds won by the measured competitor.
    pub rounds_won_a: usize,
    /// Rounds won by the handicapped opponent.
    pub rounds_won_b: usize,
}

/// Estimate the round-level win rate for the measured competitor when its
/// opponent is handicapped by `added_lag_ms` of extra latency.
///
/// Each trial replays `games_per_trial` independent matches against the
/// measured latency distribution and tallies the rounds won. The returned win
/// rate is in the range [0, 1].
///
/// # Errors
///
/// Returns [`Error::InsufficientSamples`] if `samples` is empty, in which
/// case no randomness is drawn.
pub fn simulate<R: Rng>(
    rng: &mut R,
    samples: &SampleSet,
    added_lag_ms: f64,
    config: &SimConfig,
) -> Result<f64> {
    if samples.is_empty() {
        return Err(Error::InsufficientSamples);
    }
    let total_rounds = config.games_per_trial * config.rounds_per_match;
    if total_rounds == 0 {
        return Err(Error::BadConfig(String::from(
            "games_per_trial and rounds_per_match must be non-zero",
        )));
    }
    let mut rounds_won_a = 0;
    for _ in 0..config.games_per_trial {
        let outcome = play_match(
            rng,
            samples.as_slice(),
            added_lag_ms,
            config.rounds_per_match,
        );
        rounds_won_a += outcome.rounds_won_a;
    }
    Ok(rounds_won_a as f64 / total_rounds as f64)
}

/// Play a single match of `rounds` rounds.
///
/// Both competitors start at an independent uniform offset into the sample
/// set. Competitor A walks forwards and competitor B walks backwards, with B
/// starting two positions behind its offset. B's draw is penalised by
/// `added_lag_ms` and A wins a round only when its latency is strictly lower,
/// so ties go to B.
pub fn play_match<R: Rng>(
    rng: &mut R,
    samples: &[f64],
    added_lag_ms: f64,
    rounds: usize,
) -> MatchOutcome {
    let len = samples.len();
    let start_a = rng.gen_range(0..len);
    let start_b = rng.gen_range(0..len);
    let mut outcome = MatchOutcome::default();
    for round in 0..rounds {
        let idx_a = (start_a + round) % len;
        let idx_b = (start_b as isize - round as isize - 2).rem_euclid(len as isize) as usize;
        let latency_a = samples[idx_a];
        let latency_b = samples[idx_b] + added_lag_ms;
        if latency_a < latency_b {
            outcome.rounds_won_a += 1;
        } else {
            outcome.rounds_won_b += 1;
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use test_case::test_case;

    struct PanicRng;

    impl rand::RngCore for PanicRng {
        fn next_u32(&mut self) -> u32 {
            panic!("rng used")
        }
        fn next_u64(&mut self) -> u64 {
            panic!("rng used")
        }
        fn fill_bytes(&mut self, _: &mut [u8]) {
            panic!("rng used")
        }
        fn try_fill_bytes(&mut self, _: &mut [u8]) -> std::result::Result<(), rand::Error> {
            panic!("rng used")
        }
    }

    #[test]
    fn test_simulate_empty_samples() {
        let err = simulate(&mut PanicRng, &SampleSet::new(), 5.0, &SimConfig::default());
        assert!(matches!(err, Err(Error::InsufficientSamples)));
    }

    #[test]
    fn test_simulate_zero_rounds() {
        let config = SimConfig {
            rounds_per_match: 0,
            games_per_trial: 100,
        };
        let samples = SampleSet::from_millis(vec![10.0]);
        let err = simulate(&mut PanicRng, &samples, 5.0, &config);
        assert!(matches!(err, Err(Error::BadConfig(_))));
    }

    // With constant samples every round is a tie, which B always wins.
    #[test]
    fn test_simulate_constant_samples_no_lag() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples = SampleSet::from_millis(vec![10.0; 5]);
        let win_rate = simulate(&mut rng, &samples, 0.0, &SimConfig::default()).unwrap();
        assert_eq!(0.0, win_rate);
    }

    // Any positive handicap on B makes A win every round of every match.
    #[test]
    fn test_simulate_constant_samples_with_lag() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples = SampleSet::from_millis(vec![10.0; 5]);
        let win_rate = simulate(&mut rng, &samples, 5.0, &SimConfig::default()).unwrap();
        assert_eq!(1.0, win_rate);
    }

    #[test_case(0.0; "no added lag")]
    #[test_case(0.5; "small added lag")]
    #[test_case(30.0; "large added lag")]
    fn test_simulate_win_rate_in_range(added_lag_ms: f64) {
        let mut rng = StdRng::seed_from_u64(42);
        let samples = SampleSet::from_millis(vec![8.0, 12.0, 9.5, 15.0, 10.0]);
        let win_rate = simulate(&mut rng, &samples, added_lag_ms, &SimConfig::default()).unwrap();
        assert!((0.0..=1.0).contains(&win_rate));
    }

    // A handicap larger than the sample spread guarantees A wins every round.
    #[test]
    fn test_simulate_dominant_lag() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples = SampleSet::from_millis(vec![8.0, 12.0]);
        let win_rate = simulate(&mut rng, &samples, 100.0, &SimConfig::default()).unwrap();
        assert_eq!(1.0, win_rate);
    }

    // Reseeding per lag replays the same walks at every step, so the win
    // rate is exactly non-decreasing along the sweep.
    #[test]
    fn test_simulate_monotonic_in_lag() {
        let samples = SampleSet::from_millis(vec![8.0, 12.0, 9.5, 15.0, 10.0]);
        let config = SimConfig {
            rounds_per_match: 10,
            games_per_trial: 1000,
        };
        let mut prev = 0.0;
        for added_lag_ms in [0.0, 1.0, 2.0, 4.0, 8.0, 16.0, 30.0] {
            let mut rng = StdRng::seed_from_u64(42);
            let win_rate = simulate(&mut rng, &samples, added_lag_ms, &config).unwrap();
            assert!(
                win_rate >= prev,
                "win rate fell from {prev} to {win_rate} at {added_lag_ms}ms"
            );
            prev = win_rate;
        }
        assert_eq!(1.0, prev);
    }

    #[test]
    fn test_play_match_tallies_all_rounds() {
        let mut rng = StdRng::seed_from_u64(42);
        let samples = [8.0, 12.0, 9.5];
        let outcome = play_match(&mut rng, &samples, 1.0, 10);
        assert_eq!(10, outcome.rounds_won_a + outcome.rounds_won_b);
    }
}
