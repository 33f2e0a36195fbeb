use crate::error::Error;
use crate::sample::{Sample, SampleSet, SampleStats};
use crate::search::SpeedLimit;

/// A snapshot of the state of a session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    samples: SampleSet,
    latest: Option<Sample>,
    result: Option<SpeedLimit>,
    error: Option<String>,
}

impl SessionState {
    /// The samples collected so far.
    #[must_use]
    pub const fn samples(&self) -> &SampleSet {
        &self.samples
    }

    /// The most recently collected sample.
    #[must_use]
    pub const fn latest(&self) -> Option<Sample> {
        self.latest
    }

    /// Summary statistics over the samples collected so far.
    #[must_use]
    pub fn stats(&self) -> Option<SampleStats> {
        self.samples.stats()
    }

    /// The final result of the last completed run.
    #[must_use]
    pub const fn result(&self) -> Option<SpeedLimit> {
        self.result
    }

    /// The error from the last failed run.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub(crate) fn record_sample(&mut self, sample: Sample) {
        self.samples.push(sample);
        self.latest = Some(sample);
    }

    pub(crate) fn record_result(&mut self, result: SpeedLimit) {
        self.result = Some(result);
    }

    pub(crate) fn record_error(&mut self, error: &Error) {
        self.error = Some(error.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let state = SessionState::default();
        assert!(state.samples().is_empty());
        assert_eq!(None, state.latest());
        assert_eq!(None, state.stats());
        assert_eq!(None, state.result());
        assert_eq!(None, state.error());
    }

    #[test]
    fn test_record_sample() {
        let mut state = SessionState::default();
        state.record_sample(Sample(10.0));
        state.record_sample(Sample(20.0));
        assert_eq!(2, state.samples().len());
        assert_eq!(Some(Sample(20.0)), state.latest());
        assert_eq!(15.0, state.stats().unwrap().mean);
    }

    #[test]
    fn test_record_result() {
        let mut state = SessionState::default();
        let limit = SpeedLimit {
            added_lag_ms: 1.5,
            win_rate: 0.95,
            reached_90: true,
        };
        state.record_result(limit);
        assert_eq!(Some(limit), state.result());
    }

    #[test]
    fn test_record_error() {
        let mut state = SessionState::default();
        state.record_error(&Error::InsufficientSamples);
        assert_eq!(Some("insufficient samples"), state.error());
    }
}
