use crate::config::ProbeConfig;
use crate::error::Result;
use crate::net::socket::Socket;
use crate::probe::{ProbeOutcome, Prober};
use crate::sample::{Sample, SampleSet};
use crate::types::CancelToken;
use tracing::instrument;

/// A cancellable latency sample collector.
///
/// Probes the target repeatedly until the requested number of samples has
/// been gathered or cancellation is requested. Timeouts, malformed replies
/// and transient socket errors are retried and do not consume the sample
/// budget.
#[derive(Debug, Clone, Copy)]
pub struct Collector {
    config: ProbeConfig,
    target_count: usize,
}

impl Collector {
    /// Create a `Collector`.
    #[must_use]
    pub const fn new(config: ProbeConfig, target_count: usize) -> Self {
        Self {
            config,
            target_count,
        }
    }

    /// Collect up to `target_count` samples.
    ///
    /// The `on_sample` callback is invoked with each sample as it arrives
    /// along with the number of samples collected so far.
    ///
    /// On cancellation the samples collected so far are returned, which may
    /// be none at all.
    #[instrument(skip(self, cancelled, on_sample), level = "trace")]
    pub fn collect<S: Socket, F: FnMut(Sample, usize)>(
        &self,
        cancelled: &CancelToken,
        on_sample: F,
    ) -> Result<SampleSet> {
        let prober = Prober::new(self.config);
        self.collect_with(cancelled, on_sample, || prober.probe::<S>())
    }

    fn collect_with<F, P>(
        &self,
        cancelled: &CancelToken,
        mut on_sample: F,
        mut probe: P,
    ) -> Result<SampleSet>
    where
        F: FnMut(Sample, usize),
        P: FnMut() -> Result<ProbeOutcome>,
    {
        let mut samples = SampleSet::new();
        while samples.len() < self.target_count {
            if cancelled.is_cancelled() {
                tracing::debug!(collected = samples.len(), "collection cancelled");
                break;
            }
            match probe()? {
                ProbeOutcome::Reply(sample) => {
                    samples.push(sample);
                    on_sample(sample, samples.len());
                }
                ProbeOutcome::Timeout => {
                    tracing::debug!("probe timed out, retrying");
                }
                ProbeOutcome::ProtocolError => {
                    tracing::debug!("probe reply malformed, retrying");
                }
            }
        }
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::VecDeque;

    fn collector(target_count: usize) -> Collector {
        Collector::new(ProbeConfig::default(), target_count)
    }

    fn scripted(
        outcomes: Vec<Result<ProbeOutcome>>,
    ) -> impl FnMut() -> Result<ProbeOutcome> {
        let mut outcomes = VecDeque::from(outcomes);
        move || outcomes.pop_front().expect("script exhausted")
    }

    #[test]
    fn test_collect_all() {
        let mut seen = vec![];
        let samples = collector(3)
            .collect_with(
                &CancelToken::new(),
                |sample, count| seen.push((sample.millis(), count)),
                scripted(vec![
                    Ok(ProbeOutcome::Reply(Sample(10.0))),
                    Ok(ProbeOutcome::Reply(Sample(11.0))),
                    Ok(ProbeOutcome::Reply(Sample(12.0))),
                ]),
            )
            .unwrap();
        assert_eq!(3, samples.len());
        assert_eq!(&[10.0, 11.0, 12.0], samples.as_slice());
        assert_eq!(vec![(10.0, 1), (11.0, 2), (12.0, 3)], seen);
    }

    #[test]
    fn test_collect_retries_failed_probes() {
        let samples = collector(2)
            .collect_with(
                &CancelToken::new(),
                |_, _| {},
                scripted(vec![
                    Ok(ProbeOutcome::Timeout),
                    Ok(ProbeOutcome::Reply(Sample(10.0))),
                    Ok(ProbeOutcome::ProtocolError),
                    Ok(ProbeOutcome::Reply(Sample(11.0))),
                ]),
            )
            .unwrap();
        assert_eq!(&[10.0, 11.0], samples.as_slice());
    }

    #[test]
    fn test_collect_never_exceeds_target() {
        let samples = collector(2)
            .collect_with(
                &CancelToken::new(),
                |_, _| {},
                scripted(vec![
                    Ok(ProbeOutcome::Reply(Sample(10.0))),
                    Ok(ProbeOutcome::Reply(Sample(11.0))),
                    Ok(ProbeOutcome::Reply(Sample(12.0))),
                ]),
            )
            .unwrap();
        assert_eq!(2, samples.len());
    }

    #[test]
    fn test_collect_cancelled_before_start() {
        let cancelled = CancelToken::new();
        cancelled.cancel();
        let samples = collector(5)
            .collect_with(&cancelled, |_, _| {}, scripted(vec![]))
            .unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_collect_cancelled_mid_run() {
        let cancelled = CancelToken::new();
        let samples = collector(5)
            .collect_with(
                &cancelled,
                |_, _| cancelled.cancel(),
                scripted(vec![Ok(ProbeOutcome::Reply(Sample(10.0)))]),
            )
            .unwrap();
        assert_eq!(1, samples.len());
    }

    #[test]
    fn test_collect_permission_denied() {
        let err = collector(5)
            .collect_with(
                &CancelToken::new(),
                |_, _| {},
                scripted(vec![Err(Error::PermissionDenied)]),
            )
            .unwrap_err();
        assert!(matches!(err, Error::PermissionDenied));
    }
}
