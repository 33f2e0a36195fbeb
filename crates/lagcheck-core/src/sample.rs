/// A single round trip latency measurement in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Sample(pub f64);

impl Sample {
    /// The latency in milliseconds.
    #[must_use]
    pub const fn millis(self) -> f64 {
        self.0
    }
}

/// An ordered collection of latency samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleSet {
    samples: Vec<f64>,
}

impl SampleSet {
    /// Create an empty `SampleSet`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            samples: Vec::new(),
        }
    }

    /// Create a `SampleSet` from latencies in milliseconds.
    #[must_use]
    pub fn from_millis(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    /// Append a sample.
    pub fn push(&mut self, sample: Sample) {
        self.samples.push(sample.millis());
    }

    /// The number of samples collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Is the set empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The samples in collection order, in milliseconds.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Summary statistics over the samples, `None` if the set is empty.
    #[must_use]
    pub fn stats(&self) -> Option<SampleStats> {
        if self.samples.is_empty() {
            return None;
        }
        let min = self.samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self
            .samples
            .iter()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max);
        let mean = self.samples.iter().sum::<f64>() / self.samples.len() as f64;
        Some(SampleStats {
            mean,
            min,
            max,
            jitter: max - min,
        })
    }
}

impl From<Vec<f64>> for SampleSet {
    fn from(samples: Vec<f64>) -> Self {
        Self::from_millis(samples)
    }
}

/// Summary statistics for a set of samples, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleStats {
    /// The mean latency.
    pub mean: f64,
    /// The lowest latency observed.
    pub min: f64,
    /// The highest latency observed.
    pub max: f64,
    /// The spread between the highest and lowest latency.
    pub jitter: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty() {
        let set = SampleSet::new();
        assert!(set.is_empty());
        assert_eq!(0, set.len());
        assert_eq!(None, set.stats());
    }

    #[test]
    fn test_push() {
        let mut set = SampleSet::new();
        set.push(Sample(10.5));
        set.push(Sample(12.5));
        assert_eq!(2, set.len());
        assert_eq!(&[10.5, 12.5], set.as_slice());
    }

    #[test]
    fn test_stats() {
        let set = SampleSet::from_millis(vec![10.0, 20.0, 30.0]);
        let stats = set.stats().unwrap();
        assert_eq!(20.0, stats.mean);
        assert_eq!(10.0, stats.min);
        assert_eq!(30.0, stats.max);
        assert_eq!(20.0, stats.jitter);
    }

    #[test]
    fn test_stats_single() {
        let set = SampleSet::from_millis(vec![42.0]);
        let stats = set.stats().unwrap();
        assert_eq!(42.0, stats.mean);
        assert_eq!(42.0, stats.min);
        assert_eq!(42.0, stats.max);
        assert_eq!(0.0, stats.jitter);
    }
}
