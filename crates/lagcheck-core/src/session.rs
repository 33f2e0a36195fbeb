use crate::error::Result;
use crate::search::SpeedLimit;
use crate::state::SessionState;
use crate::{Error, PayloadPattern, PayloadSize};
use std::net::Ipv4Addr;
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

/// A progress event emitted as samples are collected.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// The latest sample in milliseconds.
    pub latest_ms: f64,
    /// The number of samples collected so far.
    pub collected: usize,
    /// The number of samples requested.
    pub target: usize,
}

/// A latency measurement and speed limit search session.
///
/// A session runs the full pipeline: collect latency samples from the target
/// and search for the smallest added lag which meets the win rate targets.
///
/// Note that this type is cheaply cloneable.
#[derive(Debug, Clone)]
pub struct Session {
    inner: std::sync::Arc<inner::SessionInner>,
}

impl Session {
    /// Create a `Session`.
    ///
    /// Use the [`crate::Builder`] type to create a [`Session`].
    #[must_use]
    pub(crate) fn new(
        probe: crate::ProbeConfig,
        search: crate::SearchConfig,
        sample_count: usize,
        seed: Option<u64>,
    ) -> Self {
        Self {
            inner: std::sync::Arc::new(inner::SessionInner::new(
                probe,
                search,
                sample_count,
                seed,
            )),
        }
    }

    /// Run the [`Session`].
    ///
    /// This method blocks until the pipeline completes or fails. Starting a
    /// run cancels any run already in progress on this session and waits for
    /// it to finish before proceeding.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use lagcheck_core::Builder;
    ///
    /// let addr = std::net::Ipv4Addr::new(1, 1, 1, 1);
    /// let session = Builder::new(addr).build()?;
    /// let limit = session.run()?;
    /// println!("{limit:?}");
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// # See Also
    ///
    /// - [`Session::run_with`] - Run the session with a progress handler.
    /// - [`Session::spawn`] - Spawn the session on a new thread.
    pub fn run(&self) -> Result<SpeedLimit> {
        self.inner.run_with(|_| {})
    }

    /// Run the [`Session`] with a progress handler.
    ///
    /// The handler is called for each sample as it is collected.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use lagcheck_core::Builder;
    ///
    /// let addr = std::net::Ipv4Addr::new(1, 1, 1, 1);
    /// let session = Builder::new(addr).build()?;
    /// let limit = session.run_with(|progress| println!("{progress:?}"))?;
    /// println!("{limit:?}");
    /// # Ok(())
    /// # }
    /// ```
    pub fn run_with<F: Fn(Progress)>(&self, func: F) -> Result<SpeedLimit> {
        self.inner.run_with(func)
    }

    /// Spawn the session on a new thread.
    ///
    /// Returns the [`Session`] and a handle to the thread, so it may be
    /// joined with [`JoinHandle::join`]. A [`Session::snapshot`] of the state
    /// may be taken from any thread while the run is in progress.
    pub fn spawn(self) -> Result<(Self, JoinHandle<Result<SpeedLimit>>)> {
        let session = self.clone();
        let handle = thread::Builder::new()
            .name(format!("lagcheck-{}", self.target_addr()))
            .spawn(move || session.run())
            .map_err(|err| Error::Other(err.to_string()))?;
        Ok((self, handle))
    }

    /// Spawn the session with a progress handler on a new thread.
    pub fn spawn_with<F: Fn(Progress) + Send + 'static>(
        self,
        func: F,
    ) -> Result<(Self, JoinHandle<Result<SpeedLimit>>)> {
        let session = self.clone();
        let handle = thread::Builder::new()
            .name(format!("lagcheck-{}", self.target_addr()))
            .spawn(move || session.run_with(func))
            .map_err(|err| Error::Other(err.to_string()))?;
        Ok((self, handle))
    }

    /// Cancel the in-progress run, if any.
    ///
    /// Cancellation is cooperative and is observed between probes. A
    /// cancelled run returns whatever it can: if at least one sample was
    /// collected the search still runs over the partial set, otherwise the
    /// run fails with [`Error::InsufficientSamples`].
    pub fn cancel(&self) {
        self.inner.cancel();
    }

    /// Take a snapshot of the session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.inner.snapshot()
    }

    /// Clear the session state.
    pub fn clear(&self) {
        self.inner.clear();
    }

    /// The target address of the session.
    #[must_use]
    pub fn target_addr(&self) -> Ipv4Addr {
        self.inner.target_addr()
    }

    /// The number of samples the session will collect.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.inner.sample_count()
    }

    /// The per-probe timeout of the session.
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        self.inner.probe_timeout()
    }

    /// The probe payload size of the session.
    #[must_use]
    pub fn payload_size(&self) -> PayloadSize {
        self.inner.payload_size()
    }

    /// The probe payload pattern of the session.
    #[must_use]
    pub fn payload_pattern(&self) -> PayloadPattern {
        self.inner.payload_pattern()
    }

    /// The simulation seed of the session, if fixed.
    #[must_use]
    pub fn seed(&self) -> Option<u64> {
        self.inner.seed()
    }
}

mod inner {
    use crate::collect::Collector;
    use crate::config::{ProbeConfig, SearchConfig};
    use crate::error::Result;
    use crate::net::SocketImpl;
    use crate::search::{search, SpeedLimit};
    use crate::session::Progress;
    use crate::state::SessionState;
    use crate::types::{CancelToken, PayloadPattern, PayloadSize};
    use parking_lot::{Mutex, RwLock};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::net::Ipv4Addr;
    use std::time::Duration;
    use tracing::instrument;

    #[derive(Debug)]
    pub(super) struct SessionInner {
        probe: ProbeConfig,
        search: SearchConfig,
        sample_count: usize,
        seed: Option<u64>,
        cancelled: CancelToken,
        run_lock: Mutex<()>,
        state: RwLock<SessionState>,
    }

    impl SessionInner {
        pub(super) fn new(
            probe: ProbeConfig,
            search: SearchConfig,
            sample_count: usize,
            seed: Option<u64>,
        ) -> Self {
            Self {
                probe,
                search,
                sample_count,
                seed,
                cancelled: CancelToken::new(),
                run_lock: Mutex::new(()),
                state: RwLock::new(SessionState::default()),
            }
        }

        /// Run the full pipeline.
        ///
        /// Only one run may be active per session. Any active run is
        /// cancelled and the lock waits for it to observe the cancellation
        /// before this run resets the shared state and begins.
        #[instrument(skip(self, func), level = "trace")]
        pub(super) fn run_with<F: Fn(Progress)>(&self, func: F) -> Result<SpeedLimit> {
            self.cancelled.cancel();
            let _guard = self.run_lock.lock();
            self.cancelled.reset();
            *self.state.write() = SessionState::default();
            tracing::debug!(
                target = %self.probe.target_addr,
                sample_count = self.sample_count,
                "session started"
            );
            let collector = Collector::new(self.probe, self.sample_count);
            let result = collector
                .collect::<SocketImpl, _>(&self.cancelled, |sample, collected| {
                    self.state.write().record_sample(sample);
                    func(Progress {
                        latest_ms: sample.millis(),
                        collected,
                        target: self.sample_count,
                    });
                })
                .and_then(|samples| {
                    let mut rng = self.seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);
                    search(&mut rng, &samples, &self.search)
                });
            match result {
                Ok(limit) => {
                    self.state.write().record_result(limit);
                    tracing::debug!(?limit, "session complete");
                    Ok(limit)
                }
                Err(err) => {
                    self.state.write().record_error(&err);
                    tracing::debug!(%err, "session failed");
                    Err(err)
                }
            }
        }

        pub(super) fn cancel(&self) {
            self.cancelled.cancel();
        }

        pub(super) fn snapshot(&self) -> SessionState {
            self.state.read().clone()
        }

        pub(super) fn clear(&self) {
            *self.state.write() = SessionState::default();
        }

        pub(super) const fn target_addr(&self) -> Ipv4Addr {
            self.probe.target_addr
        }

        pub(super) const fn sample_count(&self) -> usize {
            self.sample_count
        }

        pub(super) const fn probe_timeout(&self) -> Duration {
            self.probe.timeout
        }

        pub(super) const fn payload_size(&self) -> PayloadSize {
            self.probe.payload_size
        }

        pub(super) const fn payload_pattern(&self) -> PayloadPattern {
            self.probe.payload_pattern
        }

        pub(super) const fn seed(&self) -> Option<u64> {
            self.seed
        }
    }
}
