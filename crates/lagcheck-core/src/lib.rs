//! Lagcheck - a network latency probing and outcome simulation library.
//!
//! This crate measures round trip latency to a target host using ICMP echo
//! probes and then estimates, by Monte Carlo simulation against the measured
//! latency distribution, how much extra lag an opponent must carry before
//! the measured competitor wins a target share of rounds.
//!
//! The public API is a [`Session`] which runs the full pipeline: collect a
//! set of latency samples and search for the smallest added lag which meets
//! the win rate targets. Probing requires a raw socket and so elevated
//! privileges on most platforms.
//!
//! # Example
//!
//! The following example builds and runs a session with default
//! configuration and prints the progress of each sample and the final speed
//! limit:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use lagcheck_core::Builder;
//!
//! let addr = std::net::Ipv4Addr::new(1, 1, 1, 1);
//! let session = Builder::new(addr).build()?;
//! let limit = session.run_with(|progress| println!("{progress:?}"))?;
//! println!("{limit:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`Session`].
//! - [`Session::run`] - Run the session on the current thread.
//! - [`Session::run_with`] - Run the session with a progress handler.
//! - [`Session::spawn`] - Run the session on a new thread.
//! - [`Session::cancel`] - Cancel an in-progress run.
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![allow(
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::use_self,
    clippy::option_if_let_else,
    clippy::missing_const_for_fn,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
#![deny(unsafe_code)]

mod builder;
mod collect;
mod config;
mod constants;
mod error;
mod net;
mod probe;
mod sample;
mod search;
mod session;
mod sim;
mod state;
mod types;

pub use builder::Builder;
pub use collect::Collector;
pub use config::{defaults, ProbeConfig, SearchConfig, SimConfig};
pub use constants::{ECHO_SEQUENCE, MAX_PACKET_SIZE, MAX_PAYLOAD_SIZE};
pub use error::{Error, Result};
pub use net::socket::Socket;
pub use net::SocketImpl;
pub use probe::{ProbeOutcome, Prober};
pub use sample::{Sample, SampleSet, SampleStats};
pub use search::{search, SpeedLimit};
pub use session::{Progress, Session};
pub use sim::{play_match, simulate, MatchOutcome};
pub use state::SessionState;
pub use types::{CancelToken, PayloadPattern, PayloadSize, ProbeId, Sequence};
