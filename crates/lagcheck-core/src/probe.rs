use crate::config::ProbeConfig;
use crate::constants::{ECHO_SEQUENCE, MAX_PACKET_SIZE};
use crate::error::{Error, ErrorKind, IoError, Result};
use crate::net::socket::Socket;
use crate::sample::Sample;
use crate::types::ProbeId;
use lagcheck_packet::checksum::icmp_checksum;
use lagcheck_packet::icmpv4::echo_reply::EchoReplyPacket;
use lagcheck_packet::icmpv4::echo_request::EchoRequestPacket;
use lagcheck_packet::icmpv4::{IcmpCode, IcmpType};
use lagcheck_packet::ipv4::Ipv4Packet;
use std::net::{IpAddr, SocketAddr};
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing::instrument;

/// The outcome of a single echo probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    /// A matching echo reply was received within the timeout.
    Reply(Sample),
    /// No matching echo reply was received within the timeout.
    Timeout,
    /// The probe failed with a recoverable socket or parse error.
    ProtocolError,
}

/// An ICMP echo prober.
///
/// Each probe sends a single echo request and waits for the matching echo
/// reply. Replies which carry a foreign identifier are ignored and do not
/// consume any of the probe timeout beyond the original deadline.
#[derive(Debug, Clone, Copy)]
pub struct Prober {
    config: ProbeConfig,
}

impl Prober {
    /// Create a `Prober`.
    #[must_use]
    pub const fn new(config: ProbeConfig) -> Self {
        Self { config }
    }

    /// Send a single echo probe and await the reply.
    #[instrument(skip(self), level = "trace")]
    pub fn probe<S: Socket>(&self) -> Result<ProbeOutcome> {
        let socket = S::new_icmp_socket_ipv4().map_err(|err| match err.kind() {
            ErrorKind::PermissionDenied => Error::PermissionDenied,
            ErrorKind::Std(_) => Error::IoError(err),
        })?;
        self.probe_on(socket, make_identifier())
    }

    fn probe_on<S: Socket>(&self, mut socket: S, identifier: ProbeId) -> Result<ProbeOutcome> {
        let request = self.make_echo_request(identifier)?;
        let addr = SocketAddr::new(IpAddr::V4(self.config.target_addr), 0);
        if let Err(err) = socket.send_to(&request, addr) {
            return recover(&err);
        }
        let sent = Instant::now();
        loop {
            let remaining = self.config.timeout.saturating_sub(sent.elapsed());
            if remaining.is_zero() {
                tracing::debug!(?identifier, "probe timed out");
                return Ok(ProbeOutcome::Timeout);
            }
            let readable = match socket.is_readable(remaining) {
                Ok(readable) => readable,
                Err(err) => return recover(&err),
            };
            if !readable {
                continue;
            }
            let mut buf = [0_u8; MAX_PACKET_SIZE];
            let bytes_read = match socket.read(&mut buf) {
                Ok(bytes_read) => bytes_read,
                Err(err) => return recover(&err),
            };
            match classify_reply(&buf[..bytes_read], identifier) {
                Reply::Matched => {
                    let rtt = sent.elapsed().min(self.config.timeout);
                    let sample = Sample(rtt.as_secs_f64() * 1000.0);
                    tracing::debug!(?identifier, ?sample, "probe reply");
                    return Ok(ProbeOutcome::Reply(sample));
                }
                Reply::Ignored => {
                    tracing::trace!(?identifier, "ignored foreign reply");
                }
                Reply::Malformed => {
                    tracing::debug!(?identifier, "malformed reply");
                    return Ok(ProbeOutcome::ProtocolError);
                }
            }
        }
    }

    /// Build the echo request packet for a given identifier.
    ///
    /// All bytes other than the checksum and identifier are fixed for a given
    /// configuration.
    fn make_echo_request(&self, identifier: ProbeId) -> Result<Vec<u8>> {
        let payload_size = usize::from(self.config.payload_size.0);
        let mut buf = vec![0_u8; EchoRequestPacket::minimum_packet_size() + payload_size];
        let payload = vec![self.config.payload_pattern.0; payload_size];
        let mut icmp = EchoRequestPacket::new(&mut buf)?;
        icmp.set_icmp_type(IcmpType::EchoRequest);
        icmp.set_icmp_code(IcmpCode(0));
        icmp.set_identifier(identifier.0);
        icmp.set_sequence(ECHO_SEQUENCE.0);
        icmp.set_payload(&payload);
        icmp.set_checksum(icmp_checksum(icmp.packet()));
        Ok(buf)
    }
}

enum Reply {
    Matched,
    Ignored,
    Malformed,
}

/// Map a socket failure on an in-flight probe to a probe outcome.
///
/// Transient send and receive failures are recoverable and the caller retries
/// them like a timeout. A permission failure is fatal to the session.
fn recover(err: &IoError) -> Result<ProbeOutcome> {
    match err.kind() {
        ErrorKind::PermissionDenied => Err(Error::PermissionDenied),
        ErrorKind::Std(_) => {
            tracing::debug!(%err, "probe socket error");
            Ok(ProbeOutcome::ProtocolError)
        }
    }
}

/// Classify a raw IPv4 datagram against the probe we sent.
fn classify_reply(buf: &[u8], identifier: ProbeId) -> Reply {
    let Ok(ipv4) = Ipv4Packet::new_view(buf) else {
        return Reply::Malformed;
    };
    let Ok(reply) = EchoReplyPacket::new_view(ipv4.payload()) else {
        return Reply::Malformed;
    };
    if reply.get_icmp_type() != IcmpType::EchoReply {
        return Reply::Ignored;
    }
    if reply.get_identifier() != identifier.0 {
        return Reply::Ignored;
    }
    Reply::Matched
}

/// Derive a probe identifier from the sub-second component of the wall clock.
///
/// Collisions are tolerated as stale replies are ignored by the caller.
fn make_identifier() -> ProbeId {
    let micros = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.subsec_micros());
    ProbeId((micros & 0xFFFF) as u16)
}
