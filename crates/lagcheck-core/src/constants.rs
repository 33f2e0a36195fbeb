use crate::types::Sequence;

/// The maximum size of the IP packet we allow.
pub const MAX_PACKET_SIZE: usize = 1024;

/// The maximum size of the probe payload in bytes.
pub const MAX_PAYLOAD_SIZE: u16 = 512;

/// The sequence number used for every echo probe.
pub const ECHO_SEQUENCE: Sequence = Sequence(1);
