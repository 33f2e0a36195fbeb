//! The Internet checksum for `ICMP` over IPv4.
//!
//! This code is derived from [`libpnet`] which is available under the Apache 2.0 license.
//!
//! [`libpnet`]: https://github.com/libpnet/libpnet

/// Calculate the checksum for an `Ipv4` `ICMP` packet.
///
/// The checksum field of the packet must be zero when the checksum is
/// calculated. A packet which carries a valid checksum sums to zero.
#[must_use]
pub fn icmp_checksum(data: &[u8]) -> u16 {
    if data.is_empty() {
        return 0;
    }
    finalize_checksum(sum_be_words(data))
}

fn sum_be_words(data: &[u8]) -> u32 {
    let len = data.len();
    let mut cur_data = data;
    let mut sum = 0u32;
    while cur_data.len() >= 2 {
        sum += u32::from(u16::from_be_bytes([cur_data[0], cur_data[1]]));
        cur_data = &cur_data[2..];
    }
    if len & 1 != 0 {
        sum += u32::from(data[len - 1]) << 8;
    }
    sum
}

const fn finalize_checksum(mut sum: u32) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    !sum as u16
}
