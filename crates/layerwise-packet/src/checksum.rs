//! Internet checksum (RFC 1071) with optional IPv4 and IPv6 pseudo-headers.
//!
//! This code is derived from [`libpnet`] which is available under the Apache 2.0 license.
//!
//! [`libpnet`]: https://github.com/libpnet/libpnet

use crate::IpProtocol;
use std::net::{Ipv4Addr, Ipv6Addr};

/// The addressing context of a transport checksum.
///
/// The pseudo-header is summed into the checksum of `TCP`, `UDP` and `ICMPv6` but is never
/// transmitted.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PseudoHeader {
    /// RFC 793: source, destination, zero, protocol and 16 bit length.
    Ipv4 {
        source: Ipv4Addr,
        destination: Ipv4Addr,
    },
    /// RFC 8200 section 8.1: source, destination, 32 bit length, zeros and next header.
    Ipv6 {
        source: Ipv6Addr,
        destination: Ipv6Addr,
    },
}

impl PseudoHeader {
    fn sum(self, upper_layer_length: u32, protocol: IpProtocol) -> u64 {
        let addrs = match self {
            Self::Ipv4 {
                source,
                destination,
            } => ipv4_word_sum(source) + ipv4_word_sum(destination),
            Self::Ipv6 {
                source,
                destination,
            } => ipv6_word_sum(source) + ipv6_word_sum(destination),
        };
        addrs
            + u64::from(upper_layer_length >> 16)
            + u64::from(upper_layer_length & 0xFFFF)
            + u64::from(protocol.id())
    }
}

/// Calculate the Internet checksum of `data`.
///
/// An odd trailing byte is summed as if padded with a zero byte.
#[must_use]
pub fn internet_checksum(data: &[u8]) -> u16 {
    finalize_checksum(sum_be_words(data, None))
}

/// Calculate the Internet checksum of `data` preceded by a pseudo-header.
#[must_use]
pub fn pseudo_header_checksum(
    pseudo: PseudoHeader,
    upper_layer_length: u32,
    protocol: IpProtocol,
    data: &[u8],
) -> u16 {
    finalize_checksum(pseudo.sum(upper_layer_length, protocol) + sum_be_words(data, None))
}

/// Is the checksum stored within `data` correct?
///
/// The stored checksum is summed in place, a correct one folds to all ones.
#[must_use]
pub fn is_valid_checksum(data: &[u8]) -> bool {
    fold(sum_be_words(data, None)) == 0xFFFF
}

/// Is the checksum stored within `data` correct for the given pseudo-header?
#[must_use]
pub fn is_valid_pseudo_header_checksum(
    pseudo: PseudoHeader,
    upper_layer_length: u32,
    protocol: IpProtocol,
    data: &[u8],
) -> bool {
    fold(pseudo.sum(upper_layer_length, protocol) + sum_be_words(data, None)) == 0xFFFF
}

/// Calculate the checksum for an `Ipv4` header.
#[must_use]
pub fn ipv4_header_checksum(data: &[u8]) -> u16 {
    finalize_checksum(sum_be_words(data, Some(5)))
}

/// Calculate the checksum for an `Ipv6` `ICMPv6` packet.
#[must_use]
pub fn icmp_ipv6_checksum(data: &[u8], src_addr: Ipv6Addr, dest_addr: Ipv6Addr) -> u16 {
    let pseudo = PseudoHeader::Ipv6 {
        source: src_addr,
        destination: dest_addr,
    };
    transport_checksum(pseudo, IpProtocol::IcmpV6, data, 1)
}

/// Calculate the checksum for an `IPv4` `UDP` packet.
#[must_use]
pub fn udp_ipv4_checksum(data: &[u8], src_addr: Ipv4Addr, dest_addr: Ipv4Addr) -> u16 {
    let pseudo = PseudoHeader::Ipv4 {
        source: src_addr,
        destination: dest_addr,
    };
    transport_checksum(pseudo, IpProtocol::Udp, data, 3)
}

/// Calculate the checksum for an `IPv6` `UDP` packet.
#[must_use]
pub fn udp_ipv6_checksum(data: &[u8], src_addr: Ipv6Addr, dest_addr: Ipv6Addr) -> u16 {
    let pseudo = PseudoHeader::Ipv6 {
        source: src_addr,
        destination: dest_addr,
    };
    transport_checksum(pseudo, IpProtocol::Udp, data, 3)
}

/// Calculate the checksum for an `IPv4` `TCP` packet.
#[must_use]
pub fn tcp_ipv4_checksum(data: &[u8], src_addr: Ipv4Addr, dest_addr: Ipv4Addr) -> u16 {
    let pseudo = PseudoHeader::Ipv4 {
        source: src_addr,
        destination: dest_addr,
    };
    transport_checksum(pseudo, IpProtocol::Tcp, data, 8)
}

/// Calculate the checksum for an `IPv6` `TCP` packet.
#[must_use]
pub fn tcp_ipv6_checksum(data: &[u8], src_addr: Ipv6Addr, dest_addr: Ipv6Addr) -> u16 {
    let pseudo = PseudoHeader::Ipv6 {
        source: src_addr,
        destination: dest_addr,
    };
    transport_checksum(pseudo, IpProtocol::Tcp, data, 8)
}

/// Calculate a transport checksum as if the word at `ignore_word` were zero.
pub(crate) fn transport_checksum(
    pseudo: PseudoHeader,
    protocol: IpProtocol,
    data: &[u8],
    ignore_word: usize,
) -> u16 {
    let length = u32::try_from(data.len()).unwrap_or(u32::MAX);
    finalize_checksum(pseudo.sum(length, protocol) + sum_be_words(data, Some(ignore_word)))
}

fn ipv4_word_sum(ip: Ipv4Addr) -> u64 {
    let octets = ip.octets();
    u64::from(u16::from_be_bytes([octets[0], octets[1]]))
        + u64::from(u16::from_be_bytes([octets[2], octets[3]]))
}

fn ipv6_word_sum(ip: Ipv6Addr) -> u64 {
    ip.segments().iter().map(|x| u64::from(*x)).sum()
}

fn sum_be_words(data: &[u8], ignore_word: Option<usize>) -> u64 {
    let chunks = data.chunks_exact(2);
    let remainder = chunks.remainder();
    let words = chunks.len();
    let mut sum = chunks
        .enumerate()
        .filter(|(i, _)| Some(*i) != ignore_word)
        .map(|(_, word)| u64::from(u16::from_be_bytes([word[0], word[1]])))
        .sum::<u64>();
    if let [last] = remainder {
        if Some(words) != ignore_word {
            sum += u64::from(*last) << 8;
        }
    }
    sum
}

const fn fold(mut sum: u64) -> u16 {
    while sum >> 16 != 0 {
        sum = (sum >> 16) + (sum & 0xFFFF);
    }
    sum as u16
}

const fn finalize_checksum(sum: u64) -> u16 {
    !fold(sum)
}
