//! Zero-copy packet wire format parsing and building.
//!
//! The following packet are supported:
//! - `Ethernet II`
//! - `IPv4`
//! - `IPv6` (including the extension header chain)
//! - `ICMPv6`
//! - `TCP`
//! - `UDP`
//! - `Wake-on-LAN` magic packets
//! - raw payloads
//!
//! Every codec is a thin typed layer over a [`ByteView`](view::ByteView), a bounds checked window
//! over a borrowed byte buffer. Reading a field never copies the packet and writing a field
//! mutates the buffer in place.
//!
//! # Endianness
//!
//! The internal representation is held in network byte order (big-endian) and
//! all accessor methods take and return data in host byte order, converting as
//! necessary for the given architecture.
//!
//! # Example
//!
//! The following example parses an `ICMPv6` router solicitation and validates its checksum:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use layerwise_packet::icmpv6::{IcmpType, IcmpV6Packet};
//! use layerwise_packet::ipv6::Ipv6Packet;
//!
//! let buf = hex_literal::hex!(
//!     "60 00 00 00 00 10 3a ff fe 80 00 00 00 00 00 00 02 a0 cc ff fe d9 41 75
//!      ff 02 00 00 00 00 00 00 00 00 00 00 00 00 00 02
//!      85 00 5d 50 00 00 00 00 01 01 00 a0 cc d9 41 75"
//! );
//! let ipv6 = Ipv6Packet::new_view(&buf)?;
//! assert_eq!(255, ipv6.get_hop_limit());
//! let icmp = IcmpV6Packet::new_view(ipv6.payload())?;
//! assert_eq!(IcmpType::RouterSolicitation, icmp.get_icmp_type());
//! assert_eq!(0x5d50, icmp.get_checksum());
//! assert!(icmp.is_checksum_valid(ipv6.pseudo_header()));
//! # Ok(())
//! # }
//! ```
//!
//! The following example builds a `UDP` datagram and fills in its length and checksum:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use layerwise_packet::checksum::PseudoHeader;
//! use layerwise_packet::udp::UdpPacket;
//! use std::net::Ipv4Addr;
//!
//! let mut buf = [0; UdpPacket::minimum_packet_size() + 2];
//! let mut udp = UdpPacket::new(&mut buf)?;
//! udp.set_source(26815);
//! udp.set_destination(33206);
//! udp.set_payload(&[0xab, 0xcd]);
//! udp.update_calculated_values(PseudoHeader::Ipv4 {
//!     source: Ipv4Addr::new(10, 0, 0, 1),
//!     destination: Ipv4Addr::new(10, 0, 0, 2),
//! })?;
//! assert_eq!(10, udp.get_length());
//! assert!(udp.is_checksum_valid(PseudoHeader::Ipv4 {
//!     source: Ipv4Addr::new(10, 0, 0, 1),
//!     destination: Ipv4Addr::new(10, 0, 0, 2),
//! }));
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

/// Packet errors.
pub mod error;

/// Bounds checked byte windows.
pub mod view;

/// Functions for calculating network checksums.
pub mod checksum;

/// `Ethernet II` frames.
pub mod ethernet;

/// `IPv4` packets.
pub mod ipv4;

/// `IPv6` packets.
pub mod ipv6;

/// `IPv6` extension headers.
pub mod ipv6_extension;

/// `ICMPv6` packets.
pub mod icmpv6;

/// `TCP` packets.
pub mod tcp;

/// `UDP` packets.
pub mod udp;

/// `Wake-on-LAN` magic packets.
pub mod wake_on_lan;

/// Opaque payloads.
pub mod raw;

use error::Result;
use view::ByteView;

/// The IP packet next layer protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum IpProtocol {
    HopByHop,
    Icmp,
    Tcp,
    Udp,
    Routing,
    Fragment,
    Esp,
    Authentication,
    IcmpV6,
    NoNextHeader,
    DestinationOptions,
    Mobility,
    Hip,
    Shim6,
    Other(u8),
}

impl IpProtocol {
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::HopByHop => 0,
            Self::Icmp => 1,
            Self::Tcp => 6,
            Self::Udp => 17,
            Self::Routing => 43,
            Self::Fragment => 44,
            Self::Esp => 50,
            Self::Authentication => 51,
            Self::IcmpV6 => 58,
            Self::NoNextHeader => 59,
            Self::DestinationOptions => 60,
            Self::Mobility => 135,
            Self::Hip => 139,
            Self::Shim6 => 140,
            Self::Other(id) => id,
        }
    }

    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self::Other(value)
    }
}

impl From<u8> for IpProtocol {
    fn from(id: u8) -> Self {
        match id {
            0 => Self::HopByHop,
            1 => Self::Icmp,
            6 => Self::Tcp,
            17 => Self::Udp,
            43 => Self::Routing,
            44 => Self::Fragment,
            50 => Self::Esp,
            51 => Self::Authentication,
            58 => Self::IcmpV6,
            59 => Self::NoNextHeader,
            60 => Self::DestinationOptions,
            135 => Self::Mobility,
            139 => Self::Hip,
            140 => Self::Shim6,
            p => Self::Other(p),
        }
    }
}

/// The link layer next layer protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum EtherType {
    Ipv4,
    Ipv6,
    WakeOnLan,
    Other(u16),
}

impl EtherType {
    #[must_use]
    pub const fn id(self) -> u16 {
        match self {
            Self::Ipv4 => 0x0800,
            Self::Ipv6 => 0x86DD,
            Self::WakeOnLan => 0x0842,
            Self::Other(id) => id,
        }
    }
}

impl From<u16> for EtherType {
    fn from(id: u16) -> Self {
        match id {
            0x0800 => Self::Ipv4,
            0x86DD => Self::Ipv6,
            0x0842 => Self::WakeOnLan,
            t => Self::Other(t),
        }
    }
}

/// The kind of a protocol layer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum LayerKind {
    Ethernet,
    Ipv4,
    Ipv6,
    IcmpV6,
    Tcp,
    Udp,
    WakeOnLan,
    Raw,
}

/// A codec which can be laid over the bytes of a single protocol layer.
pub trait Layer<'a>: Sized {
    /// The kind of layer this codec decodes.
    const KIND: LayerKind;

    /// Lay the codec over a view which starts at the first byte of the layer.
    fn try_from_view(view: ByteView<'a>) -> Result<Self>;
}

/// Format a payload as a hexadecimal string.
#[must_use]
pub fn fmt_payload(bytes: &[u8]) -> String {
    use itertools::Itertools as _;
    format!("{:02x}", bytes.iter().format(" "))
}

/// Check a view holds at least `minimum` bytes for the named packet.
pub(crate) fn check_minimum(name: &str, minimum: usize, view: &ByteView<'_>) -> Result<()> {
    if view.len() >= minimum {
        Ok(())
    } else {
        Err(error::Error::InsufficientPacketBuffer(
            String::from(name),
            minimum,
            view.len(),
        ))
    }
}
