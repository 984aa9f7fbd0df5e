//! Layerwise - A zero-copy layered packet dissector.
//!
//! This crate dissects a byte buffer into the chain of protocol layers it carries (link layer,
//! `IP`, transport, `ICMPv6`, `Wake-on-LAN` and opaque payloads) without copying it. Each layer
//! can be extracted as a typed codec from the [`layerwise_packet`] crate, read and written in
//! place, and have its lengths and checksums recomputed.
//!
//! # Example
//!
//! The following example dissects an `Ethernet II` frame carrying an `ICMPv6` router
//! solicitation and validates its checksum:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use layerwise_core::{parse, LinkLayer};
//! use layerwise_packet::icmpv6::{IcmpType, IcmpV6Packet};
//! use layerwise_packet::ipv6::Ipv6Packet;
//! use layerwise_packet::LayerKind;
//!
//! let buf = hex_literal::hex!(
//!     "33 33 00 00 00 02 00 a0 cc d9 41 75 86 dd
//!      60 00 00 00 00 10 3a ff fe 80 00 00 00 00 00 00 02 a0 cc ff fe d9 41 75
//!      ff 02 00 00 00 00 00 00 00 00 00 00 00 00 00 02
//!      85 00 5d 50 00 00 00 00 01 01 00 a0 cc d9 41 75"
//! );
//! let packet = parse(LinkLayer::Ethernet, &buf[..])?;
//! let ipv6 = packet.extract::<Ipv6Packet<'_>>().unwrap();
//! assert_eq!(255, ipv6.get_hop_limit());
//! let icmp = packet.extract::<IcmpV6Packet<'_>>().unwrap();
//! assert_eq!(IcmpType::RouterSolicitation, icmp.get_icmp_type());
//! let layer = packet.find(LayerKind::IcmpV6).unwrap();
//! assert_eq!(Some(true), layer.is_checksum_valid());
//! assert_eq!(16, layer.bytes().len());
//! # Ok(())
//! # }
//! ```
//!
//! The following example zeroes the `ICMPv6` checksum of an owned buffer and recomputes it:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use layerwise_core::{Dissector, LinkLayer};
//! use layerwise_packet::icmpv6::IcmpV6Packet;
//!
//! let buf = hex_literal::hex!(
//!     "60 00 00 00 00 10 3a ff fe 80 00 00 00 00 00 00 02 a0 cc ff fe d9 41 75
//!      ff 02 00 00 00 00 00 00 00 00 00 00 00 00 00 02
//!      85 00 5d 50 00 00 00 00 01 01 00 a0 cc d9 41 75"
//! );
//! let mut packet = Dissector::default().parse(LinkLayer::Raw, buf.to_vec())?;
//! packet.extract_mut::<IcmpV6Packet<'_>>().unwrap().set_checksum(0);
//! packet.update_calculated_values()?;
//! assert_eq!(&buf[..], packet.bytes());
//! # Ok(())
//! # }
//! ```
//!
//! Packets can also be built from field values, see [`PacketBuilder`].
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`Dissector`] with non-default configuration.
//! - [`Packet`] - A dissected packet.
//! - [`LayerRef`] - A single layer of a packet.
#![forbid(unsafe_code)]

mod builder;
mod config;
mod construct;
mod dissector;
mod error;
mod packet;

pub use builder::Builder;
pub use config::{defaults, Config, LinkLayer};
pub use construct::{
    EthernetSpec, IcmpV6Spec, Ipv4Spec, Ipv6Spec, PacketBuilder, TcpSpec, UdpSpec, WakeOnLanSpec,
};
pub use dissector::{parse, Dissector};
pub use error::{Error, Result};
pub use packet::{LayerId, LayerRef, Packet};
