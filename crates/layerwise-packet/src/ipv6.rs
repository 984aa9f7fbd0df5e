use crate::checksum::PseudoHeader;
use crate::error::{Error, Result};
use crate::ipv6_extension::{walk_chain, ExtensionChain, ExtensionHeaderPacket};
use crate::view::ByteView;
use crate::{check_minimum, fmt_payload, IpProtocol, Layer, LayerKind};
use std::fmt::{Debug, Formatter};
use std::net::Ipv6Addr;

const VERSION_BIT_OFFSET: usize = 0;
const VERSION_BIT_WIDTH: usize = 4;
const TRAFFIC_CLASS_BIT_OFFSET: usize = 4;
const TRAFFIC_CLASS_BIT_WIDTH: usize = 8;
const FLOW_LABEL_BIT_OFFSET: usize = 12;
const FLOW_LABEL_BIT_WIDTH: usize = 20;
const PAYLOAD_LENGTH_OFFSET: usize = 4;
const NEXT_HEADER_OFFSET: usize = 6;
const HOP_LIMIT_OFFSET: usize = 7;
const SOURCE_ADDRESS_OFFSET: usize = 8;
const DESTINATION_ADDRESS_OFFSET: usize = 24;

/// Represents an IPv6 Packet.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
///
/// The payload of the packet is everything declared by the payload length field, extension headers
/// included. Use [`Ipv6Packet::walk_extension_headers`] to locate the upper layer.
pub struct Ipv6Packet<'a> {
    buf: ByteView<'a>,
}

impl<'a> Ipv6Packet<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        Self::from_view(ByteView::new_mut(packet))
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Self::from_view(ByteView::new(packet))
    }

    pub fn from_view(buf: ByteView<'a>) -> Result<Self> {
        check_minimum("Ipv6Packet", Self::minimum_packet_size(), &buf)?;
        Ok(Self { buf })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        40
    }

    #[must_use]
    pub fn get_version(&self) -> u8 {
        self.buf.read_bits(VERSION_BIT_OFFSET, VERSION_BIT_WIDTH) as u8
    }

    #[must_use]
    pub fn get_traffic_class(&self) -> u8 {
        self.buf
            .read_bits(TRAFFIC_CLASS_BIT_OFFSET, TRAFFIC_CLASS_BIT_WIDTH) as u8
    }

    #[must_use]
    pub fn get_flow_label(&self) -> u32 {
        self.buf
            .read_bits(FLOW_LABEL_BIT_OFFSET, FLOW_LABEL_BIT_WIDTH) as u32
    }

    #[must_use]
    pub fn get_payload_length(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(PAYLOAD_LENGTH_OFFSET))
    }

    #[must_use]
    pub fn get_next_header(&self) -> IpProtocol {
        IpProtocol::from(self.buf.read(NEXT_HEADER_OFFSET))
    }

    #[must_use]
    pub fn get_hop_limit(&self) -> u8 {
        self.buf.read(HOP_LIMIT_OFFSET)
    }

    #[must_use]
    pub fn get_source_address(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.buf.get_bytes(SOURCE_ADDRESS_OFFSET))
    }

    #[must_use]
    pub fn get_destination_address(&self) -> Ipv6Addr {
        Ipv6Addr::from(self.buf.get_bytes(DESTINATION_ADDRESS_OFFSET))
    }

    pub fn set_version(&mut self, val: u8) {
        self.buf
            .write_bits(VERSION_BIT_OFFSET, VERSION_BIT_WIDTH, u64::from(val));
    }

    pub fn set_traffic_class(&mut self, val: u8) {
        self.buf.write_bits(
            TRAFFIC_CLASS_BIT_OFFSET,
            TRAFFIC_CLASS_BIT_WIDTH,
            u64::from(val),
        );
    }

    pub fn set_flow_label(&mut self, val: u32) {
        self.buf
            .write_bits(FLOW_LABEL_BIT_OFFSET, FLOW_LABEL_BIT_WIDTH, u64::from(val));
    }

    pub fn set_payload_length(&mut self, val: u16) {
        self.buf.set_bytes(PAYLOAD_LENGTH_OFFSET, val.to_be_bytes());
    }

    pub fn set_next_header(&mut self, val: IpProtocol) {
        *self.buf.write(NEXT_HEADER_OFFSET) = val.id();
    }

    pub fn set_hop_limit(&mut self, val: u8) {
        *self.buf.write(HOP_LIMIT_OFFSET) = val;
    }

    pub fn set_source_address(&mut self, val: Ipv6Addr) {
        self.buf.set_bytes(SOURCE_ADDRESS_OFFSET, val.octets());
    }

    pub fn set_destination_address(&mut self, val: Ipv6Addr) {
        self.buf.set_bytes(DESTINATION_ADDRESS_OFFSET, val.octets());
    }

    pub fn set_payload(&mut self, vals: &[u8]) {
        let current_offset = Self::minimum_packet_size();
        self.buf.set_slice(current_offset, vals);
    }

    /// Check the declared payload length fits within the buffer.
    ///
    /// Bytes beyond the declared payload are not part of this packet.
    pub fn check_payload_length(&self) -> Result<()> {
        let declared = Self::minimum_packet_size() + usize::from(self.get_payload_length());
        if declared > self.buf.len() {
            Err(Error::length_inconsistency(
                "Ipv6",
                declared,
                self.buf.len(),
            ))
        } else {
            Ok(())
        }
    }

    /// The number of bytes covered by this packet, fixed header included.
    #[must_use]
    pub fn packet_length(&self) -> usize {
        std::cmp::min(
            Self::minimum_packet_size() + usize::from(self.get_payload_length()),
            self.buf.len(),
        )
    }

    /// Walk the extension header chain, accepting at most `limit` extension headers.
    pub fn walk_extension_headers(&self, limit: usize) -> Result<ExtensionChain> {
        self.check_payload_length()?;
        walk_chain(
            self.get_next_header(),
            &self.buf.as_slice()[..self.packet_length()],
            Self::minimum_packet_size(),
            limit,
        )
    }

    /// The extension headers of this packet, in wire order.
    pub fn extension_headers(&self) -> Result<Vec<ExtensionHeaderPacket<'_>>> {
        self.walk_extension_headers(usize::MAX)?
            .headers()
            .iter()
            .map(|info| {
                let view = self.buf.slice(info.offset, info.length)?;
                ExtensionHeaderPacket::from_view(info.kind, view)
            })
            .collect()
    }

    /// The protocol which follows the fixed header and any extension headers.
    pub fn upper_layer_protocol(&self) -> Result<IpProtocol> {
        Ok(self
            .walk_extension_headers(usize::MAX)?
            .upper_layer_protocol())
    }

    /// The length of the fixed header and all extension headers.
    pub fn header_length(&self) -> Result<usize> {
        Ok(self
            .walk_extension_headers(usize::MAX)?
            .upper_layer_offset())
    }

    /// The destination of the upper layer.
    ///
    /// This is the last address of a routing header with segments left, otherwise the destination
    /// address of the fixed header. The chain is walked over the whole view regardless of the
    /// payload length field, and a chain which cannot be walked names no final destination.
    #[must_use]
    pub fn final_destination(&self) -> Ipv6Addr {
        walk_chain(
            self.get_next_header(),
            self.buf.as_slice(),
            Self::minimum_packet_size(),
            usize::MAX,
        )
        .ok()
        .and_then(|chain| chain.final_destination())
        .unwrap_or_else(|| self.get_destination_address())
    }

    /// The pseudo-header used by upper layer checksums.
    ///
    /// The destination is the [`final destination`](Ipv6Packet::final_destination) of the packet.
    #[must_use]
    pub fn pseudo_header(&self) -> PseudoHeader {
        PseudoHeader::Ipv6 {
            source: self.get_source_address(),
            destination: self.final_destination(),
        }
    }

    /// Set the payload length from the size of the buffer.
    pub fn update_calculated_values(&mut self) -> Result<()> {
        let payload_length = self.buf.len() - Self::minimum_packet_size();
        let payload_length = u16::try_from(payload_length).map_err(|_| {
            Error::length_inconsistency("Ipv6", payload_length, usize::from(u16::MAX))
        })?;
        self.set_payload_length(payload_length);
        Ok(())
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf.as_slice()[Self::minimum_packet_size()..self.packet_length()]
    }
}

impl<'a> Layer<'a> for Ipv6Packet<'a> {
    const KIND: LayerKind = LayerKind::Ipv6;

    fn try_from_view(view: ByteView<'a>) -> Result<Self> {
        Self::from_view(view)
    }
}

impl Debug for Ipv6Packet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ipv6Packet")
            .field("version", &self.get_version())
            .field("traffic_class", &self.get_traffic_class())
            .field("flow_label", &self.get_flow_label())
            .field("payload_length", &self.get_payload_length())
            .field("next_header", &self.get_next_header())
            .field("hop_limit", &self.get_hop_limit())
            .field("source_address", &self.get_source_address())
            .field("destination_address", &self.get_destination_address())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
