use crate::checksum::{ipv4_header_checksum, is_valid_checksum, PseudoHeader};
use crate::error::{Error, Result};
use crate::view::ByteView;
use crate::{check_minimum, fmt_payload, IpProtocol, Layer, LayerKind};
use std::fmt::{Debug, Formatter};
use std::net::Ipv4Addr;

const VERSION_BIT_OFFSET: usize = 0;
const IHL_BIT_OFFSET: usize = 4;
const DSCP_BIT_OFFSET: usize = 8;
const ECN_BIT_OFFSET: usize = 14;
const TOTAL_LENGTH_OFFSET: usize = 2;
const IDENTIFICATION_OFFSET: usize = 4;
const FLAGS_BIT_OFFSET: usize = 48;
const FRAGMENT_OFFSET_BIT_OFFSET: usize = 51;
const TIME_TO_LIVE_OFFSET: usize = 8;
const PROTOCOL_OFFSET: usize = 9;
const CHECKSUM_OFFSET: usize = 10;
const SOURCE_OFFSET: usize = 12;
const DESTINATION_OFFSET: usize = 16;

/// The `More Fragments` flag.
pub const FLAG_MORE_FRAGMENTS: u8 = 0b001;

/// The `Don't Fragment` flag.
pub const FLAG_DONT_FRAGMENT: u8 = 0b010;

/// Represents an IPv4 Packet.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct Ipv4Packet<'a> {
    buf: ByteView<'a>,
}

impl<'a> Ipv4Packet<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        Self::from_view(ByteView::new_mut(packet))
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Self::from_view(ByteView::new(packet))
    }

    pub fn from_view(buf: ByteView<'a>) -> Result<Self> {
        check_minimum("Ipv4Packet", Self::minimum_packet_size(), &buf)?;
        Ok(Self { buf })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        20
    }

    #[must_use]
    pub fn get_version(&self) -> u8 {
        self.buf.read_bits(VERSION_BIT_OFFSET, 4) as u8
    }

    /// The header length in 32 bit words.
    #[must_use]
    pub fn get_header_length(&self) -> u8 {
        self.buf.read_bits(IHL_BIT_OFFSET, 4) as u8
    }

    #[must_use]
    pub fn get_dscp(&self) -> u8 {
        self.buf.read_bits(DSCP_BIT_OFFSET, 6) as u8
    }

    #[must_use]
    pub fn get_ecn(&self) -> u8 {
        self.buf.read_bits(ECN_BIT_OFFSET, 2) as u8
    }

    #[must_use]
    pub fn get_tos(&self) -> u8 {
        (self.get_dscp() << 2) | self.get_ecn()
    }

    #[must_use]
    pub fn get_total_length(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(TOTAL_LENGTH_OFFSET))
    }

    #[must_use]
    pub fn get_identification(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(IDENTIFICATION_OFFSET))
    }

    #[must_use]
    pub fn get_flags(&self) -> u8 {
        self.buf.read_bits(FLAGS_BIT_OFFSET, 3) as u8
    }

    /// The fragment offset in 8 byte units.
    #[must_use]
    pub fn get_fragment_offset(&self) -> u16 {
        self.buf.read_bits(FRAGMENT_OFFSET_BIT_OFFSET, 13) as u16
    }

    #[must_use]
    pub fn get_ttl(&self) -> u8 {
        self.buf.read(TIME_TO_LIVE_OFFSET)
    }

    #[must_use]
    pub fn get_protocol(&self) -> IpProtocol {
        IpProtocol::from(self.buf.read(PROTOCOL_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
    }

    #[must_use]
    pub fn get_source(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.buf.get_bytes(SOURCE_OFFSET))
    }

    #[must_use]
    pub fn get_destination(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.buf.get_bytes(DESTINATION_OFFSET))
    }

    #[must_use]
    pub fn get_options_raw(&self) -> &[u8] {
        let start = Self::minimum_packet_size();
        let end = std::cmp::max(start, self.header_end());
        &self.buf.as_slice()[start..end]
    }

    pub fn set_version(&mut self, val: u8) {
        self.buf.write_bits(VERSION_BIT_OFFSET, 4, u64::from(val));
    }

    pub fn set_header_length(&mut self, val: u8) {
        self.buf.write_bits(IHL_BIT_OFFSET, 4, u64::from(val));
    }

    pub fn set_dscp(&mut self, val: u8) {
        self.buf.write_bits(DSCP_BIT_OFFSET, 6, u64::from(val));
    }

    pub fn set_ecn(&mut self, val: u8) {
        self.buf.write_bits(ECN_BIT_OFFSET, 2, u64::from(val));
    }

    pub fn set_tos(&mut self, val: u8) {
        self.set_dscp((val & 0xfc) >> 2);
        self.set_ecn(val & 0x3);
    }

    pub fn set_total_length(&mut self, val: u16) {
        self.buf.set_bytes(TOTAL_LENGTH_OFFSET, val.to_be_bytes());
    }

    pub fn set_identification(&mut self, val: u16) {
        self.buf.set_bytes(IDENTIFICATION_OFFSET, val.to_be_bytes());
    }

    pub fn set_flags(&mut self, val: u8) {
        self.buf.write_bits(FLAGS_BIT_OFFSET, 3, u64::from(val));
    }

    pub fn set_fragment_offset(&mut self, val: u16) {
        self.buf
            .write_bits(FRAGMENT_OFFSET_BIT_OFFSET, 13, u64::from(val));
    }

    pub fn set_ttl(&mut self, val: u8) {
        *self.buf.write(TIME_TO_LIVE_OFFSET) = val;
    }

    pub fn set_protocol(&mut self, val: IpProtocol) {
        *self.buf.write(PROTOCOL_OFFSET) = val.id();
    }

    pub fn set_checksum(&mut self, val: u16) {
        self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
    }

    pub fn set_source(&mut self, val: Ipv4Addr) {
        self.buf.set_bytes(SOURCE_OFFSET, val.octets());
    }

    pub fn set_destination(&mut self, val: Ipv4Addr) {
        self.buf.set_bytes(DESTINATION_OFFSET, val.octets());
    }

    pub fn set_payload(&mut self, vals: &[u8]) {
        let current_offset = self.header_end();
        self.buf.set_slice(current_offset, vals);
    }

    /// Is this datagram a fragment of a larger one?
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.get_fragment_offset() != 0 || self.get_flags() & FLAG_MORE_FRAGMENTS != 0
    }

    /// Check the header and total length fields agree with each other and the buffer.
    pub fn check_lengths(&self) -> Result<()> {
        let header_length = usize::from(self.get_header_length()) * 4;
        let total_length = usize::from(self.get_total_length());
        if header_length < Self::minimum_packet_size() {
            Err(Error::length_inconsistency(
                "Ipv4",
                header_length,
                Self::minimum_packet_size(),
            ))
        } else if header_length > total_length {
            Err(Error::length_inconsistency(
                "Ipv4",
                header_length,
                total_length,
            ))
        } else if total_length > self.buf.len() {
            Err(Error::length_inconsistency(
                "Ipv4",
                total_length,
                self.buf.len(),
            ))
        } else {
            Ok(())
        }
    }

    /// The number of bytes covered by this datagram, header included.
    #[must_use]
    pub fn packet_length(&self) -> usize {
        std::cmp::min(usize::from(self.get_total_length()), self.buf.len())
    }

    /// Calculate the header checksum as if the stored checksum were zero.
    #[must_use]
    pub fn calculate_checksum(&self) -> u16 {
        ipv4_header_checksum(&self.buf.as_slice()[..self.header_end()])
    }

    #[must_use]
    pub fn is_checksum_valid(&self) -> bool {
        is_valid_checksum(&self.buf.as_slice()[..self.header_end()])
    }

    pub fn update_checksum(&mut self) {
        self.set_checksum(0);
        let checksum = self.calculate_checksum();
        self.set_checksum(checksum);
    }

    /// The pseudo-header used by upper layer checksums.
    #[must_use]
    pub fn pseudo_header(&self) -> PseudoHeader {
        PseudoHeader::Ipv4 {
            source: self.get_source(),
            destination: self.get_destination(),
        }
    }

    /// Set the total length from the size of the buffer and recompute the header checksum.
    pub fn update_calculated_values(&mut self) -> Result<()> {
        let total_length = u16::try_from(self.buf.len()).map_err(|_| {
            Error::length_inconsistency("Ipv4", self.buf.len(), usize::from(u16::MAX))
        })?;
        self.set_total_length(total_length);
        self.update_checksum();
        Ok(())
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        let end = self.packet_length();
        let start = std::cmp::min(self.header_end(), end);
        &self.buf.as_slice()[start..end]
    }

    /// The end of the header, bounded by the buffer.
    fn header_end(&self) -> usize {
        std::cmp::min(usize::from(self.get_header_length()) * 4, self.buf.len())
    }
}

impl<'a> Layer<'a> for Ipv4Packet<'a> {
    const KIND: LayerKind = LayerKind::Ipv4;

    fn try_from_view(view: ByteView<'a>) -> Result<Self> {
        Self::from_view(view)
    }
}

impl Debug for Ipv4Packet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ipv4Packet")
            .field("version", &self.get_version())
            .field("header_length", &self.get_header_length())
            .field("dscp", &self.get_dscp())
            .field("ecn", &self.get_ecn())
            .field("total_length", &self.get_total_length())
            .field("identification", &self.get_identification())
            .field("flags", &self.get_flags())
            .field("fragment_offset", &self.get_fragment_offset())
            .field("ttl", &self.get_ttl())
            .field("protocol", &self.get_protocol())
            .field("checksum", &self.get_checksum())
            .field("source", &self.get_source())
            .field("destination", &self.get_destination())
            .field("options_raw", &self.get_options_raw())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
