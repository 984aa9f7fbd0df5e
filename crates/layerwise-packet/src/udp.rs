use crate::checksum::{is_valid_pseudo_header_checksum, transport_checksum, PseudoHeader};
use crate::error::{Error, Result};
use crate::view::ByteView;
use crate::{check_minimum, fmt_payload, IpProtocol, Layer, LayerKind};
use std::fmt::{Debug, Formatter};

const SOURCE_PORT_OFFSET: usize = 0;
const DESTINATION_PORT_OFFSET: usize = 2;
const LENGTH_OFFSET: usize = 4;
const CHECKSUM_OFFSET: usize = 6;

/// The index of the checksum word.
const CHECKSUM_WORD: usize = 3;

/// Represents a `UDP` packet.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct UdpPacket<'a> {
    buf: ByteView<'a>,
}

impl<'a> UdpPacket<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        Self::from_view(ByteView::new_mut(packet))
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Self::from_view(ByteView::new(packet))
    }

    pub fn from_view(buf: ByteView<'a>) -> Result<Self> {
        check_minimum("UdpPacket", Self::minimum_packet_size(), &buf)?;
        Ok(Self { buf })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        8
    }

    #[must_use]
    pub fn get_source(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(SOURCE_PORT_OFFSET))
    }

    #[must_use]
    pub fn get_destination(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(DESTINATION_PORT_OFFSET))
    }

    #[must_use]
    pub fn get_length(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(LENGTH_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
    }

    pub fn set_source(&mut self, val: u16) {
        self.buf.set_bytes(SOURCE_PORT_OFFSET, val.to_be_bytes());
    }

    pub fn set_destination(&mut self, val: u16) {
        self.buf
            .set_bytes(DESTINATION_PORT_OFFSET, val.to_be_bytes());
    }

    pub fn set_length(&mut self, val: u16) {
        self.buf.set_bytes(LENGTH_OFFSET, val.to_be_bytes());
    }

    pub fn set_checksum(&mut self, val: u16) {
        self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
    }

    pub fn set_payload(&mut self, vals: &[u8]) {
        self.buf.set_slice(Self::minimum_packet_size(), vals);
    }

    /// Check the length field agrees with the buffer.
    pub fn check_length(&self) -> Result<()> {
        let length = usize::from(self.get_length());
        if length < Self::minimum_packet_size() {
            Err(Error::length_inconsistency(
                "Udp",
                length,
                Self::minimum_packet_size(),
            ))
        } else if length > self.buf.len() {
            Err(Error::length_inconsistency("Udp", length, self.buf.len()))
        } else {
            Ok(())
        }
    }

    /// The number of bytes covered by this datagram, header included.
    #[must_use]
    pub fn packet_length(&self) -> usize {
        usize::from(self.get_length()).clamp(Self::minimum_packet_size(), self.buf.len())
    }

    /// Calculate the checksum of the datagram as if the stored checksum were zero.
    ///
    /// A computed checksum of zero is returned as all ones.
    #[must_use]
    pub fn calculate_checksum(&self, pseudo: PseudoHeader) -> u16 {
        match transport_checksum(pseudo, IpProtocol::Udp, self.datagram(), CHECKSUM_WORD) {
            0 => 0xFFFF,
            checksum => checksum,
        }
    }

    /// Is the stored checksum correct?
    ///
    /// Over `IPv4` a stored checksum of zero means no checksum was computed.
    #[must_use]
    pub fn is_checksum_valid(&self, pseudo: PseudoHeader) -> bool {
        if self.get_checksum() == 0 && matches!(pseudo, PseudoHeader::Ipv4 { .. }) {
            return true;
        }
        let datagram = self.datagram();
        let length = u32::try_from(datagram.len()).unwrap_or(u32::MAX);
        is_valid_pseudo_header_checksum(pseudo, length, IpProtocol::Udp, datagram)
    }

    pub fn update_checksum(&mut self, pseudo: PseudoHeader) {
        self.set_checksum(0);
        let checksum = self.calculate_checksum(pseudo);
        self.set_checksum(checksum);
    }

    /// Set the length from the size of the buffer and recompute the checksum.
    pub fn update_calculated_values(&mut self, pseudo: PseudoHeader) -> Result<()> {
        let length = u16::try_from(self.buf.len()).map_err(|_| {
            Error::length_inconsistency("Udp", self.buf.len(), usize::from(u16::MAX))
        })?;
        self.set_length(length);
        self.update_checksum(pseudo);
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

    fn datagram(&self) -> &[u8] {
        &self.buf.as_slice()[..self.packet_length()]
    }
}

impl<'a> Layer<'a> for UdpPacket<'a> {
    const KIND: LayerKind = LayerKind::Udp;

    fn try_from_view(view: ByteView<'a>) -> Result<Self> {
        Self::from_view(view)
    }
}

impl Debug for UdpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UdpPacket")
            .field("source", &self.get_source())
            .field("destination", &self.get_destination())
            .field("length", &self.get_length())
            .field("checksum", &self.get_checksum())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
