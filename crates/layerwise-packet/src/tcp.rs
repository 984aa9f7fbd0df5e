use crate::checksum::{is_valid_pseudo_header_checksum, transport_checksum, PseudoHeader};
use crate::error::{Error, Result};
use crate::view::ByteView;
use crate::{check_minimum, fmt_payload, IpProtocol, Layer, LayerKind};
use bitflags::bitflags;
use std::fmt::{Debug, Formatter};

const SOURCE_OFFSET: usize = 0;
const DESTINATION_OFFSET: usize = 2;
const SEQUENCE_OFFSET: usize = 4;
const ACKNOWLEDGEMENT_OFFSET: usize = 8;
const DATA_OFFSET_BIT_OFFSET: usize = 96;
const RESERVED_BIT_OFFSET: usize = 100;
const FLAGS_BIT_OFFSET: usize = 103;
const WINDOW_SIZE_OFFSET: usize = 14;
const CHECKSUM_OFFSET: usize = 16;
const URGENT_POINTER_OFFSET: usize = 18;

/// The index of the checksum word.
const CHECKSUM_WORD: usize = 8;

bitflags! {
    /// The `TCP` control flags.
    #[derive(Debug, Copy, Clone, Eq, PartialEq)]
    pub struct TcpFlags: u16 {
        const FIN = 0x001;
        const SYN = 0x002;
        const RST = 0x004;
        const PSH = 0x008;
        const ACK = 0x010;
        const URG = 0x020;
        const ECE = 0x040;
        const CWR = 0x080;
        const NS = 0x100;
    }
}

/// Represents a `TCP` packet.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct TcpPacket<'a> {
    buf: ByteView<'a>,
}

impl<'a> TcpPacket<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        Self::from_view(ByteView::new_mut(packet))
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Self::from_view(ByteView::new(packet))
    }

    pub fn from_view(buf: ByteView<'a>) -> Result<Self> {
        check_minimum("TcpPacket", Self::minimum_packet_size(), &buf)?;
        Ok(Self { buf })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        20
    }

    #[must_use]
    pub fn get_source(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(SOURCE_OFFSET))
    }

    #[must_use]
    pub fn get_destination(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(DESTINATION_OFFSET))
    }

    #[must_use]
    pub fn get_sequence(&self) -> u32 {
        u32::from_be_bytes(self.buf.get_bytes(SEQUENCE_OFFSET))
    }

    #[must_use]
    pub fn get_acknowledgement(&self) -> u32 {
        u32::from_be_bytes(self.buf.get_bytes(ACKNOWLEDGEMENT_OFFSET))
    }

    /// The header length in 32 bit words.
    #[must_use]
    pub fn get_data_offset(&self) -> u8 {
        self.buf.read_bits(DATA_OFFSET_BIT_OFFSET, 4) as u8
    }

    #[must_use]
    pub fn get_reserved(&self) -> u8 {
        self.buf.read_bits(RESERVED_BIT_OFFSET, 3) as u8
    }

    #[must_use]
    pub fn get_flags(&self) -> TcpFlags {
        TcpFlags::from_bits_retain(self.buf.read_bits(FLAGS_BIT_OFFSET, 9) as u16)
    }

    #[must_use]
    pub fn get_window_size(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(WINDOW_SIZE_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
    }

    #[must_use]
    pub fn get_urgent_pointer(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(URGENT_POINTER_OFFSET))
    }

    #[must_use]
    pub fn get_options_raw(&self) -> &[u8] {
        let start = Self::minimum_packet_size();
        let end = std::cmp::max(start, self.header_end());
        &self.buf.as_slice()[start..end]
    }

    pub fn set_source(&mut self, val: u16) {
        self.buf.set_bytes(SOURCE_OFFSET, val.to_be_bytes());
    }

    pub fn set_destination(&mut self, val: u16) {
        self.buf.set_bytes(DESTINATION_OFFSET, val.to_be_bytes());
    }

    pub fn set_sequence(&mut self, val: u32) {
        self.buf.set_bytes(SEQUENCE_OFFSET, val.to_be_bytes());
    }

    pub fn set_acknowledgement(&mut self, val: u32) {
        self.buf
            .set_bytes(ACKNOWLEDGEMENT_OFFSET, val.to_be_bytes());
    }

    pub fn set_data_offset(&mut self, val: u8) {
        self.buf
            .write_bits(DATA_OFFSET_BIT_OFFSET, 4, u64::from(val));
    }

    pub fn set_reserved(&mut self, val: u8) {
        self.buf.write_bits(RESERVED_BIT_OFFSET, 3, u64::from(val));
    }

    pub fn set_flags(&mut self, val: TcpFlags) {
        self.buf
            .write_bits(FLAGS_BIT_OFFSET, 9, u64::from(val.bits()));
    }

    pub fn set_window_size(&mut self, val: u16) {
        self.buf.set_bytes(WINDOW_SIZE_OFFSET, val.to_be_bytes());
    }

    pub fn set_checksum(&mut self, val: u16) {
        self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
    }

    pub fn set_urgent_pointer(&mut self, val: u16) {
        self.buf.set_bytes(URGENT_POINTER_OFFSET, val.to_be_bytes());
    }

    pub fn set_payload(&mut self, vals: &[u8]) {
        let current_offset = self.header_end();
        self.buf.set_slice(current_offset, vals);
    }

    /// The header length in bytes, options included.
    #[must_use]
    pub fn header_length(&self) -> usize {
        usize::from(self.get_data_offset()) * 4
    }

    /// Check the data offset describes a header which fits within the segment.
    pub fn check_header_length(&self) -> Result<()> {
        let header_length = self.header_length();
        if header_length < Self::minimum_packet_size() {
            Err(Error::length_inconsistency(
                "Tcp",
                header_length,
                Self::minimum_packet_size(),
            ))
        } else if header_length > self.buf.len() {
            Err(Error::length_inconsistency(
                "Tcp",
                header_length,
                self.buf.len(),
            ))
        } else {
            Ok(())
        }
    }

    /// Calculate the checksum of the segment as if the stored checksum were zero.
    #[must_use]
    pub fn calculate_checksum(&self, pseudo: PseudoHeader) -> u16 {
        transport_checksum(pseudo, IpProtocol::Tcp, self.buf.as_slice(), CHECKSUM_WORD)
    }

    #[must_use]
    pub fn is_checksum_valid(&self, pseudo: PseudoHeader) -> bool {
        let length = u32::try_from(self.buf.len()).unwrap_or(u32::MAX);
        is_valid_pseudo_header_checksum(pseudo, length, IpProtocol::Tcp, self.buf.as_slice())
    }

    pub fn update_checksum(&mut self, pseudo: PseudoHeader) {
        self.set_checksum(0);
        let checksum = self.calculate_checksum(pseudo);
        self.set_checksum(checksum);
    }

    pub fn update_calculated_values(&mut self, pseudo: PseudoHeader) {
        self.update_checksum(pseudo);
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf.as_slice()[self.header_end()..]
    }

    fn header_end(&self) -> usize {
        std::cmp::min(self.header_length(), self.buf.len())
    }
}

impl<'a> Layer<'a> for TcpPacket<'a> {
    const KIND: LayerKind = LayerKind::Tcp;

    fn try_from_view(view: ByteView<'a>) -> Result<Self> {
        Self::from_view(view)
    }
}

impl Debug for TcpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpPacket")
            .field("source", &self.get_source())
            .field("destination", &self.get_destination())
            .field("sequence", &self.get_sequence())
            .field("acknowledgement", &self.get_acknowledgement())
            .field("data_offset", &self.get_data_offset())
            .field("reserved", &self.get_reserved())
            .field("flags", &self.get_flags())
            .field("window_size", &self.get_window_size())
            .field("checksum", &self.get_checksum())
            .field("urgent_pointer", &self.get_urgent_pointer())
            .field("options", &self.get_options_raw())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
