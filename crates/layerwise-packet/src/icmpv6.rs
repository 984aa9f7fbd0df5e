use crate::checksum::{is_valid_pseudo_header_checksum, transport_checksum, PseudoHeader};
use crate::error::Result;
use crate::view::ByteView;
use crate::{check_minimum, fmt_payload, IpProtocol, Layer, LayerKind};
use std::fmt::{Debug, Formatter};

/// The type of `ICMPv6` packet.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum IcmpType {
    DestinationUnreachable,
    PacketTooBig,
    TimeExceeded,
    ParameterProblem,
    EchoRequest,
    EchoReply,
    MulticastListenerQuery,
    MulticastListenerReport,
    MulticastListenerDone,
    RouterSolicitation,
    RouterAdvertisement,
    NeighborSolicitation,
    NeighborAdvertisement,
    Redirect,
    MulticastListenerReportV2,
    Other(u8),
}

impl IcmpType {
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::DestinationUnreachable => 1,
            Self::PacketTooBig => 2,
            Self::TimeExceeded => 3,
            Self::ParameterProblem => 4,
            Self::EchoRequest => 128,
            Self::EchoReply => 129,
            Self::MulticastListenerQuery => 130,
            Self::MulticastListenerReport => 131,
            Self::MulticastListenerDone => 132,
            Self::RouterSolicitation => 133,
            Self::RouterAdvertisement => 134,
            Self::NeighborSolicitation => 135,
            Self::NeighborAdvertisement => 136,
            Self::Redirect => 137,
            Self::MulticastListenerReportV2 => 143,
            Self::Other(id) => *id,
        }
    }
}

impl From<u8> for IcmpType {
    fn from(val: u8) -> Self {
        match val {
            1 => Self::DestinationUnreachable,
            2 => Self::PacketTooBig,
            3 => Self::TimeExceeded,
            4 => Self::ParameterProblem,
            128 => Self::EchoRequest,
            129 => Self::EchoReply,
            130 => Self::MulticastListenerQuery,
            131 => Self::MulticastListenerReport,
            132 => Self::MulticastListenerDone,
            133 => Self::RouterSolicitation,
            134 => Self::RouterAdvertisement,
            135 => Self::NeighborSolicitation,
            136 => Self::NeighborAdvertisement,
            137 => Self::Redirect,
            143 => Self::MulticastListenerReportV2,
            id => Self::Other(id),
        }
    }
}

/// The `ICMPv6` code.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct IcmpCode(pub u8);

impl From<u8> for IcmpCode {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;

/// The index of the checksum word.
const CHECKSUM_WORD: usize = 1;

/// Represents an `ICMPv6` packet.
///
/// Only the type, code and checksum are decoded, the message body is exposed as the payload.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct IcmpV6Packet<'a> {
    buf: ByteView<'a>,
}

impl<'a> IcmpV6Packet<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        Self::from_view(ByteView::new_mut(packet))
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Self::from_view(ByteView::new(packet))
    }

    pub fn from_view(buf: ByteView<'a>) -> Result<Self> {
        check_minimum("IcmpV6Packet", Self::minimum_packet_size(), &buf)?;
        Ok(Self { buf })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        4
    }

    #[must_use]
    pub fn get_icmp_type(&self) -> IcmpType {
        IcmpType::from(self.buf.read(TYPE_OFFSET))
    }

    #[must_use]
    pub fn get_icmp_code(&self) -> IcmpCode {
        IcmpCode::from(self.buf.read(CODE_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        u16::from_be_bytes(self.buf.get_bytes(CHECKSUM_OFFSET))
    }

    pub fn set_icmp_type(&mut self, val: IcmpType) {
        *self.buf.write(TYPE_OFFSET) = val.id();
    }

    pub fn set_icmp_code(&mut self, val: IcmpCode) {
        *self.buf.write(CODE_OFFSET) = val.0;
    }

    pub fn set_checksum(&mut self, val: u16) {
        self.buf.set_bytes(CHECKSUM_OFFSET, val.to_be_bytes());
    }

    pub fn set_payload(&mut self, vals: &[u8]) {
        self.buf.set_slice(Self::minimum_packet_size(), vals);
    }

    /// Calculate the checksum of the whole message as if the stored checksum were zero.
    #[must_use]
    pub fn calculate_checksum(&self, pseudo: PseudoHeader) -> u16 {
        transport_checksum(
            pseudo,
            IpProtocol::IcmpV6,
            self.buf.as_slice(),
            CHECKSUM_WORD,
        )
    }

    #[must_use]
    pub fn is_checksum_valid(&self, pseudo: PseudoHeader) -> bool {
        let length = u32::try_from(self.buf.len()).unwrap_or(u32::MAX);
        is_valid_pseudo_header_checksum(pseudo, length, IpProtocol::IcmpV6, self.buf.as_slice())
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

    /// The type dependent message body.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf.as_slice()[Self::minimum_packet_size()..]
    }
}

impl<'a> Layer<'a> for IcmpV6Packet<'a> {
    const KIND: LayerKind = LayerKind::IcmpV6;

    fn try_from_view(view: ByteView<'a>) -> Result<Self> {
        Self::from_view(view)
    }
}

impl Debug for IcmpV6Packet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcmpV6Packet")
            .field("icmp_type", &self.get_icmp_type())
            .field("icmp_code", &self.get_icmp_code())
            .field("checksum", &self.get_checksum())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
