use crate::error::{Error, Result};
use crate::view::ByteView;
use crate::{check_minimum, fmt_payload, EtherType, Layer, LayerKind};
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

const DESTINATION_OFFSET: usize = 0;
const SOURCE_OFFSET: usize = 6;
const ETHER_TYPE_OFFSET: usize = 12;

/// A 48 bit `MAC` address.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    /// The broadcast address `ff:ff:ff:ff:ff:ff`.
    pub const BROADCAST: Self = Self([0xff; 6]);

    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for MacAddr {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl Display for MacAddr {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

/// Parse a `MAC` address separated by `:` or `-`, or given as 12 bare hex digits.
impl FromStr for MacAddr {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMacAddr(String::from(s));
        let digits = if s.contains([':', '-']) {
            let parts = s.split([':', '-']).collect::<Vec<_>>();
            if parts.len() != 6 || parts.iter().any(|p| p.len() != 2) {
                return Err(invalid());
            }
            parts.concat()
        } else {
            String::from(s)
        };
        if digits.len() != 12 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let mut octets = [0_u8; 6];
        for (i, octet) in octets.iter_mut().enumerate() {
            *octet = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).map_err(|_| invalid())?;
        }
        Ok(Self(octets))
    }
}

/// Represents an `Ethernet II` frame.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct EthernetPacket<'a> {
    buf: ByteView<'a>,
}

impl<'a> EthernetPacket<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        Self::from_view(ByteView::new_mut(packet))
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Self::from_view(ByteView::new(packet))
    }

    pub fn from_view(buf: ByteView<'a>) -> Result<Self> {
        check_minimum("EthernetPacket", Self::minimum_packet_size(), &buf)?;
        Ok(Self { buf })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        14
    }

    #[must_use]
    pub fn get_destination(&self) -> MacAddr {
        MacAddr(self.buf.get_bytes(DESTINATION_OFFSET))
    }

    #[must_use]
    pub fn get_source(&self) -> MacAddr {
        MacAddr(self.buf.get_bytes(SOURCE_OFFSET))
    }

    #[must_use]
    pub fn get_ether_type(&self) -> EtherType {
        EtherType::from(u16::from_be_bytes(self.buf.get_bytes(ETHER_TYPE_OFFSET)))
    }

    pub fn set_destination(&mut self, val: MacAddr) {
        self.buf.set_bytes(DESTINATION_OFFSET, val.0);
    }

    pub fn set_source(&mut self, val: MacAddr) {
        self.buf.set_bytes(SOURCE_OFFSET, val.0);
    }

    pub fn set_ether_type(&mut self, val: EtherType) {
        self.buf
            .set_bytes(ETHER_TYPE_OFFSET, val.id().to_be_bytes());
    }

    pub fn set_payload(&mut self, vals: &[u8]) {
        self.buf.set_slice(Self::minimum_packet_size(), vals);
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf.as_slice()[Self::minimum_packet_size()..]
    }
}

impl<'a> Layer<'a> for EthernetPacket<'a> {
    const KIND: LayerKind = LayerKind::Ethernet;

    fn try_from_view(view: ByteView<'a>) -> Result<Self> {
        Self::from_view(view)
    }
}

impl Debug for EthernetPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EthernetPacket")
            .field("destination", &self.get_destination())
            .field("source", &self.get_source())
            .field("ether_type", &self.get_ether_type())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
