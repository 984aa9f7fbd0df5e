use crate::error::{Error, Result};
use crate::ethernet::MacAddr;
use crate::view::ByteView;
use crate::{check_minimum, fmt_payload, Layer, LayerKind};
use bytemuck::{Pod, Zeroable};
use std::fmt::{Debug, Formatter};

const SYNC_OFFSET: usize = 0;
const DESTINATION_OFFSET: usize = 6;
const PASSWORD_OFFSET: usize = 102;

/// The number of times the target address is repeated.
const REPETITIONS: usize = 16;

/// A password following the magic pattern, a `MAC` style one.
const LONG_PASSWORD: usize = 6;

/// A password following the magic pattern, an `IPv4` style one.
const SHORT_PASSWORD: usize = 4;

/// The fixed magic pattern.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct MagicPacket {
    sync: [u8; 6],
    repetitions: [[u8; 6]; REPETITIONS],
}

impl MagicPacket {
    fn new(target: MacAddr) -> Self {
        Self {
            sync: [0xff; 6],
            repetitions: [target.0; REPETITIONS],
        }
    }

    fn is_valid(&self) -> bool {
        self.sync == [0xff; 6] && self.repetitions.iter().all(|r| *r == self.repetitions[0])
    }
}

/// Is `bytes` a valid `Wake-on-LAN` magic packet?
///
/// Any bytes which follow the magic pattern are ignored.
#[must_use]
pub fn is_valid_frame(bytes: &[u8]) -> bool {
    bytes
        .get(..WakeOnLanPacket::minimum_packet_size())
        .and_then(|magic| bytemuck::try_from_bytes::<MagicPacket>(magic).ok())
        .is_some_and(MagicPacket::is_valid)
}

/// The length of the password carried when `available` bytes follow the magic pattern.
#[must_use]
pub const fn password_length(available: usize) -> usize {
    if available >= LONG_PASSWORD {
        LONG_PASSWORD
    } else if available >= SHORT_PASSWORD {
        SHORT_PASSWORD
    } else {
        0
    }
}

/// The size of a `Wake-on-LAN` packet with a password of a given length.
pub fn packet_size(password_length: usize) -> Result<usize> {
    match password_length {
        0 | SHORT_PASSWORD | LONG_PASSWORD => {
            Ok(WakeOnLanPacket::minimum_packet_size() + password_length)
        }
        len => Err(Error::InvalidPasswordLength(len)),
    }
}

/// Represents a `Wake-on-LAN` magic packet.
///
/// A magic packet is six `0xff` bytes followed by the target `MAC` address repeated sixteen times
/// and an optional 4 or 6 byte password.
pub struct WakeOnLanPacket<'a> {
    buf: ByteView<'a>,
}

impl<'a> WakeOnLanPacket<'a> {
    pub fn new(packet: &'a mut [u8]) -> Result<Self> {
        Self::from_view(ByteView::new_mut(packet))
    }

    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Self::from_view(ByteView::new(packet))
    }

    pub fn from_view(buf: ByteView<'a>) -> Result<Self> {
        check_minimum("WakeOnLanPacket", Self::minimum_packet_size(), &buf)?;
        Ok(Self { buf })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        std::mem::size_of::<MagicPacket>()
    }

    #[must_use]
    pub fn get_sync(&self) -> [u8; 6] {
        self.buf.get_bytes(SYNC_OFFSET)
    }

    /// The target address, taken from its first repetition.
    #[must_use]
    pub fn get_destination_address(&self) -> MacAddr {
        MacAddr(self.buf.get_bytes(DESTINATION_OFFSET))
    }

    #[must_use]
    pub fn get_password(&self) -> &[u8] {
        &self.buf.as_slice()[PASSWORD_OFFSET..self.header_length()]
    }

    /// Write the synchronization stream and all repetitions of the target address.
    pub fn set_destination_address(&mut self, val: MacAddr) {
        let magic = MagicPacket::new(val);
        self.buf.set_slice(SYNC_OFFSET, bytemuck::bytes_of(&magic));
    }

    /// Write a 0, 4 or 6 byte password after the magic pattern.
    pub fn set_password(&mut self, val: &[u8]) -> Result<()> {
        packet_size(val.len())?;
        let mut password = self.buf.slice_mut(PASSWORD_OFFSET, val.len())?;
        password.as_slice_mut()?.copy_from_slice(val);
        Ok(())
    }

    /// Does the packet hold a correct synchronization stream and sixteen equal repetitions?
    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_frame(self.buf.as_slice())
    }

    /// The length of the magic pattern and password.
    #[must_use]
    pub fn header_length(&self) -> usize {
        PASSWORD_OFFSET + password_length(self.buf.len() - PASSWORD_OFFSET)
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// Any bytes which follow the password.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.buf.as_slice()[self.header_length()..]
    }
}

impl PartialEq for WakeOnLanPacket<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.buf.as_slice()[..self.header_length()] == other.buf.as_slice()[..other.header_length()]
    }
}

impl<'a> Layer<'a> for WakeOnLanPacket<'a> {
    const KIND: LayerKind = LayerKind::WakeOnLan;

    fn try_from_view(view: ByteView<'a>) -> Result<Self> {
        Self::from_view(view)
    }
}

impl Debug for WakeOnLanPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WakeOnLanPacket")
            .field("destination_address", &self.get_destination_address())
            .field("valid", &self.is_valid())
            .field("password", &fmt_payload(self.get_password()))
            .finish()
    }
}
