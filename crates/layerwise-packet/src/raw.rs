use crate::error::Result;
use crate::view::ByteView;
use crate::{fmt_payload, Layer, LayerKind};
use std::fmt::{Debug, Formatter};

/// Represents an opaque payload.
///
/// Raw payloads hold the bytes which follow the last recognized layer of a packet.
pub struct RawPacket<'a> {
    buf: ByteView<'a>,
}

impl<'a> RawPacket<'a> {
    #[must_use]
    pub fn new(packet: &'a mut [u8]) -> Self {
        Self::from_view(ByteView::new_mut(packet))
    }

    #[must_use]
    pub fn new_view(packet: &'a [u8]) -> Self {
        Self::from_view(ByteView::new(packet))
    }

    #[must_use]
    pub fn from_view(buf: ByteView<'a>) -> Self {
        Self { buf }
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn set_payload(&mut self, vals: &[u8]) {
        self.buf.set_slice(0, vals);
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        self.buf.as_slice()
    }
}

impl<'a> Layer<'a> for RawPacket<'a> {
    const KIND: LayerKind = LayerKind::Raw;

    fn try_from_view(view: ByteView<'a>) -> Result<Self> {
        Ok(Self::from_view(view))
    }
}

impl Debug for RawPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawPacket")
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
