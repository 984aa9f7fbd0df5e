use crate::error::{Error, Result};
use layerwise_packet::checksum::PseudoHeader;
use layerwise_packet::icmpv6::IcmpV6Packet;
use layerwise_packet::ipv4::Ipv4Packet;
use layerwise_packet::ipv6::Ipv6Packet;
use layerwise_packet::tcp::TcpPacket;
use layerwise_packet::udp::UdpPacket;
use layerwise_packet::view::ByteView;
use layerwise_packet::{Layer, LayerKind};
use std::fmt::{Debug, Display, Formatter};
use std::ops::Range;

/// The position of a layer within a packet, outermost first.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct LayerId(pub usize);

impl Display for LayerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single dissected layer.
///
/// `span` is the absolute range of the header and payload within the packet buffer.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) struct Node {
    pub(crate) kind: LayerKind,
    pub(crate) span: Range<usize>,
    pub(crate) header_len: usize,
    pub(crate) parent: Option<LayerId>,
}

impl Node {
    fn payload_range(&self) -> Range<usize> {
        self.span.start + self.header_len..self.span.end
    }
}

/// A dissected packet.
///
/// A packet owns (or borrows) its buffer together with the chain of layers found within it. The
/// layers are not copied out of the buffer, every codec returned from a packet is a view over the
/// same bytes.
///
/// The layer table is computed once, when the packet is dissected. Changing a length field
/// through a mutable codec does not move the layer boundaries; re-dissect the bytes to pick up
/// such a change.
pub struct Packet<B> {
    buf: B,
    layers: Vec<Node>,
}

impl<B: AsRef<[u8]>> Packet<B> {
    pub(crate) fn from_parts(buf: B, layers: Vec<Node>) -> Self {
        Self { buf, layers }
    }

    /// The exact on-wire bytes of the packet.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    /// Take back the buffer.
    #[must_use]
    pub fn into_inner(self) -> B {
        self.buf
    }

    /// The outermost layer.
    #[must_use]
    pub fn root(&self) -> LayerRef<'_> {
        LayerRef {
            bytes: self.buf.as_ref(),
            layers: &self.layers,
            id: LayerId(0),
        }
    }

    #[must_use]
    pub fn layer(&self, id: LayerId) -> Option<LayerRef<'_>> {
        (id.0 < self.layers.len()).then(|| LayerRef {
            bytes: self.buf.as_ref(),
            layers: &self.layers,
            id,
        })
    }

    /// All layers, outermost first.
    pub fn layers(&self) -> impl Iterator<Item = LayerRef<'_>> {
        (0..self.layers.len()).map(|i| LayerRef {
            bytes: self.buf.as_ref(),
            layers: &self.layers,
            id: LayerId(i),
        })
    }

    /// The kinds of all layers, outermost first.
    #[must_use]
    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|node| node.kind).collect()
    }

    /// The layer of a given kind, if present.
    #[must_use]
    pub fn find(&self, kind: LayerKind) -> Option<LayerRef<'_>> {
        self.layers().find(|layer| layer.kind() == kind)
    }

    /// A read-only codec for the layer of kind `T::KIND`, if present.
    ///
    /// The codec is laid over a read-only view, use [`Packet::extract_mut`] to edit a layer.
    ///
    /// # Panics
    ///
    /// Calling a setter of the returned codec panics.
    ///
    /// # Examples
    ///
    /// ```
    /// # fn main() -> anyhow::Result<()> {
    /// use layerwise_core::{parse, LinkLayer};
    /// use layerwise_packet::icmpv6::IcmpV6Packet;
    /// use layerwise_packet::tcp::TcpPacket;
    ///
    /// let buf = hex_literal::hex!(
    ///     "60 00 00 00 00 08 3a ff 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 01
    ///      00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 01
    ///      80 00 6d 86 12 34 00 01"
    /// );
    /// let packet = parse(LinkLayer::Ipv6, &buf[..])?;
    /// let icmp = packet.extract::<IcmpV6Packet<'_>>().unwrap();
    /// assert_eq!(0x6d86, icmp.get_checksum());
    /// assert!(packet.extract::<TcpPacket<'_>>().is_none());
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn extract<'p, T: Layer<'p>>(&'p self) -> Option<T> {
        self.root().extract()
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Packet<B> {
    /// The bytes of the packet, for direct editing.
    ///
    /// The layer table is not updated by edits made through this slice.
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    /// A mutable codec for the layer of kind `T::KIND`, if present.
    pub fn extract_mut<'p, T: Layer<'p>>(&'p mut self) -> Option<T> {
        let span = self
            .layers
            .iter()
            .find(|node| node.kind == T::KIND)?
            .span
            .clone();
        let start = span.start;
        let view = ByteView::new_mut(&mut self.buf.as_mut()[span]).with_offset(start);
        T::try_from_view(view).ok()
    }

    /// Recompute the lengths and checksums of every layer, innermost first.
    pub fn update_calculated_values(&mut self) -> Result<()> {
        for id in (0..self.layers.len()).rev() {
            self.update_layer(LayerId(id))?;
        }
        Ok(())
    }

    /// Recompute the lengths and checksums owned by a single layer.
    ///
    /// Transport layers without an enclosing `IP` layer have no pseudo-header and are left
    /// unchanged.
    pub fn update_layer(&mut self, id: LayerId) -> Result<()> {
        let layer = self
            .layer(id)
            .ok_or_else(|| Error::InvalidLayering(format!("no layer with id {id}")))?;
        let kind = layer.kind();
        let span = layer.span();
        let pseudo = layer.pseudo_header();
        let bytes = &mut self.buf.as_mut()[span];
        match (kind, pseudo) {
            (LayerKind::Ipv4, _) => Ipv4Packet::new(bytes)?.update_calculated_values()?,
            (LayerKind::Ipv6, _) => Ipv6Packet::new(bytes)?.update_calculated_values()?,
            (LayerKind::IcmpV6, Some(pseudo)) => {
                IcmpV6Packet::new(bytes)?.update_calculated_values(pseudo);
            }
            (LayerKind::Tcp, Some(pseudo)) => {
                TcpPacket::new(bytes)?.update_calculated_values(pseudo);
            }
            (LayerKind::Udp, Some(pseudo)) => {
                UdpPacket::new(bytes)?.update_calculated_values(pseudo)?;
            }
            (
                LayerKind::IcmpV6
                | LayerKind::Tcp
                | LayerKind::Udp
                | LayerKind::Ethernet
                | LayerKind::WakeOnLan
                | LayerKind::Raw,
                _,
            ) => {}
        }
        Ok(())
    }
}

impl<B: AsRef<[u8]>> Debug for Packet<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Packet")
            .field("length", &self.buf.as_ref().len())
            .field("layers", &self.layers().collect::<Vec<_>>())
            .finish()
    }
}

/// A reference to a single layer of a packet.
#[derive(Copy, Clone)]
pub struct LayerRef<'p> {
    bytes: &'p [u8],
    layers: &'p [Node],
    id: LayerId,
}

impl<'p> LayerRef<'p> {
    fn node(&self) -> &'p Node {
        &self.layers[self.id.0]
    }

    const fn with_id(&self, id: LayerId) -> Self {
        Self {
            bytes: self.bytes,
            layers: self.layers,
            id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> LayerKind {
        self.node().kind
    }

    #[must_use]
    pub const fn id(&self) -> LayerId {
        self.id
    }

    /// The absolute range of this layer within the packet.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.node().span.clone()
    }

    #[must_use]
    pub fn header_len(&self) -> usize {
        self.node().header_len
    }

    /// The layer which encapsulates this one.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.node().parent.map(|id| self.with_id(id))
    }

    /// The layer encapsulated by this one.
    #[must_use]
    pub fn payload(&self) -> Option<Self> {
        let next = LayerId(self.id.0 + 1);
        self.layers
            .get(next.0)
            .filter(|node| node.parent == Some(self.id))
            .map(|_| self.with_id(next))
    }

    /// The bytes of this layer and everything it encapsulates.
    #[must_use]
    pub fn bytes(&self) -> &'p [u8] {
        &self.bytes[self.node().span.clone()]
    }

    #[must_use]
    pub fn header(&self) -> &'p [u8] {
        let node = self.node();
        &self.bytes[node.span.start..node.span.start + node.header_len]
    }

    #[must_use]
    pub fn payload_bytes(&self) -> &'p [u8] {
        &self.bytes[self.node().payload_range()]
    }

    /// The bytes of the payload which follow the encapsulated layer, such as link layer padding.
    #[must_use]
    pub fn trailer(&self) -> &'p [u8] {
        match self.payload() {
            Some(child) => &self.bytes[child.node().span.end..self.node().span.end],
            None => &[],
        }
    }

    /// A read-only view over the bytes of this layer.
    #[must_use]
    pub fn view(&self) -> ByteView<'p> {
        ByteView::new(self.bytes()).with_offset(self.node().span.start)
    }

    /// A read-only codec for the layer of kind `T::KIND`.
    ///
    /// The enclosing layers are searched first, then this layer, then the encapsulated layers.
    /// Setters of the returned codec panic, edits go through [`Packet::extract_mut`].
    #[must_use]
    pub fn extract<T: Layer<'p>>(&self) -> Option<T> {
        std::iter::successors(self.parent(), Self::parent)
            .chain(std::iter::once(*self))
            .chain(std::iter::successors(self.payload(), Self::payload))
            .find(|layer| layer.kind() == T::KIND)
            .and_then(|layer| T::try_from_view(layer.view()).ok())
    }

    /// Is the stored checksum of this layer correct?
    ///
    /// Returns `None` for layers without a checksum, or transport layers without an enclosing
    /// `IP` layer.
    #[must_use]
    pub fn is_checksum_valid(&self) -> Option<bool> {
        let bytes = self.bytes();
        match self.kind() {
            LayerKind::Ipv4 => Ipv4Packet::new_view(bytes)
                .ok()
                .map(|ipv4| ipv4.is_checksum_valid()),
            LayerKind::IcmpV6 => {
                let pseudo = self.pseudo_header()?;
                IcmpV6Packet::new_view(bytes)
                    .ok()
                    .map(|icmp| icmp.is_checksum_valid(pseudo))
            }
            LayerKind::Tcp => {
                let pseudo = self.pseudo_header()?;
                TcpPacket::new_view(bytes)
                    .ok()
                    .map(|tcp| tcp.is_checksum_valid(pseudo))
            }
            LayerKind::Udp => {
                let pseudo = self.pseudo_header()?;
                UdpPacket::new_view(bytes)
                    .ok()
                    .map(|udp| udp.is_checksum_valid(pseudo))
            }
            LayerKind::Ethernet | LayerKind::Ipv6 | LayerKind::WakeOnLan | LayerKind::Raw => None,
        }
    }

    /// Calculate the checksum of this layer as if the stored checksum were zero.
    #[must_use]
    pub fn calculate_checksum(&self) -> Option<u16> {
        let bytes = self.bytes();
        match self.kind() {
            LayerKind::Ipv4 => Ipv4Packet::new_view(bytes)
                .ok()
                .map(|ipv4| ipv4.calculate_checksum()),
            LayerKind::IcmpV6 => {
                let pseudo = self.pseudo_header()?;
                IcmpV6Packet::new_view(bytes)
                    .ok()
                    .map(|icmp| icmp.calculate_checksum(pseudo))
            }
            LayerKind::Tcp => {
                let pseudo = self.pseudo_header()?;
                TcpPacket::new_view(bytes)
                    .ok()
                    .map(|tcp| tcp.calculate_checksum(pseudo))
            }
            LayerKind::Udp => {
                let pseudo = self.pseudo_header()?;
                UdpPacket::new_view(bytes)
                    .ok()
                    .map(|udp| udp.calculate_checksum(pseudo))
            }
            LayerKind::Ethernet | LayerKind::Ipv6 | LayerKind::WakeOnLan | LayerKind::Raw => None,
        }
    }

    /// The pseudo-header of the enclosing `IP` layer.
    fn pseudo_header(&self) -> Option<PseudoHeader> {
        let parent = self.parent()?;
        match parent.kind() {
            LayerKind::Ipv4 => Ipv4Packet::new_view(parent.bytes())
                .ok()
                .map(|ipv4| ipv4.pseudo_header()),
            LayerKind::Ipv6 => Ipv6Packet::new_view(parent.bytes())
                .ok()
                .map(|ipv6| ipv6.pseudo_header()),
            _ => None,
        }
    }
}

impl Debug for LayerRef<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayerRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("span", &self.span())
            .field("header_len", &self.header_len())
            .finish()
    }
}
