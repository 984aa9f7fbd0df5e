use crate::error::{Error, Result};
use crate::view::ByteView;
use crate::{check_minimum, fmt_payload, IpProtocol};
use std::fmt::{Debug, Formatter};
use std::net::Ipv6Addr;

const NEXT_HEADER_OFFSET: usize = 0;
const HEADER_EXTENSION_LENGTH_OFFSET: usize = 1;
const FRAGMENT_OFFSET_BIT_OFFSET: usize = 16;
const FRAGMENT_OFFSET_BIT_WIDTH: usize = 13;
const MORE_FRAGMENTS_BIT_OFFSET: usize = 31;
const IDENTIFICATION_OFFSET: usize = 4;
const OPTIONS_OFFSET: usize = 2;
const ROUTING_TYPE_OFFSET: usize = 2;
const SEGMENTS_LEFT_OFFSET: usize = 3;
const ROUTING_ADDRESSES_OFFSET: usize = 8;

/// The deprecated source route (RFC 5095) and the Mobile `IPv6` home address (RFC 6275) routing
/// types, both of which carry a list of full `IPv6` addresses.
const ROUTING_TYPE_SOURCE_ROUTE: u8 = 0;
const ROUTING_TYPE_HOME_ADDRESS: u8 = 2;
const FULL_ADDRESS_ROUTING_TYPES: [u8; 2] = [ROUTING_TYPE_SOURCE_ROUTE, ROUTING_TYPE_HOME_ADDRESS];

/// The fixed size of a fragment header.
const FRAGMENT_HEADER_LENGTH: usize = 8;

/// Is `protocol` an IPv6 extension header which carries a next header field?
///
/// `ESP` is not included, its contents are encrypted and so it terminates the chain.
#[must_use]
pub const fn is_extension_header(protocol: IpProtocol) -> bool {
    matches!(
        protocol,
        IpProtocol::HopByHop
            | IpProtocol::Routing
            | IpProtocol::Fragment
            | IpProtocol::Authentication
            | IpProtocol::DestinationOptions
            | IpProtocol::Mobility
            | IpProtocol::Hip
            | IpProtocol::Shim6
    )
}

/// The total length in bytes of an extension header of a given kind.
#[must_use]
pub fn header_length(kind: IpProtocol, header_extension_length: u8) -> usize {
    let units = usize::from(header_extension_length);
    match kind {
        IpProtocol::Fragment => FRAGMENT_HEADER_LENGTH,
        IpProtocol::Authentication => (units + 2) * 4,
        _ => (units + 1) * 8,
    }
}

/// The final destination named by a routing header, if it has segments left to visit.
///
/// Only routing types which carry full `IPv6` addresses are understood, the final destination is
/// the last address of the list.
fn routing_final_destination(header: &[u8]) -> Option<Ipv6Addr> {
    let view = ByteView::new(header);
    let [routing_type, segments_left] = view.get_array(ROUTING_TYPE_OFFSET).ok()?;
    if segments_left == 0 || !FULL_ADDRESS_ROUTING_TYPES.contains(&routing_type) {
        return None;
    }
    let count = header.len().saturating_sub(ROUTING_ADDRESSES_OFFSET) / 16;
    let last = ROUTING_ADDRESSES_OFFSET + count.checked_sub(1)? * 16;
    view.get_array::<16>(last).ok().map(Ipv6Addr::from)
}

/// The location of a single extension header within an `IPv6` packet.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ExtensionHeaderInfo {
    /// The kind of extension header.
    pub kind: IpProtocol,
    /// The offset of the header from the start of the `IPv6` packet.
    pub offset: usize,
    /// The total length of the header in bytes.
    pub length: usize,
}

/// The result of walking an `IPv6` extension header chain.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ExtensionChain {
    headers: Vec<ExtensionHeaderInfo>,
    upper_layer_protocol: IpProtocol,
    upper_layer_offset: usize,
    final_destination: Option<Ipv6Addr>,
}

impl ExtensionChain {
    /// The extension headers, in wire order.
    #[must_use]
    pub fn headers(&self) -> &[ExtensionHeaderInfo] {
        &self.headers
    }

    /// The protocol which follows the last extension header.
    #[must_use]
    pub const fn upper_layer_protocol(&self) -> IpProtocol {
        self.upper_layer_protocol
    }

    /// The offset of the upper layer from the start of the `IPv6` packet.
    #[must_use]
    pub const fn upper_layer_offset(&self) -> usize {
        self.upper_layer_offset
    }

    /// The final destination of a packet with a routing header which has segments left.
    ///
    /// This address replaces the destination address of the fixed header in upper layer
    /// pseudo-headers (RFC 8200, section 8.1).
    #[must_use]
    pub const fn final_destination(&self) -> Option<Ipv6Addr> {
        self.final_destination
    }

    /// The combined length of all extension headers.
    #[must_use]
    pub fn extension_length(&self) -> usize {
        self.headers.iter().map(|h| h.length).sum()
    }
}

/// Walk the extension header chain of an `IPv6` packet.
///
/// `packet` holds the `IPv6` packet bounded by its payload length, `start` is the offset of the
/// first extension header and `first` is the next header value of the fixed header. At most
/// `limit` extension headers are accepted.
pub fn walk_chain(
    first: IpProtocol,
    packet: &[u8],
    start: usize,
    limit: usize,
) -> Result<ExtensionChain> {
    let view = ByteView::new(packet);
    let mut headers = Vec::new();
    let mut next = first;
    let mut offset = start;
    let mut final_destination = None;
    while is_extension_header(next) {
        if headers.len() >= limit {
            return Err(Error::TooManyExtensionHeaders(limit));
        }
        let [next_header, header_extension_length] = view
            .get_array(offset)
            .map_err(|_| Error::length_inconsistency("Ipv6", offset + 2, packet.len()))?;
        let length = header_length(next, header_extension_length);
        if offset + length > packet.len() {
            return Err(Error::length_inconsistency(
                "Ipv6",
                offset + length,
                packet.len(),
            ));
        }
        if next == IpProtocol::Routing {
            final_destination = routing_final_destination(&packet[offset..offset + length])
                .or(final_destination);
        }
        headers.push(ExtensionHeaderInfo {
            kind: next,
            offset,
            length,
        });
        offset += length;
        next = IpProtocol::from(next_header);
    }
    Ok(ExtensionChain {
        headers,
        upper_layer_protocol: next,
        upper_layer_offset: offset,
        final_destination,
    })
}

/// Represents an `IPv6` extension header.
///
/// The view spans exactly one extension header.
pub struct ExtensionHeaderPacket<'a> {
    buf: ByteView<'a>,
    kind: IpProtocol,
}

impl<'a> ExtensionHeaderPacket<'a> {
    pub fn new(kind: IpProtocol, packet: &'a mut [u8]) -> Result<Self> {
        Self::from_view(kind, ByteView::new_mut(packet))
    }

    pub fn new_view(kind: IpProtocol, packet: &'a [u8]) -> Result<Self> {
        Self::from_view(kind, ByteView::new(packet))
    }

    pub fn from_view(kind: IpProtocol, buf: ByteView<'a>) -> Result<Self> {
        check_minimum("ExtensionHeaderPacket", Self::minimum_packet_size(), &buf)?;
        Ok(Self { buf, kind })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        8
    }

    #[must_use]
    pub const fn kind(&self) -> IpProtocol {
        self.kind
    }

    #[must_use]
    pub fn get_next_header(&self) -> IpProtocol {
        IpProtocol::from(self.buf.read(NEXT_HEADER_OFFSET))
    }

    #[must_use]
    pub fn get_header_extension_length(&self) -> u8 {
        self.buf.read(HEADER_EXTENSION_LENGTH_OFFSET)
    }

    /// The total length of this header as declared by its length field.
    #[must_use]
    pub fn header_length(&self) -> usize {
        header_length(self.kind, self.get_header_extension_length())
    }

    /// The routing type of a routing header.
    #[must_use]
    pub fn get_routing_type(&self) -> u8 {
        self.buf.read(ROUTING_TYPE_OFFSET)
    }

    /// The number of segments left to visit of a routing header.
    #[must_use]
    pub fn get_segments_left(&self) -> u8 {
        self.buf.read(SEGMENTS_LEFT_OFFSET)
    }

    /// The fragment offset, in 8 byte units, of a fragment header.
    #[must_use]
    pub fn get_fragment_offset(&self) -> u16 {
        self.buf
            .read_bits(FRAGMENT_OFFSET_BIT_OFFSET, FRAGMENT_OFFSET_BIT_WIDTH) as u16
    }

    /// The `M` flag of a fragment header.
    #[must_use]
    pub fn get_more_fragments(&self) -> bool {
        self.buf.read_bits(MORE_FRAGMENTS_BIT_OFFSET, 1) == 1
    }

    #[must_use]
    pub fn get_identification(&self) -> u32 {
        u32::from_be_bytes(self.buf.get_bytes(IDENTIFICATION_OFFSET))
    }

    pub fn set_next_header(&mut self, val: IpProtocol) {
        *self.buf.write(NEXT_HEADER_OFFSET) = val.id();
    }

    pub fn set_header_extension_length(&mut self, val: u8) {
        *self.buf.write(HEADER_EXTENSION_LENGTH_OFFSET) = val;
    }

    pub fn set_fragment_offset(&mut self, val: u16) {
        self.buf.write_bits(
            FRAGMENT_OFFSET_BIT_OFFSET,
            FRAGMENT_OFFSET_BIT_WIDTH,
            u64::from(val),
        );
    }

    pub fn set_more_fragments(&mut self, val: bool) {
        self.buf
            .write_bits(MORE_FRAGMENTS_BIT_OFFSET, 1, u64::from(val));
    }

    pub fn set_identification(&mut self, val: u32) {
        self.buf.set_bytes(IDENTIFICATION_OFFSET, val.to_be_bytes());
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// The option bytes which follow the next header and length fields.
    #[must_use]
    pub fn options(&self) -> &[u8] {
        let end = std::cmp::min(self.header_length(), self.buf.len());
        &self.buf.as_slice()[OPTIONS_OFFSET..end]
    }
}

impl Debug for ExtensionHeaderPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtensionHeaderPacket")
            .field("kind", &self.kind)
            .field("next_header", &self.get_next_header())
            .field(
                "header_extension_length",
                &self.get_header_extension_length(),
            )
            .field("options", &fmt_payload(self.options()))
            .finish()
    }
}
