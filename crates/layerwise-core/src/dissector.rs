use crate::config::{Config, LinkLayer};
use crate::error::Result;
use crate::packet::{LayerId, Node, Packet};
use layerwise_packet::ethernet::EthernetPacket;
use layerwise_packet::icmpv6::IcmpV6Packet;
use layerwise_packet::ipv4::Ipv4Packet;
use layerwise_packet::ipv6::Ipv6Packet;
use layerwise_packet::ipv6_extension::ExtensionHeaderPacket;
use layerwise_packet::tcp::TcpPacket;
use layerwise_packet::udp::UdpPacket;
use layerwise_packet::wake_on_lan::{self, WakeOnLanPacket};
use layerwise_packet::{EtherType, IpProtocol, LayerKind};
use tracing::instrument;

/// The layer kinds dispatched from an `Ethernet II` `EtherType`.
const ETHER_TYPES: [(EtherType, LayerKind); 3] = [
    (EtherType::Ipv4, LayerKind::Ipv4),
    (EtherType::Ipv6, LayerKind::Ipv6),
    (EtherType::WakeOnLan, LayerKind::WakeOnLan),
];

/// The layer kinds dispatched from an `IPv4` protocol number.
const IPV4_PROTOCOLS: &[(IpProtocol, LayerKind)] = &[
    (IpProtocol::Tcp, LayerKind::Tcp),
    (IpProtocol::Udp, LayerKind::Udp),
];

/// The layer kinds dispatched from an `IPv6` upper layer protocol number.
const IPV6_PROTOCOLS: &[(IpProtocol, LayerKind)] = &[
    (IpProtocol::Tcp, LayerKind::Tcp),
    (IpProtocol::Udp, LayerKind::Udp),
    (IpProtocol::IcmpV6, LayerKind::IcmpV6),
];

fn ether_type_kind(ether_type: EtherType) -> Option<LayerKind> {
    ETHER_TYPES
        .iter()
        .find(|(t, _)| *t == ether_type)
        .map(|(_, kind)| *kind)
}

fn ip_protocol_kind(
    table: &[(IpProtocol, LayerKind)],
    protocol: IpProtocol,
) -> Option<LayerKind> {
    table
        .iter()
        .find(|(p, _)| *p == protocol)
        .map(|(_, kind)| *kind)
}

/// What was learnt from dissecting a single layer.
#[derive(Debug)]
struct Dissected {
    /// The length of the layer, header and payload, from the start of the layer.
    length: usize,
    header_len: usize,
    /// The kind of the encapsulated layer, if known.
    next: Next,
}

#[derive(Debug, Eq, PartialEq)]
enum Next {
    /// The payload is parsed by a known layer.
    Layer(LayerKind),
    /// The payload is opaque.
    Raw,
}

/// A layered packet dissector.
///
/// A dissector walks a buffer from the outermost layer inwards, using static dispatch tables to
/// choose the codec of each encapsulated layer. Dissection never modifies the buffer.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use layerwise_core::{Dissector, LinkLayer};
/// use layerwise_packet::LayerKind;
///
/// let buf = hex_literal::hex!(
///     "33 33 00 00 00 02 00 a0 cc d9 41 75 86 dd
///      60 00 00 00 00 10 3a ff fe 80 00 00 00 00 00 00 02 a0 cc ff fe d9 41 75
///      ff 02 00 00 00 00 00 00 00 00 00 00 00 00 00 02
///      85 00 5d 50 00 00 00 00 01 01 00 a0 cc d9 41 75"
/// );
/// let packet = Dissector::default().parse(LinkLayer::Ethernet, &buf[..])?;
/// assert_eq!(
///     vec![LayerKind::Ethernet, LayerKind::Ipv6, LayerKind::IcmpV6, LayerKind::Raw],
///     packet.kinds()
/// );
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Builder`](crate::Builder) - Build a `Dissector` with a non-default configuration.
#[derive(Debug, Clone, Default)]
pub struct Dissector {
    config: Config,
}

impl Dissector {
    pub(crate) fn new(config: Config) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Dissect a buffer captured on a given link layer.
    #[instrument(skip_all, level = "trace")]
    pub fn parse<B: AsRef<[u8]>>(&self, link: LinkLayer, buf: B) -> Result<Packet<B>> {
        let first = link_layer_kind(link, buf.as_ref());
        self.parse_as(first, buf)
    }

    /// Dissect a buffer whose outermost layer is of a given kind.
    #[instrument(skip_all, level = "trace")]
    pub fn parse_as<B: AsRef<[u8]>>(&self, kind: LayerKind, buf: B) -> Result<Packet<B>> {
        let layers = self.dissect(kind, buf.as_ref())?;
        Ok(Packet::from_parts(buf, layers))
    }

    fn dissect(&self, first: LayerKind, bytes: &[u8]) -> Result<Vec<Node>> {
        let mut layers: Vec<Node> = Vec::new();
        let mut next = Some((first, 0..bytes.len()));
        while let Some((kind, available)) = next.take() {
            let start = available.start;
            let dissected = self.dissect_layer(kind, &bytes[available])?;
            let span = start..start + dissected.length;
            let payload = start + dissected.header_len..span.end;
            tracing::trace!(
                ?kind,
                start,
                length = dissected.length,
                header_len = dissected.header_len
            );
            let parent = layers.len().checked_sub(1).map(LayerId);
            layers.push(Node {
                kind,
                span,
                header_len: dissected.header_len,
                parent,
            });
            if !payload.is_empty() {
                next = match dissected.next {
                    Next::Layer(kind) => Some((kind, payload)),
                    Next::Raw => Some((LayerKind::Raw, payload)),
                };
            }
        }
        Ok(layers)
    }

    /// Dissect a single layer laid over `bytes`, which run from the start of the layer to the end
    /// of the enclosing payload.
    fn dissect_layer(&self, kind: LayerKind, bytes: &[u8]) -> Result<Dissected> {
        match kind {
            LayerKind::Ethernet => {
                let ethernet = EthernetPacket::new_view(bytes)?;
                let ether_type = ethernet.get_ether_type();
                let next = ether_type_kind(ether_type).map_or_else(
                    || {
                        tracing::debug!(?ether_type, "unrecognized ether type");
                        Next::Raw
                    },
                    Next::Layer,
                );
                Ok(Dissected {
                    length: bytes.len(),
                    header_len: EthernetPacket::minimum_packet_size(),
                    next,
                })
            }
            LayerKind::Ipv4 => {
                let ipv4 = Ipv4Packet::new_view(bytes)?;
                ipv4.check_lengths()?;
                let next = if ipv4.is_fragment() {
                    tracing::debug!(
                        identification = ipv4.get_identification(),
                        "not dissecting ipv4 fragment"
                    );
                    Next::Raw
                } else {
                    ip_next(IPV4_PROTOCOLS, ipv4.get_protocol())
                };
                Ok(Dissected {
                    length: ipv4.packet_length(),
                    header_len: usize::from(ipv4.get_header_length()) * 4,
                    next,
                })
            }
            LayerKind::Ipv6 => {
                let ipv6 = Ipv6Packet::new_view(bytes)?;
                let chain = ipv6.walk_extension_headers(self.config.max_extension_headers)?;
                let is_fragment = chain.headers().iter().any(|info| {
                    info.kind == IpProtocol::Fragment
                        && ExtensionHeaderPacket::new_view(
                            info.kind,
                            &bytes[info.offset..info.offset + info.length],
                        )
                        .is_ok_and(|fragment| {
                            fragment.get_fragment_offset() != 0 || fragment.get_more_fragments()
                        })
                });
                let next = if is_fragment {
                    tracing::debug!("not dissecting ipv6 fragment");
                    Next::Raw
                } else {
                    ip_next(IPV6_PROTOCOLS, chain.upper_layer_protocol())
                };
                Ok(Dissected {
                    length: ipv6.packet_length(),
                    header_len: chain.upper_layer_offset(),
                    next,
                })
            }
            LayerKind::IcmpV6 => {
                IcmpV6Packet::new_view(bytes)?;
                Ok(Dissected {
                    length: bytes.len(),
                    header_len: IcmpV6Packet::minimum_packet_size(),
                    next: Next::Raw,
                })
            }
            LayerKind::Tcp => {
                let tcp = TcpPacket::new_view(bytes)?;
                tcp.check_header_length()?;
                Ok(Dissected {
                    length: bytes.len(),
                    header_len: tcp.header_length(),
                    next: Next::Raw,
                })
            }
            LayerKind::Udp => {
                let udp = UdpPacket::new_view(bytes)?;
                udp.check_length()?;
                let next = if self
                    .config
                    .wake_on_lan_ports
                    .contains(&udp.get_destination())
                    && wake_on_lan::is_valid_frame(udp.payload())
                {
                    Next::Layer(LayerKind::WakeOnLan)
                } else {
                    Next::Raw
                };
                Ok(Dissected {
                    length: udp.packet_length(),
                    header_len: UdpPacket::minimum_packet_size(),
                    next,
                })
            }
            LayerKind::WakeOnLan => {
                let wol = WakeOnLanPacket::new_view(bytes)?;
                Ok(Dissected {
                    length: bytes.len(),
                    header_len: wol.header_length(),
                    next: Next::Raw,
                })
            }
            LayerKind::Raw => Ok(Dissected {
                length: bytes.len(),
                header_len: bytes.len(),
                next: Next::Raw,
            }),
        }
    }
}

/// The kind of the first layer of a buffer captured on a given link layer.
fn link_layer_kind(link: LinkLayer, bytes: &[u8]) -> LayerKind {
    match link {
        LinkLayer::Ethernet => LayerKind::Ethernet,
        LinkLayer::Ipv4 => LayerKind::Ipv4,
        LinkLayer::Ipv6 => LayerKind::Ipv6,
        LinkLayer::Raw => match bytes.first().map(|b| b >> 4) {
            Some(4) => LayerKind::Ipv4,
            Some(6) => LayerKind::Ipv6,
            version => {
                tracing::debug!(?version, "unrecognized ip version");
                LayerKind::Raw
            }
        },
    }
}

/// The next layer of an `IP` packet carrying `protocol`, looked up in the table of its version.
fn ip_next(table: &[(IpProtocol, LayerKind)], protocol: IpProtocol) -> Next {
    match ip_protocol_kind(table, protocol) {
        Some(kind) => Next::Layer(kind),
        None if protocol == IpProtocol::NoNextHeader => Next::Raw,
        None => {
            tracing::debug!(?protocol, "unrecognized ip protocol");
            Next::Raw
        }
    }
}

/// Dissect a buffer captured on a given link layer with the default configuration.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use layerwise_core::{parse, LinkLayer};
///
/// let packet = parse(LinkLayer::Raw, vec![0x00, 0x01, 0x02])?;
/// assert_eq!(&[0x00, 0x01, 0x02], packet.bytes());
/// # Ok(())
/// # }
/// ```
pub fn parse<B: AsRef<[u8]>>(link: LinkLayer, buf: B) -> Result<Packet<B>> {
    Dissector::default().parse(link, buf)
}
