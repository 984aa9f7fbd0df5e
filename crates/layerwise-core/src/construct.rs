use crate::config::defaults::DEFAULT_HOP_LIMIT;
use crate::dissector::Dissector;
use crate::error::{Error, Result};
use crate::packet::Packet;
use layerwise_packet::error::Error as PacketError;
use layerwise_packet::ethernet::{EthernetPacket, MacAddr};
use layerwise_packet::icmpv6::{IcmpCode, IcmpType, IcmpV6Packet};
use layerwise_packet::ipv4::Ipv4Packet;
use layerwise_packet::ipv6::Ipv6Packet;
use layerwise_packet::raw::RawPacket;
use layerwise_packet::tcp::{TcpFlags, TcpPacket};
use layerwise_packet::udp::UdpPacket;
use layerwise_packet::wake_on_lan::{self, WakeOnLanPacket};
use layerwise_packet::{EtherType, IpProtocol, LayerKind};
use std::net::{Ipv4Addr, Ipv6Addr};

/// The `EtherType` written ahead of an opaque payload, reserved for local experiments.
const EXPERIMENTAL_ETHER_TYPE: EtherType = EtherType::Other(0x88B5);

/// The `IP` protocol written ahead of an opaque payload, reserved for experimentation (RFC 3692).
const EXPERIMENTAL_PROTOCOL: IpProtocol = IpProtocol::Other(253);

/// The fields of an `Ethernet II` header.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EthernetSpec {
    pub source: MacAddr,
    pub destination: MacAddr,
}

impl EthernetSpec {
    #[must_use]
    pub const fn new(source: MacAddr, destination: MacAddr) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// The fields of an `IPv4` header.
///
/// The total length, protocol and checksum are computed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Ipv4Spec {
    pub source: Ipv4Addr,
    pub destination: Ipv4Addr,
    pub ttl: u8,
    pub dscp: u8,
    pub ecn: u8,
    pub identification: u16,
    pub flags: u8,
}

impl Ipv4Spec {
    #[must_use]
    pub const fn new(source: Ipv4Addr, destination: Ipv4Addr) -> Self {
        Self {
            source,
            destination,
            ttl: DEFAULT_HOP_LIMIT,
            dscp: 0,
            ecn: 0,
            identification: 0,
            flags: 0,
        }
    }
}

/// The fields of an `IPv6` header.
///
/// The payload length and next header are computed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Ipv6Spec {
    pub source: Ipv6Addr,
    pub destination: Ipv6Addr,
    pub hop_limit: u8,
    pub traffic_class: u8,
    pub flow_label: u32,
}

impl Ipv6Spec {
    #[must_use]
    pub const fn new(source: Ipv6Addr, destination: Ipv6Addr) -> Self {
        Self {
            source,
            destination,
            hop_limit: DEFAULT_HOP_LIMIT,
            traffic_class: 0,
            flow_label: 0,
        }
    }
}

/// The fields of an `ICMPv6` header.
///
/// The message body is given as a following raw layer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct IcmpV6Spec {
    pub icmp_type: IcmpType,
    pub icmp_code: IcmpCode,
}

impl IcmpV6Spec {
    #[must_use]
    pub const fn new(icmp_type: IcmpType, icmp_code: IcmpCode) -> Self {
        Self {
            icmp_type,
            icmp_code,
        }
    }
}

/// The fields of a `TCP` header, without options.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TcpSpec {
    pub source: u16,
    pub destination: u16,
    pub sequence: u32,
    pub acknowledgement: u32,
    pub flags: TcpFlags,
    pub window_size: u16,
    pub urgent_pointer: u16,
}

impl TcpSpec {
    #[must_use]
    pub const fn new(source: u16, destination: u16) -> Self {
        Self {
            source,
            destination,
            sequence: 0,
            acknowledgement: 0,
            flags: TcpFlags::empty(),
            window_size: 0,
            urgent_pointer: 0,
        }
    }
}

/// The fields of a `UDP` header.
///
/// The length and checksum are computed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct UdpSpec {
    pub source: u16,
    pub destination: u16,
}

impl UdpSpec {
    #[must_use]
    pub const fn new(source: u16, destination: u16) -> Self {
        Self {
            source,
            destination,
        }
    }
}

/// The target and password of a `Wake-on-LAN` magic packet.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct WakeOnLanSpec {
    pub target: MacAddr,
    /// An empty, 4 byte or 6 byte password.
    pub password: Vec<u8>,
}

impl WakeOnLanSpec {
    #[must_use]
    pub const fn new(target: MacAddr) -> Self {
        Self {
            target,
            password: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_password(self, password: &[u8]) -> Self {
        Self {
            password: password.to_vec(),
            ..self
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum LayerSpec {
    Ethernet(EthernetSpec),
    Ipv4(Ipv4Spec),
    Ipv6(Ipv6Spec),
    IcmpV6(IcmpV6Spec),
    Tcp(TcpSpec),
    Udp(UdpSpec),
    WakeOnLan(WakeOnLanSpec),
    Raw(Vec<u8>),
}

impl LayerSpec {
    const fn kind(&self) -> LayerKind {
        match self {
            Self::Ethernet(_) => LayerKind::Ethernet,
            Self::Ipv4(_) => LayerKind::Ipv4,
            Self::Ipv6(_) => LayerKind::Ipv6,
            Self::IcmpV6(_) => LayerKind::IcmpV6,
            Self::Tcp(_) => LayerKind::Tcp,
            Self::Udp(_) => LayerKind::Udp,
            Self::WakeOnLan(_) => LayerKind::WakeOnLan,
            Self::Raw(_) => LayerKind::Raw,
        }
    }

    /// The number of bytes this layer writes ahead of its payload.
    fn header_size(&self) -> Result<usize> {
        Ok(match self {
            Self::Ethernet(_) => EthernetPacket::minimum_packet_size(),
            Self::Ipv4(_) => Ipv4Packet::minimum_packet_size(),
            Self::Ipv6(_) => Ipv6Packet::minimum_packet_size(),
            Self::IcmpV6(_) => IcmpV6Packet::minimum_packet_size(),
            Self::Tcp(_) => TcpPacket::minimum_packet_size(),
            Self::Udp(_) => UdpPacket::minimum_packet_size(),
            Self::WakeOnLan(wol) => wake_on_lan::packet_size(wol.password.len())?,
            Self::Raw(bytes) => bytes.len(),
        })
    }

    /// An empty raw layer is not dissected.
    fn is_empty_raw(&self) -> bool {
        matches!(self, Self::Raw(bytes) if bytes.is_empty())
    }

    /// Write this layer over `bytes`, which run to the end of the packet.
    fn write(&self, bytes: &mut [u8], next: Option<LayerKind>) -> Result<()> {
        match self {
            Self::Ethernet(spec) => {
                let mut ethernet = EthernetPacket::new(bytes)?;
                ethernet.set_destination(spec.destination);
                ethernet.set_source(spec.source);
                ethernet.set_ether_type(ether_type_for(next));
            }
            Self::Ipv4(spec) => {
                let mut ipv4 = Ipv4Packet::new(bytes)?;
                ipv4.set_version(4);
                ipv4.set_header_length(5);
                ipv4.set_dscp(spec.dscp);
                ipv4.set_ecn(spec.ecn);
                ipv4.set_identification(spec.identification);
                ipv4.set_flags(spec.flags);
                ipv4.set_ttl(spec.ttl);
                ipv4.set_protocol(ip_protocol_for(next));
                ipv4.set_source(spec.source);
                ipv4.set_destination(spec.destination);
                ipv4.update_calculated_values()?;
            }
            Self::Ipv6(spec) => {
                let mut ipv6 = Ipv6Packet::new(bytes)?;
                ipv6.set_version(6);
                ipv6.set_traffic_class(spec.traffic_class);
                ipv6.set_flow_label(spec.flow_label);
                ipv6.set_next_header(ip_protocol_for(next));
                ipv6.set_hop_limit(spec.hop_limit);
                ipv6.set_source_address(spec.source);
                ipv6.set_destination_address(spec.destination);
                ipv6.update_calculated_values()?;
            }
            Self::IcmpV6(spec) => {
                let mut icmp = IcmpV6Packet::new(bytes)?;
                icmp.set_icmp_type(spec.icmp_type);
                icmp.set_icmp_code(spec.icmp_code);
            }
            Self::Tcp(spec) => {
                let mut tcp = TcpPacket::new(bytes)?;
                tcp.set_source(spec.source);
                tcp.set_destination(spec.destination);
                tcp.set_sequence(spec.sequence);
                tcp.set_acknowledgement(spec.acknowledgement);
                tcp.set_data_offset(5);
                tcp.set_flags(spec.flags);
                tcp.set_window_size(spec.window_size);
                tcp.set_urgent_pointer(spec.urgent_pointer);
            }
            Self::Udp(spec) => {
                let declared = bytes.len();
                let length = u16::try_from(declared).map_err(|_| udp_too_long(declared))?;
                let mut udp = UdpPacket::new(bytes)?;
                udp.set_source(spec.source);
                udp.set_destination(spec.destination);
                udp.set_length(length);
            }
            Self::WakeOnLan(spec) => {
                let mut wol = WakeOnLanPacket::new(bytes)?;
                wol.set_destination_address(spec.target);
                wol.set_password(&spec.password)?;
            }
            Self::Raw(data) => RawPacket::new(bytes).set_payload(data),
        }
        Ok(())
    }
}

fn ether_type_for(next: Option<LayerKind>) -> EtherType {
    match next {
        Some(LayerKind::Ipv4) => EtherType::Ipv4,
        Some(LayerKind::Ipv6) => EtherType::Ipv6,
        Some(LayerKind::WakeOnLan) => EtherType::WakeOnLan,
        _ => EXPERIMENTAL_ETHER_TYPE,
    }
}

fn ip_protocol_for(next: Option<LayerKind>) -> IpProtocol {
    match next {
        Some(LayerKind::Tcp) => IpProtocol::Tcp,
        Some(LayerKind::Udp) => IpProtocol::Udp,
        Some(LayerKind::IcmpV6) => IpProtocol::IcmpV6,
        None => IpProtocol::NoNextHeader,
        Some(_) => EXPERIMENTAL_PROTOCOL,
    }
}

fn udp_too_long(declared: usize) -> PacketError {
    PacketError::LengthInconsistency {
        protocol: String::from("Udp"),
        declared,
        available: usize::from(u16::MAX),
    }
}

/// Can a layer of kind `inner` be carried in the payload of a layer of kind `outer`?
const fn can_encapsulate(outer: LayerKind, inner: LayerKind) -> bool {
    match (outer, inner) {
        (LayerKind::Raw, _) => false,
        (_, LayerKind::Raw) => true,
        (LayerKind::Ethernet, LayerKind::Ipv4 | LayerKind::Ipv6 | LayerKind::WakeOnLan) => true,
        (LayerKind::Ipv4, LayerKind::Tcp | LayerKind::Udp) => true,
        (LayerKind::Ipv6, LayerKind::Tcp | LayerKind::Udp | LayerKind::IcmpV6) => true,
        (LayerKind::Udp, LayerKind::WakeOnLan) => true,
        _ => false,
    }
}

/// Build a packet from field values.
///
/// Layers are given outermost first. Every next-protocol discriminator, length and checksum is
/// filled in, so the packet dissects back to the same chain of layers.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use layerwise_core::{Ipv6Spec, PacketBuilder, UdpSpec};
/// use layerwise_packet::udp::UdpPacket;
/// use layerwise_packet::LayerKind;
/// use std::net::Ipv6Addr;
///
/// let packet = PacketBuilder::new()
///     .ipv6(Ipv6Spec::new(Ipv6Addr::LOCALHOST, Ipv6Addr::LOCALHOST))
///     .udp(UdpSpec::new(5353, 53))
///     .raw(&[0xde, 0xad, 0xbe, 0xef])
///     .build()?;
/// assert_eq!(
///     vec![LayerKind::Ipv6, LayerKind::Udp, LayerKind::Raw],
///     packet.kinds()
/// );
/// let udp = packet.find(LayerKind::Udp).unwrap();
/// assert_eq!(Some(true), udp.is_checksum_valid());
/// assert_eq!(12, packet.extract::<UdpPacket<'_>>().unwrap().get_length());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PacketBuilder {
    layers: Vec<LayerSpec>,
}

impl PacketBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ethernet(self, spec: EthernetSpec) -> Self {
        self.push(LayerSpec::Ethernet(spec))
    }

    #[must_use]
    pub fn ipv4(self, spec: Ipv4Spec) -> Self {
        self.push(LayerSpec::Ipv4(spec))
    }

    #[must_use]
    pub fn ipv6(self, spec: Ipv6Spec) -> Self {
        self.push(LayerSpec::Ipv6(spec))
    }

    #[must_use]
    pub fn icmpv6(self, spec: IcmpV6Spec) -> Self {
        self.push(LayerSpec::IcmpV6(spec))
    }

    #[must_use]
    pub fn tcp(self, spec: TcpSpec) -> Self {
        self.push(LayerSpec::Tcp(spec))
    }

    #[must_use]
    pub fn udp(self, spec: UdpSpec) -> Self {
        self.push(LayerSpec::Udp(spec))
    }

    /// Add a `Wake-on-LAN` magic packet.
    ///
    /// When carried over `UDP` the destination port must be one of the `Wake-on-LAN` ports of the
    /// dissector used to build the packet.
    #[must_use]
    pub fn wake_on_lan(self, spec: WakeOnLanSpec) -> Self {
        self.push(LayerSpec::WakeOnLan(spec))
    }

    /// Add an opaque payload.
    #[must_use]
    pub fn raw(self, bytes: &[u8]) -> Self {
        self.push(LayerSpec::Raw(bytes.to_vec()))
    }

    fn push(mut self, layer: LayerSpec) -> Self {
        self.layers.push(layer);
        self
    }

    /// Build the packet and dissect it with the default configuration.
    pub fn build(self) -> Result<Packet<Vec<u8>>> {
        self.build_with(&Dissector::default())
    }

    /// Build the packet and dissect it with a given dissector.
    pub fn build_with(self, dissector: &Dissector) -> Result<Packet<Vec<u8>>> {
        self.check_layering()?;
        let sizes = self
            .layers
            .iter()
            .map(LayerSpec::header_size)
            .collect::<Result<Vec<_>>>()?;
        let mut buf = vec![0_u8; sizes.iter().sum()];
        let mut offset = 0;
        for (i, (layer, size)) in self.layers.iter().zip(&sizes).enumerate() {
            let next = self.layers.get(i + 1).map(LayerSpec::kind);
            layer.write(&mut buf[offset..], next)?;
            offset += size;
        }
        let first = self.layers[0].kind();
        let mut packet = dissector.parse_as(first, buf)?;
        let expected = self
            .layers
            .iter()
            .filter(|layer| !layer.is_empty_raw())
            .map(LayerSpec::kind)
            .collect::<Vec<_>>();
        if packet.kinds() != expected {
            return Err(Error::InvalidLayering(format!(
                "built {expected:?} but dissected {:?}",
                packet.kinds()
            )));
        }
        packet.update_calculated_values()?;
        Ok(packet)
    }

    fn check_layering(&self) -> Result<()> {
        if self.layers.is_empty() {
            return Err(Error::InvalidLayering(String::from(
                "a packet needs at least one layer",
            )));
        }
        for pair in self.layers.windows(2) {
            let (outer, inner) = (pair[0].kind(), pair[1].kind());
            if !can_encapsulate(outer, inner) {
                return Err(Error::InvalidLayering(format!(
                    "{inner:?} cannot be carried by {outer:?}"
                )));
            }
        }
        Ok(())
    }
}
