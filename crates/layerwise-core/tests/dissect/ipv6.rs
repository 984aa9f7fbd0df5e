use crate::init_tracing;
use crate::samples::{IPV6_HOP_BY_HOP_ETHERNET, IPV6_ICMPV6_ETHERNET, IPV6_ROUTING_ICMPV6};
use layerwise_core::{parse, Builder, Error, LinkLayer};
use layerwise_packet::error::Error as PacketError;
use layerwise_packet::icmpv6::IcmpV6Packet;
use layerwise_packet::ipv6::Ipv6Packet;
use layerwise_packet::{IpProtocol, LayerKind};
use std::net::Ipv6Addr;
use std::str::FromStr;

#[test]
fn test_router_solicitation() -> anyhow::Result<()> {
    init_tracing();
    let packet = parse(LinkLayer::Ethernet, IPV6_ICMPV6_ETHERNET)?;
    assert_eq!(
        vec![
            LayerKind::Ethernet,
            LayerKind::Ipv6,
            LayerKind::IcmpV6,
            LayerKind::Raw
        ],
        packet.kinds()
    );
    assert_eq!(IPV6_ICMPV6_ETHERNET, packet.bytes());
    let ipv6 = packet.extract::<Ipv6Packet<'_>>().unwrap();
    assert_eq!(6, ipv6.get_version());
    assert_eq!(16, ipv6.get_payload_length());
    assert_eq!(255, ipv6.get_hop_limit());
    assert_eq!(IpProtocol::IcmpV6, ipv6.get_next_header());
    assert_eq!(
        Ipv6Addr::from_str("fe80::2a0:ccff:fed9:4175")?,
        ipv6.get_source_address()
    );
    assert_eq!(
        Ipv6Addr::from_str("ff02::2")?,
        ipv6.get_destination_address()
    );
    let layer = packet.find(LayerKind::Ipv6).unwrap();
    assert_eq!(14..70, layer.span());
    assert_eq!(40, layer.header_len());
    assert!(layer.trailer().is_empty());
    assert_eq!(None, layer.is_checksum_valid());
    Ok(())
}

#[test]
fn test_hop_by_hop() -> anyhow::Result<()> {
    init_tracing();
    let packet = parse(LinkLayer::Ethernet, IPV6_HOP_BY_HOP_ETHERNET)?;
    assert_eq!(
        vec![
            LayerKind::Ethernet,
            LayerKind::Ipv6,
            LayerKind::IcmpV6,
            LayerKind::Raw
        ],
        packet.kinds()
    );
    let layer = packet.find(LayerKind::Ipv6).unwrap();
    assert_eq!(48, layer.header_len());
    assert_eq!(28, layer.payload_bytes().len());
    let ipv6 = packet.extract::<Ipv6Packet<'_>>().unwrap();
    assert_eq!(IpProtocol::HopByHop, ipv6.get_next_header());
    assert_eq!(1, ipv6.get_hop_limit());
    assert_eq!(IpProtocol::IcmpV6, ipv6.upper_layer_protocol()?);
    let headers = ipv6.extension_headers()?;
    assert_eq!(1, headers.len());
    assert_eq!(IpProtocol::HopByHop, headers[0].kind());
    assert_eq!(IpProtocol::IcmpV6, headers[0].get_next_header());
    assert_eq!(8, headers[0].header_length());
    assert_eq!(&[0x05, 0x02, 0x00, 0x00, 0x01, 0x00], headers[0].options());
    let icmp = packet.find(LayerKind::IcmpV6).unwrap();
    assert_eq!(62..90, icmp.span());
    assert_eq!(Some(true), icmp.is_checksum_valid());
    Ok(())
}

#[test]
fn test_raw_link_layer() -> anyhow::Result<()> {
    let packet = parse(LinkLayer::Raw, &IPV6_ICMPV6_ETHERNET[14..])?;
    assert_eq!(
        vec![LayerKind::Ipv6, LayerKind::IcmpV6, LayerKind::Raw],
        packet.kinds()
    );
    assert_eq!(0..56, packet.root().span());
    Ok(())
}

#[test]
fn test_payload_length_exceeds_buffer() {
    let buf = &IPV6_ICMPV6_ETHERNET[14..69];
    let err = parse(LinkLayer::Ipv6, buf).unwrap_err();
    assert_eq!(
        Error::PacketError(PacketError::LengthInconsistency {
            protocol: String::from("Ipv6"),
            declared: 56,
            available: 55,
        }),
        err
    );
}

#[test]
fn test_bytes_beyond_payload_length_are_a_trailer() -> anyhow::Result<()> {
    let mut buf = IPV6_ICMPV6_ETHERNET.to_vec();
    buf.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
    let packet = parse(LinkLayer::Ethernet, buf)?;
    let ethernet = packet.root();
    assert_eq!(&[0xde, 0xad, 0xbe, 0xef], ethernet.trailer());
    let ipv6 = ethernet.payload().unwrap();
    assert_eq!(14..70, ipv6.span());
    assert_eq!(Some(true), ipv6.payload().unwrap().is_checksum_valid());
    Ok(())
}

#[test]
fn test_extension_header_limit() -> anyhow::Result<()> {
    let mut buf = IPV6_HOP_BY_HOP_ETHERNET.to_vec();
    // chain the hop-by-hop header to a second one laid over the start of the icmp message
    buf[54] = 0x00;
    let dissector = Builder::new().max_extension_headers(1).build()?;
    assert!(dissector
        .parse(LinkLayer::Ethernet, IPV6_HOP_BY_HOP_ETHERNET)
        .is_ok());
    let err = dissector.parse(LinkLayer::Ethernet, &buf[..]).unwrap_err();
    assert_eq!(
        Error::PacketError(PacketError::TooManyExtensionHeaders(1)),
        err
    );
    let packet = parse(LinkLayer::Ethernet, &buf[..])?;
    assert_eq!(
        vec![LayerKind::Ethernet, LayerKind::Ipv6, LayerKind::Raw],
        packet.kinds()
    );
    assert_eq!(56, packet.find(LayerKind::Ipv6).unwrap().header_len());
    Ok(())
}

#[test]
fn test_update_payload_length() -> anyhow::Result<()> {
    let mut packet = parse(LinkLayer::Ethernet, IPV6_HOP_BY_HOP_ETHERNET.to_vec())?;
    packet
        .extract_mut::<Ipv6Packet<'_>>()
        .unwrap()
        .set_payload_length(0);
    packet.update_calculated_values()?;
    assert_eq!(IPV6_HOP_BY_HOP_ETHERNET, packet.bytes());
    Ok(())
}

#[test]
fn test_routing_header_checksum_uses_final_destination() -> anyhow::Result<()> {
    init_tracing();
    let packet = parse(LinkLayer::Ipv6, IPV6_ROUTING_ICMPV6)?;
    assert_eq!(
        vec![LayerKind::Ipv6, LayerKind::IcmpV6, LayerKind::Raw],
        packet.kinds()
    );
    let ipv6 = packet.extract::<Ipv6Packet<'_>>().unwrap();
    assert_eq!(
        Ipv6Addr::from_str("2001:db8::2")?,
        ipv6.get_destination_address()
    );
    assert_eq!(
        Ipv6Addr::from_str("2001:db8::99")?,
        ipv6.final_destination()
    );
    let icmp = packet.find(LayerKind::IcmpV6).unwrap();
    assert_eq!(64..76, icmp.span());
    assert_eq!(Some(true), icmp.is_checksum_valid());
    assert_eq!(Some(0x4cb1), icmp.calculate_checksum());
    Ok(())
}

#[test]
fn test_routing_header_checksum_idempotence() -> anyhow::Result<()> {
    let mut packet = parse(LinkLayer::Ipv6, IPV6_ROUTING_ICMPV6.to_vec())?;
    packet
        .extract_mut::<IcmpV6Packet<'_>>()
        .unwrap()
        .set_checksum(0);
    assert_eq!(
        Some(false),
        packet.find(LayerKind::IcmpV6).unwrap().is_checksum_valid()
    );
    packet.update_calculated_values()?;
    assert_eq!(IPV6_ROUTING_ICMPV6, packet.bytes());
    Ok(())
}
