use crate::init_tracing;
use crate::samples::{IPV6_HOP_BY_HOP_ETHERNET, IPV6_ICMPV6_ETHERNET};
use layerwise_core::{parse, LayerRef, LinkLayer};
use layerwise_packet::icmpv6::{IcmpCode, IcmpType, IcmpV6Packet};
use layerwise_packet::ipv6::Ipv6Packet;
use layerwise_packet::raw::RawPacket;
use layerwise_packet::LayerKind;
use test_case::test_case;

#[test]
fn test_router_solicitation() -> anyhow::Result<()> {
    init_tracing();
    let packet = parse(LinkLayer::Ethernet, IPV6_ICMPV6_ETHERNET)?;
    let icmp = packet.extract::<IcmpV6Packet<'_>>().unwrap();
    assert_eq!(IcmpType::RouterSolicitation, icmp.get_icmp_type());
    assert_eq!(IcmpCode(0), icmp.get_icmp_code());
    assert_eq!(0x5d50, icmp.get_checksum());
    assert_eq!(16, icmp.packet().len());
    let layer = packet.find(LayerKind::IcmpV6).unwrap();
    assert_eq!(4, layer.header_len());
    assert_eq!(Some(0x5d50), layer.calculate_checksum());
    let body = layer.payload().unwrap();
    assert_eq!(LayerKind::Raw, body.kind());
    // reserved word followed by a source link-layer address option
    assert_eq!(
        &[0x00, 0x00, 0x00, 0x00, 0x01, 0x01, 0x00, 0xa0, 0xcc, 0xd9, 0x41, 0x75],
        body.bytes()
    );
    Ok(())
}

#[test]
fn test_extract_from_any_layer() -> anyhow::Result<()> {
    let packet = parse(LinkLayer::Ethernet, IPV6_ICMPV6_ETHERNET)?;
    let raw = packet.find(LayerKind::Raw).unwrap();
    let from_raw = raw.extract::<Ipv6Packet<'_>>().unwrap();
    assert_eq!(255, from_raw.get_hop_limit());
    let root = packet.root();
    let from_root = root.extract::<RawPacket<'_>>().unwrap();
    assert_eq!(12, from_root.len());
    let grandparent = raw.parent().and_then(|icmp| icmp.parent());
    assert_eq!(Some(LayerKind::Ipv6), grandparent.map(|ip| ip.kind()));
    Ok(())
}

#[test_case(IPV6_ICMPV6_ETHERNET, 0x5d50; "router solicitation")]
#[test_case(IPV6_HOP_BY_HOP_ETHERNET, 0x1b84; "multicast listener report")]
fn test_checksum_idempotence(sample: &[u8], expected: u16) -> anyhow::Result<()> {
    let mut packet = parse(LinkLayer::Ethernet, sample.to_vec())?;
    packet
        .extract_mut::<IcmpV6Packet<'_>>()
        .unwrap()
        .set_checksum(0);
    assert_eq!(Some(false), icmp_layer(&packet).is_checksum_valid());
    assert_eq!(Some(expected), icmp_layer(&packet).calculate_checksum());
    packet.update_calculated_values()?;
    assert_eq!(sample, packet.bytes());
    assert_eq!(Some(true), icmp_layer(&packet).is_checksum_valid());
    Ok(())
}

#[test]
fn test_corrupted_body() -> anyhow::Result<()> {
    let mut buf = IPV6_ICMPV6_ETHERNET.to_vec();
    buf[69] ^= 0xff;
    let packet = parse(LinkLayer::Ethernet, &buf[..])?;
    assert_eq!(Some(false), icmp_layer(&packet).is_checksum_valid());
    Ok(())
}

#[test]
fn test_without_ip_layer() -> anyhow::Result<()> {
    let packet = layerwise_core::Dissector::default()
        .parse_as(LayerKind::IcmpV6, &IPV6_ICMPV6_ETHERNET[54..])?;
    assert_eq!(vec![LayerKind::IcmpV6, LayerKind::Raw], packet.kinds());
    assert_eq!(None, packet.root().is_checksum_valid());
    assert_eq!(None, packet.root().calculate_checksum());
    Ok(())
}

fn icmp_layer<B: AsRef<[u8]>>(packet: &layerwise_core::Packet<B>) -> LayerRef<'_> {
    packet.find(LayerKind::IcmpV6).unwrap()
}
