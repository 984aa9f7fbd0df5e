use crate::init_tracing;
use crate::samples::{IPV4_TCP_PADDED_ETHERNET, IPV6_TCP_ETHERNET};
use layerwise_core::{parse, Error, LinkLayer};
use layerwise_packet::error::Error as PacketError;
use layerwise_packet::ipv4::Ipv4Packet;
use layerwise_packet::tcp::{TcpFlags, TcpPacket};
use layerwise_packet::LayerKind;
use std::net::Ipv4Addr;

#[test]
fn test_tcp_over_ipv6() -> anyhow::Result<()> {
    init_tracing();
    let packet = parse(LinkLayer::Ethernet, IPV6_TCP_ETHERNET)?;
    assert_eq!(
        vec![
            LayerKind::Ethernet,
            LayerKind::Ipv6,
            LayerKind::Tcp,
            LayerKind::Raw
        ],
        packet.kinds()
    );
    let tcp = packet.extract::<TcpPacket<'_>>().unwrap();
    assert_eq!(49152, tcp.get_source());
    assert_eq!(80, tcp.get_destination());
    assert_eq!(TcpFlags::PSH | TcpFlags::ACK, tcp.get_flags());
    assert_eq!(32, tcp.header_length());
    let layer = packet.find(LayerKind::Tcp).unwrap();
    assert_eq!(Some(true), layer.is_checksum_valid());
    assert_eq!(Some(0xd01f), layer.calculate_checksum());
    let request = layer.payload().unwrap();
    assert_eq!(
        b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n",
        request.bytes()
    );
    Ok(())
}

#[test]
fn test_tcp_checksum_idempotence() -> anyhow::Result<()> {
    let mut packet = parse(LinkLayer::Ethernet, IPV6_TCP_ETHERNET.to_vec())?;
    packet
        .extract_mut::<TcpPacket<'_>>()
        .unwrap()
        .set_checksum(0);
    assert_eq!(
        Some(false),
        packet.find(LayerKind::Tcp).unwrap().is_checksum_valid()
    );
    packet.update_calculated_values()?;
    assert_eq!(IPV6_TCP_ETHERNET, packet.bytes());
    Ok(())
}

#[test]
fn test_ethernet_padding_is_a_trailer() -> anyhow::Result<()> {
    let packet = parse(LinkLayer::Ethernet, IPV4_TCP_PADDED_ETHERNET)?;
    assert_eq!(
        vec![LayerKind::Ethernet, LayerKind::Ipv4, LayerKind::Tcp],
        packet.kinds()
    );
    let ethernet = packet.root();
    assert_eq!(46, ethernet.payload_bytes().len());
    assert_eq!(&[0; 6], ethernet.trailer());
    let ipv4 = ethernet.payload().unwrap();
    assert_eq!(14..54, ipv4.span());
    assert_eq!(Some(true), ipv4.is_checksum_valid());
    assert!(ipv4.trailer().is_empty());
    let tcp = ipv4.payload().unwrap();
    assert_eq!(Some(true), tcp.is_checksum_valid());
    assert!(tcp.payload_bytes().is_empty());
    let header = packet.extract::<Ipv4Packet<'_>>().unwrap();
    assert_eq!(Ipv4Addr::new(192, 168, 1, 10), header.get_source());
    assert_eq!(Ipv4Addr::new(192, 168, 1, 20), header.get_destination());
    assert_eq!(40, header.get_total_length());
    Ok(())
}

#[test]
fn test_ipv4_round_trip_after_update() -> anyhow::Result<()> {
    let mut packet = parse(LinkLayer::Ethernet, IPV4_TCP_PADDED_ETHERNET.to_vec())?;
    {
        let mut ipv4 = packet.extract_mut::<Ipv4Packet<'_>>().unwrap();
        ipv4.set_checksum(0);
        ipv4.set_total_length(0);
    }
    packet.extract_mut::<TcpPacket<'_>>().unwrap().set_checksum(0);
    packet.update_calculated_values()?;
    assert_eq!(IPV4_TCP_PADDED_ETHERNET, packet.bytes());
    Ok(())
}

#[test]
fn test_ipv4_header_length_too_short() {
    let mut buf = IPV4_TCP_PADDED_ETHERNET.to_vec();
    buf[14] = 0x44;
    let err = parse(LinkLayer::Ethernet, buf).unwrap_err();
    assert_eq!(
        Error::PacketError(PacketError::LengthInconsistency {
            protocol: String::from("Ipv4"),
            declared: 16,
            available: 20,
        }),
        err
    );
}

#[test]
fn test_tcp_data_offset_too_short() {
    let mut buf = IPV4_TCP_PADDED_ETHERNET.to_vec();
    buf[46] = 0x40;
    let err = parse(LinkLayer::Ethernet, buf).unwrap_err();
    assert_eq!(
        Error::PacketError(PacketError::LengthInconsistency {
            protocol: String::from("Tcp"),
            declared: 16,
            available: 20,
        }),
        err
    );
}

#[test]
fn test_ipv4_fragment_is_not_dissected() -> anyhow::Result<()> {
    let mut buf = IPV4_TCP_PADDED_ETHERNET.to_vec();
    // set the more fragments flag in place of don't fragment
    buf[20] = 0x20;
    let packet = parse(LinkLayer::Ethernet, buf)?;
    assert_eq!(
        vec![LayerKind::Ethernet, LayerKind::Ipv4, LayerKind::Raw],
        packet.kinds()
    );
    let ipv4 = packet.root().payload().unwrap();
    assert_eq!(Some(false), ipv4.is_checksum_valid());
    Ok(())
}
