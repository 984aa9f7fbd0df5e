use crate::init_tracing;
use crate::samples::{IPV6_ICMPV6_ETHERNET, WOL_UDP_MAC_PASSWORD};
use layerwise_core::{
    Builder, EthernetSpec, IcmpV6Spec, Ipv4Spec, Ipv6Spec, PacketBuilder, TcpSpec, UdpSpec,
    WakeOnLanSpec,
};
use layerwise_packet::ethernet::MacAddr;
use layerwise_packet::icmpv6::{IcmpCode, IcmpType};
use layerwise_packet::ipv4::Ipv4Packet;
use layerwise_packet::tcp::{TcpFlags, TcpPacket};
use layerwise_packet::wake_on_lan::WakeOnLanPacket;
use layerwise_packet::LayerKind;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::str::FromStr;
use test_case::test_case;

#[test]
fn test_build_router_solicitation() -> anyhow::Result<()> {
    init_tracing();
    let ethernet = EthernetSpec::new(
        MacAddr::from_str("00:a0:cc:d9:41:75")?,
        MacAddr::from_str("33:33:00:00:00:02")?,
    );
    let ipv6 = Ipv6Spec {
        hop_limit: 255,
        ..Ipv6Spec::new(
            Ipv6Addr::from_str("fe80::2a0:ccff:fed9:4175")?,
            Ipv6Addr::from_str("ff02::2")?,
        )
    };
    let icmpv6 = IcmpV6Spec::new(IcmpType::RouterSolicitation, IcmpCode(0));
    let packet = PacketBuilder::new()
        .ethernet(ethernet)
        .ipv6(ipv6)
        .icmpv6(icmpv6)
        .raw(&[0, 0, 0, 0, 1, 1, 0x00, 0xa0, 0xcc, 0xd9, 0x41, 0x75])
        .build()?;
    assert_eq!(IPV6_ICMPV6_ETHERNET, packet.bytes());
    Ok(())
}

#[test]
fn test_build_wake_on_lan_over_udp() -> anyhow::Result<()> {
    let source = Ipv4Addr::new(192, 168, 1, 5);
    let broadcast = Ipv4Addr::new(192, 168, 1, 255);
    let packet = PacketBuilder::new()
        .ethernet(EthernetSpec::new(
            MacAddr::from_str("00:26:b9:c4:d2:a1")?,
            MacAddr::BROADCAST,
        ))
        .ipv4(Ipv4Spec {
            ttl: 128,
            identification: 1,
            ..Ipv4Spec::new(source, broadcast)
        })
        .udp(UdpSpec::new(40000, 9))
        .wake_on_lan(
            WakeOnLanSpec::new(MacAddr::from_str("00:0d:56:dc:9e:35")?)
                .with_password(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xab]),
        )
        .build()?;
    assert_eq!(WOL_UDP_MAC_PASSWORD, packet.bytes());
    Ok(())
}

#[test]
fn test_build_wake_on_lan_over_custom_port() -> anyhow::Result<()> {
    let dissector = Builder::new().wake_on_lan_ports([4000]).build()?;
    let packet = PacketBuilder::new()
        .ipv4(Ipv4Spec::new(
            Ipv4Addr::new(192, 168, 1, 5),
            Ipv4Addr::BROADCAST,
        ))
        .udp(UdpSpec::new(40000, 4000))
        .wake_on_lan(WakeOnLanSpec::new(MacAddr::BROADCAST))
        .build_with(&dissector)?;
    assert_eq!(
        vec![LayerKind::Ipv4, LayerKind::Udp, LayerKind::WakeOnLan],
        packet.kinds()
    );
    assert_eq!(20 + 8 + 102, packet.bytes().len());
    Ok(())
}

#[test_case(&[]; "no password")]
#[test_case(&[10, 0, 0, 1]; "short password")]
#[test_case(&[1, 2, 3, 4, 5, 6]; "long password")]
fn test_build_wake_on_lan_over_ethernet(password: &[u8]) -> anyhow::Result<()> {
    let target = MacAddr::from([0x00, 0x1b, 0x21, 0x3c, 0x4d, 0x5e]);
    let packet = PacketBuilder::new()
        .ethernet(EthernetSpec::new(
            MacAddr::from([0x02, 0, 0, 0, 0, 1]),
            MacAddr::BROADCAST,
        ))
        .wake_on_lan(WakeOnLanSpec::new(target).with_password(password))
        .build()?;
    assert_eq!(
        vec![LayerKind::Ethernet, LayerKind::WakeOnLan],
        packet.kinds()
    );
    assert_eq!([0x08, 0x42], packet.bytes()[12..14]);
    let wol = packet.extract::<WakeOnLanPacket<'_>>().unwrap();
    assert!(wol.is_valid());
    assert_eq!(target, wol.get_destination_address());
    assert_eq!(password, wol.get_password());
    assert_eq!(14 + 102 + password.len(), packet.bytes().len());
    Ok(())
}

#[test]
fn test_build_tcp_over_ipv4() -> anyhow::Result<()> {
    let tcp = TcpSpec {
        sequence: 0x0102_0304,
        flags: TcpFlags::SYN,
        window_size: 64240,
        ..TcpSpec::new(49152, 443)
    };
    let packet = PacketBuilder::new()
        .ipv4(Ipv4Spec::new(
            Ipv4Addr::new(10, 0, 0, 1),
            Ipv4Addr::new(10, 0, 0, 2),
        ))
        .tcp(tcp)
        .build()?;
    assert_eq!(vec![LayerKind::Ipv4, LayerKind::Tcp], packet.kinds());
    let ipv4 = packet.extract::<Ipv4Packet<'_>>().unwrap();
    assert_eq!(40, ipv4.get_total_length());
    assert_eq!(64, ipv4.get_ttl());
    assert_eq!(Some(true), packet.root().is_checksum_valid());
    let segment = packet.extract::<TcpPacket<'_>>().unwrap();
    assert_eq!(49152, segment.get_source());
    assert_eq!(443, segment.get_destination());
    assert_eq!(0x0102_0304, segment.get_sequence());
    assert_eq!(TcpFlags::SYN, segment.get_flags());
    assert_eq!(5, segment.get_data_offset());
    assert_eq!(
        Some(true),
        packet.find(LayerKind::Tcp).unwrap().is_checksum_valid()
    );
    Ok(())
}

#[test]
fn test_build_tcp_over_ipv6_with_payload() -> anyhow::Result<()> {
    let packet = PacketBuilder::new()
        .ipv6(Ipv6Spec::new(
            Ipv6Addr::from_str("2001:db8::1")?,
            Ipv6Addr::from_str("2001:db8::2")?,
        ))
        .tcp(TcpSpec {
            flags: TcpFlags::PSH | TcpFlags::ACK,
            ..TcpSpec::new(1024, 80)
        })
        .raw(b"ping")
        .build()?;
    assert_eq!(
        vec![LayerKind::Ipv6, LayerKind::Tcp, LayerKind::Raw],
        packet.kinds()
    );
    assert_eq!(40 + 20 + 4, packet.bytes().len());
    assert_eq!([0x00, 0x18], packet.bytes()[4..6]);
    assert_eq!(
        Some(true),
        packet.find(LayerKind::Tcp).unwrap().is_checksum_valid()
    );
    Ok(())
}
