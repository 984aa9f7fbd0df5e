use crate::init_tracing;
use crate::samples::{WOL_ETHERTYPE, WOL_ETHERTYPE_IPV4_PASSWORD, WOL_UDP, WOL_UDP_MAC_PASSWORD};
use layerwise_core::{parse, Builder, LinkLayer};
use layerwise_packet::ethernet::MacAddr;
use layerwise_packet::udp::UdpPacket;
use layerwise_packet::wake_on_lan::WakeOnLanPacket;
use layerwise_packet::LayerKind;
use std::str::FromStr;
use test_case::test_case;

const IPV4_PASSWORD: &[u8] = &[0xc0, 0xa8, 0x01, 0x01];
const MAC_PASSWORD: &[u8] = &[0x01, 0x23, 0x45, 0x67, 0x89, 0xab];

#[test_case(WOL_ETHERTYPE, "00:0d:56:dc:9e:35", &[]; "ethertype")]
#[test_case(WOL_ETHERTYPE_IPV4_PASSWORD, "00:0d:56:dc:9e:35", IPV4_PASSWORD; "ipv4 password")]
fn test_wake_on_lan_ethertype(sample: &[u8], target: &str, password: &[u8]) -> anyhow::Result<()> {
    init_tracing();
    let packet = parse(LinkLayer::Ethernet, sample)?;
    assert_eq!(
        vec![LayerKind::Ethernet, LayerKind::WakeOnLan],
        packet.kinds()
    );
    let wol = packet.extract::<WakeOnLanPacket<'_>>().unwrap();
    assert!(wol.is_valid());
    assert_eq!(MacAddr::from_str(target)?, wol.get_destination_address());
    assert_eq!(password, wol.get_password());
    assert_eq!(
        102 + password.len(),
        packet.find(LayerKind::WakeOnLan).unwrap().header_len()
    );
    Ok(())
}

#[test_case(WOL_UDP, "00:90:27:85:cf:01", &[]; "udp")]
#[test_case(WOL_UDP_MAC_PASSWORD, "00:0d:56:dc:9e:35", MAC_PASSWORD; "udp with mac password")]
fn test_wake_on_lan_udp(sample: &[u8], target: &str, password: &[u8]) -> anyhow::Result<()> {
    init_tracing();
    let packet = parse(LinkLayer::Ethernet, sample)?;
    assert_eq!(
        vec![
            LayerKind::Ethernet,
            LayerKind::Ipv4,
            LayerKind::Udp,
            LayerKind::WakeOnLan
        ],
        packet.kinds()
    );
    let wol = packet.extract::<WakeOnLanPacket<'_>>().unwrap();
    assert!(wol.is_valid());
    assert_eq!(MacAddr::from_str(target)?, wol.get_destination_address());
    assert_eq!(password, wol.get_password());
    assert!(wol.payload().is_empty());
    let udp = packet.find(LayerKind::Udp).unwrap();
    assert_eq!(Some(true), udp.is_checksum_valid());
    assert_eq!(
        Some(true),
        packet.find(LayerKind::Ipv4).unwrap().is_checksum_valid()
    );
    let udp_codec = packet.extract::<UdpPacket<'_>>().unwrap();
    assert_eq!(9, udp_codec.get_destination());
    Ok(())
}

#[test]
fn test_wake_on_lan_port_not_configured() -> anyhow::Result<()> {
    let dissector = Builder::new().wake_on_lan_ports([7]).build()?;
    let packet = dissector.parse(LinkLayer::Ethernet, WOL_UDP)?;
    assert_eq!(
        vec![
            LayerKind::Ethernet,
            LayerKind::Ipv4,
            LayerKind::Udp,
            LayerKind::Raw
        ],
        packet.kinds()
    );
    Ok(())
}

#[test]
fn test_invalid_magic_over_udp_is_raw() -> anyhow::Result<()> {
    let mut buf = WOL_UDP.to_vec();
    // corrupt the last repetition of the target address
    buf[143] ^= 0x01;
    let packet = parse(LinkLayer::Ethernet, &buf[..])?;
    let last = packet.layers().last().map(|l| l.kind());
    assert_eq!(Some(LayerKind::Raw), last);
    assert_eq!(
        Some(false),
        packet.find(LayerKind::Udp).unwrap().is_checksum_valid()
    );
    Ok(())
}

#[test]
fn test_invalid_magic_over_ethertype() -> anyhow::Result<()> {
    let mut buf = WOL_ETHERTYPE.to_vec();
    buf[14] = 0x00;
    let packet = parse(LinkLayer::Ethernet, &buf[..])?;
    assert_eq!(
        vec![LayerKind::Ethernet, LayerKind::WakeOnLan],
        packet.kinds()
    );
    assert!(!packet.extract::<WakeOnLanPacket<'_>>().unwrap().is_valid());
    Ok(())
}

#[test]
fn test_truncated_magic_over_ethertype() {
    let err = parse(LinkLayer::Ethernet, &WOL_ETHERTYPE[..115]).unwrap_err();
    assert!(matches!(err, layerwise_core::Error::PacketError(_)));
}
