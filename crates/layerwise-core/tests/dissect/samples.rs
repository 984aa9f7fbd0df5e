use hex_literal::hex;

/// An `ICMPv6` router solicitation from `fe80::2a0:ccff:fed9:4175` to `ff02::2`.
pub const IPV6_ICMPV6_ETHERNET: &[u8] = &hex!(
    "
        33 33 00 00 00 02 00 a0 cc d9 41 75 86 dd 60 00
        00 00 00 10 3a ff fe 80 00 00 00 00 00 00 02 a0
        cc ff fe d9 41 75 ff 02 00 00 00 00 00 00 00 00
        00 00 00 00 00 02 85 00 5d 50 00 00 00 00 01 01
        00 a0 cc d9 41 75
        "
);

/// An `MLDv2` report behind a hop-by-hop options header carrying a router alert.
pub const IPV6_HOP_BY_HOP_ETHERNET: &[u8] = &hex!(
    "
        33 33 00 00 00 16 f8 94 c2 2e fa d1 86 dd 60 00
        00 00 00 24 00 01 fe 80 00 00 00 00 00 00 d8 02
        35 89 15 cf 31 28 ff 02 00 00 00 00 00 00 00 00
        00 00 00 00 00 16 3a 00 05 02 00 00 01 00 8f 00
        1b 84 00 00 00 01 04 00 00 00 ff 02 00 00 00 00
        00 00 00 00 00 00 00 01 00 03
        "
);

/// An `HTTP` request over `TCP` from `2001:db8::10` to `2001:db8::80`.
pub const IPV6_TCP_ETHERNET: &[u8] = &hex!(
    "
        02 00 00 00 00 02 02 00 00 00 00 01 86 dd 60 00
        ab cd 00 45 06 40 20 01 0d b8 00 00 00 00 00 00
        00 00 00 00 00 10 20 01 0d b8 00 00 00 00 00 00
        00 00 00 00 00 80 c0 00 00 50 1a 2b 3c 4d 5e 6f
        70 81 80 18 10 00 d0 1f 00 00 01 01 08 0a 00 01
        02 03 04 05 06 07 47 45 54 20 2f 20 48 54 54 50
        2f 31 2e 31 0d 0a 48 6f 73 74 3a 20 65 78 61 6d
        70 6c 65 2e 63 6f 6d 0d 0a 0d 0a
        "
);

/// A `TCP` acknowledgement over `IPv4` padded to the minimum frame size.
pub const IPV4_TCP_PADDED_ETHERNET: &[u8] = &hex!(
    "
        02 00 00 00 00 20 02 00 00 00 00 10 08 00 45 00
        00 28 12 34 40 00 40 06 a5 2d c0 a8 01 0a c0 a8
        01 14 01 bb c7 38 00 00 03 e8 00 00 07 d0 50 10
        ff ff 57 ba 00 00 00 00 00 00 00 00
        "
);

/// A `Wake-on-LAN` magic packet for `00:0d:56:dc:9e:35` sent with its own `EtherType`.
pub const WOL_ETHERTYPE: &[u8] = &hex!(
    "
        ff ff ff ff ff ff 00 26 b9 c4 d2 a1 08 42 ff ff
        ff ff ff ff 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35
        00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc
        9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d
        56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35
        00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc
        9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d
        56 dc 9e 35
        "
);

/// As `WOL_ETHERTYPE` with the 4 byte password `192.168.1.1`.
pub const WOL_ETHERTYPE_IPV4_PASSWORD: &[u8] = &hex!(
    "
        ff ff ff ff ff ff 00 26 b9 c4 d2 a1 08 42 ff ff
        ff ff ff ff 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35
        00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc
        9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d
        56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35
        00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc
        9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d
        56 dc 9e 35 c0 a8 01 01
        "
);

/// A `Wake-on-LAN` magic packet for `00:0d:56:dc:9e:35` over `UDP` port 9 with a 6 byte password.
pub const WOL_UDP_MAC_PASSWORD: &[u8] = &hex!(
    "
        ff ff ff ff ff ff 00 26 b9 c4 d2 a1 08 00 45 00
        00 88 00 01 00 00 80 11 b6 0f c0 a8 01 05 c0 a8
        01 ff 9c 40 00 09 00 74 bc 42 ff ff ff ff ff ff
        00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc
        9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d
        56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35
        00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc
        9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35 00 0d
        56 dc 9e 35 00 0d 56 dc 9e 35 00 0d 56 dc 9e 35
        01 23 45 67 89 ab
        "
);

/// A `Wake-on-LAN` magic packet for `00:90:27:85:cf:01` over `UDP` port 9.
pub const WOL_UDP: &[u8] = &hex!(
    "
        ff ff ff ff ff ff 00 26 b9 c4 d2 a1 08 00 45 00
        00 82 00 01 00 00 80 11 b6 15 c0 a8 01 05 c0 a8
        01 ff 9c 40 00 09 00 6e 6d 04 ff ff ff ff ff ff
        00 90 27 85 cf 01 00 90 27 85 cf 01 00 90 27 85
        cf 01 00 90 27 85 cf 01 00 90 27 85 cf 01 00 90
        27 85 cf 01 00 90 27 85 cf 01 00 90 27 85 cf 01
        00 90 27 85 cf 01 00 90 27 85 cf 01 00 90 27 85
        cf 01 00 90 27 85 cf 01 00 90 27 85 cf 01 00 90
        27 85 cf 01 00 90 27 85 cf 01 00 90 27 85 cf 01
        "
);

/// An `ICMPv6` echo request to a mobile node's home address `2001:db8::99`, routed through its
/// care-of address `2001:db8::2` by a type 2 routing header.
pub const IPV6_ROUTING_ICMPV6: &[u8] = &hex!(
    "
        60 00 00 00 00 24 2b 40 20 01 0d b8 00 00 00 00
        00 00 00 00 00 00 00 01 20 01 0d b8 00 00 00 00
        00 00 00 00 00 00 00 02 3a 02 02 01 00 00 00 00
        20 01 0d b8 00 00 00 00 00 00 00 00 00 00 00 99
        80 00 4c b1 12 34 00 01 61 62 63 64
        "
);
