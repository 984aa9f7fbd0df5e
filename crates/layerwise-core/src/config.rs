use crate::error::Error;
use std::fmt::{Display, Formatter};

/// Default values for configuration.
pub mod defaults {
    /// The default value for `max-extension-headers`.
    pub const DEFAULT_MAX_EXTENSION_HEADERS: usize = 16;

    /// The default value for `wake-on-lan-ports`.
    pub const DEFAULT_WAKE_ON_LAN_PORTS: [u16; 2] = [7, 9];

    /// The `IPv4` time-to-live and `IPv6` hop limit of constructed packets.
    pub const DEFAULT_HOP_LIMIT: u8 = 64;
}

/// The link layer type of a captured buffer.
///
/// Values are taken from the `LINKTYPE_*` registry used by capture files.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum LinkLayer {
    /// `Ethernet II` frames.
    Ethernet,
    /// Bare `IP` packets, the version is taken from the first nibble.
    Raw,
    /// Bare `IPv4` packets.
    Ipv4,
    /// Bare `IPv6` packets.
    Ipv6,
}

impl LinkLayer {
    /// The `LINKTYPE_*` value of this link layer.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Ethernet => 1,
            Self::Raw => 101,
            Self::Ipv4 => 228,
            Self::Ipv6 => 229,
        }
    }
}

impl TryFrom<u32> for LinkLayer {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Ethernet),
            12 | 14 | 101 => Ok(Self::Raw),
            228 => Ok(Self::Ipv4),
            229 => Ok(Self::Ipv6),
            other => Err(Error::UnsupportedLinkLayer(other)),
        }
    }
}

impl Display for LinkLayer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ethernet => write!(f, "ethernet"),
            Self::Raw => write!(f, "raw"),
            Self::Ipv4 => write!(f, "ipv4"),
            Self::Ipv6 => write!(f, "ipv6"),
        }
    }
}

/// Dissector configuration.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    /// The maximum number of `IPv6` extension headers walked per packet.
    pub max_extension_headers: usize,
    /// The `UDP` destination ports which may carry a `Wake-on-LAN` magic packet.
    pub wake_on_lan_ports: Vec<u16>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_extension_headers: defaults::DEFAULT_MAX_EXTENSION_HEADERS,
            wake_on_lan_ports: defaults::DEFAULT_WAKE_ON_LAN_PORTS.to_vec(),
        }
    }
}
