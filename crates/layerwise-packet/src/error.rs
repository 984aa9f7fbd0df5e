use thiserror::Error;

/// A packet error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A packet error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    /// Attempting to create a packet with an insufficient buffer size.
    #[error("insufficient buffer for {0} packet, minimum={1}, provided={2}")]
    InsufficientPacketBuffer(String, usize, usize),
    /// A read, write or slice would cross the bounds of a view.
    #[error("out of range access of {length} bytes at offset {offset}, view length={bound}")]
    OutOfRange {
        offset: usize,
        length: usize,
        bound: usize,
    },
    /// A bit field access with a width outside of `1..=64`.
    #[error("invalid bit field width {0}")]
    InvalidBitWidth(usize),
    /// A write through a read-only view.
    #[error("write operation called on readonly buffer")]
    ReadOnlyBuffer,
    /// A declared length field disagrees with the bytes available.
    #[error(
        "inconsistent length for {protocol} packet, declared={declared}, available={available}"
    )]
    LengthInconsistency {
        protocol: String,
        declared: usize,
        available: usize,
    },
    /// The IPv6 extension header chain is longer than allowed.
    #[error("too many extension headers, limit={0}")]
    TooManyExtensionHeaders(usize),
    /// A Wake-on-LAN password which is not 0, 4 or 6 bytes long.
    #[error("invalid wake-on-lan password length {0}, expected 0, 4 or 6")]
    InvalidPasswordLength(usize),
    /// A MAC address which could not be parsed.
    #[error("invalid mac address: {0}")]
    InvalidMacAddr(String),
}

impl Error {
    pub(crate) fn length_inconsistency(protocol: &str, declared: usize, available: usize) -> Self {
        Self::LengthInconsistency {
            protocol: String::from(protocol),
            declared,
            available,
        }
    }
}
