use thiserror::Error;

/// A dissector error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A dissector error.
#[derive(Error, Debug, Eq, PartialEq)]
pub enum Error {
    #[error("invalid packet: {0}")]
    PacketError(#[from] layerwise_packet::error::Error),
    #[error("unsupported link layer type: {0}")]
    UnsupportedLinkLayer(u32),
    #[error("invalid config: {0}")]
    BadConfig(String),
    #[error("invalid layering: {0}")]
    InvalidLayering(String),
}
