use crate::config::Config;
use crate::error::{Error, Result};
use crate::Dissector;
use tracing::instrument;

/// Build a dissector.
///
/// # Examples
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// use layerwise_core::Builder;
///
/// let dissector = Builder::new()
///     .max_extension_headers(4)
///     .wake_on_lan_ports([9, 40000])
///     .build()?;
/// assert_eq!(4, dissector.config().max_extension_headers);
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Dissector`] - A layered packet dissector.
#[derive(Debug)]
pub struct Builder {
    max_extension_headers: usize,
    wake_on_lan_ports: Vec<u16>,
}

impl Default for Builder {
    fn default() -> Self {
        let config = Config::default();
        Self {
            max_extension_headers: config.max_extension_headers,
            wake_on_lan_ports: config.wake_on_lan_ports,
        }
    }
}

impl Builder {
    /// Build a dissector builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of `IPv6` extension headers walked per packet.
    ///
    /// A chain longer than this fails with a `TooManyExtensionHeaders` error.
    #[must_use]
    pub fn max_extension_headers(self, max_extension_headers: usize) -> Self {
        Self {
            max_extension_headers,
            ..self
        }
    }

    /// Set the `UDP` destination ports which may carry a `Wake-on-LAN` magic packet.
    ///
    /// An empty set disables `Wake-on-LAN` dissection over `UDP`.
    #[must_use]
    pub fn wake_on_lan_ports(self, ports: impl IntoIterator<Item = u16>) -> Self {
        Self {
            wake_on_lan_ports: ports.into_iter().collect(),
            ..self
        }
    }

    /// Build the `Dissector`.
    #[instrument(skip_all, level = "trace")]
    pub fn build(self) -> Result<Dissector> {
        if self.max_extension_headers == 0 {
            return Err(Error::BadConfig(String::from(
                "max_extension_headers must be greater than zero",
            )));
        }
        let mut wake_on_lan_ports = self.wake_on_lan_ports;
        wake_on_lan_ports.sort_unstable();
        wake_on_lan_ports.dedup();
        let config = Config {
            max_extension_headers: self.max_extension_headers,
            wake_on_lan_ports,
        };
        tracing::debug!(?config);
        Ok(Dissector::new(config))
    }
}
