#![allow(clippy::needless_pass_by_value)]

use std::sync::OnceLock;
use tracing_subscriber::fmt::format::FmtSpan;

mod construct;
mod icmpv6;
mod ipv6;
mod samples;
mod tcp;
mod wake_on_lan;

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a subscriber so dissection logs are shown for failing tests.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        tracing_subscriber::fmt()
            .with_span_events(FmtSpan::NONE)
            .with_env_filter("layerwise_core=trace")
            .with_test_writer()
            .init();
    });
}
