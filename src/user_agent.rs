//! Value of the `User-Agent` header on outgoing requests.

use std::env::consts::{ARCH, OS};
use std::sync::LazyLock;

static USER_AGENT: LazyLock<String> = LazyLock::new(|| {
    format!(
        "{}/{} (rust/{}; {}/{})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_RUST_VERSION"),
        platform(OS),
        ARCH,
    )
});

/// `seaweedfs-provider/<version> (rust/<msrv>; <os>/<arch>)`.
pub(crate) fn user_agent() -> &'static str {
    &USER_AGENT
}

// `darwin`, not `macos`.
fn platform(os: &str) -> &str {
    if os == "macos" { "darwin" } else { os }
}
