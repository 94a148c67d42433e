//! Configuration types for the SeaweedFS provider.
//!
//! This module provides configuration options for:
//! - [`ProviderConfig`]: The provider block (endpoint, region, credentials)
//! - [`RetryConfig`]: Backoff for eventually-consistent IAM writes
//! - [`TlsConfig`]: TLS/SSL settings

mod provider;
mod retry;
mod tls;

pub use provider::{DEFAULT_REGION, ProviderConfig};
pub use retry::RetryConfig;
pub use tls::TlsConfig;
