//! Provider block configuration.

use std::fmt;

use serde::Deserialize;

use super::RetryConfig;
use crate::Error;

/// Signing region used when none is configured.
pub const DEFAULT_REGION: &str = "us-east-1";

/// The provider's configuration block.
///
/// The host framework hands the block over as JSON; attribute names match the
/// provider schema (`endpoint`, `region`, `access_key`, `secret_key`,
/// `insecure`, `retry_attempts`).
///
/// ## Example
///
/// ```rust
/// use seaweedfs_provider::ProviderConfig;
///
/// let config = ProviderConfig::from_json(serde_json::json!({
///     "endpoint": "https://s3.example.com",
///     "access_key": "admin",
///     "secret_key": "admin-secret",
/// }))
/// .unwrap();
/// assert_eq!(config.region(), "us-east-1");
/// assert!(!config.insecure());
/// ```
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    /// SeaweedFS S3/IAM endpoint, for example `https://s3.example.com`.
    pub endpoint: String,

    /// Signing region for SigV4. Defaults to `us-east-1`.
    #[serde(default)]
    pub region: Option<String>,

    /// Admin access key used to manage SeaweedFS IAM users.
    pub access_key: String,

    /// Admin secret key used to manage SeaweedFS IAM users.
    pub secret_key: String,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure: Option<bool>,

    /// Attempt budget for eventually-consistent IAM writes.
    #[serde(default)]
    pub retry_attempts: Option<u32>,
}

impl ProviderConfig {
    /// Creates a configuration from the required attributes.
    pub fn new(
        endpoint: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            region: None,
            access_key: access_key.into(),
            secret_key: secret_key.into(),
            insecure: None,
            retry_attempts: None,
        }
    }

    /// Decodes the provider block handed over by the host framework.
    pub fn from_json(value: serde_json::Value) -> Result<Self, Error> {
        serde_json::from_value(value).map_err(|e| {
            Error::configuration(format!("invalid provider configuration: {}", e)).with_source(e)
        })
    }

    /// Sets the signing region.
    #[must_use]
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets whether TLS verification is skipped.
    #[must_use]
    pub fn with_insecure(mut self, insecure: bool) -> Self {
        self.insecure = Some(insecure);
        self
    }

    /// Sets the retry attempt budget.
    #[must_use]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = Some(attempts);
        self
    }

    /// Returns the configured region, or `us-east-1` when unset or empty.
    pub fn region(&self) -> &str {
        match self.region.as_deref() {
            Some(region) if !region.is_empty() => region,
            _ => DEFAULT_REGION,
        }
    }

    /// Returns whether TLS verification is skipped.
    pub fn insecure(&self) -> bool {
        self.insecure.unwrap_or(false)
    }

    /// Returns the retry configuration for IAM writes.
    pub fn retry_config(&self) -> RetryConfig {
        match self.retry_attempts {
            Some(attempts) => RetryConfig::new().with_max_attempts(attempts),
            None => RetryConfig::default(),
        }
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint)
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"[REDACTED]")
            .field("insecure", &self.insecure)
            .field("retry_attempts", &self.retry_attempts)
            .finish()
    }
}
