//! Client builder.

use std::time::Duration;

use super::inner::ClientInner;
use crate::{
    Client, Error,
    auth::{Credentials, SigV4Signer},
    config::{DEFAULT_REGION, ProviderConfig, TlsConfig},
    user_agent,
};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Builder for creating [`Client`] instances.
///
/// ## Required Configuration
///
/// - `endpoint()`: The SeaweedFS S3/IAM endpoint
/// - `credentials()`: Admin access key and secret key
///
/// Missing or empty values are reported by [`build()`](ClientBuilder::build).
///
/// ## Optional Configuration
///
/// - `region()`: Signing region, `us-east-1` when unset or empty
/// - `tls_config()` / `insecure()`: TLS settings
/// - `timeout()`: Per-request timeout, 30 seconds by default
///
/// ## Example
///
/// ```rust
/// use seaweedfs_provider::{Client, Credentials};
///
/// let client = Client::builder()
///     .endpoint("http://localhost:8333/")
///     .credentials(Credentials::new("admin", "admin-secret"))
///     .build()?;
/// assert_eq!(client.endpoint(), "http://localhost:8333");
/// assert_eq!(client.region(), "us-east-1");
/// # Ok::<(), seaweedfs_provider::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    region: Option<String>,
    credentials: Option<Credentials>,
    tls_config: TlsConfig,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new client builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the SeaweedFS endpoint. A trailing `/` is trimmed.
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the signing region.
    #[must_use]
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Sets the signing credentials.
    #[must_use]
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the TLS configuration.
    #[must_use]
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = config;
        self
    }

    /// Disables TLS certificate verification.
    ///
    /// **WARNING**: Only for clusters with self-signed certificates that
    /// cannot be given a proper CA.
    #[must_use]
    pub fn insecure(mut self) -> Self {
        self.tls_config.skip_verification = true;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if:
    /// - The endpoint is missing or empty
    /// - The access key or secret key is missing or empty
    /// - The endpoint is not a valid URL
    /// - A custom CA certificate cannot be loaded
    pub fn build(self) -> Result<Client, Error> {
        let endpoint = self.endpoint.unwrap_or_default();
        if endpoint.is_empty() {
            return Err(Error::configuration("endpoint is required"));
        }

        let credentials = match self.credentials {
            Some(credentials) if !credentials.is_incomplete() => credentials,
            _ => return Err(Error::configuration("access_key and secret_key are required")),
        };

        let endpoint = endpoint.trim_end_matches('/').to_owned();
        url::Url::parse(&endpoint)
            .map_err(|e| Error::configuration(format!("invalid endpoint: {}", e)).with_source(e))?;

        let region = match self.region {
            Some(region) if !region.is_empty() => region,
            _ => DEFAULT_REGION.to_owned(),
        };

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        let http = http_client(&self.tls_config, timeout)?;

        let inner = ClientInner {
            endpoint,
            signer: SigV4Signer::new(credentials, region),
            http,
            timeout,
        };

        Ok(Client::from_inner(inner))
    }
}

impl Client {
    /// Builds a client from the provider configuration block.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, Error> {
        let mut builder = Client::builder()
            .endpoint(config.endpoint.clone())
            .region(config.region())
            .credentials(Credentials::new(
                config.access_key.clone(),
                config.secret_key.clone(),
            ));
        if config.insecure() {
            builder = builder.insecure();
        }
        builder.build()
    }
}

fn http_client(tls_config: &TlsConfig, timeout: Duration) -> Result<reqwest::Client, Error> {
    let builder = reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(user_agent::user_agent());

    tls_config
        .apply(builder)?
        .build()
        .map_err(|e| Error::configuration(format!("failed to create HTTP client: {}", e)).with_source(e))
}
