//! Trust settings for HTTPS endpoints.

use std::path::{Path, PathBuf};

use reqwest::Certificate;

use crate::Error;

/// How the client verifies the endpoint's certificate.
///
/// The system roots are always trusted. A self-hosted cluster behind a
/// private CA adds that CA as a PEM bundle, from a file or inline, and
/// keeps verification on.
///
/// ```rust
/// use seaweedfs_provider::TlsConfig;
///
/// let config = TlsConfig::builder()
///     .ca_bundle_path("/etc/ssl/seaweedfs-ca.crt")
///     .build();
/// assert!(config.has_custom_ca());
/// ```
#[derive(Debug, Clone, Default, bon::Builder)]
pub struct TlsConfig {
    /// PEM file with one or more extra CA certificates.
    #[builder(into)]
    pub ca_bundle_path: Option<PathBuf>,

    /// Inline PEM with one or more extra CA certificates.
    #[builder(into)]
    pub ca_bundle_pem: Option<String>,

    /// Accept any server certificate. Only the provider's `insecure`
    /// flag sets this.
    #[builder(default)]
    pub skip_verification: bool,
}

impl TlsConfig {
    /// Verification off. Anyone on the path can impersonate the endpoint.
    pub fn insecure() -> Self {
        Self::builder().skip_verification(true).build()
    }

    /// Returns `true` if an extra CA bundle is configured.
    pub fn has_custom_ca(&self) -> bool {
        self.ca_bundle_path.is_some() || self.ca_bundle_pem.is_some()
    }

    /// Parses every configured CA bundle.
    ///
    /// A bundle that cannot be read, or holds no certificate, is a
    /// configuration error.
    pub(crate) fn extra_roots(&self) -> Result<Vec<Certificate>, Error> {
        let mut roots = Vec::new();
        if let Some(path) = &self.ca_bundle_path {
            roots.extend(read_bundle(path)?);
        }
        if let Some(pem) = &self.ca_bundle_pem {
            roots.extend(parse_bundle(pem.as_bytes(), "ca_bundle_pem")?);
        }
        Ok(roots)
    }

    /// Applies these settings to an HTTP client under construction.
    pub(crate) fn apply(
        &self,
        builder: reqwest::ClientBuilder,
    ) -> Result<reqwest::ClientBuilder, Error> {
        let mut builder = builder.tls_certs_merge(self.extra_roots()?);
        if self.skip_verification {
            builder = builder.tls_danger_accept_invalid_certs(true);
        }
        Ok(builder)
    }
}

fn read_bundle(path: &Path) -> Result<Vec<Certificate>, Error> {
    let pem = std::fs::read(path).map_err(|e| {
        Error::configuration(format!("failed to read CA bundle {}: {}", path.display(), e))
            .with_source(e)
    })?;
    parse_bundle(&pem, &path.display().to_string())
}

fn parse_bundle(pem: &[u8], origin: &str) -> Result<Vec<Certificate>, Error> {
    let certs = Certificate::from_pem_bundle(pem).map_err(|e| {
        Error::configuration(format!("invalid CA bundle {}: {}", origin, e)).with_source(e)
    })?;
    if certs.is_empty() {
        return Err(Error::configuration(format!(
            "CA bundle {} contains no certificate",
            origin
        )));
    }
    Ok(certs)
}
