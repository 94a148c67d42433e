//! Signed IAM/S3 client for SeaweedFS.
//!
//! [`Client`] signs every request with SigV4, dispatches it, decodes the XML
//! response and classifies failures into [`Error`](crate::Error). It never
//! retries; wrap calls in
//! [`retry_eventually_consistent`](crate::retry_eventually_consistent) where
//! the backend's eventual consistency must be absorbed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seaweedfs_provider::{Client, Credentials};
//!
//! # async fn example() -> Result<(), seaweedfs_provider::Error> {
//! let client = Client::builder()
//!     .endpoint("http://localhost:8333")
//!     .credentials(Credentials::new("admin", "admin-secret"))
//!     .build()?;
//!
//! client.create_user("alice", "/").await?;
//! let key = client.create_access_key("alice").await?;
//! println!("created {}", key.access_key_id);
//! # Ok(())
//! # }
//! ```

mod builder;
mod iam;
mod inner;
mod s3;

pub use builder::{ClientBuilder, DEFAULT_TIMEOUT};

use std::fmt;
use std::sync::Arc;

/// The SeaweedFS IAM/S3 client.
///
/// ## Thread Safety
///
/// `Client` is `Clone` and thread-safe. Configuration is immutable after
/// [`build()`](ClientBuilder::build) and shared through an `Arc`; clones share
/// one connection pool.
#[derive(Clone)]
pub struct Client {
    inner: Arc<inner::ClientInner>,
}

impl Client {
    /// Creates a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Returns the endpoint, without a trailing `/`.
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Returns the signing region.
    pub fn region(&self) -> &str {
        self.inner.signer.region()
    }

    pub(crate) fn from_inner(inner: inner::ClientInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.inner.endpoint)
            .field("region", &self.inner.signer.region())
            .field("access_key", &self.inner.signer.access_key())
            .finish_non_exhaustive()
    }
}
