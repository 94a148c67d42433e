//! Credentials and request signing.
//!
//! - [`Credentials`]: The static access key / secret key pair
//! - [`SigV4Signer`]: AWS Signature Version 4 signer used for every request
//!
//! ```rust
//! use seaweedfs_provider::auth::{Credentials, SigV4Signer};
//!
//! let signer = SigV4Signer::new(Credentials::new("admin", "admin-secret"), "us-east-1");
//! assert_eq!(signer.region(), "us-east-1");
//! ```

mod credentials;
mod sigv4;

pub use credentials::Credentials;
pub use sigv4::{EMPTY_PAYLOAD_SHA256, SigV4Signer, SigningService, hash_payload};
