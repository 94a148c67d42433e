//! # SeaweedFS Provider Core
//!
//! Signed IAM/S3 client and resource lifecycle handlers for managing
//! SeaweedFS buckets, IAM users, access keys and inline user policies.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use seaweedfs_provider::prelude::*;
//! use seaweedfs_provider::provider::{IamAccessKeyModel, IamUserModel};
//!
//! #[tokio::main]
//! async fn main() -> seaweedfs_provider::Result<()> {
//!     let provider = Provider::configure(
//!         ProviderConfig::new("http://localhost:8333", "admin", "admin-secret")
//!             .with_retry_attempts(5),
//!     )?;
//!     let cancel = Cancellation::never();
//!
//!     provider.iam_user().create(&cancel, IamUserModel::new("alice")).await?;
//!     let key = provider
//!         .iam_access_key()
//!         .create(&cancel, IamAccessKeyModel::new("alice"))
//!         .await?;
//!     println!("alice has key {}", key.access_key_id);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Key Concepts
//!
//! - **Layers**: [`Client`] speaks the wire protocol and never retries;
//!   [`retry_eventually_consistent`] absorbs IAM eventual consistency;
//!   [`Provider`] hands out one [`Resource`] handler per resource type.
//! - **Classification**: every failure is an [`Error`] with an [`ErrorKind`];
//!   API failures carry the backend's error code, see [`ApiError`].
//! - **Serialization**: mutating IAM calls run under a [`UserLockRegistry`],
//!   one lock per user name behind a process-wide write gate.
//! - **Cancellation**: every lifecycle operation takes a [`Cancellation`];
//!   firing it drops the in-flight request and aborts retry backoff.

#![cfg_attr(docsrs, feature(doc_cfg))]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod types;

// Lifecycle building blocks
mod cancel;
pub mod locks;
pub mod policy;
pub mod retry;

// Resource handlers
pub mod provider;

// Prelude for convenient imports
pub mod prelude;

mod user_agent;

// Re-export main types at crate root for convenience
pub use auth::Credentials;
pub use cancel::{CancelHandle, Cancellation};
pub use client::{Client, ClientBuilder};
pub use config::{DEFAULT_REGION, ProviderConfig, RetryConfig, TlsConfig};
pub use error::{ApiError, Error, ErrorKind, Result};
pub use locks::UserLockRegistry;
pub use policy::{normalize_json, policies_semantically_equal};
pub use provider::{Provider, ReadOutcome, Resource};
pub use retry::retry_eventually_consistent;
