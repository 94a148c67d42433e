//! Prelude module for convenient imports.
//!
//! ```rust
//! use seaweedfs_provider::prelude::*;
//! ```
//!
//! This provides access to:
//! - The client and its configuration
//! - Error types
//! - The provider and the `Resource` trait
//! - Cancellation and retry helpers

pub use crate::{
    auth::Credentials,
    cancel::{CancelHandle, Cancellation},
    client::{Client, ClientBuilder},
    config::{ProviderConfig, RetryConfig, TlsConfig},
    error::{ApiError, Error, ErrorKind, Result},
    locks::UserLockRegistry,
    policy::policies_semantically_equal,
    provider::{Provider, ReadOutcome, Resource},
    retry::retry_eventually_consistent,
};
