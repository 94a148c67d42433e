//! Resource lifecycle handlers.
//!
//! A [`Provider`] is built once from the provider configuration block and
//! hands out one handler per resource type:
//!
//! | Type name                   | Handler                  |
//! |-----------------------------|--------------------------|
//! | `seaweedfs_bucket`          | [`BucketResource`]       |
//! | `seaweedfs_iam_user`        | [`IamUserResource`]      |
//! | `seaweedfs_iam_access_key`  | [`IamAccessKeyResource`] |
//! | `seaweedfs_iam_user_policy` | [`IamUserPolicyResource`] |
//!
//! Every handler implements [`Resource`]. Mutating IAM calls run under the
//! provider's [`UserLockRegistry`]; reads never take a lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use seaweedfs_provider::{Cancellation, Provider, ProviderConfig, ReadOutcome, Resource};
//! use seaweedfs_provider::provider::IamUserModel;
//!
//! # async fn example() -> Result<(), seaweedfs_provider::Error> {
//! let provider = Provider::configure(ProviderConfig::new(
//!     "http://localhost:8333",
//!     "admin",
//!     "admin-secret",
//! ))?;
//! let users = provider.iam_user();
//! let cancel = Cancellation::never();
//!
//! let state = users.create(&cancel, IamUserModel::new("alice")).await?;
//! match users.read(&cancel, state).await? {
//!     ReadOutcome::Found(user) => println!("{} is {}", user.name, user.arn),
//!     ReadOutcome::Gone => println!("alice was deleted out of band"),
//! }
//! # Ok(())
//! # }
//! ```

mod access_key;
mod bucket;
mod iam_user;
mod user_policy;

pub use access_key::{IamAccessKeyModel, IamAccessKeyResource};
pub use bucket::{BucketModel, BucketResource};
pub use iam_user::{IamUserModel, IamUserResource};
pub use user_policy::{IamUserPolicyModel, IamUserPolicyResource};

use std::future::Future;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{Cancellation, Client, Error, ProviderConfig, RetryConfig, UserLockRegistry};

/// Result of refreshing a resource against the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome<M> {
    /// The resource exists; the model carries the refreshed attributes.
    Found(M),
    /// The resource no longer exists and should be removed from state.
    Gone,
}

impl<M> ReadOutcome<M> {
    /// Returns `true` for [`ReadOutcome::Gone`].
    pub fn is_gone(&self) -> bool {
        matches!(self, ReadOutcome::Gone)
    }

    /// Returns the refreshed model, if any.
    pub fn found(self) -> Option<M> {
        match self {
            ReadOutcome::Found(model) => Some(model),
            ReadOutcome::Gone => None,
        }
    }
}

/// CRUD lifecycle of one resource type.
///
/// Every operation takes a [`Cancellation`]; when it fires, the in-flight
/// request is dropped and the operation returns the cancellation's error.
pub trait Resource: Send + Sync {
    /// Tracked attributes of the resource.
    type Model: Serialize + DeserializeOwned + Clone + Send + Sync;

    /// The resource type name, for example `seaweedfs_bucket`.
    const TYPE_NAME: &'static str;

    /// Creates the resource described by `plan` and returns its state.
    fn create(
        &self,
        cancel: &Cancellation,
        plan: Self::Model,
    ) -> impl Future<Output = Result<Self::Model, Error>> + Send;

    /// Refreshes `state` from the backend.
    fn read(
        &self,
        cancel: &Cancellation,
        state: Self::Model,
    ) -> impl Future<Output = Result<ReadOutcome<Self::Model>, Error>> + Send;

    /// Applies `plan` to an existing resource whose state is `prior`.
    fn update(
        &self,
        cancel: &Cancellation,
        prior: Self::Model,
        plan: Self::Model,
    ) -> impl Future<Output = Result<Self::Model, Error>> + Send;

    /// Deletes the resource. Deleting an already-absent resource succeeds.
    fn delete(
        &self,
        cancel: &Cancellation,
        state: Self::Model,
    ) -> impl Future<Output = Result<(), Error>> + Send;

    /// Parses an import ID into a partial model, to be completed by
    /// [`read`](Resource::read).
    fn import(&self, id: &str) -> Result<Self::Model, Error>;
}

struct ProviderData {
    client: Client,
    locks: Arc<UserLockRegistry>,
    retry: RetryConfig,
}

/// Configured provider: the shared client, lock registry and retry policy.
///
/// Cheap to clone; every resource handler holds a clone.
#[derive(Clone)]
pub struct Provider {
    data: Arc<ProviderData>,
}

impl Provider {
    /// Resource type names served by this provider.
    pub const RESOURCE_TYPES: [&'static str; 4] = [
        BucketResource::TYPE_NAME,
        IamUserResource::TYPE_NAME,
        IamAccessKeyResource::TYPE_NAME,
        IamUserPolicyResource::TYPE_NAME,
    ];

    /// Validates the configuration block and builds the provider.
    pub fn configure(config: ProviderConfig) -> Result<Self, Error> {
        let client = Client::from_config(&config)?;
        info!(
            endpoint = client.endpoint(),
            region = client.region(),
            insecure = config.insecure(),
            "configured SeaweedFS provider"
        );
        Ok(Self::new(
            client,
            Arc::new(UserLockRegistry::new()),
            config.retry_config(),
        ))
    }

    /// Assembles a provider from parts.
    pub fn new(client: Client, locks: Arc<UserLockRegistry>, retry: RetryConfig) -> Self {
        Self {
            data: Arc::new(ProviderData {
                client,
                locks,
                retry,
            }),
        }
    }

    /// The signed IAM/S3 client.
    pub fn client(&self) -> &Client {
        &self.data.client
    }

    /// The per-user lock registry.
    pub fn locks(&self) -> &UserLockRegistry {
        &self.data.locks
    }

    /// Retry policy for eventually-consistent IAM writes.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.data.retry
    }

    /// Handler for `seaweedfs_bucket`.
    pub fn bucket(&self) -> BucketResource {
        BucketResource::new(self.clone())
    }

    /// Handler for `seaweedfs_iam_user`.
    pub fn iam_user(&self) -> IamUserResource {
        IamUserResource::new(self.clone())
    }

    /// Handler for `seaweedfs_iam_access_key`.
    pub fn iam_access_key(&self) -> IamAccessKeyResource {
        IamAccessKeyResource::new(self.clone())
    }

    /// Handler for `seaweedfs_iam_user_policy`.
    pub fn iam_user_policy(&self) -> IamUserPolicyResource {
        IamUserPolicyResource::new(self.clone())
    }
}

impl std::fmt::Debug for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provider")
            .field("client", &self.data.client)
            .field("retry", &self.data.retry)
            .finish_non_exhaustive()
    }
}

/// Splits an import ID of the form `left<sep>right`, both halves non-empty.
fn split_import_id<'a>(id: &'a str, sep: char, format: &str) -> Result<(&'a str, &'a str), Error> {
    match id.split_once(sep) {
        Some((left, right)) if !left.is_empty() && !right.is_empty() && !right.contains(sep) => {
            Ok((left, right))
        },
        _ => Err(Error::invalid_argument(format!(
            "invalid import id {:?}: expected `{}`",
            id, format
        ))),
    }
}

/// How a delete call ended when absence counts as success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Removal {
    Deleted,
    AlreadyAbsent,
}

/// Folds an absent-resource error from a delete call into [`Removal::AlreadyAbsent`].
fn removal(result: Result<(), Error>, is_absent: fn(&Error) -> bool) -> Result<Removal, Error> {
    match result {
        Ok(()) => Ok(Removal::Deleted),
        Err(err) if is_absent(&err) => Ok(Removal::AlreadyAbsent),
        Err(err) => Err(err),
    }
}

fn update_not_supported(type_name: &str) -> Error {
    Error::invalid_argument(format!("{} supports replacement only", type_name))
}
