//! `seaweedfs_iam_access_key`: an access key belonging to an IAM user.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{
    Provider, ReadOutcome, Removal, Resource, removal, split_import_id, update_not_supported,
};
use crate::types::AccessKey;
use crate::{Cancellation, Error, retry_eventually_consistent};

/// Tracked attributes of an access key.
///
/// `secret_access_key` is only known for keys created through this provider;
/// imported keys leave it empty.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IamAccessKeyModel {
    /// Same as `access_key_id`.
    pub id: String,
    /// Owner of the key.
    pub user_name: String,
    /// The access key ID.
    pub access_key_id: String,
    /// The secret access key.
    pub secret_access_key: String,
    /// `Active` or `Inactive`.
    pub status: String,
}

impl IamAccessKeyModel {
    /// A plan for a new key owned by `user_name`.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            ..Self::default()
        }
    }

    /// State for a freshly created key. The owner is always the planned
    /// user name, whatever the backend echoes back.
    fn created(user_name: &str, key: AccessKey) -> Self {
        Self {
            id: key.access_key_id.clone(),
            user_name: user_name.to_owned(),
            access_key_id: key.access_key_id,
            secret_access_key: key.secret_access_key,
            status: key.status,
        }
    }
}

impl fmt::Debug for IamAccessKeyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IamAccessKeyModel")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"[REDACTED]")
            .field("status", &self.status)
            .finish()
    }
}

/// Lifecycle handler for `seaweedfs_iam_access_key`.
#[derive(Debug, Clone)]
pub struct IamAccessKeyResource {
    provider: Provider,
}

impl IamAccessKeyResource {
    pub(crate) fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

impl Resource for IamAccessKeyResource {
    type Model = IamAccessKeyModel;

    const TYPE_NAME: &'static str = "seaweedfs_iam_access_key";

    async fn create(
        &self,
        cancel: &Cancellation,
        plan: IamAccessKeyModel,
    ) -> Result<IamAccessKeyModel, Error> {
        let client = self.provider.client();
        let retry = self.provider.retry_config();
        let user = plan.user_name.as_str();

        // A freshly created user may not be visible yet, and SeaweedFS
        // intermittently answers CreateAccessKey with ServiceFailure.
        let key = cancel
            .run(self.provider.locks().with_user_lock(user, || {
                retry_eventually_consistent(cancel, retry, || client.create_access_key(user))
            }))
            .await?;

        info!(user, access_key_id = %key.access_key_id, "created IAM access key");
        Ok(IamAccessKeyModel::created(user, key))
    }

    async fn read(
        &self,
        cancel: &Cancellation,
        state: IamAccessKeyModel,
    ) -> Result<ReadOutcome<IamAccessKeyModel>, Error> {
        let keys = match cancel
            .run(self.provider.client().list_access_keys(&state.user_name))
            .await
        {
            Ok(keys) => keys,
            Err(err) if err.is_no_such_entity() => {
                info!(user = %state.user_name, "IAM user is gone, removing access key from state");
                return Ok(ReadOutcome::Gone);
            },
            Err(err) => return Err(err),
        };

        let Some(found) = keys
            .into_iter()
            .find(|key| key.access_key_id == state.access_key_id)
        else {
            info!(
                user = %state.user_name,
                access_key_id = %state.access_key_id,
                "access key is gone, removing from state"
            );
            return Ok(ReadOutcome::Gone);
        };

        Ok(ReadOutcome::Found(IamAccessKeyModel {
            id: found.access_key_id.clone(),
            access_key_id: found.access_key_id,
            status: found.status,
            ..state
        }))
    }

    async fn update(
        &self,
        _cancel: &Cancellation,
        _prior: IamAccessKeyModel,
        _plan: IamAccessKeyModel,
    ) -> Result<IamAccessKeyModel, Error> {
        Err(update_not_supported(Self::TYPE_NAME))
    }

    async fn delete(&self, cancel: &Cancellation, state: IamAccessKeyModel) -> Result<(), Error> {
        let client = self.provider.client();
        let user = state.user_name.as_str();
        let access_key_id = state.access_key_id.as_str();

        let result = cancel
            .run(self.provider.locks().with_user_lock(user, || {
                client.delete_access_key(user, access_key_id)
            }))
            .await;

        match removal(result, Error::is_no_such_entity)? {
            Removal::Deleted => info!(user, access_key_id, "deleted IAM access key"),
            Removal::AlreadyAbsent => {
                info!(user, access_key_id, "IAM access key already absent, nothing to delete");
            },
        }
        Ok(())
    }

    fn import(&self, id: &str) -> Result<IamAccessKeyModel, Error> {
        let (user_name, access_key_id) = split_import_id(id, ',', "user_name,access_key_id")?;
        Ok(IamAccessKeyModel {
            id: access_key_id.to_owned(),
            user_name: user_name.to_owned(),
            access_key_id: access_key_id.to_owned(),
            ..IamAccessKeyModel::default()
        })
    }
}
