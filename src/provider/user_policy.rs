//! `seaweedfs_iam_user_policy`: an inline policy attached to an IAM user.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::{Provider, ReadOutcome, Removal, Resource, removal, split_import_id};
use crate::{Cancellation, Error, policies_semantically_equal, retry_eventually_consistent};

/// Tracked attributes of an inline user policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IamUserPolicyModel {
    /// `{user_name}:{name}`.
    pub id: String,
    /// The user the policy is attached to.
    pub user_name: String,
    /// The policy name.
    pub name: String,
    /// The policy document, as JSON text.
    pub policy: String,
}

impl IamUserPolicyModel {
    /// A plan attaching `policy` to `user_name` under `name`.
    pub fn new(
        user_name: impl Into<String>,
        name: impl Into<String>,
        policy: impl Into<String>,
    ) -> Self {
        let user_name = user_name.into();
        let name = name.into();
        Self {
            id: policy_id(&user_name, &name),
            user_name,
            name,
            policy: policy.into(),
        }
    }
}

fn policy_id(user_name: &str, name: &str) -> String {
    format!("{}:{}", user_name, name)
}

/// Lifecycle handler for `seaweedfs_iam_user_policy`.
#[derive(Debug, Clone)]
pub struct IamUserPolicyResource {
    provider: Provider,
}

impl IamUserPolicyResource {
    pub(crate) fn new(provider: Provider) -> Self {
        Self { provider }
    }

    async fn put(
        &self,
        cancel: &Cancellation,
        plan: IamUserPolicyModel,
    ) -> Result<IamUserPolicyModel, Error> {
        let client = self.provider.client();
        let retry = self.provider.retry_config();
        let user = plan.user_name.as_str();
        let name = plan.name.as_str();
        let policy = plan.policy.as_str();

        cancel
            .run(self.provider.locks().with_user_lock(user, || {
                retry_eventually_consistent(cancel, retry, || {
                    client.put_user_policy(user, name, policy)
                })
            }))
            .await?;

        info!(user, policy = name, "put IAM user policy");
        Ok(IamUserPolicyModel::new(user, name, policy))
    }
}

impl Resource for IamUserPolicyResource {
    type Model = IamUserPolicyModel;

    const TYPE_NAME: &'static str = "seaweedfs_iam_user_policy";

    async fn create(
        &self,
        cancel: &Cancellation,
        plan: IamUserPolicyModel,
    ) -> Result<IamUserPolicyModel, Error> {
        self.put(cancel, plan).await
    }

    async fn read(
        &self,
        cancel: &Cancellation,
        state: IamUserPolicyModel,
    ) -> Result<ReadOutcome<IamUserPolicyModel>, Error> {
        let remote = match cancel
            .run(
                self.provider
                    .client()
                    .get_user_policy(&state.user_name, &state.name),
            )
            .await
        {
            Ok(remote) => remote,
            Err(err) if err.is_no_such_entity() => {
                info!(
                    user = %state.user_name,
                    policy = %state.name,
                    "IAM user policy is gone, removing from state"
                );
                return Ok(ReadOutcome::Gone);
            },
            Err(err) => return Err(err),
        };

        let policy = if policies_semantically_equal(&state.policy, &remote) {
            state.policy
        } else {
            debug!(user = %state.user_name, policy = %state.name, "policy document drifted");
            remote
        };

        Ok(ReadOutcome::Found(IamUserPolicyModel::new(
            state.user_name,
            state.name,
            policy,
        )))
    }

    async fn update(
        &self,
        cancel: &Cancellation,
        _prior: IamUserPolicyModel,
        plan: IamUserPolicyModel,
    ) -> Result<IamUserPolicyModel, Error> {
        self.put(cancel, plan).await
    }

    async fn delete(&self, cancel: &Cancellation, state: IamUserPolicyModel) -> Result<(), Error> {
        let client = self.provider.client();
        let user = state.user_name.as_str();
        let name = state.name.as_str();

        let result = cancel
            .run(
                self.provider
                    .locks()
                    .with_user_lock(user, || client.delete_user_policy(user, name)),
            )
            .await;

        match removal(result, Error::is_no_such_entity)? {
            Removal::Deleted => info!(user, policy = name, "deleted IAM user policy"),
            Removal::AlreadyAbsent => {
                info!(user, policy = name, "IAM user policy already absent, nothing to delete");
            },
        }
        Ok(())
    }

    fn import(&self, id: &str) -> Result<IamUserPolicyModel, Error> {
        let (user_name, name) = split_import_id(id, ':', "user_name:policy_name")?;
        Ok(IamUserPolicyModel::new(user_name, name, ""))
    }
}
