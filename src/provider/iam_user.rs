//! `seaweedfs_iam_user`: an IAM user.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Provider, ReadOutcome, Removal, Resource, removal, update_not_supported};
use crate::types::IamUser;
use crate::{Cancellation, Error};

const DEFAULT_PATH: &str = "/";

/// Tracked attributes of an IAM user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IamUserModel {
    /// Same as `name`.
    pub id: String,
    /// User name.
    pub name: String,
    /// IAM path, `/` unless set.
    pub path: String,
    /// User ARN as reported by the backend.
    pub arn: String,
    /// Backend-assigned user ID.
    pub user_id: String,
}

impl IamUserModel {
    /// A plan for a user at the default path.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
            path: DEFAULT_PATH.to_owned(),
            ..Self::default()
        }
    }

    /// Sets the planned path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    fn observed(user: IamUser, planned_path: &str) -> Self {
        let path = if !user.path.is_empty() {
            user.path
        } else if !planned_path.is_empty() {
            planned_path.to_owned()
        } else {
            DEFAULT_PATH.to_owned()
        };

        Self {
            id: user.user_name.clone(),
            name: user.user_name,
            path,
            arn: user.arn,
            user_id: user.user_id,
        }
    }
}

/// Lifecycle handler for `seaweedfs_iam_user`.
#[derive(Debug, Clone)]
pub struct IamUserResource {
    provider: Provider,
}

impl IamUserResource {
    pub(crate) fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

impl Resource for IamUserResource {
    type Model = IamUserModel;

    const TYPE_NAME: &'static str = "seaweedfs_iam_user";

    async fn create(&self, cancel: &Cancellation, plan: IamUserModel) -> Result<IamUserModel, Error> {
        let client = self.provider.client();
        let name = plan.name.as_str();

        let user = cancel
            .run(
                self.provider
                    .locks()
                    .with_user_lock(name, || client.create_user(name, &plan.path)),
            )
            .await?;

        info!(user = name, arn = %user.arn, "created IAM user");
        Ok(IamUserModel::observed(user, &plan.path))
    }

    async fn read(
        &self,
        cancel: &Cancellation,
        state: IamUserModel,
    ) -> Result<ReadOutcome<IamUserModel>, Error> {
        match cancel.run(self.provider.client().get_user(&state.name)).await {
            Ok(user) => Ok(ReadOutcome::Found(IamUserModel::observed(user, &state.path))),
            Err(err) if err.is_no_such_entity() => {
                info!(user = %state.name, "IAM user is gone, removing from state");
                Ok(ReadOutcome::Gone)
            },
            Err(err) => Err(err),
        }
    }

    async fn update(
        &self,
        _cancel: &Cancellation,
        _prior: IamUserModel,
        _plan: IamUserModel,
    ) -> Result<IamUserModel, Error> {
        Err(update_not_supported(Self::TYPE_NAME))
    }

    async fn delete(&self, cancel: &Cancellation, state: IamUserModel) -> Result<(), Error> {
        let client = self.provider.client();
        let name = state.name.as_str();

        let result = cancel
            .run(
                self.provider
                    .locks()
                    .with_user_lock(name, || client.delete_user(name)),
            )
            .await;

        match removal(result, Error::is_no_such_entity)? {
            Removal::Deleted => info!(user = name, "deleted IAM user"),
            Removal::AlreadyAbsent => info!(user = name, "IAM user already absent, nothing to delete"),
        }
        Ok(())
    }

    fn import(&self, id: &str) -> Result<IamUserModel, Error> {
        if id.is_empty() {
            return Err(Error::invalid_argument("invalid import id: expected user name"));
        }
        Ok(IamUserModel {
            id: id.to_owned(),
            name: id.to_owned(),
            ..IamUserModel::default()
        })
    }
}
