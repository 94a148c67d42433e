//! IAM entities and response envelopes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An IAM user as returned by `CreateUser` and `GetUser`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct IamUser {
    /// The user name.
    pub user_name: String,
    /// The user's ARN.
    pub arn: String,
    /// The backend-assigned user ID.
    pub user_id: String,
    /// The user's path. SeaweedFS may leave this empty.
    pub path: String,
}

/// A freshly created access key, including its secret.
///
/// The secret is only ever returned by `CreateAccessKey`.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccessKey {
    /// Owner of the key.
    pub user_name: String,
    /// The access key ID.
    pub access_key_id: String,
    /// `Active` or `Inactive`.
    pub status: String,
    /// The secret access key.
    pub secret_access_key: String,
}

impl fmt::Debug for AccessKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessKey")
            .field("user_name", &self.user_name)
            .field("access_key_id", &self.access_key_id)
            .field("status", &self.status)
            .field("secret_access_key", &"[REDACTED]")
            .finish()
    }
}

/// Access key metadata as listed by `ListAccessKeys`. Never carries a secret.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct AccessKeyMetadata {
    /// Owner of the key.
    pub user_name: String,
    /// The access key ID.
    pub access_key_id: String,
    /// `Active` or `Inactive`.
    pub status: String,
}

/// An inline policy as returned by `GetUserPolicy`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UserPolicy {
    /// The user the policy is attached to.
    pub user_name: String,
    /// The policy name.
    pub policy_name: String,
    /// The policy document. URL-encoded on the wire.
    pub policy_document: String,
}

// Response envelopes. The root element name is not checked on decode.

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct UserResult {
    #[serde(rename = "User")]
    pub user: IamUser,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateUserResponse {
    #[serde(rename = "CreateUserResult")]
    pub result: UserResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GetUserResponse {
    #[serde(rename = "GetUserResult")]
    pub result: UserResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AccessKeyResult {
    #[serde(rename = "AccessKey")]
    pub access_key: AccessKey,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct CreateAccessKeyResponse {
    #[serde(rename = "CreateAccessKeyResult")]
    pub result: AccessKeyResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AccessKeyMembers {
    #[serde(rename = "member")]
    pub members: Vec<AccessKeyMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListAccessKeysResult {
    #[serde(rename = "AccessKeyMetadata")]
    pub metadata: AccessKeyMembers,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct ListAccessKeysResponse {
    #[serde(rename = "ListAccessKeysResult")]
    pub result: ListAccessKeysResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct GetUserPolicyResponse {
    #[serde(rename = "GetUserPolicyResult")]
    pub result: UserPolicy,
}
