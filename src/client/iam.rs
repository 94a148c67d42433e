//! IAM query API operations.

use super::Client;
use crate::Error;
use crate::types::{
    AccessKey, AccessKeyMetadata, CreateAccessKeyResponse, CreateUserResponse,
    GetUserPolicyResponse, GetUserResponse, IamUser, ListAccessKeysResponse,
};

fn require(value: &str, name: &'static str) -> Result<(), Error> {
    if value.is_empty() {
        return Err(Error::invalid_argument(format!("{} is required", name)));
    }
    Ok(())
}

/// Decodes a URL-encoded policy document, `+` meaning space.
///
/// Falls back to the raw text when the escapes do not decode: a `%` not
/// followed by two hex digits, or escapes that decode to invalid UTF-8.
fn decode_policy_document(raw: &str) -> String {
    if !has_valid_escapes(raw) {
        return raw.to_owned();
    }
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => raw.to_owned(),
    }
}

fn has_valid_escapes(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

impl Client {
    /// Creates an IAM user. `path` is omitted from the request when empty.
    pub async fn create_user(&self, user_name: &str, path: &str) -> Result<IamUser, Error> {
        require(user_name, "user name")?;

        let mut params = vec![("UserName", user_name)];
        if !path.is_empty() {
            params.push(("Path", path));
        }

        let out: CreateUserResponse = self.inner.do_iam_action("CreateUser", &params).await?;
        Ok(out.result.user)
    }

    /// Fetches an IAM user. Absent users fail with `NoSuchEntity`.
    pub async fn get_user(&self, user_name: &str) -> Result<IamUser, Error> {
        require(user_name, "user name")?;

        let out: GetUserResponse = self
            .inner
            .do_iam_action("GetUser", &[("UserName", user_name)])
            .await?;
        Ok(out.result.user)
    }

    /// Deletes an IAM user.
    pub async fn delete_user(&self, user_name: &str) -> Result<(), Error> {
        require(user_name, "user name")?;
        self.inner
            .do_iam_action_no_output("DeleteUser", &[("UserName", user_name)])
            .await
    }

    /// Creates an access key for a user. The secret is only returned here.
    pub async fn create_access_key(&self, user_name: &str) -> Result<AccessKey, Error> {
        require(user_name, "user name")?;

        let out: CreateAccessKeyResponse = self
            .inner
            .do_iam_action("CreateAccessKey", &[("UserName", user_name)])
            .await?;
        Ok(out.result.access_key)
    }

    /// Lists a user's access keys, without secrets.
    pub async fn list_access_keys(&self, user_name: &str) -> Result<Vec<AccessKeyMetadata>, Error> {
        require(user_name, "user name")?;

        let out: ListAccessKeysResponse = self
            .inner
            .do_iam_action("ListAccessKeys", &[("UserName", user_name)])
            .await?;
        Ok(out.result.metadata.members)
    }

    /// Deletes one access key.
    pub async fn delete_access_key(&self, user_name: &str, access_key_id: &str) -> Result<(), Error> {
        require(user_name, "user name")?;
        require(access_key_id, "access key id")?;

        self.inner
            .do_iam_action_no_output(
                "DeleteAccessKey",
                &[("UserName", user_name), ("AccessKeyId", access_key_id)],
            )
            .await
    }

    /// Creates or replaces an inline user policy.
    pub async fn put_user_policy(
        &self,
        user_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> Result<(), Error> {
        require(user_name, "user name")?;
        require(policy_name, "policy name")?;

        self.inner
            .do_iam_action_no_output(
                "PutUserPolicy",
                &[
                    ("UserName", user_name),
                    ("PolicyName", policy_name),
                    ("PolicyDocument", policy_document),
                ],
            )
            .await
    }

    /// Fetches an inline user policy document, URL-decoded.
    pub async fn get_user_policy(&self, user_name: &str, policy_name: &str) -> Result<String, Error> {
        require(user_name, "user name")?;
        require(policy_name, "policy name")?;

        let out: GetUserPolicyResponse = self
            .inner
            .do_iam_action(
                "GetUserPolicy",
                &[("UserName", user_name), ("PolicyName", policy_name)],
            )
            .await?;
        Ok(decode_policy_document(&out.result.policy_document))
    }

    /// Deletes an inline user policy.
    pub async fn delete_user_policy(&self, user_name: &str, policy_name: &str) -> Result<(), Error> {
        require(user_name, "user name")?;
        require(policy_name, "policy name")?;

        self.inner
            .do_iam_action_no_output(
                "DeleteUserPolicy",
                &[("UserName", user_name), ("PolicyName", policy_name)],
            )
            .await
    }
}
