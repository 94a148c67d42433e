//! Wire types for the SeaweedFS IAM and S3 APIs.
//!
//! - [`IamUser`], [`AccessKey`], [`AccessKeyMetadata`], [`UserPolicy`]: IAM entities
//! - [`Tagging`]: The bucket tagging document

mod iam;
mod s3;

pub(crate) use iam::{
    CreateAccessKeyResponse, CreateUserResponse, GetUserPolicyResponse, GetUserResponse,
    ListAccessKeysResponse,
};
pub use iam::{AccessKey, AccessKeyMetadata, IamUser, UserPolicy};
pub use s3::{Tag, TagSet, Tagging, Tags};
