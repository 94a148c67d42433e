//! `seaweedfs_bucket`: an S3 bucket and its tags.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{Provider, ReadOutcome, Removal, Resource, removal};
use crate::types::Tags;
use crate::{Cancellation, Error};

/// Tracked attributes of a bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketModel {
    /// Same as `bucket`.
    pub id: String,
    /// Bucket name.
    pub bucket: String,
    /// `arn:aws:s3:::{bucket}`.
    pub arn: String,
    /// Bucket tags.
    pub tags: Tags,
}

impl BucketModel {
    /// A plan for a bucket with no tags.
    pub fn new(bucket: impl Into<String>) -> Self {
        let bucket = bucket.into();
        Self {
            id: bucket.clone(),
            arn: bucket_arn(&bucket),
            bucket,
            tags: Tags::new(),
        }
    }

    /// Sets the planned tags.
    #[must_use]
    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    fn observed(bucket: &str, tags: Tags) -> Self {
        Self::new(bucket).with_tags(tags)
    }
}

fn bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{}", bucket)
}

/// Lifecycle handler for `seaweedfs_bucket`.
#[derive(Debug, Clone)]
pub struct BucketResource {
    provider: Provider,
}

impl BucketResource {
    pub(crate) fn new(provider: Provider) -> Self {
        Self { provider }
    }
}

impl Resource for BucketResource {
    type Model = BucketModel;

    const TYPE_NAME: &'static str = "seaweedfs_bucket";

    async fn create(&self, cancel: &Cancellation, plan: BucketModel) -> Result<BucketModel, Error> {
        let client = self.provider.client();
        let bucket = plan.bucket.as_str();

        match cancel.run(client.create_bucket(bucket)).await {
            Ok(()) => info!(bucket, "created bucket"),
            Err(err) if err.is_bucket_already_exists() => {
                cancel.run(client.head_bucket(bucket)).await?;
                info!(bucket, "adopted existing bucket");
            },
            Err(err) => return Err(err),
        }

        if !plan.tags.is_empty() {
            cancel.run(client.put_bucket_tags(bucket, &plan.tags)).await?;
        }

        let tags = cancel.run(client.get_bucket_tags(bucket)).await?;
        Ok(BucketModel::observed(bucket, tags))
    }

    async fn read(
        &self,
        cancel: &Cancellation,
        state: BucketModel,
    ) -> Result<ReadOutcome<BucketModel>, Error> {
        let client = self.provider.client();
        let bucket = state.bucket.as_str();

        match cancel.run(client.head_bucket(bucket)).await {
            Ok(()) => {},
            Err(err) if err.is_no_such_bucket() => {
                info!(bucket, "bucket is gone, removing from state");
                return Ok(ReadOutcome::Gone);
            },
            Err(err) => return Err(err),
        }

        let tags = cancel.run(client.get_bucket_tags(bucket)).await?;
        Ok(ReadOutcome::Found(BucketModel::observed(bucket, tags)))
    }

    async fn update(
        &self,
        cancel: &Cancellation,
        _prior: BucketModel,
        plan: BucketModel,
    ) -> Result<BucketModel, Error> {
        let client = self.provider.client();
        let bucket = plan.bucket.as_str();

        if plan.tags.is_empty() {
            match cancel.run(client.delete_bucket_tags(bucket)).await {
                Err(err) if !err.is_no_such_bucket() => return Err(err),
                _ => {},
            }
        } else {
            cancel.run(client.put_bucket_tags(bucket, &plan.tags)).await?;
        }

        let tags = cancel.run(client.get_bucket_tags(bucket)).await?;
        Ok(BucketModel::observed(bucket, tags))
    }

    async fn delete(&self, cancel: &Cancellation, state: BucketModel) -> Result<(), Error> {
        let result = cancel.run(self.provider.client().delete_bucket(&state.bucket)).await;
        match removal(result, Error::is_no_such_bucket)? {
            Removal::Deleted => info!(bucket = %state.bucket, "deleted bucket"),
            Removal::AlreadyAbsent => {
                info!(bucket = %state.bucket, "bucket already absent, nothing to delete");
            },
        }
        Ok(())
    }

    fn import(&self, id: &str) -> Result<BucketModel, Error> {
        if id.is_empty() {
            return Err(Error::invalid_argument("invalid import id: expected bucket name"));
        }
        Ok(BucketModel::new(id))
    }
}
