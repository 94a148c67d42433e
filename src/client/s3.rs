//! S3 bucket operations.

use reqwest::Method;
use tracing::debug;

use super::Client;
use super::inner::{SignedRequest, decode_xml};
use crate::Error;
use crate::auth::SigningService;
use crate::types::{Tagging, Tags};

const TAGGING: &str = "tagging";
const XML_CONTENT_TYPE: &str = "application/xml";

impl Client {
    async fn bucket_request(
        &self,
        method: Method,
        bucket: &str,
        subresource: Option<&str>,
    ) -> Result<bytes::Bytes, Error> {
        let url = self.inner.bucket_url(bucket, subresource)?;
        self.inner
            .do_signed_request(SignedRequest::new(SigningService::S3, method, url))
            .await
    }

    /// Creates a bucket. An existing bucket fails with
    /// `BucketAlreadyOwnedByYou` or `BucketAlreadyExists`.
    pub async fn create_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.bucket_request(Method::PUT, bucket, None).await.map(drop)
    }

    /// Checks that a bucket exists and is accessible.
    ///
    /// HEAD responses have no body, so a missing bucket surfaces as `HTTP404`.
    pub async fn head_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.bucket_request(Method::HEAD, bucket, None).await.map(drop)
    }

    /// Deletes a bucket.
    pub async fn delete_bucket(&self, bucket: &str) -> Result<(), Error> {
        self.bucket_request(Method::DELETE, bucket, None).await.map(drop)
    }

    /// Returns the bucket's tags. A bucket without a tag set yields an empty map.
    pub async fn get_bucket_tags(&self, bucket: &str) -> Result<Tags, Error> {
        match self.bucket_request(Method::GET, bucket, Some(TAGGING)).await {
            Ok(body) => Ok(decode_xml::<Tagging>(&body)?.into_tags()),
            Err(err) if err.is_no_such_tag_set() => {
                debug!(bucket, "bucket has no tag set");
                Ok(Tags::new())
            },
            Err(err) => Err(err),
        }
    }

    /// Replaces the bucket's tags. Tags are sent sorted by key.
    pub async fn put_bucket_tags(&self, bucket: &str, tags: &Tags) -> Result<(), Error> {
        let url = self.inner.bucket_url(bucket, Some(TAGGING))?;
        let body = quick_xml::se::to_string(&Tagging::from_tags(tags)).map_err(|e| {
            Error::invalid_argument(format!("encode tagging document: {}", e)).with_source(e)
        })?;

        let request = SignedRequest::new(SigningService::S3, Method::PUT, url)
            .with_body(XML_CONTENT_TYPE, body)
            .with_content_md5();
        self.inner.do_signed_request(request).await.map(drop)
    }

    /// Removes all tags from the bucket.
    pub async fn delete_bucket_tags(&self, bucket: &str) -> Result<(), Error> {
        self.bucket_request(Method::DELETE, bucket, Some(TAGGING))
            .await
            .map(drop)
    }
}
