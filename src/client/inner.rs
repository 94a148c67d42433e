//! Internal client implementation: signing, dispatch and decoding.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use bytes::Bytes;
use chrono::Utc;
use md5::{Digest, Md5};
use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::auth::{EMPTY_PAYLOAD_SHA256, SigV4Signer, SigningService, hash_payload};
use crate::error::{ApiError, Error};

/// IAM query API version sent with every action.
pub(crate) const IAM_API_VERSION: &str = "2010-05-08";

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

pub(crate) struct ClientInner {
    /// Endpoint with any trailing `/` removed.
    pub endpoint: String,

    /// Signs every outbound request.
    pub signer: SigV4Signer,

    /// Shared HTTP connection pool.
    pub http: reqwest::Client,

    /// Per-request timeout.
    pub timeout: Duration,
}

/// One outbound request, built per call and consumed by dispatch.
#[derive(Debug)]
pub(crate) struct SignedRequest {
    service: SigningService,
    method: Method,
    url: Url,
    content_type: Option<&'static str>,
    content_md5: Option<String>,
    body: Bytes,
    payload_hash: String,
}

impl SignedRequest {
    pub fn new(service: SigningService, method: Method, url: Url) -> Self {
        Self {
            service,
            method,
            url,
            content_type: None,
            content_md5: None,
            body: Bytes::new(),
            payload_hash: EMPTY_PAYLOAD_SHA256.to_owned(),
        }
    }

    /// Attaches a body and records its SHA-256.
    #[must_use]
    pub fn with_body(mut self, content_type: &'static str, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self.payload_hash = hash_payload(&self.body);
        self.content_type = Some(content_type);
        self
    }

    /// Adds a `Content-MD5` header over the current body.
    #[must_use]
    pub fn with_content_md5(mut self) -> Self {
        self.content_md5 = Some(BASE64.encode(Md5::digest(&self.body)));
        self
    }
}

impl ClientInner {
    /// Builds `{endpoint}/` for IAM actions.
    pub fn iam_url(&self) -> Result<Url, Error> {
        Ok(Url::parse(&format!("{}/", self.endpoint))?)
    }

    /// Builds the path-style bucket URL, optionally with a bare sub-resource
    /// query such as `tagging`.
    pub fn bucket_url(&self, bucket: &str, subresource: Option<&str>) -> Result<Url, Error> {
        if bucket.is_empty() {
            return Err(Error::invalid_argument("bucket name is required"));
        }
        if bucket.contains('/') {
            return Err(Error::invalid_argument(format!(
                "invalid bucket name {:?}",
                bucket
            )));
        }

        let raw = match subresource {
            Some(sub) => format!("{}/{}?{}", self.endpoint, bucket, sub),
            None => format!("{}/{}", self.endpoint, bucket),
        };
        Ok(Url::parse(&raw)?)
    }

    /// Signs and dispatches one request.
    ///
    /// Returns the raw body of a successful (< 400) response. A response with
    /// status >= 400 is decoded into an [`ApiError`] and returned as an
    /// [`Error`]. No retries happen here.
    pub async fn do_signed_request(&self, request: SignedRequest) -> Result<Bytes, Error> {
        let SignedRequest {
            service,
            method,
            url,
            content_type,
            content_md5,
            body,
            payload_hash,
        } = request;

        let mut headers = BTreeMap::new();
        if let Some(content_type) = content_type {
            headers.insert("content-type".to_owned(), content_type.to_owned());
        }
        if let Some(md5) = content_md5 {
            headers.insert("content-md5".to_owned(), md5);
        }
        self.signer
            .sign(service, method.as_str(), &url, &mut headers, &payload_hash, Utc::now())?;

        debug!(
            service = service.as_str(),
            method = %method,
            url = %url,
            "dispatching signed request"
        );

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .timeout(self.timeout);
        for (name, value) in &headers {
            // reqwest derives Host from the URL; the signed value is identical.
            if name != "host" {
                builder = builder.header(name.as_str(), value.as_str());
            }
        }

        let response = builder.body(body).send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;

        if status >= 400 {
            let api = ApiError::from_response(status, &bytes);
            warn!(
                service = service.as_str(),
                method = %method,
                status,
                code = api.code(),
                "SeaweedFS request failed"
            );
            return Err(Error::api(status, api));
        }

        Ok(bytes)
    }

    /// Posts one IAM action and returns the raw response body.
    async fn post_iam_action(&self, action: &str, params: &[(&str, &str)]) -> Result<Bytes, Error> {
        let body = encode_iam_form(action, params);
        let request = SignedRequest::new(SigningService::Iam, Method::POST, self.iam_url()?)
            .with_body(FORM_CONTENT_TYPE, body);
        self.do_signed_request(request).await
    }

    /// Runs an IAM action and decodes its XML response envelope.
    pub async fn do_iam_action<R>(&self, action: &str, params: &[(&str, &str)]) -> Result<R, Error>
    where
        R: DeserializeOwned,
    {
        let body = self.post_iam_action(action, params).await?;
        decode_xml(&body)
    }

    /// Runs an IAM action whose response carries nothing of interest.
    pub async fn do_iam_action_no_output(
        &self,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<(), Error> {
        self.post_iam_action(action, params).await.map(drop)
    }
}

/// Encodes the form body of an IAM action.
///
/// The serializer is not `Send`, so it must never live across an await.
fn encode_iam_form(action: &str, params: &[(&str, &str)]) -> String {
    let mut form = url::form_urlencoded::Serializer::new(String::new());
    form.append_pair("Action", action);
    form.append_pair("Version", IAM_API_VERSION);
    for (name, value) in params {
        form.append_pair(name, value);
    }
    form.finish()
}

/// Decodes an XML response body. The root element name is not checked.
pub(crate) fn decode_xml<R>(body: &[u8]) -> Result<R, Error>
where
    R: DeserializeOwned,
{
    let text = std::str::from_utf8(body).map_err(|e| {
        Error::invalid_response(format!("response body is not UTF-8: {}", e)).with_source(e)
    })?;
    Ok(quick_xml::de::from_str(text)?)
}
