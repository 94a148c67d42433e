//! AWS Signature Version 4 request signing.
//!
//! Every IAM and S3 request is signed with the provider's static credentials.
//! The signed header set is `host`, `x-amz-date` and `x-amz-content-sha256`,
//! plus any caller-supplied headers such as `content-type` and `content-md5`.
//! Path segments are signed as they appear on the wire (no second escaping
//! pass), matching the S3 dialect SeaweedFS verifies against.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

use super::Credentials;
use crate::Error;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// SHA-256 of the empty payload.
pub const EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

static HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Service names used in the credential scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningService {
    /// The IAM query API.
    Iam,
    /// The S3 REST API.
    S3,
}

impl SigningService {
    /// Returns the service name as it appears in the credential scope.
    pub fn as_str(self) -> &'static str {
        match self {
            SigningService::Iam => "iam",
            SigningService::S3 => "s3",
        }
    }
}

/// Signs requests with SigV4 for a fixed region and credential pair.
#[derive(Debug, Clone)]
pub struct SigV4Signer {
    credentials: Credentials,
    region: String,
}

impl SigV4Signer {
    /// Creates a signer for the given credentials and region.
    pub fn new(credentials: Credentials, region: impl Into<String>) -> Self {
        Self {
            credentials,
            region: region.into(),
        }
    }

    /// Returns the signing region.
    pub fn region(&self) -> &str {
        &self.region
    }

    /// Returns the access key ID used in the credential scope.
    pub fn access_key(&self) -> &str {
        self.credentials.access_key()
    }

    /// Signs a request in place.
    ///
    /// `headers` must use lowercase names. The signer adds `host`,
    /// `x-amz-date`, `x-amz-content-sha256` and finally `authorization`.
    /// Every header present in the map at signing time is signed.
    pub fn sign(
        &self,
        service: SigningService,
        method: &str,
        url: &Url,
        headers: &mut BTreeMap<String, String>,
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        headers.insert("host".to_owned(), host_header(url));
        headers.insert("x-amz-date".to_owned(), amz_date(now));
        headers.insert("x-amz-content-sha256".to_owned(), payload_hash.to_owned());
        headers.remove("authorization");

        let authorization = self.authorization(service, method, url, headers, payload_hash, now)?;
        headers.insert("authorization".to_owned(), authorization);
        Ok(())
    }

    /// Builds the `Authorization` header value over the given headers.
    fn authorization(
        &self,
        service: SigningService,
        method: &str,
        url: &Url,
        headers: &BTreeMap<String, String>,
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> Result<String, Error> {
        let date_stamp = now.format("%Y%m%d").to_string();
        let scope = format!(
            "{}/{}/{}/aws4_request",
            date_stamp,
            self.region,
            service.as_str()
        );

        let canonical = canonical_request(method, url, headers, payload_hash);
        let string_to_sign = format!(
            "{}\n{}\n{}\n{}",
            ALGORITHM,
            amz_date(now),
            scope,
            hex::encode(Sha256::digest(canonical.as_bytes()))
        );

        let signing_key = self.signing_key(&date_stamp, service)?;
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes())?);

        Ok(format!(
            "{} Credential={}/{}, SignedHeaders={}, Signature={}",
            ALGORITHM,
            self.credentials.access_key(),
            scope,
            signed_headers(headers),
            signature
        ))
    }

    fn signing_key(&self, date_stamp: &str, service: SigningService) -> Result<[u8; 32], Error> {
        let secret = format!("AWS4{}", self.credentials.secret_key());
        let k_date = hmac_sha256(secret.as_bytes(), date_stamp.as_bytes())?;
        let k_region = hmac_sha256(&k_date, self.region.as_bytes())?;
        let k_service = hmac_sha256(&k_region, service.as_str().as_bytes())?;
        hmac_sha256(&k_service, b"aws4_request")
    }
}

/// Returns the lowercase hex SHA-256 of a payload.
pub fn hash_payload(payload: &[u8]) -> String {
    if payload.is_empty() {
        return EMPTY_PAYLOAD_SHA256.to_owned();
    }
    hex::encode(Sha256::digest(payload))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Result<[u8; 32], Error> {
    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| Error::configuration(format!("invalid signing key: {}", e)))?;
    mac.update(data);
    let digest = mac.finalize().into_bytes();
    let mut output = [0u8; 32];
    output.copy_from_slice(&digest);
    Ok(output)
}

fn amz_date(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Host header value: host plus port when the port is not the scheme default.
fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_owned(),
    }
}

fn canonical_request(
    method: &str,
    url: &Url,
    headers: &BTreeMap<String, String>,
    payload_hash: &str,
) -> String {
    let path = match url.path() {
        "" => "/",
        path => path,
    };

    let mut canonical_headers = String::new();
    for (name, value) in headers {
        canonical_headers.push_str(name);
        canonical_headers.push(':');
        canonical_headers.push_str(value.trim());
        canonical_headers.push('\n');
    }

    format!(
        "{}\n{}\n{}\n{}\n{}\n{}",
        method,
        path,
        canonical_query(url),
        canonical_headers,
        signed_headers(headers),
        payload_hash
    )
}

/// Sorted, URI-encoded query string. A bare `?tagging` becomes `tagging=`.
fn canonical_query(url: &Url) -> String {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (uri_encode(&k), uri_encode(&v)))
        .collect();
    params.sort();

    params
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

fn signed_headers(headers: &BTreeMap<String, String>) -> String {
    headers
        .keys()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(";")
}

/// RFC 3986 encoding: everything except unreserved characters is escaped.
fn uri_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char);
            },
            _ => {
                encoded.push('%');
                encoded.push(HEX_UPPER[(byte >> 4) as usize] as char);
                encoded.push(HEX_UPPER[(byte & 0x0f) as usize] as char);
            },
        }
    }
    encoded
}
