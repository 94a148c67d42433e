//! Error kind enumeration for categorizing provider errors.

/// Categorization of client and provider errors.
///
/// This enum provides a stable interface for matching on error types, enabling
/// callers to tell "the resource is gone" apart from "the request failed".
///
/// ## Retryable vs Non-Retryable
///
/// | ErrorKind         | Retryable | Typical cause                              |
/// |-------------------|-----------|--------------------------------------------|
/// | `NotFound`        | Partly*   | Entity, bucket, key or tag set is absent   |
/// | `AlreadyExists`   | No        | Entity or bucket already exists            |
/// | `ServiceFailure`  | Yes       | `ServiceFailure`, HTTP 500 or HTTP 503     |
/// | `Http`            | No        | Any other API error response               |
/// | `Transport`       | No        | DNS, TLS, connection reset                 |
/// | `Timeout`         | No        | Request or deadline exceeded               |
/// | `Cancelled`       | No        | Caller cancelled the operation             |
/// | `InvalidResponse` | No        | Response body could not be decoded         |
/// | `Configuration`   | No        | Missing endpoint or credentials            |
/// | `InvalidArgument` | No        | Bad import ID, unsupported update          |
///
/// *Only the IAM `NoSuchEntity` code is retried, to absorb the eventual
/// consistency window right after a create. See
/// [`Error::is_retryable`](crate::Error::is_retryable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The requested entity, bucket, access key or tag set does not exist.
    #[error("not found")]
    NotFound,

    /// The entity or bucket already exists.
    ///
    /// Callers treat this as an idempotent-success signal where it makes sense
    /// (adopting an existing bucket), never as a transient failure.
    #[error("already exists")]
    AlreadyExists,

    /// The backend reported a transient failure.
    #[error("service failure")]
    ServiceFailure,

    /// Any other error response from the backend.
    #[error("http error")]
    Http,

    /// The request never produced a response (DNS, TLS, connection errors).
    #[error("transport error")]
    Transport,

    /// The request or the caller's deadline timed out.
    #[error("timeout")]
    Timeout,

    /// The operation was cancelled by the caller.
    #[error("cancelled")]
    Cancelled,

    /// The response body could not be decoded.
    #[error("invalid response")]
    InvalidResponse,

    /// Client or provider configuration is invalid.
    #[error("configuration error")]
    Configuration,

    /// A caller-supplied argument is invalid.
    #[error("invalid argument")]
    InvalidArgument,
}

impl ErrorKind {
    /// Classifies an API error code.
    ///
    /// The synthetic `HTTP<status>` codes produced when an error body carries
    /// no code of its own are classified here as well.
    pub fn from_api_code(code: &str) -> Self {
        match code {
            "NoSuchEntity" | "NoSuchBucket" | "NotFound" | "NoSuchKey" | "NoSuchTagSet"
            | "HTTP404" => ErrorKind::NotFound,
            "EntityAlreadyExists" | "BucketAlreadyExists" | "BucketAlreadyOwnedByYou" => {
                ErrorKind::AlreadyExists
            }
            "ServiceFailure" | "HTTP500" | "HTTP503" => ErrorKind::ServiceFailure,
            _ => ErrorKind::Http,
        }
    }

    /// Returns `true` for the kinds a response from the backend can carry.
    #[inline]
    pub fn is_api(&self) -> bool {
        matches!(
            self,
            ErrorKind::NotFound
                | ErrorKind::AlreadyExists
                | ErrorKind::ServiceFailure
                | ErrorKind::Http
        )
    }
}
