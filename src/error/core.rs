//! Main error type for the provider.

use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

use super::{ApiError, ErrorKind};

/// The primary error type for client and resource operations.
///
/// `Error` carries enough context to branch on and to report:
/// - [`kind()`](Error::kind): Categorization for `match` statements
/// - [`api_error()`](Error::api_error): The backend's `{code, message}` pair
/// - [`status()`](Error::status): HTTP status of the failed response
/// - [`is_retryable()`](Error::is_retryable): Whether the retry engine may retry
///
/// ## Error Hierarchy
///
/// ```text
/// Error
/// ├── kind: ErrorKind          (category for matching)
/// ├── message: String          (human-readable description)
/// ├── api: Option<ApiError>    (backend error code and message)
/// ├── status: Option<u16>      (HTTP status of the failed response)
/// └── source: Option           (underlying cause)
/// ```
///
/// ## Example
///
/// ```rust
/// use seaweedfs_provider::{Error, ErrorKind};
///
/// fn treat_as_gone(err: &Error) -> bool {
///     match err.kind() {
///         ErrorKind::NotFound => err.is_no_such_entity(),
///         _ => false,
///     }
/// }
/// ```
#[derive(Debug)]
pub struct Error {
    /// The error category.
    kind: ErrorKind,

    /// Human-readable error message.
    message: Cow<'static, str>,

    /// Backend error code and message, if the backend sent a response.
    api: Option<ApiError>,

    /// HTTP status of the failed response.
    status: Option<u16>,

    /// The underlying error, if any.
    source: Option<Box<dyn StdError + Send + Sync + 'static>>,
}

impl Error {
    /// Creates a new error with the given kind and message.
    ///
    /// # Example
    ///
    /// ```rust
    /// use seaweedfs_provider::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Configuration, "endpoint is required");
    /// assert_eq!(err.kind(), ErrorKind::Configuration);
    /// ```
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            api: None,
            status: None,
            source: None,
        }
    }

    /// Creates an error from a decoded backend error response.
    ///
    /// The kind is derived from the API error code.
    pub fn api(status: u16, api: ApiError) -> Self {
        Self {
            kind: api.kind(),
            message: Cow::Owned(api.message().to_owned()),
            api: Some(api),
            status: Some(status),
            source: None,
        }
    }

    /// Returns the error kind for categorization.
    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the backend's error code and message, if any.
    #[inline]
    pub fn api_error(&self) -> Option<&ApiError> {
        self.api.as_ref()
    }

    /// Returns the backend error code, if any.
    #[inline]
    pub fn code(&self) -> Option<&str> {
        self.api.as_ref().map(ApiError::code)
    }

    /// Returns the HTTP status of the failed response, if any.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Sets the source error for this error.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    fn has_code(&self, codes: &[&str]) -> bool {
        self.code().is_some_and(|code| codes.contains(&code))
    }

    /// IAM user, access key or policy is absent (`NoSuchEntity`).
    pub fn is_no_such_entity(&self) -> bool {
        self.has_code(&["NoSuchEntity"])
    }

    /// IAM entity already exists (`EntityAlreadyExists`).
    pub fn is_entity_already_exists(&self) -> bool {
        self.has_code(&["EntityAlreadyExists"])
    }

    /// Bucket already exists, owned by the caller or not.
    pub fn is_bucket_already_exists(&self) -> bool {
        self.has_code(&["BucketAlreadyOwnedByYou", "BucketAlreadyExists"])
    }

    /// Bucket is absent.
    ///
    /// `NotFound`, `NoSuchKey` and `NoSuchEntity` also count. A bodiless 404
    /// (every HEAD response) arrives as `HTTP404`.
    pub fn is_no_such_bucket(&self) -> bool {
        self.has_code(&["NoSuchBucket", "NotFound", "NoSuchKey", "NoSuchEntity", "HTTP404"])
    }

    /// Bucket has no tag set (`NoSuchTagSet`).
    pub fn is_no_such_tag_set(&self) -> bool {
        self.has_code(&["NoSuchTagSet"])
    }

    /// Transient backend failure: `ServiceFailure`, HTTP 500 or HTTP 503.
    pub fn is_service_failure(&self) -> bool {
        self.has_code(&["ServiceFailure", "HTTP500", "HTTP503"])
    }

    /// Returns `true` if the retry engine may retry this error.
    ///
    /// Only `NoSuchEntity` (eventual consistency after a create) and service
    /// failures qualify. `EntityAlreadyExists` signals idempotent success and
    /// is never retried.
    pub fn is_retryable(&self) -> bool {
        self.is_no_such_entity() || self.is_service_failure()
    }

    // Convenience constructors for common error types

    /// Creates a configuration error.
    pub fn configuration(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Creates an invalid argument error.
    pub fn invalid_argument(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Creates a transport error.
    pub fn transport(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Transport, message)
    }

    /// Creates a timeout error.
    pub fn timeout(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Timeout, message)
    }

    /// Creates a cancelled error.
    pub fn cancelled() -> Self {
        Self::new(ErrorKind::Cancelled, "operation cancelled")
    }

    /// Creates an invalid response error.
    pub fn invalid_response(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InvalidResponse, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.api {
            Some(ref api) => write!(f, "{}", api),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// Implement From for common error types

impl From<ApiError> for Error {
    fn from(api: ApiError) -> Self {
        let mut err = Self::new(api.kind(), api.message().to_owned());
        err.api = Some(api);
        err
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::configuration(format!("invalid URL: {}", err)).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::invalid_response(format!("JSON error: {}", err)).with_source(err)
    }
}

impl From<quick_xml::DeError> for Error {
    fn from(err: quick_xml::DeError) -> Self {
        Error::invalid_response(format!("decode xml response: {}", err)).with_source(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::timeout(format!("request timed out: {}", err)).with_source(err)
        } else if err.is_decode() || err.is_body() {
            Error::invalid_response(format!("read response body: {}", err)).with_source(err)
        } else {
            Error::transport(format!("request failed: {}", err)).with_source(err)
        }
    }
}
