//! API error codes returned by the SeaweedFS IAM and S3 endpoints.

use std::hash::{Hash, Hasher};

use serde::Deserialize;

use super::ErrorKind;

/// A `{code, message}` pair decoded from an error response.
///
/// Identity is the code: two `ApiError`s with the same code compare equal
/// regardless of their messages.
///
/// ```rust
/// use seaweedfs_provider::error::ApiError;
///
/// let a = ApiError::new("NoSuchEntity", "user alice not found");
/// let b = ApiError::new("NoSuchEntity", "user bob not found");
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: String,
    message: String,
}

impl ApiError {
    /// Creates an API error from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Creates the synthetic `HTTP<status>` error used when a response body
    /// carries no recognizable code.
    pub fn from_status(status: u16, body: &str) -> Self {
        Self::new(format!("HTTP{}", status), body.trim())
    }

    /// Decodes an error response body.
    ///
    /// Both `<ErrorResponse><Error><Code>..` (IAM) and bare
    /// `<Error><Code>..` (S3) envelopes are accepted. A missing code becomes
    /// `HTTP<status>`, a missing message becomes the trimmed raw body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let raw = String::from_utf8_lossy(body);
        let trimmed = raw.trim();

        if let Ok(envelope) = quick_xml::de::from_str::<ErrorEnvelope>(trimmed) {
            let code = first_non_empty(envelope.error.code, envelope.code);
            let message = first_non_empty(envelope.error.message, envelope.message);

            if !code.is_empty() || !message.is_empty() {
                return Self {
                    code: if code.is_empty() {
                        format!("HTTP{}", status)
                    } else {
                        code
                    },
                    message: if message.is_empty() {
                        trimmed.to_owned()
                    } else {
                        message
                    },
                };
            }
        }

        Self::from_status(status, trimmed)
    }

    /// Returns the error code, e.g. `NoSuchEntity` or `HTTP500`.
    #[inline]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the human-readable message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the kind this code classifies as.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::from_api_code(&self.code)
    }
}

impl PartialEq for ApiError {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code
    }
}

impl Eq for ApiError {}

impl Hash for ApiError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.code.hash(state);
    }
}

/// Error envelope covering both nesting styles.
///
/// The root element name is not checked, so the same type decodes
/// `<ErrorResponse>` and a bare `<Error>` root.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorEnvelope {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
    #[serde(rename = "Error")]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Message")]
    message: String,
}

fn first_non_empty(preferred: String, fallback: String) -> String {
    let preferred = preferred.trim();
    if preferred.is_empty() {
        fallback.trim().to_owned()
    } else {
        preferred.to_owned()
    }
}
