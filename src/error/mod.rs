//! Error types for the SeaweedFS provider.
//!
//! - [`Error`]: General errors (API responses, network, decode, configuration)
//! - [`ApiError`]: The `{code, message}` pair a backend error response carries
//! - [`ErrorKind`]: Coarse categorization for `match` statements
//!
//! ## Key Invariant
//!
//! A read that fails with "not found" means the resource is gone; every other
//! error is reported with its code and message intact.
//!
//! ```rust,ignore
//! match client.get_user("alice").await {
//!     Ok(user) => Some(user),
//!     Err(e) if e.is_no_such_entity() => None,
//!     Err(e) => return Err(e),
//! }
//! ```

mod api;
mod core;
mod kind;

pub use self::core::Error;
pub use api::ApiError;
pub use kind::ErrorKind;

/// A specialized `Result` type for provider operations.
pub type Result<T> = std::result::Result<T, Error>;
