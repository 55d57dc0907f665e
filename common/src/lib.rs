//! Shared building blocks for the chassis workspace.
//!
//! Nothing in here knows about HTTP clients or SSH. The types are small,
//! dependency-light values that every other crate passes around:
//!
//! - [`ErrorLocation`]: where an error was constructed, captured via `#[track_caller]`
//! - [`HttpStatusCode`]: status classification used by the error taxonomy
//! - [`RedactedSecret`]: API keys and passwords that never leak into logs
//!
//! ## Architecture
//!
//! - **common** (this crate): Leaf value types
//! - **chassis-core**: Session, async polling, shell bridge
//! - **chassis-cli**: Command-line wiring, logging and profile config

pub mod error;
pub mod http_status;
pub mod redacted_secret;

#[cfg(test)]
mod tests;

pub use error::error_location::ErrorLocation;
pub use error::redact_error::RedactError;
pub use http_status::HttpStatusCode;
pub use redacted_secret::{RedactedSecret, SecretKind};
