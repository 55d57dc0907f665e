//! Secret values (API keys, passwords) with redacted Debug/Display output.

use crate::RedactError;

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

/// Which credential a [`RedactedSecret`] holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretKind {
    /// The `x-api-key` token handed out by the chassis.
    ApiKey,
    /// A login password (REST session or SSH shell).
    Password,
}

impl fmt::Display for SecretKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SecretKind::ApiKey => write!(f, "API key"),
            SecretKind::Password => write!(f, "password"),
        }
    }
}

/// A credential that never exposes its value in logs or debug output.
///
/// Used for the `x-api-key` token and for the login password kept around so
/// a session can re-authenticate.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedSecret {
    kind: SecretKind,
    inner: String,
}

impl RedactedSecret {
    pub fn api_key(value: impl Into<String>) -> Self {
        Self {
            kind: SecretKind::ApiKey,
            inner: value.into(),
        }
    }

    pub fn password(value: impl Into<String>) -> Self {
        Self {
            kind: SecretKind::Password,
            inner: value.into(),
        }
    }

    pub fn kind(&self) -> SecretKind {
        self.kind
    }

    /// The real value. Only call this when putting it on the wire.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Length of the value (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedSecret({}, [REDACTED])", self.kind)
    }
}

impl fmt::Display for RedactedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for RedactedSecret {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Refuse serialization so a secret never ends up in a JSON payload by accident.
impl serde::Serialize for RedactedSecret {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::refused(self.kind)))
    }
}
