use crate::ErrorLocation;
use crate::redacted_secret::SecretKind;

use thiserror::Error as ThisError;

/// Raised when a [`crate::RedactedSecret`] is asked to leave the process
/// through a serializer.
#[derive(Debug, ThisError)]
pub enum RedactError {
    #[error("Refused to serialize {kind}; send it with expose() instead {location}")]
    SerializationRefused {
        kind: SecretKind,
        location: ErrorLocation,
    },
}

impl RedactError {
    #[track_caller]
    pub fn refused(kind: SecretKind) -> Self {
        RedactError::SerializationRefused {
            kind,
            location: ErrorLocation::here(),
        }
    }

    pub fn kind(&self) -> SecretKind {
        match self {
            RedactError::SerializationRefused { kind, .. } => *kind,
        }
    }
}
