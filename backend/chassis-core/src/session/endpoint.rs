use crate::error::session::SessionError;
use crate::{AUTH_SESSION_PATH, DEFAULT_SCHEME, IXOS_API_PATH, LICENSING_API_PATH};

use url::Url;

/// Where a chassis lives and how relative targets map onto its APIs.
///
/// A bare host (`10.0.0.5`, `chassis.lab`) is reached over HTTPS. An address
/// that already has a scheme is used verbatim as the origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChassisEndpoint {
    origin: String,
}

impl ChassisEndpoint {
    pub fn new(address: &str) -> Result<Self, SessionError> {
        let address = address.trim().trim_end_matches('/');

        let origin = if is_absolute(address) {
            address.to_string()
        } else {
            format!("{DEFAULT_SCHEME}{address}")
        };

        // Reject garbage early instead of on the first request.
        Url::parse(&origin)?;

        Ok(Self { origin })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn ixos_root(&self) -> String {
        format!("{}{IXOS_API_PATH}", self.origin)
    }

    pub fn auth_url(&self) -> Result<Url, SessionError> {
        Ok(Url::parse(&format!("{}{AUTH_SESSION_PATH}", self.origin))?)
    }

    pub fn licensing_url(&self, path: &str) -> Result<Url, SessionError> {
        Ok(Url::parse(&format!(
            "{}{LICENSING_API_PATH}{}",
            self.origin,
            with_leading_slash(path)
        ))?)
    }

    /// Absolute targets pass through; anything else hangs off the IxOS API root.
    pub fn resolve(&self, target: &str) -> Result<Url, SessionError> {
        if is_absolute(target) {
            return Ok(Url::parse(target)?);
        }

        Ok(Url::parse(&format!(
            "{}{}",
            self.ixos_root(),
            with_leading_slash(target)
        ))?)
    }

    pub fn is_auth_url(url: &Url) -> bool {
        url.path().trim_end_matches('/').ends_with(AUTH_SESSION_PATH)
    }
}

fn is_absolute(target: &str) -> bool {
    target.starts_with("http://") || target.starts_with("https://")
}

fn with_leading_slash(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}
