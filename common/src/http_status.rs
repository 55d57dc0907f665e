//! HTTP status code classification for the chassis REST API.

/// HTTP status code as returned by the chassis.
///
/// Stored directly rather than parsed from error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HttpStatusCode(pub u16);

impl HttpStatusCode {
    pub const ACCEPTED: HttpStatusCode = HttpStatusCode(202);
    pub const UNAUTHORIZED: HttpStatusCode = HttpStatusCode(401);

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// 2xx responses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.0)
    }

    /// 202: the chassis started an asynchronous operation.
    pub fn is_accepted(&self) -> bool {
        *self == Self::ACCEPTED
    }

    /// 4xx client errors. These become typed errors, never replies.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.0)
    }

    /// 5xx server errors. Returned to the caller as ordinary responses.
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.0)
    }

    pub fn is_unauthorized(&self) -> bool {
        *self == Self::UNAUTHORIZED
    }
}

impl From<u16> for HttpStatusCode {
    fn from(code: u16) -> Self {
        HttpStatusCode(code)
    }
}

impl std::fmt::Display for HttpStatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
