pub mod async_op;
pub mod error;
pub mod licensing;
pub mod session;
pub mod shell;
pub mod translator;
pub mod transport;

#[cfg(test)]
mod tests;

pub use async_op::{AsyncOperationDescriptor, AsyncOperationPoller, AsyncOutcome, AsyncState};
pub use error::CoreError;
pub use error::session::SessionError;
pub use error::shell::ShellError;
pub use licensing::{ActivationCodeQuantity, Licensing};
pub use session::{ChassisRequest, Reply, Session, SessionConfig};
pub use shell::{LicenseCheckOperation, ShellBridge, ShellConfig};
pub use transport::Response;

pub use tokio_util::sync::CancellationToken;

pub const DEFAULT_SCHEME: &str = "https://";
pub const IXOS_API_PATH: &str = "/chassis/api/v2/ixos";
pub const AUTH_SESSION_PATH: &str = "/platform/api/v1/auth/session";
pub const LICENSING_API_PATH: &str = "/platform/api/v2/licensing";
pub const LICENSING_SERVERS_PATH: &str = const_format::concatcp!(LICENSING_API_PATH, "/servers");

pub const API_KEY_HEADER: &str = "x-api-key";
pub const JSON_CONTENT_TYPE: &str = "application/json";
