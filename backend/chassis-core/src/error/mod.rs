pub mod config;
pub mod session;
pub mod shell;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Session(#[from] session::SessionError),

    #[error(transparent)]
    Shell(#[from] shell::ShellError),

    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
