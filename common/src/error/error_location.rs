use serde::Serialize;

use std::fmt::{Display, Formatter, Result as FormatResult};
use std::panic::Location;

/// Where in the workspace an error was built.
///
/// Every error variant in the chassis crates carries one, so a failure
/// reported by the CLI points straight at the constructor that raised it.
/// Constructors are `#[track_caller]`, which makes [`ErrorLocation::here`]
/// resolve to the caller of the constructor rather than the constructor body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorLocation {
    pub file: &'static str,
    pub line: u32,
    pub column: u32,
}

impl ErrorLocation {
    /// Location of the (tracked) caller.
    #[track_caller]
    pub fn here() -> Self {
        Self::from(Location::caller())
    }

    /// Last path component of `file`, for compact log lines.
    pub fn file_name(&self) -> &'static str {
        self.file.rsplit(['/', '\\']).next().unwrap_or(self.file)
    }
}

impl From<&'static Location<'static>> for ErrorLocation {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            column: location.column(),
        }
    }
}

impl Display for ErrorLocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FormatResult {
        write!(formatter, "[{}:{}:{}]", self.file, self.line, self.column)
    }
}
