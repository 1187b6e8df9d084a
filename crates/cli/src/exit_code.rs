//! Exit code definitions for the taskview CLI
//!
//! Scripts wrapping a task run rely on these values; changing one is a
//! breaking change.

/// Exit codes for the taskview CLI application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Rendered successfully, no host failed
    Success = 0,

    /// General/unspecified error
    GeneralError = 1,

    /// User input error: invalid arguments, unknown attribute, bad config
    UsageError = 2,

    /// Input could not be read or parsed
    IoError = 3,

    /// Rendered successfully, but at least one host failed
    HostsFailed = 4,

    /// Operation was interrupted (e.g., Ctrl+C)
    Interrupted = 130,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::IoError),
            4 => Some(Self::HostsFailed),
            130 => Some(Self::Interrupted),
            _ => None,
        }
    }

    /// Success or HostsFailed depending on the rendered result
    pub const fn for_run(failed: bool) -> Self {
        if failed {
            Self::HostsFailed
        } else {
            Self::Success
        }
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Operation completed successfully",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments or configuration",
            Self::IoError => "Input could not be read",
            Self::HostsFailed => "One or more hosts failed",
            Self::Interrupted => "Operation interrupted",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
