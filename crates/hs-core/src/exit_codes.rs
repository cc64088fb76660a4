//! Exit codes for the hall-scout CLI.
//!
//! Exit code ranges:
//! - 0-2: Operational outcomes (parse outcome from code, not output)
//! - 10-19: User/environment errors (recoverable by user action)
//! - 20-29: Internal errors

/// Exit codes for hall-scout operations.
///
/// These codes are a stable contract for automation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    // ========================================================================
    // Operational Outcomes (0-2)
    // ========================================================================
    /// Every source produced records.
    Clean = 0,

    /// Some sources failed; the analysis ran on the rest.
    PartialSources = 1,

    /// No usable record survived normalization.
    NoData = 2,

    // ========================================================================
    // User / Environment Errors (10-19)
    // ========================================================================
    /// Invalid arguments
    ArgsError = 10,

    /// Spec table missing, unreadable, or invalid
    ConfigError = 11,

    // ========================================================================
    // Internal Errors (20-29)
    // ========================================================================
    /// Internal error (bug - please report)
    InternalError = 20,

    /// I/O error
    IoError = 21,
}

impl ExitCode {
    /// Convert to i32 for process exit.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Codes where a report was produced.
    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Clean | ExitCode::PartialSources)
    }

    /// Check if this exit code indicates operational outcome (codes 0-2).
    pub fn is_operational(self) -> bool {
        (self as i32) < 10
    }

    /// Check if this exit code is a user/environment error (codes 10-19).
    pub fn is_user_error(self) -> bool {
        let code = self as i32;
        (10..20).contains(&code)
    }

    /// Check if this exit code is an internal error (codes 20-29).
    pub fn is_internal_error(self) -> bool {
        (self as i32) >= 20
    }

    /// Get the code name as a string constant (for JSON output).
    pub fn code_name(&self) -> &'static str {
        match self {
            ExitCode::Clean => "OK_CLEAN",
            ExitCode::PartialSources => "OK_PARTIAL_SOURCES",
            ExitCode::NoData => "ERR_NO_DATA",
            ExitCode::ArgsError => "ERR_ARGS",
            ExitCode::ConfigError => "ERR_CONFIG",
            ExitCode::InternalError => "ERR_INTERNAL",
            ExitCode::IoError => "ERR_IO",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as i32
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.code_name(), self.as_i32())
    }
}

impl From<&hs_common::Error> for ExitCode {
    fn from(err: &hs_common::Error) -> Self {
        use hs_common::Error;
        match err {
            Error::InvalidArgs(_) | Error::EmptyManifest => ExitCode::ArgsError,
            Error::Config(_) | Error::InvalidSpecTable(_) => ExitCode::ConfigError,
            Error::EmptyBatch => ExitCode::NoData,
            Error::Source { .. } => ExitCode::PartialSources,
            Error::Io(_) | Error::Export(_) => ExitCode::IoError,
            Error::Json(_) => ExitCode::InternalError,
        }
    }
}
