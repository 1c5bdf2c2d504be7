//! SurfaceErrorCode trait for structured error reporting.

/// Every error enum implements this to provide a stable code string that
/// external formatters can key on without matching on message text.
pub trait SurfaceErrorCode {
    /// Returns the error code string (e.g., "LOAD_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CALL_ERROR: &str = "CALL_ERROR";
pub const UNSUPPORTED_GRANULARITY: &str = "UNSUPPORTED_GRANULARITY";
pub const PARSE_ERROR: &str = "PARSE_ERROR";
pub const LOAD_ERROR: &str = "LOAD_ERROR";
pub const IO_ERROR: &str = "IO_ERROR";
pub const CALL_GRAPH_ERROR: &str = "CALL_GRAPH_ERROR";
pub const NOT_AN_ENTRY_POINT: &str = "NOT_AN_ENTRY_POINT";
pub const NOT_AN_EXIT_POINT: &str = "NOT_AN_EXIT_POINT";
pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
