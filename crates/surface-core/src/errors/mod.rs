//! Error handling for the attack surface meter.
//! One error enum per subsystem, `thiserror` only, zero `anyhow`.

pub mod call_error;
pub mod call_graph_error;
pub mod config_error;
pub mod error_code;
pub mod load_error;
pub mod parse_error;

pub use call_error::CallError;
pub use call_graph_error::CallGraphError;
pub use config_error::ConfigError;
pub use error_code::SurfaceErrorCode;
pub use load_error::LoadError;
pub use parse_error::{ParseError, ParserKind};
