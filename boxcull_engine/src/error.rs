//! Error types for the boxcull engine
//!
//! One enum covers the whole crate: resource creation failures (fatal at
//! init), per-frame upload failures (the frame is skipped) and invalid
//! configuration. A query that is not ready yet is NOT an error, see
//! `QueryData::NotReady`.

use std::fmt;

/// Result type for boxcull engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Boxcull engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (D3D11, Vulkan, mock device, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (buffer, pipeline, binding group, query)
    InvalidResource(String),

    /// Initialization failed (component setup aborted)
    InitializationFailed(String),

    /// A per-frame buffer upload could not be performed
    MapFailed(String),

    /// Configuration rejected by validation
    InvalidConfig(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::MapFailed(msg) => write!(f, "Map failed: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an `Error` variant from a formatted message and log it at ERROR
/// severity with file:line information.
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("boxcull::InstancedBoxes", InvalidResource, "slot {} missing", 3);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $variant:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::boxcull::Error::$variant(message)
    }};
}

/// Log an error and return it from the enclosing function.
///
/// # Example
///
/// ```ignore
/// engine_bail!("boxcull::MockDevice", InvalidResource, "buffer '{}' has zero size", label);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $variant:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $variant, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
