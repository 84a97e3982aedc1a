//! Error types for the Galaxy3D wave effect
//!
//! This module defines the error type shared by the render graph, the
//! parameter stack and the effect lifecycle, together with the
//! `engine_err!` / `engine_bail!` macros that log an error at the point
//! where it is raised.

use std::fmt;

/// Result type for Galaxy3D operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D errors
///
/// Three families share this enum:
/// - configuration errors (`BackendError`, `OutOfMemory`, `InvalidResource`,
///   `InitializationFailed`): the frame degrades, the effect is skipped
/// - graph-contract violations (`ResourceNotReady`, `DuplicateWrite`,
///   `UndeclaredResourceAccess`): fail fast
/// - lifecycle violations (`UseAfterDispose`): fail fast
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error (GPU API, device lost, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, shader, handle, uniform, etc.)
    InvalidResource(String),

    /// Initialization failed (missing shader, material creation, etc.)
    InitializationFailed(String),

    /// A texture handle was resolved outside of the execution phase, or a
    /// pass is scheduled to read a texture before the pass that writes it
    ResourceNotReady(String),

    /// Two write declarations target the same attachment slot of one pass
    DuplicateWrite(String),

    /// A recording callback touched a texture its pass never declared
    UndeclaredResourceAccess(String),

    /// A disposed resource was used or disposed again
    UseAfterDispose(String),
}

impl Error {
    /// Returns true for programming errors (graph-contract and lifecycle
    /// violations). These must propagate; everything else may degrade to
    /// skipping the effect for the current frame.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            Error::ResourceNotReady(_)
                | Error::DuplicateWrite(_)
                | Error::UndeclaredResourceAccess(_)
                | Error::UseAfterDispose(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::ResourceNotReady(msg) => write!(f, "Resource not ready: {}", msg),
            Error::DuplicateWrite(msg) => write!(f, "Duplicate write: {}", msg),
            Error::UndeclaredResourceAccess(msg) => write!(f, "Undeclared resource access: {}", msg),
            Error::UseAfterDispose(msg) => write!(f, "Use after dispose: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an error and log it at ERROR severity
///
/// Without a variant the error is a `BackendError`. A variant name followed
/// by `;` selects another message-carrying variant.
///
/// # Example
///
/// ```ignore
/// let err = engine_err!("galaxy3d::RenderGraph", "pass '{}' has no render function", name);
/// let err = engine_err!(DuplicateWrite; "galaxy3d::RenderGraph", "slot {} written twice", 0);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($variant:ident; $source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::$variant(message)
    }};
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::galaxy3d::Error::BackendError(message)
    }};
}

/// Log an error and return it from the current function
///
/// Accepts the same forms as `engine_err!`.
#[macro_export]
macro_rules! engine_bail {
    ($($arg:tt)*) => {
        return Err($crate::engine_err!($($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
