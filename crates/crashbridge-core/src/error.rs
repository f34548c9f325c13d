//! # Error Types
//!
//! General error handling for the bridge.
//!
//! We use `thiserror` to automatically generate `Error` trait implementations
//! and nice error messages.
//!
//! None of these errors ever reach the native caller of `notify`,
//! `set_user` or `leave_breadcrumb`: the bridge logs them and drops the
//! operation. They exist so that each internal step can use `?` and so that
//! Rust callers (and tests) can ask *why* an operation was abandoned through
//! the `try_*` entry points.

use std::fmt;

use thiserror::Error;

/// Kind of managed-side symbol that a lookup was trying to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind
{
    /// A class, looked up by its fully-qualified binary name.
    Class,
    /// A static or instance method, looked up by name and signature.
    Method,
    /// A static field, looked up by name and type descriptor.
    Field,
    /// The current value of a static enum constant.
    Constant,
}

impl fmt::Display for SymbolKind
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            SymbolKind::Class => write!(f, "class"),
            SymbolKind::Method => write!(f, "method"),
            SymbolKind::Field => write!(f, "field"),
            SymbolKind::Constant => write!(f, "constant"),
        }
    }
}

/// Main error type for bridge operations
///
/// ## Error Categories
///
/// 1. **Lifecycle errors**: Uninitialized
/// 2. **Lookup errors**: ResolutionFailed
/// 3. **Resource errors**: AllocationFailed, FrameMarshalFailed
/// 4. **Managed-side errors**: InvocationFailed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError
{
    /// A context-bound operation ran on a thread that never called `initialize`
    ///
    /// The boundary handle is bound to the thread that captured it, so every
    /// thread that reports through the context needs its own initialization.
    #[error("Cannot {0} before initializing the bridge on this thread")]
    Uninitialized(&'static str),

    /// A class, method, field or enum constant could not be found
    ///
    /// Any fault the lookup left pending in the boundary has already been
    /// cleared by the time this error is produced.
    #[error("Failed to resolve {kind} `{name}`")]
    ResolutionFailed
    {
        /// What kind of symbol was being resolved
        kind: SymbolKind,
        /// Name of the symbol (including the owning class where relevant)
        name: String,
    },

    /// The boundary could not allocate a string, array or object
    #[error("Allocation failed: {0}")]
    AllocationFailed(String),

    /// One frame of a stack trace could not be converted
    ///
    /// The marshaler logs this and leaves the slot empty; it never aborts the
    /// whole trace.
    #[error("Failed to marshal frame {index}: {reason}")]
    FrameMarshalFailed
    {
        /// Position of the frame in the captured trace
        index: usize,
        /// Underlying failure
        reason: String,
    },

    /// The managed entry point raised a fault while handling the call
    #[error("Managed call `{0}` raised a fault")]
    InvocationFailed(String),
}

impl BridgeError
{
    /// Build a [`BridgeError::ResolutionFailed`] for the given symbol.
    pub fn resolution(kind: SymbolKind, name: impl Into<String>) -> Self
    {
        BridgeError::ResolutionFailed { kind, name: name.into() }
    }
}

/// Convenience type alias for `Result<T, BridgeError>`
///
/// ```rust
/// use crashbridge_core::error::BridgeResult;
/// fn foo() -> BridgeResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
