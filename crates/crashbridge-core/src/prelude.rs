//! Common module for library exports

pub use crate::boundary::{Boundary, LocalRef, RecordingBoundary};
pub use crate::bridge::Bridge;
pub use crate::config::BridgeConfig;
pub use crate::context;
pub use crate::error::{BridgeError, BridgeResult, SymbolKind};
pub use crate::root::{RootEvidence, RootScanner};
pub use crate::types::{Address, Architecture, BreadcrumbType, NotificationEvent, Severity, StackFrame, UserIdentity};
pub use crate::unwind::{CapturedStack, NoopUnwinder, Unwinder};
