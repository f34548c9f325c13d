//! # crashbridge-core
//!
//! Native-to-managed crash reporting bridge for Android.
//!
//! This crate forwards errors, user details and breadcrumbs captured in native
//! code into the managed notifier running in the JVM, and provides a
//! filesystem heuristic for rooted devices:
//!
//! - [`root`]: the root heuristic scanner
//! - [`resolver`] / [`encoder`] / [`marshal`]: fault-safe lookups, byte-array
//!   encoding and stack frame conversion
//! - [`bridge`]: the `notify`, `set_user` and `leave_breadcrumb` operations
//! - [`context`]: the per-thread boundary handle used by the C exports
//! - [`platform`] / [`ffi`]: the JNI boundary and the exported symbols
//!
//! ## Resource discipline
//!
//! Every managed reference an operation creates is owned by a
//! [`LocalRef`](boundary::LocalRef) and released exactly once, whichever step
//! fails. Every fault a boundary call leaves pending is cleared before the
//! next call. A failed operation is logged and dropped; it never reaches the
//! native caller as an error.
//!
//! ## Why unsafe code is needed
//!
//! Talking to the JVM means calling through the raw JNI function table, and
//! the root scanner calls `lstat` directly so it can run without allocating.
//! Both are wrapped in safe APIs; only the exported C symbols are `unsafe`
//! to call.

#![allow(unsafe_code)] // Required for JNI and libc calls

pub mod boundary;
pub mod bridge;
pub mod config;
pub mod context;
pub mod encoder;
pub mod error;
pub mod ffi;
pub mod marshal;
pub mod platform;
pub mod prelude;
pub mod resolver;
pub mod root;
pub mod symbols;
pub mod types;
pub mod unwind;

pub use bridge::Bridge;
pub use config::BridgeConfig;
// Re-export commonly used types
pub use error::{BridgeError, BridgeResult};
pub use root::is_rooted;
pub use types::{BreadcrumbType, Severity, StackFrame, UserIdentity};
