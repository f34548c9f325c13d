//! # Bridge Operations
//!
//! The operations that carry native reports into the managed notifier:
//!
//! - [`Bridge::notify`] / [`Bridge::deliver`]: an error with its stack trace
//! - [`Bridge::set_user`]: the user attached to later reports
//! - [`Bridge::leave_breadcrumb`]: a breadcrumb on the managed timeline
//!
//! Each operation resolves what it needs through a [`Resolver`], encodes its
//! arguments, invokes the managed entry point and returns. Every temporary
//! reference is a [`LocalRef`](crate::boundary::LocalRef), so all of them are
//! released on every path, including when a lookup fails half way.
//!
//! The plain methods never fail from the caller's point of view: an abandoned
//! operation is logged with `warn!` and dropped. The `try_*` variants return
//! the reason instead.
//!
//! ## Example
//!
//! ```rust
//! use crashbridge_core::boundary::RecordingBoundary;
//! use crashbridge_core::bridge::Bridge;
//! use crashbridge_core::types::{Severity, StackFrame};
//! use crashbridge_core::unwind::CapturedStack;
//!
//! let boundary = RecordingBoundary::with_notifier_schema();
//! let stack = CapturedStack::new(vec![StackFrame::at(0x1A2B_u64)]);
//!
//! Bridge::new(&boundary, &stack).notify(b"SIGSEGV", b"Segmentation violation", Severity::Error);
//!
//! let methods: Vec<_> = boundary.invocations().into_iter().map(|call| call.method).collect();
//! assert_eq!(methods, ["setBinaryArch", "notify"]);
//! assert_eq!(boundary.outstanding_handles(), 0);
//! ```

mod arch;
mod breadcrumb;
mod notify;
mod user;

use crate::boundary::Boundary;
use crate::config::BridgeConfig;
use crate::resolver::Resolver;
use crate::unwind::Unwinder;

/// Bridge operations bound to one boundary handle.
///
/// Cheap to build; the bridge context builds one per call.
#[derive(Clone, Copy)]
pub struct Bridge<'b>
{
    resolver: Resolver<'b>,
    unwinder: &'b dyn Unwinder,
    config: BridgeConfig,
}

impl<'b> Bridge<'b>
{
    /// Bridge over `boundary`, capturing stacks with `unwinder`, default config.
    pub fn new(boundary: &'b dyn Boundary, unwinder: &'b dyn Unwinder) -> Self
    {
        Self {
            resolver: Resolver::new(boundary),
            unwinder,
            config: BridgeConfig::default(),
        }
    }

    /// Replace the configuration.
    #[must_use]
    pub fn with_config(mut self, config: BridgeConfig) -> Self
    {
        self.config = config;
        self
    }

    pub fn config(&self) -> &BridgeConfig
    {
        &self.config
    }

    pub fn resolver(&self) -> &Resolver<'b>
    {
        &self.resolver
    }
}
