//! # Bridge Context
//!
//! Implicit state for callers that cannot pass a boundary handle around,
//! typically native instrumentation calling through the C exports.
//!
//! A boundary handle is only valid on the thread that obtained it, so the
//! context keeps **one handle per thread**: [`initialize`] stores it for the
//! calling thread, and [`notify`], [`set_user`] and [`leave_breadcrumb`] use
//! the handle of the thread they run on. A thread that never initialized gets
//! a `warn!` and no boundary call at all.
//!
//! The unwinder and the [`BridgeConfig`] are process-wide and can each be
//! installed once. Without an installed configuration, the first operation
//! reads it from the environment ([`BridgeConfig::from_env`]).
//!
//! The `*_env` functions take the boundary explicitly and skip the per-thread
//! slot entirely.
//!
//! ## Example
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use crashbridge_core::boundary::RecordingBoundary;
//! use crashbridge_core::context;
//! use crashbridge_core::types::BreadcrumbType;
//!
//! let boundary = Rc::new(RecordingBoundary::with_notifier_schema());
//! context::initialize(Rc::clone(&boundary));
//!
//! context::leave_breadcrumb(b"Loaded level", BreadcrumbType::State);
//! assert_eq!(boundary.invocations().len(), 1);
//! ```

use std::cell::RefCell;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use crate::boundary::Boundary;
use crate::bridge::Bridge;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::types::{BreadcrumbType, Severity, UserIdentity};
use crate::unwind::{NoopUnwinder, Unwinder};

thread_local! {
    static BOUNDARY: RefCell<Option<Box<dyn Boundary>>> = const { RefCell::new(None) };
}

static UNWINDER: OnceCell<Box<dyn Unwinder + Send + Sync>> = OnceCell::new();
static CONFIG: OnceCell<BridgeConfig> = OnceCell::new();

/// Store `boundary` as the calling thread's handle, replacing any earlier one.
pub fn initialize<B: Boundary + 'static>(boundary: B)
{
    initialize_boxed(Box::new(boundary));
}

/// [`initialize`] for an already boxed boundary.
pub fn initialize_boxed(boundary: Box<dyn Boundary>)
{
    BOUNDARY.with(|slot| match slot.try_borrow_mut() {
        Ok(mut slot) => {
            if slot.replace(boundary).is_some() {
                debug!("replaced this thread's boundary handle");
            }
        }
        Err(_) => warn!("cannot initialize the bridge from inside a bridge operation"),
    });
}

/// Whether the calling thread has a boundary handle.
pub fn is_initialized() -> bool
{
    BOUNDARY.with(|slot| slot.try_borrow().is_ok_and(|slot| slot.is_some()))
}

/// Install the process-wide unwinder. Returns `false` if one was already installed.
pub fn install_unwinder<U: Unwinder + Send + Sync + 'static>(unwinder: U) -> bool
{
    let installed = UNWINDER.set(Box::new(unwinder)).is_ok();
    if !installed {
        warn!("an unwinder is already installed");
    }
    installed
}

/// Install the process-wide configuration. Returns `false` if it was already set.
pub fn install_config(config: BridgeConfig) -> bool
{
    let installed = CONFIG.set(config).is_ok();
    if !installed {
        warn!("bridge configuration is already installed");
    }
    installed
}

/// The configuration in effect.
pub fn config() -> BridgeConfig
{
    *CONFIG.get_or_init(BridgeConfig::from_env)
}

fn unwinder() -> &'static dyn Unwinder
{
    match UNWINDER.get() {
        Some(unwinder) => unwinder.as_ref(),
        None => &NoopUnwinder,
    }
}

fn bridge_over(boundary: &dyn Boundary) -> Bridge<'_>
{
    Bridge::new(boundary, unwinder()).with_config(config())
}

fn with_bridge<R>(operation: &'static str, run: impl FnOnce(&Bridge<'_>) -> R) -> BridgeResult<R>
{
    BOUNDARY.with(|slot| {
        let slot = slot.try_borrow().map_err(|_| BridgeError::Uninitialized(operation))?;
        let boundary = slot.as_deref().ok_or(BridgeError::Uninitialized(operation))?;
        Ok(run(&bridge_over(boundary)))
    })
}

/// Report a native error with the current call stack.
pub fn notify(name: &[u8], message: &[u8], severity: Severity)
{
    if let Err(error) = try_notify(name, message, severity) {
        warn!(%error, "dropping native notification");
    }
}

/// [`notify`], returning why the notification was dropped.
pub fn try_notify(name: &[u8], message: &[u8], severity: Severity) -> BridgeResult<()>
{
    with_bridge("notify", |bridge| bridge.try_notify(name, message, severity))?
}

/// Attach a user to subsequent reports.
pub fn set_user(id: Option<&[u8]>, email: Option<&[u8]>, name: Option<&[u8]>)
{
    if let Err(error) = try_set_user(id, email, name) {
        warn!(%error, "dropping user update");
    }
}

/// [`set_user`], returning why the update was dropped.
pub fn try_set_user(id: Option<&[u8]>, email: Option<&[u8]>, name: Option<&[u8]>) -> BridgeResult<()>
{
    with_bridge("set the user", |bridge| bridge.try_set_user(&UserIdentity::new(id, email, name)))?
}

/// Leave a breadcrumb on the managed timeline.
pub fn leave_breadcrumb(message: &[u8], kind: BreadcrumbType)
{
    if let Err(error) = try_leave_breadcrumb(message, kind) {
        warn!(%error, "dropping breadcrumb");
    }
}

/// [`leave_breadcrumb`], returning why the breadcrumb was dropped.
pub fn try_leave_breadcrumb(message: &[u8], kind: BreadcrumbType) -> BridgeResult<()>
{
    with_bridge("leave a breadcrumb", |bridge| bridge.try_leave_breadcrumb(message, kind))?
}

/// [`notify`] over an explicit boundary.
pub fn notify_env(boundary: &dyn Boundary, name: &[u8], message: &[u8], severity: Severity)
{
    bridge_over(boundary).notify(name, message, severity);
}

/// [`set_user`] over an explicit boundary.
pub fn set_user_env(boundary: &dyn Boundary, id: Option<&[u8]>, email: Option<&[u8]>, name: Option<&[u8]>)
{
    bridge_over(boundary).set_user(&UserIdentity::new(id, email, name));
}

/// [`leave_breadcrumb`] over an explicit boundary.
pub fn leave_breadcrumb_env(boundary: &dyn Boundary, message: &[u8], kind: BreadcrumbType)
{
    bridge_over(boundary).leave_breadcrumb(message, kind);
}
