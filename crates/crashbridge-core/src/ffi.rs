//! # C and JNI Exports
//!
//! The symbols native code links against when this crate is built as a
//! `cdylib` or `staticlib`:
//!
//! | Symbol | Forwards to |
//! |---|---|
//! | `bugsnag_init` | [`context::initialize`] |
//! | `bugsnag_notify` / `bugsnag_notify_env` | [`context::notify`] / [`context::notify_env`] |
//! | `bugsnag_set_user` / `bugsnag_set_user_env` | [`context::set_user`] / [`context::set_user_env`] |
//! | `bugsnag_leave_breadcrumb` / `bugsnag_leave_breadcrumb_env` | [`context::leave_breadcrumb`] / [`context::leave_breadcrumb_env`] |
//! | `Java_com_bugsnag_android_RootDetector_performNativeRootChecks` | [`root::is_rooted`] |
//!
//! Text arrives as NUL-terminated byte strings; a null pointer means "absent".
//! Enum arguments are the raw C ordinals (see [`Severity::from_raw`] and
//! [`BreadcrumbType::from_raw`]). No panic is allowed to unwind into the
//! caller: a panicking call is logged and dropped.
//!
//! The first exported call installs the crashbridge logging stack
//! ([`crashbridge_utils::init_logging`], configured from the environment) so
//! the diagnostics of dropped operations reach stderr or the log file. A host
//! that installed its own `tracing` subscriber first keeps it.

use std::ffi::{c_char, c_int, CStr};
use std::panic::{self, AssertUnwindSafe};

use crashbridge_utils::{init_logging, LoggingGuard};
use jni::sys::{jboolean, jobject, JNIEnv, JNI_FALSE, JNI_TRUE};
use once_cell::sync::OnceCell;
use tracing::{debug, error, warn};

use crate::context;
use crate::platform::JniBoundary;
use crate::root;
use crate::types::{BreadcrumbType, Severity};

/// Borrow a C string's bytes; `None` for null.
///
/// # Safety
///
/// `text` must be null or point to a NUL-terminated string that outlives `'a`.
unsafe fn bytes<'a>(text: *const c_char) -> Option<&'a [u8]>
{
    (!text.is_null()).then(|| CStr::from_ptr(text).to_bytes())
}

/// Lives for the rest of the process so the file writer keeps running.
static LOGGING: OnceCell<Option<LoggingGuard>> = OnceCell::new();

/// Install the logging stack on the first exported call. Returns `true` if
/// this library's subscriber is the active one.
fn install_logging() -> bool
{
    LOGGING
        .get_or_init(|| match init_logging() {
            Ok(guard) => Some(guard),
            Err(error) => {
                // Reaches the host's subscriber, if it has one.
                debug!(%error, "keeping the existing log setup");
                None
            }
        })
        .is_some()
}

fn guarded(operation: &str, run: impl FnOnce())
{
    install_logging();
    if panic::catch_unwind(AssertUnwindSafe(run)).is_err() {
        error!(operation, "bridge operation panicked");
    }
}

/// Store `env` as the calling thread's boundary.
///
/// # Safety
///
/// `env` must be null or the calling thread's valid `JNIEnv*`.
#[no_mangle]
pub unsafe extern "C" fn bugsnag_init(env: *mut JNIEnv)
{
    guarded("init", || match JniBoundary::from_raw(env) {
        Some(boundary) => context::initialize(boundary),
        None => warn!("bugsnag_init called with a null JNIEnv"),
    });
}

/// Report a native error through the calling thread's boundary.
///
/// # Safety
///
/// `name` and `message` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn bugsnag_notify(name: *const c_char, message: *const c_char, severity: c_int)
{
    let (name, message) = (bytes(name).unwrap_or_default(), bytes(message).unwrap_or_default());
    guarded("notify", || context::notify(name, message, Severity::from_raw(severity)));
}

/// Report a native error through `env`.
///
/// # Safety
///
/// `env` must be null or the calling thread's valid `JNIEnv*`; `name` and
/// `message` must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn bugsnag_notify_env(
    env: *mut JNIEnv,
    name: *const c_char,
    message: *const c_char,
    severity: c_int,
)
{
    let Some(boundary) = JniBoundary::from_raw(env) else {
        install_logging();
        warn!("bugsnag_notify_env called with a null JNIEnv");
        return;
    };
    let (name, message) = (bytes(name).unwrap_or_default(), bytes(message).unwrap_or_default());
    guarded("notify", || context::notify_env(&boundary, name, message, Severity::from_raw(severity)));
}

/// Attach a user to subsequent reports.
///
/// # Safety
///
/// Each argument must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bugsnag_set_user(id: *const c_char, email: *const c_char, name: *const c_char)
{
    let (id, email, name) = (bytes(id), bytes(email), bytes(name));
    guarded("set_user", || context::set_user(id, email, name));
}

/// Attach a user to subsequent reports through `env`.
///
/// # Safety
///
/// `env` must be null or the calling thread's valid `JNIEnv*`; the text
/// arguments must be null or valid NUL-terminated strings.
#[no_mangle]
pub unsafe extern "C" fn bugsnag_set_user_env(
    env: *mut JNIEnv,
    id: *const c_char,
    email: *const c_char,
    name: *const c_char,
)
{
    let Some(boundary) = JniBoundary::from_raw(env) else {
        install_logging();
        warn!("bugsnag_set_user_env called with a null JNIEnv");
        return;
    };
    let (id, email, name) = (bytes(id), bytes(email), bytes(name));
    guarded("set_user", || context::set_user_env(&boundary, id, email, name));
}

/// Leave a breadcrumb. Unknown `crumb_type` values become `MANUAL`.
///
/// # Safety
///
/// `message` must be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bugsnag_leave_breadcrumb(message: *const c_char, crumb_type: c_int)
{
    let message = bytes(message).unwrap_or_default();
    guarded("leave_breadcrumb", || context::leave_breadcrumb(message, BreadcrumbType::from_raw(crumb_type)));
}

/// Leave a breadcrumb through `env`.
///
/// # Safety
///
/// `env` must be null or the calling thread's valid `JNIEnv*`; `message` must
/// be null or a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn bugsnag_leave_breadcrumb_env(env: *mut JNIEnv, message: *const c_char, crumb_type: c_int)
{
    let Some(boundary) = JniBoundary::from_raw(env) else {
        install_logging();
        warn!("bugsnag_leave_breadcrumb_env called with a null JNIEnv");
        return;
    };
    let message = bytes(message).unwrap_or_default();
    guarded("leave_breadcrumb", || {
        context::leave_breadcrumb_env(&boundary, message, BreadcrumbType::from_raw(crumb_type));
    });
}

/// `native boolean performNativeRootChecks()` of `com.bugsnag.android.RootDetector`.
#[allow(non_snake_case)]
#[no_mangle]
pub extern "system" fn Java_com_bugsnag_android_RootDetector_performNativeRootChecks(
    _env: *mut JNIEnv,
    _this: jobject,
) -> jboolean
{
    install_logging();
    if root::is_rooted() {
        JNI_TRUE
    } else {
        JNI_FALSE
    }
}

#[cfg(test)]
mod tests
{
    use std::ptr;

    use super::*;

    #[test]
    fn test_null_text_is_absent()
    {
        // SAFETY: null is explicitly handled.
        assert_eq!(unsafe { bytes(ptr::null()) }, None);
    }

    #[test]
    fn test_text_keeps_raw_bytes()
    {
        let text = c"caf\xc3\xa9 \xff";
        // SAFETY: `text` is a NUL-terminated literal.
        assert_eq!(unsafe { bytes(text.as_ptr()) }, Some(&b"caf\xc3\xa9 \xff"[..]));
    }

    #[test]
    fn test_null_env_is_ignored()
    {
        // SAFETY: a null env is rejected before anything is dereferenced.
        unsafe {
            bugsnag_init(ptr::null_mut());
            bugsnag_leave_breadcrumb_env(ptr::null_mut(), c"crumb".as_ptr(), 1);
        }
        assert!(!context::is_initialized());
    }

    #[test]
    fn test_exports_install_logging()
    {
        // SAFETY: all arguments are null or NUL-terminated literals.
        unsafe {
            bugsnag_init(ptr::null_mut());
            bugsnag_notify(c"SIGABRT".as_ptr(), ptr::null(), 0);
        }

        assert!(tracing::dispatcher::has_been_set());
        assert!(matches!(LOGGING.get(), Some(Some(_))));
        // Later calls reuse the first setup
        assert!(install_logging());
    }

    #[test]
    fn test_uninitialized_calls_are_dropped()
    {
        // SAFETY: all arguments are null or NUL-terminated literals.
        unsafe {
            bugsnag_notify(c"SIGABRT".as_ptr(), ptr::null(), 0);
            bugsnag_set_user(ptr::null(), ptr::null(), ptr::null());
            bugsnag_leave_breadcrumb(ptr::null(), 99);
        }
        assert!(!context::is_initialized());
    }
}
