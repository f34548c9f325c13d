//! # RAII Guards for Boundary References
//!
//! A [`LocalRef`] owns one local reference and releases it when dropped, so
//! every temporary handle a bridge operation creates is released exactly once
//! whichever step fails.
//!
//! ## Example
//!
//! ```rust
//! use crashbridge_core::boundary::{Boundary, LocalRef, RecordingBoundary};
//!
//! let boundary = RecordingBoundary::with_notifier_schema();
//! {
//!     let raw = boundary.find_class("java/lang/StackTraceElement").unwrap();
//!     let _class = LocalRef::new(&boundary, raw);
//!     assert_eq!(boundary.outstanding_handles(), 1);
//! }
//! // Guard released the reference when it went out of scope
//! assert_eq!(boundary.outstanding_handles(), 0);
//! ```

use std::fmt;

use super::{Boundary, RawHandle};

/// Owned local reference, deleted on drop.
pub struct LocalRef<'b>
{
    boundary: &'b dyn Boundary,
    raw: RawHandle,
    active: bool,
}

impl<'b> LocalRef<'b>
{
    /// Take ownership of `raw`, which must be a live local reference of `boundary`.
    pub fn new(boundary: &'b dyn Boundary, raw: RawHandle) -> Self
    {
        Self {
            boundary,
            raw,
            active: true,
        }
    }

    /// The underlying handle. Valid only while the guard is alive.
    pub fn raw(&self) -> RawHandle
    {
        self.raw
    }

    /// Release the reference now instead of at the end of the scope.
    pub fn release(mut self)
    {
        self.delete();
    }

    fn delete(&mut self)
    {
        if self.active {
            self.boundary.delete_local_ref(self.raw);
            self.active = false;
        }
    }
}

impl Drop for LocalRef<'_>
{
    fn drop(&mut self)
    {
        self.delete();
    }
}

impl fmt::Debug for LocalRef<'_>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.debug_struct("LocalRef").field("raw", &self.raw).field("active", &self.active).finish()
    }
}
