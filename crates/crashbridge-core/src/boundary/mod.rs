//! # Runtime Boundary
//!
//! The interface the bridge uses to talk to the managed runtime.
//!
//! [`Boundary`] is a thin, object-safe mirror of the handful of JNI functions
//! the bridge needs. Each method is a single boundary call with no fault
//! handling of its own: lookups and allocations return `None` on failure and
//! may leave a fault pending. The [`Resolver`](crate::resolver::Resolver) wraps
//! every call with the check-and-clear discipline, so the rest of the crate
//! never talks to a `Boundary` directly.
//!
//! Implementations:
//!
//! - [`JniBoundary`](crate::platform::jni::JniBoundary): a real `JNIEnv`
//! - [`RecordingBoundary`](recording::RecordingBoundary): an in-memory managed
//!   side for tests and dry runs
//!
//! ## Handle lifetimes
//!
//! Objects, classes, strings and arrays come back as [`RawHandle`]s that are
//! *local references*: they must be released with
//! [`Boundary::delete_local_ref`] exactly once. Wrap them in a
//! [`LocalRef`](guards::LocalRef) so release happens on every exit path.
//! [`MethodId`] and [`FieldId`] are not references and are never released.
//!
//! ## Threading
//!
//! A boundary handle is bound to the thread that obtained it. Implementations
//! are therefore neither `Send` nor `Sync` in spirit, and the bridge context
//! keeps one per thread.

pub mod guards;
pub mod recording;

use std::num::NonZeroUsize;
use std::rc::Rc;

pub use guards::LocalRef;
pub use recording::RecordingBoundary;

/// Opaque local reference to a managed object, class, string or array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawHandle(NonZeroUsize);

impl RawHandle
{
    /// Wrap a raw reference value; `None` for null.
    pub fn new(raw: usize) -> Option<Self>
    {
        NonZeroUsize::new(raw).map(Self)
    }

    /// Raw reference value.
    pub fn get(self) -> usize
    {
        self.0.get()
    }
}

/// Opaque method identifier. Valid for as long as its class is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodId(NonZeroUsize);

impl MethodId
{
    /// Wrap a raw method id; `None` for null.
    pub fn new(raw: usize) -> Option<Self>
    {
        NonZeroUsize::new(raw).map(Self)
    }

    /// Raw method id.
    pub fn get(self) -> usize
    {
        self.0.get()
    }
}

/// Opaque static field identifier. Valid for as long as its class is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldId(NonZeroUsize);

impl FieldId
{
    /// Wrap a raw field id; `None` for null.
    pub fn new(raw: usize) -> Option<Self>
    {
        NonZeroUsize::new(raw).map(Self)
    }

    /// Raw field id.
    pub fn get(self) -> usize
    {
        self.0.get()
    }
}

/// One argument of a managed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arg
{
    /// An object reference, `None` for `null`.
    Object(Option<RawHandle>),
    /// A Java `int`.
    Int(i32),
}

impl Arg
{
    /// Pass `value` as an object argument.
    pub fn object(value: &LocalRef<'_>) -> Self
    {
        Arg::Object(Some(value.raw()))
    }

    /// Pass `value` as an object argument, or `null` when absent.
    pub fn nullable(value: Option<&LocalRef<'_>>) -> Self
    {
        Arg::Object(value.map(LocalRef::raw))
    }
}

/// Raw operations on the managed runtime.
///
/// Failures are reported as `None` / `false` and may leave a fault pending;
/// callers are expected to check [`Boundary::fault_pending`] after each call.
pub trait Boundary
{
    /// Look up a class by binary name (`java/lang/String`).
    fn find_class(&self, name: &str) -> Option<RawHandle>;

    /// Look up a static method.
    fn static_method_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<MethodId>;

    /// Look up an instance method or constructor (`<init>`).
    fn method_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<MethodId>;

    /// Look up a static field.
    fn static_field_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<FieldId>;

    /// Read a static object field.
    fn static_object_field(&self, class: RawHandle, field: FieldId) -> Option<RawHandle>;

    /// Create a managed string from text.
    fn new_string(&self, text: &str) -> Option<RawHandle>;

    /// Create a managed `byte[]` holding a copy of `bytes`.
    fn new_byte_array(&self, bytes: &[u8]) -> Option<RawHandle>;

    /// Create an object array of `len` null slots typed by `element_class`.
    fn new_object_array(&self, len: usize, element_class: RawHandle) -> Option<RawHandle>;

    /// Store `value` at `index` of `array`. Returns `false` on failure.
    fn set_object_array_element(&self, array: RawHandle, index: usize, value: RawHandle) -> bool;

    /// Construct an object through `constructor`.
    fn new_object(&self, class: RawHandle, constructor: MethodId, args: &[Arg]) -> Option<RawHandle>;

    /// Call a static `void` method.
    fn call_static_void_method(&self, class: RawHandle, method: MethodId, args: &[Arg]);

    /// Whether a fault (pending exception) is outstanding.
    fn fault_pending(&self) -> bool;

    /// Clear any outstanding fault.
    fn clear_fault(&self);

    /// Release a local reference.
    fn delete_local_ref(&self, handle: RawHandle);
}

/// Shared ownership keeps the same boundary reachable from the bridge context
/// and from the code that installed it.
impl<B: Boundary + ?Sized> Boundary for Rc<B>
{
    fn find_class(&self, name: &str) -> Option<RawHandle>
    {
        (**self).find_class(name)
    }

    fn static_method_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<MethodId>
    {
        (**self).static_method_id(class, name, descriptor)
    }

    fn method_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<MethodId>
    {
        (**self).method_id(class, name, descriptor)
    }

    fn static_field_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<FieldId>
    {
        (**self).static_field_id(class, name, descriptor)
    }

    fn static_object_field(&self, class: RawHandle, field: FieldId) -> Option<RawHandle>
    {
        (**self).static_object_field(class, field)
    }

    fn new_string(&self, text: &str) -> Option<RawHandle>
    {
        (**self).new_string(text)
    }

    fn new_byte_array(&self, bytes: &[u8]) -> Option<RawHandle>
    {
        (**self).new_byte_array(bytes)
    }

    fn new_object_array(&self, len: usize, element_class: RawHandle) -> Option<RawHandle>
    {
        (**self).new_object_array(len, element_class)
    }

    fn set_object_array_element(&self, array: RawHandle, index: usize, value: RawHandle) -> bool
    {
        (**self).set_object_array_element(array, index, value)
    }

    fn new_object(&self, class: RawHandle, constructor: MethodId, args: &[Arg]) -> Option<RawHandle>
    {
        (**self).new_object(class, constructor, args)
    }

    fn call_static_void_method(&self, class: RawHandle, method: MethodId, args: &[Arg])
    {
        (**self).call_static_void_method(class, method, args);
    }

    fn fault_pending(&self) -> bool
    {
        (**self).fault_pending()
    }

    fn clear_fault(&self)
    {
        (**self).clear_fault();
    }

    fn delete_local_ref(&self, handle: RawHandle)
    {
        (**self).delete_local_ref(handle);
    }
}
