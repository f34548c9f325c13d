//! # Symbol Resolver
//!
//! Safe wrappers around every [`Boundary`] call.
//!
//! Each wrapper makes one boundary call, then checks for a pending fault and
//! clears it before returning. A lookup or allocation that fails (or faults)
//! comes back as a [`BridgeError`], never as a fault left in the boundary,
//! so the next unrelated call always starts from a clean state.
//!
//! Every reference a wrapper hands out is a [`LocalRef`], released when the
//! caller drops it.

use tracing::debug;

use crate::boundary::{Arg, Boundary, FieldId, LocalRef, MethodId, RawHandle};
use crate::error::{BridgeError, BridgeResult, SymbolKind};
use crate::symbols::{ManagedConstant, MethodSignature};

/// Fault-checked access to a [`Boundary`].
#[derive(Clone, Copy)]
pub struct Resolver<'b>
{
    boundary: &'b dyn Boundary,
}

impl<'b> Resolver<'b>
{
    /// Wrap a boundary.
    pub fn new(boundary: &'b dyn Boundary) -> Self
    {
        Self { boundary }
    }

    /// The wrapped boundary.
    pub fn boundary(&self) -> &'b dyn Boundary
    {
        self.boundary
    }

    /// Clear any pending fault. Returns `true` if there was one.
    fn settle(&self) -> bool
    {
        if self.boundary.fault_pending() {
            self.boundary.clear_fault();
            debug!("cleared pending boundary fault");
            true
        } else {
            false
        }
    }

    /// Take ownership of a returned reference unless the call faulted.
    fn adopt(&self, raw: Option<RawHandle>) -> Option<LocalRef<'b>>
    {
        let faulted = self.settle();
        let local = raw.map(|raw| LocalRef::new(self.boundary, raw));
        if faulted {
            None
        } else {
            local
        }
    }

    /// Resolve a class by binary name.
    pub fn find_class(&self, name: &str) -> BridgeResult<LocalRef<'b>>
    {
        self.adopt(self.boundary.find_class(name))
            .ok_or_else(|| BridgeError::resolution(SymbolKind::Class, name))
    }

    /// Resolve a static method of `class`.
    pub fn static_method(&self, class: &LocalRef<'_>, signature: MethodSignature) -> BridgeResult<MethodId>
    {
        let method = self.boundary.static_method_id(class.raw(), signature.name, signature.descriptor);
        self.checked(method, SymbolKind::Method, signature.name)
    }

    /// Resolve an instance method or constructor of `class`.
    pub fn method(&self, class: &LocalRef<'_>, signature: MethodSignature) -> BridgeResult<MethodId>
    {
        let method = self.boundary.method_id(class.raw(), signature.name, signature.descriptor);
        self.checked(method, SymbolKind::Method, signature.name)
    }

    /// Resolve a static field of `class`.
    pub fn static_field(&self, class: &LocalRef<'_>, name: &str, descriptor: &str) -> BridgeResult<FieldId>
    {
        let field = self.boundary.static_field_id(class.raw(), name, descriptor);
        self.checked(field, SymbolKind::Field, name)
    }

    /// Fetch the managed constant for `value`, resolving its enum class first.
    pub fn constant<T: ManagedConstant>(&self, value: T) -> BridgeResult<LocalRef<'b>>
    {
        let class = self.find_class(T::CLASS)?;
        self.constant_in(&class, value)
    }

    /// Fetch the managed constant for `value` from an already-resolved enum class.
    pub fn constant_in<T: ManagedConstant>(&self, class: &LocalRef<'_>, value: T) -> BridgeResult<LocalRef<'b>>
    {
        let name = value.constant_name();
        let field = self.static_field(class, name, T::DESCRIPTOR)?;
        self.adopt(self.boundary.static_object_field(class.raw(), field))
            .ok_or_else(|| BridgeError::resolution(SymbolKind::Constant, format!("{}.{name}", T::CLASS)))
    }

    /// Create a managed string.
    pub fn new_string(&self, text: &str) -> BridgeResult<LocalRef<'b>>
    {
        self.adopt(self.boundary.new_string(text))
            .ok_or_else(|| BridgeError::AllocationFailed(format!("string of {} bytes", text.len())))
    }

    /// Create a managed `byte[]` holding a copy of `bytes`.
    pub fn new_byte_array(&self, bytes: &[u8]) -> BridgeResult<LocalRef<'b>>
    {
        self.adopt(self.boundary.new_byte_array(bytes))
            .ok_or_else(|| BridgeError::AllocationFailed(format!("byte array of {} bytes", bytes.len())))
    }

    /// Create an object array of `len` empty slots.
    pub fn new_object_array(&self, len: usize, element_class: &LocalRef<'_>) -> BridgeResult<LocalRef<'b>>
    {
        self.adopt(self.boundary.new_object_array(len, element_class.raw()))
            .ok_or_else(|| BridgeError::AllocationFailed(format!("object array of {len} slots")))
    }

    /// Store `value` in slot `index` of `array`.
    pub fn set_element(&self, array: &LocalRef<'_>, index: usize, value: &LocalRef<'_>) -> BridgeResult<()>
    {
        let stored = self.boundary.set_object_array_element(array.raw(), index, value.raw());
        if self.settle() || !stored {
            return Err(BridgeError::AllocationFailed(format!("array slot {index}")));
        }
        Ok(())
    }

    /// Construct an object through `constructor`.
    pub fn new_object(&self, class: &LocalRef<'_>, constructor: MethodId, args: &[Arg]) -> BridgeResult<LocalRef<'b>>
    {
        self.adopt(self.boundary.new_object(class.raw(), constructor, args))
            .ok_or_else(|| BridgeError::AllocationFailed("managed object".to_string()))
    }

    /// Invoke a static `void` method. A fault raised by the callee is cleared
    /// and reported as [`BridgeError::InvocationFailed`].
    pub fn call_static_void(
        &self,
        class: &LocalRef<'_>,
        method: MethodId,
        name: &str,
        args: &[Arg],
    ) -> BridgeResult<()>
    {
        self.boundary.call_static_void_method(class.raw(), method, args);
        if self.settle() {
            return Err(BridgeError::InvocationFailed(name.to_string()));
        }
        Ok(())
    }

    fn checked<T>(&self, id: Option<T>, kind: SymbolKind, name: &str) -> BridgeResult<T>
    {
        if self.settle() {
            return Err(BridgeError::resolution(kind, name));
        }
        id.ok_or_else(|| BridgeError::resolution(kind, name))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::boundary::RecordingBoundary;
    use crate::symbols::{NATIVE_INTERFACE_CLASS, NOTIFY_METHOD};
    use crate::types::Severity;

    #[test]
    fn test_missing_class_clears_fault()
    {
        let boundary = RecordingBoundary::with_notifier_schema();
        let resolver = Resolver::new(&boundary);

        let error = resolver.find_class("com/example/Missing").unwrap_err();

        assert_eq!(error, BridgeError::resolution(SymbolKind::Class, "com/example/Missing"));
        assert!(!boundary.fault_pending());
        assert_eq!(boundary.outstanding_handles(), 0);
    }

    #[test]
    fn test_missing_method_clears_fault()
    {
        let boundary = RecordingBoundary::with_notifier_schema().without_method(NATIVE_INTERFACE_CLASS, "notify");
        let resolver = Resolver::new(&boundary);
        let class = resolver.find_class(NATIVE_INTERFACE_CLASS).unwrap();

        assert!(resolver.static_method(&class, NOTIFY_METHOD).is_err());
        assert!(!boundary.fault_pending());

        // The boundary is usable again right away
        assert!(resolver.static_method(&class, crate::symbols::SET_USER_METHOD).is_ok());
        drop(class);
        assert!(boundary.violations().is_empty());
    }

    #[test]
    fn test_constant_releases_enum_class()
    {
        let boundary = RecordingBoundary::with_notifier_schema();
        let resolver = Resolver::new(&boundary);

        let constant = resolver.constant(Severity::Warning).unwrap();
        assert_eq!(boundary.outstanding_handles(), 1);
        assert_eq!(
            boundary.inspect(constant.raw()),
            Some(crate::boundary::recording::Snapshot::Constant {
                class: "com/bugsnag/android/Severity".to_string(),
                name: "WARNING".to_string(),
            })
        );
    }

    #[test]
    fn test_faulting_call_is_reported()
    {
        let boundary = RecordingBoundary::with_notifier_schema().faulting_method("notify");
        let resolver = Resolver::new(&boundary);
        let class = resolver.find_class(NATIVE_INTERFACE_CLASS).unwrap();
        let method = resolver.static_method(&class, NOTIFY_METHOD).unwrap();

        let result = resolver.call_static_void(&class, method, "notify", &[]);

        assert_eq!(result, Err(BridgeError::InvocationFailed("notify".to_string())));
        assert!(!boundary.fault_pending());
    }
}
