//! # Recording Boundary
//!
//! An in-memory stand-in for the managed runtime.
//!
//! [`RecordingBoundary`] models just enough of a JVM for the bridge to run
//! against it: a registry of classes, methods and static fields, local
//! references with explicit release, and a single pending-fault flag. On top
//! of that it records:
//!
//! - a transcript of every boundary call
//! - a deep snapshot of the arguments of every static `void` invocation
//! - violations of the boundary discipline: calls made while a fault was
//!   pending, and use or release of a reference that is no longer live
//!
//! Failures can be injected per class, method or field, per object
//! construction, or for every allocation. The CLI uses it for dry runs and the
//! test suites use it to check that every operation leaves zero outstanding
//! references behind.
//!
//! ## Example
//!
//! ```rust
//! use crashbridge_core::boundary::RecordingBoundary;
//! use crashbridge_core::bridge::Bridge;
//! use crashbridge_core::types::BreadcrumbType;
//! use crashbridge_core::unwind::NoopUnwinder;
//!
//! let boundary = RecordingBoundary::with_notifier_schema();
//! Bridge::new(&boundary, &NoopUnwinder).leave_breadcrumb(b"Critical failure", BreadcrumbType::Log);
//!
//! assert_eq!(boundary.invocations().len(), 1);
//! assert_eq!(boundary.outstanding_handles(), 0);
//! assert!(boundary.violations().is_empty());
//! ```

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::{Arg, Boundary, FieldId, MethodId, RawHandle};
use crate::symbols::{
    ManagedConstant, MethodSignature, LEAVE_BREADCRUMB_METHOD, NATIVE_INTERFACE_CLASS, NOTIFY_METHOD,
    SET_BINARY_ARCH_METHOD, SET_USER_METHOD, STACK_TRACE_ELEMENT_CLASS, STACK_TRACE_ELEMENT_CTOR,
};
use crate::types::{BreadcrumbType, Severity};

/// Deep copy of a managed value, taken when it crosses the boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Snapshot
{
    /// `null`
    Null,
    /// A Java `int`
    Int(i32),
    /// A class reference
    Class(String),
    /// A `java.lang.String`
    Str(String),
    /// A `byte[]`
    Bytes(Vec<u8>),
    /// A static enum constant
    Constant
    {
        /// Owning enum class
        class: String,
        /// Constant name
        name: String,
    },
    /// An object array; unset slots are `None`
    Array
    {
        /// Element class
        element_class: String,
        /// Slots in order
        elements: Vec<Option<Snapshot>>,
    },
    /// An object built through a constructor
    Instance
    {
        /// Class of the object
        class: String,
        /// Constructor arguments in order
        args: Vec<Snapshot>,
    },
}

impl Snapshot
{
    /// Payload of a `byte[]` snapshot.
    pub fn as_bytes(&self) -> Option<&[u8]>
    {
        match self {
            Snapshot::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Text of a string snapshot.
    pub fn as_str(&self) -> Option<&str>
    {
        match self {
            Snapshot::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Slots of an array snapshot.
    pub fn elements(&self) -> Option<&[Option<Snapshot>]>
    {
        match self {
            Snapshot::Array { elements, .. } => Some(elements),
            _ => None,
        }
    }
}

/// One static `void` call that reached the managed side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation
{
    /// Class the method was invoked on
    pub class: String,
    /// Method name
    pub method: String,
    /// Arguments, snapshotted at call time
    pub args: Vec<Snapshot>,
}

/// One line of the boundary transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallRecord
{
    /// Boundary operation, e.g. `find_class`
    pub operation: &'static str,
    /// Operation-specific detail, e.g. the class name
    pub detail: String,
}

impl fmt::Display for CallRecord
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}({})", self.operation, self.detail)
    }
}

#[derive(Debug, Clone)]
struct MemberEntry
{
    class: String,
    name: String,
    descriptor: String,
    is_static: bool,
}

#[derive(Debug, Default)]
struct State
{
    classes: HashSet<String>,
    methods: Vec<MemberEntry>,
    fields: Vec<MemberEntry>,
    objects: HashMap<usize, Snapshot>,
    next_handle: usize,
    fault: bool,
    constructions: usize,
    failing_constructions: HashSet<usize>,
    failing_allocations: bool,
    faulting_methods: HashSet<String>,
    transcript: Vec<CallRecord>,
    invocations: Vec<Invocation>,
    violations: Vec<String>,
}

impl State
{
    fn enter(&mut self, operation: &'static str, detail: impl Into<String>)
    {
        let record = CallRecord {
            operation,
            detail: detail.into(),
        };
        if self.fault {
            self.violations.push(format!("{record} called with a fault pending"));
        }
        self.transcript.push(record);
    }

    fn fail(&mut self) -> Option<RawHandle>
    {
        self.fault = true;
        None
    }

    fn allocate(&mut self, value: Snapshot) -> Option<RawHandle>
    {
        self.next_handle += 1;
        let handle = RawHandle::new(self.next_handle)?;
        self.objects.insert(handle.get(), value);
        Some(handle)
    }

    fn lookup(&mut self, handle: RawHandle, operation: &str) -> Option<Snapshot>
    {
        let value = self.objects.get(&handle.get()).cloned();
        if value.is_none() {
            self.violations.push(format!("{operation} used stale handle {}", handle.get()));
        }
        value
    }

    fn class_name(&mut self, handle: RawHandle, operation: &str) -> Option<String>
    {
        match self.lookup(handle, operation)? {
            Snapshot::Class(name) => Some(name),
            other => {
                self.violations.push(format!("{operation} expected a class, got {other:?}"));
                None
            }
        }
    }

    fn snapshot_args(&mut self, args: &[Arg], operation: &str) -> Vec<Snapshot>
    {
        args.iter()
            .map(|arg| match arg {
                Arg::Object(None) => Snapshot::Null,
                Arg::Object(Some(handle)) => self.lookup(*handle, operation).unwrap_or(Snapshot::Null),
                Arg::Int(value) => Snapshot::Int(*value),
            })
            .collect()
    }

    fn find_member(
        entries: &[MemberEntry],
        class: &str,
        name: &str,
        descriptor: &str,
        is_static: bool,
    ) -> Option<usize>
    {
        entries
            .iter()
            .position(|entry| {
                entry.class == class && entry.name == name && entry.descriptor == descriptor && entry.is_static == is_static
            })
            .map(|index| index + 1)
    }

    fn method_entry(&self, method: MethodId) -> Option<&MemberEntry>
    {
        self.methods.get(method.get() - 1)
    }
}

/// In-memory managed runtime that records everything the bridge does.
#[derive(Debug, Default)]
pub struct RecordingBoundary
{
    state: RefCell<State>,
}

impl RecordingBoundary
{
    /// An empty managed side: every lookup fails.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// A managed side exposing everything the notifier bridge expects.
    pub fn with_notifier_schema() -> Self
    {
        let boundary = Self::new()
            .with_static_method(NATIVE_INTERFACE_CLASS, NOTIFY_METHOD)
            .with_static_method(NATIVE_INTERFACE_CLASS, SET_BINARY_ARCH_METHOD)
            .with_static_method(NATIVE_INTERFACE_CLASS, SET_USER_METHOD)
            .with_static_method(NATIVE_INTERFACE_CLASS, LEAVE_BREADCRUMB_METHOD)
            .with_method(STACK_TRACE_ELEMENT_CLASS, STACK_TRACE_ELEMENT_CTOR)
            .with_constants::<Severity>();
        boundary.with_constants::<BreadcrumbType>()
    }

    /// Register a class.
    #[must_use]
    pub fn with_class(self, class: &str) -> Self
    {
        self.state.borrow_mut().classes.insert(class.to_string());
        self
    }

    /// Register a static method (and its class).
    #[must_use]
    pub fn with_static_method(self, class: &str, signature: MethodSignature) -> Self
    {
        self.register_method(class, signature, true)
    }

    /// Register an instance method or constructor (and its class).
    #[must_use]
    pub fn with_method(self, class: &str, signature: MethodSignature) -> Self
    {
        self.register_method(class, signature, false)
    }

    /// Register a static field (and its class).
    #[must_use]
    pub fn with_static_field(self, class: &str, name: &str, descriptor: &str) -> Self
    {
        let this = self.with_class(class);
        this.state.borrow_mut().fields.push(MemberEntry {
            class: class.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            is_static: true,
        });
        this
    }

    /// Register every constant of a managed enum.
    #[must_use]
    pub fn with_constants<T: ManagedConstant>(self) -> Self
    {
        T::ALL
            .iter()
            .fold(self, |this, value| this.with_static_field(T::CLASS, value.constant_name(), T::DESCRIPTOR))
    }

    /// Remove a class, making every lookup against it fail.
    #[must_use]
    pub fn without_class(self, class: &str) -> Self
    {
        self.state.borrow_mut().classes.remove(class);
        self
    }

    /// Remove every method called `name` on `class`.
    #[must_use]
    pub fn without_method(self, class: &str, name: &str) -> Self
    {
        self.state.borrow_mut().methods.iter_mut().filter(|m| m.class == class && m.name == name).for_each(hide);
        self
    }

    /// Remove the static field `name` of `class`.
    #[must_use]
    pub fn without_field(self, class: &str, name: &str) -> Self
    {
        self.state.borrow_mut().fields.iter_mut().filter(|f| f.class == class && f.name == name).for_each(hide);
        self
    }

    /// Make the `nth` object construction (0-based) fail with a fault.
    #[must_use]
    pub fn failing_construction(self, nth: usize) -> Self
    {
        self.state.borrow_mut().failing_constructions.insert(nth);
        self
    }

    /// Make every string and array allocation fail with a fault.
    #[must_use]
    pub fn failing_allocations(self) -> Self
    {
        self.state.borrow_mut().failing_allocations = true;
        self
    }

    /// Make invocations of the method called `name` raise a fault.
    #[must_use]
    pub fn faulting_method(self, name: &str) -> Self
    {
        self.state.borrow_mut().faulting_methods.insert(name.to_string());
        self
    }

    /// Number of local references created and not yet released.
    pub fn outstanding_handles(&self) -> usize
    {
        self.state.borrow().objects.len()
    }

    /// Every static `void` invocation so far.
    pub fn invocations(&self) -> Vec<Invocation>
    {
        self.state.borrow().invocations.clone()
    }

    /// Every boundary call so far.
    pub fn transcript(&self) -> Vec<CallRecord>
    {
        self.state.borrow().transcript.clone()
    }

    /// Number of calls of `operation` whose detail equals `detail`.
    pub fn count_calls(&self, operation: &str, detail: &str) -> usize
    {
        self.state.borrow().transcript.iter().filter(|r| r.operation == operation && r.detail == detail).count()
    }

    /// Discipline violations so far; empty when the bridge behaved.
    pub fn violations(&self) -> Vec<String>
    {
        self.state.borrow().violations.clone()
    }

    /// Snapshot of a live reference.
    pub fn inspect(&self, handle: RawHandle) -> Option<Snapshot>
    {
        self.state.borrow().objects.get(&handle.get()).cloned()
    }

    fn register_method(self, class: &str, signature: MethodSignature, is_static: bool) -> Self
    {
        let this = self.with_class(class);
        this.state.borrow_mut().methods.push(MemberEntry {
            class: class.to_string(),
            name: signature.name.to_string(),
            descriptor: signature.descriptor.to_string(),
            is_static,
        });
        this
    }

    fn member_id(&self, class: RawHandle, name: &str, descriptor: &str, kind: Member) -> Option<usize>
    {
        let mut state = self.state.borrow_mut();
        state.enter(kind.operation(), format!("{name}{descriptor}"));
        let Some(class_name) = state.class_name(class, kind.operation()) else {
            state.fail();
            return None;
        };
        let entries = match kind {
            Member::StaticMethod | Member::Method => &state.methods,
            Member::StaticField => &state.fields,
        };
        let found = State::find_member(entries, &class_name, name, descriptor, kind.is_static());
        if found.is_none() {
            state.fail();
        }
        found
    }

    fn allocate_value(&self, operation: &'static str, detail: String, value: Snapshot) -> Option<RawHandle>
    {
        let mut state = self.state.borrow_mut();
        state.enter(operation, detail);
        if state.failing_allocations {
            return state.fail();
        }
        state.allocate(value)
    }
}

fn hide(entry: &mut MemberEntry)
{
    entry.name.insert(0, '!');
}

#[derive(Debug, Clone, Copy)]
enum Member
{
    StaticMethod,
    Method,
    StaticField,
}

impl Member
{
    fn operation(self) -> &'static str
    {
        match self {
            Member::StaticMethod => "static_method_id",
            Member::Method => "method_id",
            Member::StaticField => "static_field_id",
        }
    }

    fn is_static(self) -> bool
    {
        !matches!(self, Member::Method)
    }
}

impl Boundary for RecordingBoundary
{
    fn find_class(&self, name: &str) -> Option<RawHandle>
    {
        let mut state = self.state.borrow_mut();
        state.enter("find_class", name);
        if !state.classes.contains(name) {
            return state.fail();
        }
        state.allocate(Snapshot::Class(name.to_string()))
    }

    fn static_method_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<MethodId>
    {
        self.member_id(class, name, descriptor, Member::StaticMethod).and_then(MethodId::new)
    }

    fn method_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<MethodId>
    {
        self.member_id(class, name, descriptor, Member::Method).and_then(MethodId::new)
    }

    fn static_field_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<FieldId>
    {
        self.member_id(class, name, descriptor, Member::StaticField).and_then(FieldId::new)
    }

    fn static_object_field(&self, class: RawHandle, field: FieldId) -> Option<RawHandle>
    {
        let mut state = self.state.borrow_mut();
        let entry = state.fields.get(field.get() - 1).cloned();
        state.enter("static_object_field", entry.as_ref().map(|e| e.name.clone()).unwrap_or_default());
        let class_name = state.class_name(class, "static_object_field");
        match (class_name, entry) {
            (Some(class_name), Some(entry)) if entry.class == class_name => state.allocate(Snapshot::Constant {
                class: entry.class,
                name: entry.name,
            }),
            _ => state.fail(),
        }
    }

    fn new_string(&self, text: &str) -> Option<RawHandle>
    {
        self.allocate_value("new_string", format!("{text:?}"), Snapshot::Str(text.to_string()))
    }

    fn new_byte_array(&self, bytes: &[u8]) -> Option<RawHandle>
    {
        self.allocate_value("new_byte_array", format!("{} bytes", bytes.len()), Snapshot::Bytes(bytes.to_vec()))
    }

    fn new_object_array(&self, len: usize, element_class: RawHandle) -> Option<RawHandle>
    {
        let element_class = {
            let mut state = self.state.borrow_mut();
            state.class_name(element_class, "new_object_array")
        };
        let Some(element_class) = element_class else {
            let mut state = self.state.borrow_mut();
            state.enter("new_object_array", format!("{len}"));
            return state.fail();
        };
        self.allocate_value(
            "new_object_array",
            format!("{len} x {element_class}"),
            Snapshot::Array {
                element_class,
                elements: vec![None; len],
            },
        )
    }

    fn set_object_array_element(&self, array: RawHandle, index: usize, value: RawHandle) -> bool
    {
        let mut state = self.state.borrow_mut();
        state.enter("set_object_array_element", format!("{index}"));
        let Some(value) = state.lookup(value, "set_object_array_element") else {
            state.fail();
            return false;
        };
        let slot = match state.objects.get_mut(&array.get()) {
            Some(Snapshot::Array { elements, .. }) => elements.get_mut(index),
            _ => None,
        };
        match slot {
            Some(slot) => {
                *slot = Some(value);
                true
            }
            None => {
                state.fail();
                false
            }
        }
    }

    fn new_object(&self, class: RawHandle, constructor: MethodId, args: &[Arg]) -> Option<RawHandle>
    {
        let mut state = self.state.borrow_mut();
        state.enter("new_object", format!("{} args", args.len()));
        let nth = state.constructions;
        state.constructions += 1;
        let class_name = state.class_name(class, "new_object")?;
        let is_constructor = state
            .method_entry(constructor)
            .is_some_and(|entry| entry.class == class_name && entry.name == "<init>" && !entry.is_static);
        if !is_constructor || state.failing_constructions.contains(&nth) {
            return state.fail();
        }
        let args = state.snapshot_args(args, "new_object");
        state.allocate(Snapshot::Instance { class: class_name, args })
    }

    fn call_static_void_method(&self, class: RawHandle, method: MethodId, args: &[Arg])
    {
        let mut state = self.state.borrow_mut();
        let entry = state.method_entry(method).cloned();
        let Some(entry) = entry else {
            state.enter("call_static_void_method", "<unknown method>");
            state.violations.push(format!("call_static_void_method used unknown method id {}", method.get()));
            return;
        };
        state.enter("call_static_void_method", entry.name.clone());
        let Some(class_name) = state.class_name(class, "call_static_void_method") else {
            return;
        };
        let args = state.snapshot_args(args, "call_static_void_method");
        state.invocations.push(Invocation {
            class: class_name,
            method: entry.name.clone(),
            args,
        });
        if state.faulting_methods.contains(&entry.name) {
            state.fault = true;
        }
    }

    fn fault_pending(&self) -> bool
    {
        self.state.borrow().fault
    }

    fn clear_fault(&self)
    {
        let mut state = self.state.borrow_mut();
        state.transcript.push(CallRecord {
            operation: "clear_fault",
            detail: String::new(),
        });
        state.fault = false;
    }

    fn delete_local_ref(&self, handle: RawHandle)
    {
        let mut state = self.state.borrow_mut();
        if state.objects.remove(&handle.get()).is_none() {
            state.violations.push(format!("delete_local_ref released stale handle {}", handle.get()));
        }
    }
}
