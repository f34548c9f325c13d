//! # JNI Boundary
//!
//! [`Boundary`] over the raw JNI function table.
//!
//! The bridge may run on a crash path, so this goes straight to the
//! `JNINativeInterface_` function pointers from `jni::sys` instead of the
//! higher-level `jni::JNIEnv` wrapper: no lifetimes tied to a frame, no
//! implicit exception translation, and every fault stays pending for the
//! [`Resolver`](crate::resolver::Resolver) to check and clear.
//!
//! Names, signatures and managed strings are converted to modified UTF-8 with
//! [`JNIString`]. Text payloads never take that route: they are copied into a
//! `byte[]` with `NewByteArray` + `SetByteArrayRegion`.
//!
//! ## References
//!
//! - [JNI Functions](https://docs.oracle.com/en/java/javase/21/docs/specs/jni/functions.html)
//! - [JNI Tips (Android)](https://developer.android.com/training/articles/perf-jni)

use std::ptr;

use ::jni::strings::JNIString;
use ::jni::sys::{jbyte, jclass, jfieldID, jmethodID, jobject, jsize, jvalue, JNIEnv, JNINativeInterface_, JNI_TRUE};

use crate::boundary::{Arg, Boundary, FieldId, MethodId, RawHandle};

/// A `JNIEnv*` for the current thread.
///
/// A `JNIEnv` is only valid on the thread it was handed to, which is why
/// this type is neither `Send` nor `Sync` (it holds a raw pointer).
#[derive(Debug)]
pub struct JniBoundary
{
    env: *mut JNIEnv,
}

impl JniBoundary
{
    /// Wrap a raw `JNIEnv*`. Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `env` must be the `JNIEnv*` of the calling thread, as received by a
    /// native method or from `AttachCurrentThread`, and must stay valid for as
    /// long as the returned value is used.
    pub unsafe fn from_raw(env: *mut JNIEnv) -> Option<Self>
    {
        if env.is_null() || (*env).is_null() {
            return None;
        }
        Some(Self { env })
    }

    /// The wrapped pointer.
    pub fn as_raw(&self) -> *mut JNIEnv
    {
        self.env
    }

    fn table(&self) -> &JNINativeInterface_
    {
        // SAFETY: `from_raw` checked both levels of indirection and the
        // caller guaranteed the environment outlives `self`.
        unsafe { &**self.env }
    }
}

fn handle(object: jobject) -> Option<RawHandle>
{
    RawHandle::new(object as usize)
}

fn object(handle: RawHandle) -> jobject
{
    handle.get() as jobject
}

fn method(id: MethodId) -> jmethodID
{
    id.get() as jmethodID
}

fn jvalues(args: &[Arg]) -> Vec<jvalue>
{
    args.iter()
        .map(|arg| match arg {
            Arg::Object(value) => jvalue {
                l: value.map_or(ptr::null_mut(), object),
            },
            Arg::Int(value) => jvalue { i: *value },
        })
        .collect()
}

impl Boundary for JniBoundary
{
    fn find_class(&self, name: &str) -> Option<RawHandle>
    {
        let name = JNIString::from(name);
        let find_class = self.table().FindClass?;
        // SAFETY: valid env, NUL-terminated modified UTF-8 name.
        handle(unsafe { find_class(self.env, name.as_ptr()) })
    }

    fn static_method_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<MethodId>
    {
        let (name, descriptor) = (JNIString::from(name), JNIString::from(descriptor));
        let get = self.table().GetStaticMethodID?;
        // SAFETY: valid env and live class reference.
        let id = unsafe { get(self.env, object(class) as jclass, name.as_ptr(), descriptor.as_ptr()) };
        MethodId::new(id as usize)
    }

    fn method_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<MethodId>
    {
        let (name, descriptor) = (JNIString::from(name), JNIString::from(descriptor));
        let get = self.table().GetMethodID?;
        // SAFETY: valid env and live class reference.
        let id = unsafe { get(self.env, object(class) as jclass, name.as_ptr(), descriptor.as_ptr()) };
        MethodId::new(id as usize)
    }

    fn static_field_id(&self, class: RawHandle, name: &str, descriptor: &str) -> Option<FieldId>
    {
        let (name, descriptor) = (JNIString::from(name), JNIString::from(descriptor));
        let get = self.table().GetStaticFieldID?;
        // SAFETY: valid env and live class reference.
        let id = unsafe { get(self.env, object(class) as jclass, name.as_ptr(), descriptor.as_ptr()) };
        FieldId::new(id as usize)
    }

    fn static_object_field(&self, class: RawHandle, field: FieldId) -> Option<RawHandle>
    {
        let get = self.table().GetStaticObjectField?;
        // SAFETY: `field` was resolved against `class`.
        handle(unsafe { get(self.env, object(class) as jclass, field.get() as jfieldID) })
    }

    fn new_string(&self, text: &str) -> Option<RawHandle>
    {
        let text = JNIString::from(text);
        let new_string = self.table().NewStringUTF?;
        // SAFETY: valid env, NUL-terminated modified UTF-8 text.
        handle(unsafe { new_string(self.env, text.as_ptr()) })
    }

    fn new_byte_array(&self, bytes: &[u8]) -> Option<RawHandle>
    {
        let len = jsize::try_from(bytes.len()).ok()?;
        let table = self.table();
        let (new_array, set_region) = (table.NewByteArray?, table.SetByteArrayRegion?);
        // SAFETY: valid env; the region write covers exactly the new array.
        unsafe {
            let array = handle(new_array(self.env, len))?;
            set_region(self.env, object(array), 0, len, bytes.as_ptr().cast::<jbyte>());
            Some(array)
        }
    }

    fn new_object_array(&self, len: usize, element_class: RawHandle) -> Option<RawHandle>
    {
        let len = jsize::try_from(len).ok()?;
        let new_array = self.table().NewObjectArray?;
        // SAFETY: valid env and live class reference; slots start out null.
        handle(unsafe { new_array(self.env, len, object(element_class) as jclass, ptr::null_mut()) })
    }

    fn set_object_array_element(&self, array: RawHandle, index: usize, value: RawHandle) -> bool
    {
        let (Ok(index), Some(set)) = (jsize::try_from(index), self.table().SetObjectArrayElement) else {
            return false;
        };
        // SAFETY: valid env and live references; an out-of-range index raises
        // a pending exception rather than writing out of bounds.
        unsafe { set(self.env, object(array), index, object(value)) };
        true
    }

    fn new_object(&self, class: RawHandle, constructor: MethodId, args: &[Arg]) -> Option<RawHandle>
    {
        let args = jvalues(args);
        let new_object = self.table().NewObjectA?;
        // SAFETY: `constructor` was resolved against `class` with a signature
        // matching `args`.
        handle(unsafe { new_object(self.env, object(class) as jclass, method(constructor), args.as_ptr()) })
    }

    fn call_static_void_method(&self, class: RawHandle, method_id: MethodId, args: &[Arg])
    {
        let args = jvalues(args);
        if let Some(call) = self.table().CallStaticVoidMethodA {
            // SAFETY: `method_id` is a static void method of `class` with a
            // signature matching `args`.
            unsafe { call(self.env, object(class) as jclass, method(method_id), args.as_ptr()) };
        }
    }

    fn fault_pending(&self) -> bool
    {
        // SAFETY: ExceptionCheck may be called at any time on a valid env.
        self.table().ExceptionCheck.is_some_and(|check| unsafe { check(self.env) } == JNI_TRUE)
    }

    fn clear_fault(&self)
    {
        if let Some(clear) = self.table().ExceptionClear {
            // SAFETY: ExceptionClear may be called at any time on a valid env.
            unsafe { clear(self.env) };
        }
    }

    fn delete_local_ref(&self, handle: RawHandle)
    {
        if let Some(delete) = self.table().DeleteLocalRef {
            // SAFETY: `handle` is a live local reference owned by the caller.
            unsafe { delete(self.env, object(handle)) };
        }
    }
}
