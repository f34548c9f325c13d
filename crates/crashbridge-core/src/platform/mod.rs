//! # Runtime Bindings
//!
//! Concrete [`Boundary`](crate::boundary::Boundary) implementations for real
//! managed runtimes.
//!
//! - **JVM / Android Runtime**: [`jni::JniBoundary`], over a raw `JNIEnv*`
//!   - See: [JNI Functions](https://docs.oracle.com/en/java/javase/21/docs/specs/jni/functions.html)

pub mod jni;

pub use self::jni::JniBoundary;
