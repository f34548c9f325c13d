//! # Managed-Side Symbols
//!
//! Names and JNI signatures of everything the bridge looks up on the JVM side,
//! plus the static tables that map native enum tags to managed enum constants.
//!
//! The enum tables replace by-name branching at call sites: each native tag
//! has exactly one constant name, and each constant name maps back to exactly
//! one tag.

/// `com.bugsnag.android.NativeInterface`, home of every static entry point.
pub const NATIVE_INTERFACE_CLASS: &str = "com/bugsnag/android/NativeInterface";

/// `java.lang.StackTraceElement`, the managed frame record.
pub const STACK_TRACE_ELEMENT_CLASS: &str = "java/lang/StackTraceElement";

/// `StackTraceElement(String declaringClass, String methodName, String fileName, int lineNumber)`
pub const STACK_TRACE_ELEMENT_CTOR: MethodSignature =
    MethodSignature::new("<init>", "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;I)V");

/// `NativeInterface.notify(byte[] name, byte[] message, Severity severity, StackTraceElement[] trace)`
pub const NOTIFY_METHOD: MethodSignature = MethodSignature::new(
    "notify",
    "([B[BLcom/bugsnag/android/Severity;[Ljava/lang/StackTraceElement;)V",
);

/// `NativeInterface.setBinaryArch(String arch)`
pub const SET_BINARY_ARCH_METHOD: MethodSignature = MethodSignature::new("setBinaryArch", "(Ljava/lang/String;)V");

/// `NativeInterface.setUser(byte[] id, byte[] email, byte[] name)`
pub const SET_USER_METHOD: MethodSignature = MethodSignature::new("setUser", "([B[B[B)V");

/// `NativeInterface.leaveBreadcrumb(byte[] message, BreadcrumbType type)`
pub const LEAVE_BREADCRUMB_METHOD: MethodSignature =
    MethodSignature::new("leaveBreadcrumb", "([BLcom/bugsnag/android/BreadcrumbType;)V");

/// Name plus JNI type signature of a managed method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MethodSignature
{
    /// Method name (`<init>` for constructors).
    pub name: &'static str,
    /// JNI descriptor, e.g. `([B[B[B)V`.
    pub descriptor: &'static str,
}

impl MethodSignature
{
    /// Pair a method name with its descriptor.
    pub const fn new(name: &'static str, descriptor: &'static str) -> Self
    {
        Self { name, descriptor }
    }
}

/// A native enum whose values correspond 1:1 to static constants of a managed enum class.
pub trait ManagedConstant: Copy + Sized + 'static
{
    /// Binary name of the managed enum class.
    const CLASS: &'static str;
    /// Field type descriptor of each constant (`L<class>;`).
    const DESCRIPTOR: &'static str;
    /// Every native value, in declaration order.
    const ALL: &'static [Self];

    /// Name of the managed constant for this value.
    fn constant_name(self) -> &'static str;

    /// Reverse lookup from a managed constant name.
    fn from_constant_name(name: &str) -> Option<Self>
    {
        Self::ALL.iter().copied().find(|value| value.constant_name() == name)
    }
}
