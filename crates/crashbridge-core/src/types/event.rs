use super::{Severity, StackFrame};

/// A native error on its way to the managed notifier.
///
/// Lives only for the duration of one bridge call and is never persisted here.
#[derive(Debug, Clone, Copy)]
pub struct NotificationEvent<'a>
{
    /// Error class / short name, as raw bytes.
    pub name: &'a [u8],
    /// Human-readable message, as raw bytes.
    pub message: &'a [u8],
    /// Report severity.
    pub severity: Severity,
    /// Captured frames, innermost first.
    pub stacktrace: &'a [StackFrame],
}

impl<'a> NotificationEvent<'a>
{
    /// Assemble an event.
    pub const fn new(name: &'a [u8], message: &'a [u8], severity: Severity, stacktrace: &'a [StackFrame]) -> Self
    {
        Self {
            name,
            message,
            severity,
            stacktrace,
        }
    }
}
