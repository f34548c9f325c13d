use std::fmt;
use std::str::FromStr;

use crate::symbols::ManagedConstant;

/// Severity of a native notification.
///
/// The ordinals match the C enum exposed to native callers
/// (`BSG_SEVERITY_ERR`, `BSG_SEVERITY_WARN`, `BSG_SEVERITY_INFO`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity
{
    /// An error that should be prioritised
    Error,
    /// Something unexpected but recoverable
    Warning,
    /// Informational report
    Info,
}

impl Severity
{
    /// Map a raw C enum value. Anything unrecognized is reported as [`Severity::Info`].
    pub const fn from_raw(raw: i32) -> Self
    {
        match raw {
            0 => Severity::Error,
            1 => Severity::Warning,
            _ => Severity::Info,
        }
    }

    /// Raw C enum value.
    pub const fn raw(self) -> i32
    {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

impl ManagedConstant for Severity
{
    const CLASS: &'static str = "com/bugsnag/android/Severity";
    const DESCRIPTOR: &'static str = "Lcom/bugsnag/android/Severity;";
    const ALL: &'static [Self] = &[Severity::Error, Severity::Warning, Severity::Info];

    fn constant_name(self) -> &'static str
    {
        match self {
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Info => "INFO",
        }
    }
}

impl FromStr for Severity
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            _ => Err(format!("Unknown severity: {s}. Use 'error', 'warning', or 'info'")),
        }
    }
}

impl fmt::Display for Severity
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.constant_name())
    }
}
