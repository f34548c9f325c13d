use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::symbols::ManagedConstant;

/// Category of a breadcrumb left from native code.
///
/// [`BreadcrumbType::Manual`] is the default: any tag the bridge does not
/// recognize, whether a raw ordinal or a name, becomes `Manual`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BreadcrumbType
{
    /// A user action, such as tapping a button
    User,
    /// An error was reported
    Error,
    /// A log message
    Log,
    /// A navigation change
    Navigation,
    /// A change in process state
    Process,
    /// A network request
    Request,
    /// A change in application state
    State,
    /// Anything else
    #[default]
    Manual,
}

impl BreadcrumbType
{
    /// Map a raw C enum value (`BSG_CRUMB_*`, declared alphabetically).
    pub const fn from_raw(raw: i32) -> Self
    {
        match raw {
            0 => BreadcrumbType::Error,
            1 => BreadcrumbType::Log,
            3 => BreadcrumbType::Navigation,
            4 => BreadcrumbType::Process,
            5 => BreadcrumbType::Request,
            6 => BreadcrumbType::State,
            7 => BreadcrumbType::User,
            _ => BreadcrumbType::Manual,
        }
    }

    /// Raw C enum value.
    pub const fn raw(self) -> i32
    {
        match self {
            BreadcrumbType::Error => 0,
            BreadcrumbType::Log => 1,
            BreadcrumbType::Manual => 2,
            BreadcrumbType::Navigation => 3,
            BreadcrumbType::Process => 4,
            BreadcrumbType::Request => 5,
            BreadcrumbType::State => 6,
            BreadcrumbType::User => 7,
        }
    }
}

impl ManagedConstant for BreadcrumbType
{
    const CLASS: &'static str = "com/bugsnag/android/BreadcrumbType";
    const DESCRIPTOR: &'static str = "Lcom/bugsnag/android/BreadcrumbType;";
    const ALL: &'static [Self] = &[
        BreadcrumbType::User,
        BreadcrumbType::Error,
        BreadcrumbType::Log,
        BreadcrumbType::Navigation,
        BreadcrumbType::Process,
        BreadcrumbType::Request,
        BreadcrumbType::State,
        BreadcrumbType::Manual,
    ];

    fn constant_name(self) -> &'static str
    {
        match self {
            BreadcrumbType::User => "USER",
            BreadcrumbType::Error => "ERROR",
            BreadcrumbType::Log => "LOG",
            BreadcrumbType::Navigation => "NAVIGATION",
            BreadcrumbType::Process => "PROCESS",
            BreadcrumbType::Request => "REQUEST",
            BreadcrumbType::State => "STATE",
            BreadcrumbType::Manual => "MANUAL",
        }
    }
}

/// Case-insensitive; unknown names fall back to [`BreadcrumbType::Manual`].
impl FromStr for BreadcrumbType
{
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        Ok(Self::from_constant_name(&s.to_uppercase()).unwrap_or_default())
    }
}

impl fmt::Display for BreadcrumbType
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.constant_name())
    }
}
