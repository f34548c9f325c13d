use std::fmt;

/// CPU architecture the native library was built for
///
/// The notifier forwards this to the managed side before every native
/// notification so the report can be symbolicated against the right ABI.
///
/// ## Example
///
/// ```rust
/// use crashbridge_core::types::Architecture;
///
/// assert_eq!(Architecture::Arm64.identifier(), "arm64");
/// assert_eq!(Architecture::Arm32.to_string(), "arm32");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture
{
    /// 64-bit ARM (`arm64-v8a`)
    Arm64,
    /// 32-bit ARM (`armeabi-v7a`)
    Arm32,
    /// 32-bit x86
    X86,
    /// 64-bit x86
    X86_64,
    /// Anything else
    Unknown,
}

impl Architecture
{
    /// Architecture of the currently running binary, fixed at compile time.
    pub const fn current() -> Self
    {
        #[cfg(target_arch = "aarch64")]
        {
            Architecture::Arm64
        }

        #[cfg(target_arch = "arm")]
        {
            Architecture::Arm32
        }

        #[cfg(target_arch = "x86")]
        {
            Architecture::X86
        }

        #[cfg(target_arch = "x86_64")]
        {
            Architecture::X86_64
        }

        #[cfg(not(any(target_arch = "aarch64", target_arch = "arm", target_arch = "x86", target_arch = "x86_64")))]
        {
            Architecture::Unknown
        }
    }

    /// Identifier understood by the managed notifier.
    pub const fn identifier(self) -> &'static str
    {
        match self {
            Architecture::Arm64 => "arm64",
            Architecture::Arm32 => "arm32",
            Architecture::X86 => "x86",
            Architecture::X86_64 => "x86_64",
            Architecture::Unknown => "unknown",
        }
    }
}

impl Default for Architecture
{
    fn default() -> Self
    {
        Self::current()
    }
}

impl fmt::Display for Architecture
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(self.identifier())
    }
}
