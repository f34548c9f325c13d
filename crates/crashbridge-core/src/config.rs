//! Bridge configuration.

use tracing::warn;

use crate::types::Architecture;

/// Default cap on captured frames.
pub const DEFAULT_MAX_FRAMES: usize = 192;

/// Environment variable overriding [`BridgeConfig::max_frames`].
pub const MAX_FRAMES_ENV: &str = "CRASHBRIDGE_MAX_FRAMES";

/// Process-wide bridge settings.
///
/// ## Example
///
/// ```rust
/// use crashbridge_core::config::BridgeConfig;
///
/// let config = BridgeConfig::default().with_max_frames(64);
/// assert_eq!(config.max_frames, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeConfig
{
    /// Most frames captured for one notification.
    pub max_frames: usize,
    /// Architecture reported to the managed side before each notification.
    pub binary_arch: Architecture,
}

impl Default for BridgeConfig
{
    fn default() -> Self
    {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            binary_arch: Architecture::current(),
        }
    }
}

impl BridgeConfig
{
    /// Defaults, with `CRASHBRIDGE_MAX_FRAMES` applied when set.
    pub fn from_env() -> Self
    {
        let max_frames = parse_max_frames(std::env::var(MAX_FRAMES_ENV).ok().as_deref());
        Self {
            max_frames,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: usize) -> Self
    {
        self.max_frames = max_frames;
        self
    }

    #[must_use]
    pub fn with_binary_arch(mut self, binary_arch: Architecture) -> Self
    {
        self.binary_arch = binary_arch;
        self
    }
}

fn parse_max_frames(raw: Option<&str>) -> usize
{
    let Some(raw) = raw else {
        return DEFAULT_MAX_FRAMES;
    };
    match raw.trim().parse() {
        Ok(max_frames) => max_frames,
        Err(error) => {
            warn!(value = raw, %error, "invalid {MAX_FRAMES_ENV}, using {DEFAULT_MAX_FRAMES}");
            DEFAULT_MAX_FRAMES
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_parse_max_frames()
    {
        assert_eq!(parse_max_frames(None), DEFAULT_MAX_FRAMES);
        assert_eq!(parse_max_frames(Some("64")), 64);
        assert_eq!(parse_max_frames(Some(" 8 ")), 8);
        assert_eq!(parse_max_frames(Some("lots")), DEFAULT_MAX_FRAMES);
        assert_eq!(parse_max_frames(Some("-1")), DEFAULT_MAX_FRAMES);
    }

    #[test]
    fn test_default_reports_current_arch()
    {
        assert_eq!(BridgeConfig::default().binary_arch, Architecture::current());
    }
}
