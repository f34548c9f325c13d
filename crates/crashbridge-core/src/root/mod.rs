//! # Root Detection
//!
//! A best-effort filesystem heuristic that flags a likely rooted device.
//!
//! Two independent checks run in order, and the scan stops at the first hit:
//!
//! 1. **Known artifacts**: any of [`ROOT_ARTIFACT_PATHS`] exists. Existence
//!    means "`lstat` succeeded", whatever the file type, so symlinks and
//!    special files count.
//! 2. **Writable system paths**: any of [`GUARDED_PATHS`] has a write bit in
//!    [`GUARDED_WRITE_BITS`] set.
//!
//! A path that cannot be stat'd is treated as absent / not writable. The
//! result is recomputed on every call.
//!
//! ## Example
//!
//! ```rust
//! use crashbridge_core::root::{self, RootScanner, SysrootProbe};
//!
//! // Scan the real filesystem.
//! let _rooted = root::is_rooted();
//!
//! // Scan a mounted image instead.
//! let scanner = RootScanner::with_probe(SysrootProbe::new("/mnt/image"));
//! let _evidence = scanner.scan();
//! ```

pub mod probe;

use std::ffi::CStr;
use std::fmt;

pub use probe::{LstatProbe, PathProbe, SysrootProbe};
use tracing::debug;

/// Paths left behind by root-management tools, checked in order.
pub const ROOT_ARTIFACT_PATHS: [&CStr; 8] = [
    // Common binaries
    c"/system/xbin/su",
    c"/system/bin/su",
    // Root manager packages before Android 5.0
    c"/system/app/Superuser.apk",
    c"/system/app/SuperSU.apk",
    // Root manager packages from Android 5.0
    c"/system/app/Superuser",
    c"/system/app/SuperSU",
    // Fallback daemon
    c"/system/xbin/daemonsu",
    // Systemless root
    c"/su/bin",
];

/// Paths that must not be writable beyond their owner on a locked-down device.
pub const GUARDED_PATHS: [&CStr; 5] = [c"/system", c"/system/bin", c"/vendor/bin", c"/sbin", c"/etc"];

/// Group-write (`S_IWGRP`).
pub const GROUP_WRITE_BIT: u32 = 0o020;

/// Other-write (`S_IWOTH`).
pub const OTHER_WRITE_BIT: u32 = 0o002;

/// Mode bits that flag a guarded path as writable.
pub const GUARDED_WRITE_BITS: u32 = GROUP_WRITE_BIT | OTHER_WRITE_BIT;

/// The first piece of evidence a scan found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootEvidence
{
    /// A known root artifact exists.
    Artifact(&'static CStr),
    /// A guarded system path is group- or world-writable.
    WritablePath
    {
        /// The guarded path.
        path: &'static CStr,
        /// Its full mode bits.
        mode: u32,
    },
}

impl fmt::Display for RootEvidence
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        match self {
            RootEvidence::Artifact(path) => write!(f, "root artifact present: {}", path.to_string_lossy()),
            RootEvidence::WritablePath { path, mode } => {
                write!(f, "guarded path is writable: {} (mode {:o})", path.to_string_lossy(), mode & 0o7777)
            }
        }
    }
}

/// Runs the root heuristic against a [`PathProbe`].
#[derive(Debug, Clone, Default)]
pub struct RootScanner<P = LstatProbe>
{
    probe: P,
}

impl RootScanner<LstatProbe>
{
    /// Scanner over the live filesystem.
    pub fn new() -> Self
    {
        Self { probe: LstatProbe }
    }
}

impl<P: PathProbe> RootScanner<P>
{
    /// Scanner over a custom probe (sysroot, fixture, mock).
    pub fn with_probe(probe: P) -> Self
    {
        Self { probe }
    }

    /// Returns the first piece of root evidence, or `None` if nothing fired.
    pub fn scan(&self) -> Option<RootEvidence>
    {
        let evidence = self.find_artifact().or_else(|| self.find_writable_path());
        if let Some(evidence) = &evidence {
            debug!(%evidence, "root heuristic fired");
        }
        evidence
    }

    /// `true` if either check fires.
    pub fn is_rooted(&self) -> bool
    {
        self.scan().is_some()
    }

    fn find_artifact(&self) -> Option<RootEvidence>
    {
        ROOT_ARTIFACT_PATHS
            .iter()
            .copied()
            .find(|path| self.probe.mode(path).is_some())
            .map(RootEvidence::Artifact)
    }

    fn find_writable_path(&self) -> Option<RootEvidence>
    {
        GUARDED_PATHS.iter().copied().find_map(|path| {
            let mode = self.probe.mode(path)?;
            (mode & GUARDED_WRITE_BITS != 0).then_some(RootEvidence::WritablePath { path, mode })
        })
    }
}

/// Run the heuristic against the live filesystem.
///
/// Callable at any time, independent of bridge initialization, and never fails.
pub fn is_rooted() -> bool
{
    RootScanner::new().is_rooted()
}
