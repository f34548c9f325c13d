//! Filesystem probes used by the root scanner.

use std::ffi::CStr;
use std::mem::MaybeUninit;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};

/// Source of `lstat`-style mode bits for a path.
///
/// Returning `None` means "could not stat", which the scanner reads as
/// "does not exist" / "not writable".
pub trait PathProbe
{
    /// Mode bits of `path` without following a trailing symlink.
    fn mode(&self, path: &CStr) -> Option<u32>;
}

/// Probe backed directly by `lstat(2)`.
///
/// Performs no allocation, so it is safe to run from a crash handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct LstatProbe;

impl PathProbe for LstatProbe
{
    #[allow(clippy::unnecessary_cast)] // mode_t is u16 on some targets
    fn mode(&self, path: &CStr) -> Option<u32>
    {
        let mut stat = MaybeUninit::<libc::stat>::uninit();
        // SAFETY: `path` is NUL-terminated and `stat` points to writable
        // storage of the right size.
        let rc = unsafe { libc::lstat(path.as_ptr(), stat.as_mut_ptr()) };
        if rc != 0 {
            return None;
        }
        // SAFETY: lstat returned 0, so the buffer was filled in.
        let stat = unsafe { stat.assume_init() };
        Some(stat.st_mode as u32)
    }
}

/// Probe that evaluates every path relative to another root directory.
///
/// Used to inspect a mounted system image (or a test fixture) with the same
/// path tables the device scan uses. Unlike [`LstatProbe`] this allocates.
#[derive(Debug, Clone)]
pub struct SysrootProbe
{
    root: PathBuf,
}

impl SysrootProbe
{
    /// Treat `root` as `/`.
    pub fn new(root: impl Into<PathBuf>) -> Self
    {
        Self { root: root.into() }
    }

    /// The directory standing in for `/`.
    pub fn root(&self) -> &Path
    {
        &self.root
    }

    fn rebase(&self, path: &CStr) -> PathBuf
    {
        let relative = Path::new(std::ffi::OsStr::from_bytes(path.to_bytes()));
        let relative = relative.strip_prefix("/").unwrap_or(relative);
        self.root.join(relative)
    }
}

impl PathProbe for SysrootProbe
{
    fn mode(&self, path: &CStr) -> Option<u32>
    {
        std::fs::symlink_metadata(self.rebase(path)).ok().map(|metadata| metadata.mode())
    }
}

impl<P: PathProbe + ?Sized> PathProbe for &P
{
    fn mode(&self, path: &CStr) -> Option<u32>
    {
        (**self).mode(path)
    }
}
