//! Tests for the root heuristic

use std::collections::HashMap;
use std::ffi::CStr;
use std::fs;
use std::os::unix::fs::PermissionsExt;

use crashbridge_core::root::{
    PathProbe, RootEvidence, RootScanner, SysrootProbe, GUARDED_PATHS, GUARDED_WRITE_BITS, ROOT_ARTIFACT_PATHS,
};

const LOCKED_DIR: u32 = 0o040_755;

/// Probe over an in-memory table of path -> mode.
#[derive(Default)]
struct FakeFilesystem
{
    modes: HashMap<&'static CStr, u32>,
}

impl FakeFilesystem
{
    /// Every guarded path present and locked down; no artifacts.
    fn locked_down() -> Self
    {
        Self {
            modes: GUARDED_PATHS.iter().map(|path| (*path, LOCKED_DIR)).collect(),
        }
    }

    fn with(mut self, path: &'static CStr, mode: u32) -> Self
    {
        self.modes.insert(path, mode);
        self
    }
}

impl PathProbe for FakeFilesystem
{
    fn mode(&self, path: &CStr) -> Option<u32>
    {
        self.modes.get(path).copied()
    }
}

#[test]
fn test_clean_device_is_not_rooted()
{
    let scanner = RootScanner::with_probe(FakeFilesystem::locked_down());
    assert_eq!(scanner.scan(), None);
    assert!(!scanner.is_rooted());
}

#[test]
fn test_empty_filesystem_is_not_rooted()
{
    assert!(!RootScanner::with_probe(FakeFilesystem::default()).is_rooted());
}

#[test]
fn test_every_artifact_is_detected()
{
    for path in ROOT_ARTIFACT_PATHS {
        let scanner = RootScanner::with_probe(FakeFilesystem::locked_down().with(path, 0o100_755));
        assert_eq!(scanner.scan(), Some(RootEvidence::Artifact(path)), "{path:?}");
    }
}

#[test]
fn test_artifact_of_any_file_type_counts()
{
    // Symlink, character device, socket: existence is all that matters.
    for mode in [0o120_777, 0o020_600, 0o140_000, 0] {
        let scanner = RootScanner::with_probe(FakeFilesystem::default().with(c"/su/bin", mode));
        assert!(scanner.is_rooted(), "mode {mode:o}");
    }
}

#[test]
fn test_group_writable_guarded_path_is_detected()
{
    for path in GUARDED_PATHS {
        let scanner = RootScanner::with_probe(FakeFilesystem::locked_down().with(path, 0o040_775));
        assert_eq!(scanner.scan(), Some(RootEvidence::WritablePath { path, mode: 0o040_775 }), "{path:?}");
    }
}

#[test]
fn test_world_writable_guarded_path_is_detected()
{
    let scanner = RootScanner::with_probe(FakeFilesystem::locked_down().with(c"/etc", 0o040_757));
    assert!(scanner.is_rooted());
}

#[test]
fn test_owner_write_is_not_evidence()
{
    let scanner = RootScanner::with_probe(FakeFilesystem::locked_down().with(c"/system", 0o040_700));
    assert!(!scanner.is_rooted());
    assert_eq!(GUARDED_WRITE_BITS & 0o700, 0);
}

#[test]
fn test_artifacts_are_checked_before_writable_paths()
{
    let filesystem = FakeFilesystem::locked_down()
        .with(c"/system/bin", 0o040_777)
        .with(c"/system/app/SuperSU", 0o040_755)
        .with(c"/su/bin", 0o040_755);

    let scanner = RootScanner::with_probe(filesystem);

    // First artifact in list order wins
    assert_eq!(scanner.scan(), Some(RootEvidence::Artifact(c"/system/app/SuperSU")));
}

#[test]
fn test_evidence_display()
{
    let artifact = RootEvidence::Artifact(c"/system/xbin/su");
    assert_eq!(artifact.to_string(), "root artifact present: /system/xbin/su");

    let writable = RootEvidence::WritablePath {
        path: c"/vendor/bin",
        mode: 0o040_777,
    };
    assert_eq!(writable.to_string(), "guarded path is writable: /vendor/bin (mode 777)");
}

#[test]
fn test_sysroot_without_evidence()
{
    let root = tempfile::tempdir().unwrap();
    for path in ["system/bin", "vendor/bin", "sbin", "etc"] {
        fs::create_dir_all(root.path().join(path)).unwrap();
    }
    for path in ["system", "system/bin", "vendor/bin", "sbin", "etc"] {
        fs::set_permissions(root.path().join(path), fs::Permissions::from_mode(0o755)).unwrap();
    }

    let scanner = RootScanner::with_probe(SysrootProbe::new(root.path()));

    assert_eq!(scanner.scan(), None);
}

#[test]
fn test_sysroot_with_su_binary()
{
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("system/xbin")).unwrap();
    fs::write(root.path().join("system/xbin/su"), b"").unwrap();

    let scanner = RootScanner::with_probe(SysrootProbe::new(root.path()));

    assert_eq!(scanner.scan(), Some(RootEvidence::Artifact(c"/system/xbin/su")));
}

#[test]
fn test_sysroot_with_dangling_symlink_artifact()
{
    let root = tempfile::tempdir().unwrap();
    fs::create_dir_all(root.path().join("su")).unwrap();
    std::os::unix::fs::symlink("/nonexistent/target", root.path().join("su/bin")).unwrap();

    let scanner = RootScanner::with_probe(SysrootProbe::new(root.path()));

    assert_eq!(scanner.scan(), Some(RootEvidence::Artifact(c"/su/bin")));
}

#[test]
fn test_sysroot_with_writable_etc()
{
    let root = tempfile::tempdir().unwrap();
    let etc = root.path().join("etc");
    fs::create_dir_all(&etc).unwrap();
    fs::set_permissions(&etc, fs::Permissions::from_mode(0o775)).unwrap();

    let evidence = RootScanner::with_probe(SysrootProbe::new(root.path())).scan();

    match evidence {
        Some(RootEvidence::WritablePath { path, mode }) => {
            assert_eq!(path, c"/etc");
            assert_eq!(mode & 0o777, 0o775);
        }
        other => panic!("expected writable /etc, got {other:?}"),
    }
}

#[test]
fn test_live_scan_does_not_panic()
{
    // Result depends on the host; the call itself must always succeed.
    let _ = crashbridge_core::is_rooted();
}
