//! File and folder helpers around the format codecs
//!
//! These are thin I/O wrappers: verify that files survive a parse/build
//! round trip, and unpack or pack resource archives to and from a directory.

use crate::AcrossFormat;
use crate::error::{FormatError, Result};
use crate::resource::{ResourceArchive, ResourceArchiveBuilder};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Outcome of verifying one file
#[derive(Debug)]
pub struct VerifyReport {
    /// File that was checked
    pub path: PathBuf,
    /// Failure, if any
    pub error: Option<FormatError>,
}

impl VerifyReport {
    /// Whether the file round-tripped
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Read `path` and check that it parses and rebuilds to identical bytes
pub fn verify_file<F: AcrossFormat>(path: impl AsRef<Path>) -> Result<()> {
    let data = fs::read(path.as_ref())?;
    F::verify_round_trip(&data)
}

/// Verify every file under `dir` whose extension matches `extension`
/// (case-insensitive, with or without the leading dot).
///
/// Failures are reported per file and never stop the scan. Entries that
/// cannot be visited are skipped.
pub fn verify_folder<F: AcrossFormat>(dir: impl AsRef<Path>, extension: &str) -> Vec<VerifyReport> {
    let extension = extension.trim_start_matches('.');
    let mut reports = Vec::new();

    for entry in WalkDir::new(dir.as_ref())
        .sort_by_file_name()
        .into_iter()
        .flatten()
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let matches = entry
            .path()
            .extension()
            .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(extension));
        if !matches {
            continue;
        }

        let path = entry.into_path();
        let error = verify_file::<F>(&path).err();
        match &error {
            None => debug!(path = %path.display(), "OK"),
            Some(e) => warn!(path = %path.display(), error = %e, "FAILED"),
        }
        reports.push(VerifyReport { path, error });
    }

    let failed = reports.iter().filter(|r| !r.is_ok()).count();
    info!(
        dir = %dir.as_ref().display(),
        checked = reports.len(),
        failed,
        "verified folder"
    );
    reports
}

/// Create `path` and its parents; succeeds if it already is a directory
pub fn ensure_dir(path: impl AsRef<Path>) -> Result<()> {
    fs::create_dir_all(path)?;
    Ok(())
}

/// Extract every file of the archive at `archive_path` into `dir`.
///
/// Returns the number of files written. Names that would escape `dir` are
/// rejected.
pub fn unpack_archive(archive_path: impl AsRef<Path>, dir: impl AsRef<Path>) -> Result<usize> {
    let archive = ResourceArchive::parse(&fs::read(archive_path.as_ref())?)?;
    let dir = dir.as_ref();
    ensure_dir(dir)?;

    for file in &archive.files {
        let name = file.name.to_string_lossy();
        if name.is_empty() || name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(FormatError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("refusing to unpack resource named {name:?}"),
            )));
        }
        fs::write(dir.join(&*name), &file.data)?;
    }

    info!(
        archive = %archive_path.as_ref().display(),
        files = archive.files.len(),
        "unpacked resource archive"
    );
    Ok(archive.files.len())
}

/// Pack the regular files directly inside `dir` (no recursion) into an
/// archive at `archive_path`, in file name order.
///
/// Returns the number of files packed.
pub fn pack_archive(dir: impl AsRef<Path>, archive_path: impl AsRef<Path>) -> Result<usize> {
    let mut builder = ResourceArchiveBuilder::new();
    for entry in WalkDir::new(dir.as_ref())
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        builder = builder.add_file(&name, fs::read(entry.path())?)?;
    }

    let archive = builder.build()?;
    fs::write(archive_path.as_ref(), archive.build()?)?;

    info!(
        archive = %archive_path.as_ref().display(),
        files = archive.files.len(),
        "packed resource archive"
    );
    Ok(archive.files.len())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::level::{Level, LevelBuilder, ObjectType, Vertex};
    use crate::replay::Replay;
    use tempfile::TempDir;

    fn level_bytes() -> Vec<u8> {
        LevelBuilder::pot14()
            .add_polygon(vec![
                Vertex::new(0.0, 0.0),
                Vertex::new(1.0, 0.0),
                Vertex::new(1.0, 1.0),
            ])
            .add_object(0.5, 0.5, ObjectType::Start)
            .build()
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_verify_folder_reports_each_file() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("nested");
        ensure_dir(&nested).unwrap();

        fs::write(tmp.path().join("good.lev"), level_bytes()).unwrap();
        fs::write(nested.join("ALSO.LEV"), level_bytes()).unwrap();
        fs::write(tmp.path().join("broken.lev"), b"POT14 nope").unwrap();
        fs::write(tmp.path().join("ignored.rec"), b"whatever").unwrap();

        let reports = verify_folder::<Level>(tmp.path(), ".lev");
        assert_eq!(reports.len(), 3);
        assert_eq!(reports.iter().filter(|r| r.is_ok()).count(), 2);

        let broken = reports
            .iter()
            .find(|r| r.path.ends_with("broken.lev"))
            .unwrap();
        assert!(broken.error.is_some());

        let replays = verify_folder::<Replay>(tmp.path(), "rec");
        assert!(replays[0].error.is_some());
    }

    #[test]
    fn test_verify_missing_file() {
        let tmp = TempDir::new().unwrap();
        let err = verify_file::<Level>(tmp.path().join("absent.lev")).unwrap_err();
        assert!(matches!(err, FormatError::Io(_)));
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("a").join("b");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());

        let file = tmp.path().join("file");
        fs::write(&file, b"").unwrap();
        assert!(ensure_dir(&file).is_err());
    }

    #[test]
    fn test_pack_then_unpack() {
        let tmp = TempDir::new().unwrap();
        let source = tmp.path().join("source");
        ensure_dir(source.join("sub")).unwrap();
        fs::write(source.join("B.PCX"), b"second").unwrap();
        fs::write(source.join("A.PCX"), b"first").unwrap();
        fs::write(source.join("sub").join("C.PCX"), b"skipped").unwrap();

        let archive_path = tmp.path().join("out.res");
        assert_eq!(pack_archive(&source, &archive_path).unwrap(), 2);

        let archive = ResourceArchive::parse(&fs::read(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.files[0].name.as_bytes(), b"A.PCX");
        assert_eq!(archive.files[1].name.as_bytes(), b"B.PCX");

        let target = tmp.path().join("target");
        assert_eq!(unpack_archive(&archive_path, &target).unwrap(), 2);
        assert_eq!(fs::read(target.join("A.PCX")).unwrap(), b"first");
        assert_eq!(fs::read(target.join("B.PCX")).unwrap(), b"second");
        assert!(!target.join("C.PCX").exists());

        verify_file::<ResourceArchive>(&archive_path).unwrap();
    }

    #[test]
    fn test_unpack_rejects_path_names() {
        let tmp = TempDir::new().unwrap();
        let archive = ResourceArchiveBuilder::new()
            .add_file("../evil", b"x".to_vec())
            .unwrap()
            .build()
            .unwrap();
        let archive_path = tmp.path().join("evil.res");
        fs::write(&archive_path, archive.build().unwrap()).unwrap();

        let err = unpack_archive(&archive_path, tmp.path().join("out")).unwrap_err();
        assert!(matches!(err, FormatError::Io(_)));
    }
}
