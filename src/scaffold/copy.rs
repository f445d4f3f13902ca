use tracing::{info, warn};

use super::materialize::materialize_with;
use super::report::{Report, ReportKind};
use crate::core::FsBackend;
use crate::error::{Op, Result, ScaffoldError};

/// Replays every regular file of `src` onto `dest` in walk order.
///
/// Directories are not created explicitly, so a source directory without files beneath it
/// is not reproduced. The first walk, read or write failure aborts the copy; files copied
/// before it stay in `dest`.
pub(crate) fn copy_tree_with<S: FsBackend, D: FsBackend>(
    src: &S,
    dest: &mut D,
    mode: u32,
) -> Result<Report> {
    let mut report = Report::new(ReportKind::Copy);

    let walked = src.walk("/", &mut |entry| {
        if entry.is_dir() {
            report.add_dir();
            return Ok(());
        }
        let content = src
            .read(entry.path())
            .map_err(|e| ScaffoldError::io(Op::Read, entry.path(), e))?;
        materialize_with(dest, entry.path(), &content, mode)?;
        report.add_file(content.len() as u64);
        Ok(())
    });

    if let Err(e) = walked {
        let e = lift(e, "/");
        warn!(error = %e, copied = report.files, "copy aborted");
        return Err(e);
    }

    info!(dirs = report.dirs, files = report.files, bytes = report.bytes, "copied tree");
    Ok(report)
}

/// Recovers a `ScaffoldError` raised inside a walk visitor; anything else is a walk failure.
pub(crate) fn lift(err: anyhow::Error, root: &str) -> ScaffoldError {
    match err.downcast::<ScaffoldError>() {
        Ok(e) => e,
        Err(e) => ScaffoldError::io(Op::Walk, root, e),
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use anyhow::anyhow;
    use tempdir::TempDir;

    use super::*;
    use crate::scaffold::testing::RejectingFs;
    use crate::{DEFAULT_DIR_MODE, DirEntry, DirFS, MapFS};

    fn source_tree() -> anyhow::Result<MapFS> {
        let mut src = MapFS::new();
        for (path, content) in [
            ("file.txt", "root"),
            ("dir1/file.txt", "one"),
            ("dir2/file.txt", "two"),
            ("dir2/dir3/file.txt", "three"),
        ] {
            materialize_with(&mut src, path, content.as_bytes(), DEFAULT_DIR_MODE)?;
        }
        Ok(src)
    }

    fn files_of<F: FsBackend>(fs: &F) -> anyhow::Result<Vec<(PathBuf, Vec<u8>)>> {
        let mut files = Vec::new();
        fs.walk("/", &mut |entry: &DirEntry| {
            if entry.is_file() {
                files.push((entry.path().to_path_buf(), fs.read(entry.path())?));
            }
            Ok(())
        })?;
        Ok(files)
    }

    #[test]
    fn copies_every_file_between_memory_stores() -> anyhow::Result<()> {
        let src = source_tree()?;
        let mut dest = MapFS::new();
        let report = copy_tree_with(&src, &mut dest, DEFAULT_DIR_MODE)?;

        assert_eq!(report.files, 4);
        assert_eq!(report.dirs, 3);
        assert_eq!(report.bytes, 15);
        assert_eq!(files_of(&dest)?, files_of(&src)?);
        Ok(())
    }

    #[test]
    fn copies_host_directory_into_memory() -> anyhow::Result<()> {
        let temp_dir = TempDir::new("copy_test")?;
        let root = temp_dir.path();
        std::fs::create_dir_all(root.join("dir1"))?;
        std::fs::create_dir_all(root.join("dir2/dir3"))?;
        std::fs::write(root.join("file.txt"), b"file")?;
        std::fs::write(root.join("dir1/file.txt"), b"dir1")?;
        std::fs::write(root.join("dir2/file.txt"), b"dir2")?;
        std::fs::write(root.join("dir2/dir3/file.txt"), b"dir3")?;

        let src = DirFS::new(root)?;
        let mut dest = MapFS::new();
        copy_tree_with(&src, &mut dest, DEFAULT_DIR_MODE)?;

        let copied = files_of(&dest)?;
        let paths: Vec<_> = copied.iter().map(|(p, _)| p.to_str()).collect();
        assert_eq!(
            paths,
            vec![
                Some("dir1/file.txt"),
                Some("dir2/dir3/file.txt"),
                Some("dir2/file.txt"),
                Some("file.txt")
            ]
        );
        assert_eq!(copied, files_of(&src)?);
        Ok(())
    }

    #[test]
    fn copies_memory_into_host_directory() -> anyhow::Result<()> {
        let temp_dir = TempDir::new("copy_test")?;
        let src = source_tree()?;
        let mut dest = DirFS::new(temp_dir.path())?;
        copy_tree_with(&src, &mut dest, DEFAULT_DIR_MODE)?;
        assert_eq!(
            std::fs::read(temp_dir.path().join("dir2/dir3/file.txt"))?,
            b"three"
        );
        assert_eq!(files_of(&dest)?, files_of(&src)?);
        Ok(())
    }

    #[test]
    fn empty_directories_are_not_reproduced() -> anyhow::Result<()> {
        let mut src = source_tree()?;
        src.mkdir_all("/empty/nested", DEFAULT_DIR_MODE)?;
        let mut dest = MapFS::new();
        let report = copy_tree_with(&src, &mut dest, DEFAULT_DIR_MODE)?;
        assert_eq!(report.dirs, 5);
        assert!(!dest.exists("/empty"));
        Ok(())
    }

    #[test]
    fn repeated_copies_are_identical() -> anyhow::Result<()> {
        let src = source_tree()?;
        let mut first = MapFS::new();
        let mut second = MapFS::new();
        copy_tree_with(&src, &mut first, DEFAULT_DIR_MODE)?;
        copy_tree_with(&src, &mut second, DEFAULT_DIR_MODE)?;
        assert_eq!(files_of(&first)?, files_of(&second)?);

        // copying again over an existing destination changes nothing
        copy_tree_with(&src, &mut first, DEFAULT_DIR_MODE)?;
        assert_eq!(files_of(&first)?, files_of(&second)?);
        Ok(())
    }

    #[test]
    fn rejected_write_stops_the_copy() -> anyhow::Result<()> {
        let src = source_tree()?;
        let mut dest = RejectingFs::new(MapFS::new(), "dir2/dir3/file.txt");
        let err = copy_tree_with(&src, &mut dest, DEFAULT_DIR_MODE).unwrap_err();

        assert_eq!(err.op(), Some(Op::Create));
        assert_eq!(
            err.io_error().map(|e| e.kind()),
            Some(std::io::ErrorKind::StorageFull)
        );
        // walk order: dir1/file.txt, dir2/dir3/file.txt, dir2/file.txt, file.txt
        assert_eq!(dest.inner.read("dir1/file.txt")?, b"one");
        assert!(!dest.inner.exists("dir2/file.txt"));
        assert!(!dest.inner.exists("file.txt"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn copies_non_utf8_host_names() -> anyhow::Result<()> {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new("copy_test")?;
        let name = OsStr::from_bytes(b"caf\xe9.txt");
        std::fs::create_dir(temp_dir.path().join("dir"))?;
        std::fs::write(temp_dir.path().join("dir").join(name), b"latin-1")?;
        std::fs::write(temp_dir.path().join("plain.txt"), b"plain")?;

        let src = DirFS::new(temp_dir.path())?;
        let mut dest = MapFS::new();
        let report = copy_tree_with(&src, &mut dest, DEFAULT_DIR_MODE)?;

        assert_eq!(report.files, 2);
        assert_eq!(dest.read(Path::new("dir").join(name))?, b"latin-1");
        assert_eq!(files_of(&dest)?, files_of(&src)?);

        let out_dir = TempDir::new("copy_test")?;
        let mut host_dest = DirFS::new(out_dir.path())?;
        copy_tree_with(&dest, &mut host_dest, DEFAULT_DIR_MODE)?;
        assert_eq!(std::fs::read(out_dir.path().join("dir").join(name))?, b"latin-1");
        Ok(())
    }

    #[test]
    fn walk_failure_is_reported_as_walk() {
        let err = lift(anyhow!("broken listing"), "/");
        assert_eq!(err.op(), Some(Op::Walk));
        let err = lift(ScaffoldError::InvalidPath("x".into()).into(), "/");
        assert!(matches!(err, ScaffoldError::InvalidPath(_)));
    }
}
