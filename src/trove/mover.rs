//! Physical relocation of a resource's files to a new root.
//!
//! Every file is copied to the same relative offset under the destination
//! root and verified there before any source file is deleted. A failed copy
//! never triggers deletion: callers get the per-file breakdown in
//! `PartialMove` and the sources stay untouched, so no mutation that did not
//! fully complete can ever be recorded.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, TroveError};

/// Copy every file under `join(src_root, relative_path)` to the same offset
/// under `join(dst_root, relative_path)`, then delete the sources if
/// `remove_origin`. Returns the `(source, destination)` pairs moved.
pub fn move_tree(
    src_root: &Path,
    dst_root: &Path,
    relative_path: &Path,
    remove_origin: bool,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let src_base = crate::path::join(src_root, relative_path);
    let dst_base = crate::path::join(dst_root, relative_path);

    let mut files = Vec::new();
    collect_files(&src_base, &mut files).map_err(TroveError::Io)?;
    let rel_files = files
        .iter()
        .map(|f| {
            f.strip_prefix(&src_base)
                .map(Path::to_path_buf)
                .map_err(|_| {
                    TroveError::Store(format!(
                        "{} is not under {}",
                        f.display(),
                        src_base.display()
                    ))
                })
        })
        .collect::<Result<Vec<_>>>()?;

    move_files(&src_base, &dst_base, &rel_files, remove_origin)
}

/// Move an explicit set of files, each given relative to `src_base`.
///
/// All copies are attempted; any failure aborts with `PartialMove` before
/// anything is deleted. Existing destination files are never overwritten.
pub fn move_files(
    src_base: &Path,
    dst_base: &Path,
    rel_files: &[PathBuf],
    remove_origin: bool,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut moved = Vec::new();
    let mut failed = Vec::new();

    for rel in rel_files {
        let src = src_base.join(rel);
        let dst = dst_base.join(rel);
        match copy_one(&src, &dst) {
            Ok(()) => moved.push((src, dst)),
            Err(e) => {
                log::warn!("copy {} -> {} failed: {}", src.display(), dst.display(), e);
                failed.push((src, e));
            }
        }
    }

    if !failed.is_empty() {
        return Err(TroveError::PartialMove { moved, failed });
    }

    if remove_origin {
        // Every destination has been verified; only now touch the sources.
        for (src, _) in &moved {
            fs::remove_file(src).map_err(TroveError::Io)?;
        }
        log::info!(
            "moved {} file(s) from {} to {}",
            moved.len(),
            src_base.display(),
            dst_base.display()
        );
    } else {
        log::info!(
            "copied {} file(s) from {} to {} (origin retained)",
            moved.len(),
            src_base.display(),
            dst_base.display()
        );
    }

    Ok(moved)
}

/// Copy one file and confirm it arrived intact.
fn copy_one(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", dst.display()),
        ));
    }
    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(src, dst)?;

    let src_len = fs::metadata(src)?.len();
    let dst_len = fs::metadata(dst)?.len();
    if src_len != dst_len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "{} has {} byte(s), expected {}",
                dst.display(),
                dst_len,
                src_len
            ),
        ));
    }
    log::debug!("copied {} -> {}", src.display(), dst.display());
    Ok(())
}

/// Recursively gather every file under `dir`.
fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_tree(base: &Path, files: &[(&str, &str)]) {
        for (rel, content) in files {
            let path = base.join(rel);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
    }

    #[test]
    fn move_tree_relocates_and_removes() {
        let dir = tempfile::tempdir().unwrap();
        let src_root = dir.path().join("old");
        let dst_root = dir.path().join("new");
        let rel = Path::new("a/b");
        write_tree(&src_root.join(rel), &[("one.dat", "1"), ("sub/two.dat", "22")]);

        let moved = move_tree(&src_root, &dst_root, rel, true).unwrap();
        assert_eq!(moved.len(), 2);
        assert_eq!(
            fs::read_to_string(dst_root.join("a/b/one.dat")).unwrap(),
            "1"
        );
        assert_eq!(
            fs::read_to_string(dst_root.join("a/b/sub/two.dat")).unwrap(),
            "22"
        );
        assert!(!src_root.join("a/b/one.dat").exists());
        assert!(!src_root.join("a/b/sub/two.dat").exists());
    }

    #[test]
    fn origin_is_kept_when_not_removing() {
        let dir = tempfile::tempdir().unwrap();
        let src_root = dir.path().join("old");
        let dst_root = dir.path().join("new");
        let rel = Path::new("series");
        write_tree(&src_root.join(rel), &[("one.dat", "1")]);

        move_tree(&src_root, &dst_root, rel, false).unwrap();
        assert!(src_root.join("series/one.dat").exists());
        assert!(dst_root.join("series/one.dat").exists());
    }

    #[test]
    fn occupied_destination_aborts_without_deleting() {
        let dir = tempfile::tempdir().unwrap();
        let src_root = dir.path().join("old");
        let dst_root = dir.path().join("new");
        let rel = Path::new("series");
        write_tree(&src_root.join(rel), &[("one.dat", "1"), ("two.dat", "2")]);
        // Pre-occupy one destination so its copy must fail.
        write_tree(&dst_root.join(rel), &[("two.dat", "stale")]);

        let err = move_tree(&src_root, &dst_root, rel, true).unwrap_err();
        match err {
            TroveError::PartialMove { moved, failed } => {
                assert_eq!(moved.len(), 1);
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].1.kind(), io::ErrorKind::AlreadyExists);
            }
            other => panic!("expected PartialMove, got {:?}", other),
        }
        // Nothing deleted, occupied file untouched.
        assert!(src_root.join("series/one.dat").exists());
        assert!(src_root.join("series/two.dat").exists());
        assert_eq!(
            fs::read_to_string(dst_root.join("series/two.dat")).unwrap(),
            "stale"
        );
    }
}
