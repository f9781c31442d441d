//! Pure path math for the root / resource-path split.
//!
//! A resource's absolute location is `join(root, resource_path)`. Shifting
//! moves segments across that boundary without ever changing the join; that
//! invariant is what makes a root shift a pure bookkeeping operation.

use std::path::{Component, Path, PathBuf};

use crate::error::{Result, TroveError};

/// Join a root and a relative path into a normalized absolute path.
///
/// Either side may be empty; the join of a valid record is always absolute.
pub fn join(root: &Path, resource_path: &Path) -> PathBuf {
    root.components().chain(resource_path.components()).collect()
}

/// Restate `full_path` as a `(root, resource_path)` pair. Validation only:
/// fails if `full_path` does not live under `root`.
pub fn split(root: &Path, full_path: &Path) -> Result<(PathBuf, PathBuf)> {
    let rel = full_path.strip_prefix(root).map_err(|_| {
        TroveError::Store(format!(
            "{} is not under root {}",
            full_path.display(),
            root.display()
        ))
    })?;
    Ok((root.to_path_buf(), rel.to_path_buf()))
}

/// Move `|delta|` segments across the root / resource-path boundary.
///
/// `delta > 0` moves leading segments of `resource_path` into `root`;
/// `delta < 0` moves trailing segments of `root` out into `resource_path`.
/// Fails with `OutOfRangeShift` when the requested side does not have enough
/// segments (a delta of zero is rejected the same way). The join of the
/// returned pair always equals the join of the inputs.
pub fn shift(root: &Path, resource_path: &Path, delta: i64) -> Result<(PathBuf, PathBuf)> {
    // Prefix/RootDir components stay glued to the root side; only Normal
    // segments are movable.
    let mut anchor: Vec<Component> = Vec::new();
    let mut root_segs: Vec<Component> = Vec::new();
    for c in root.components() {
        match c {
            Component::Normal(_) => root_segs.push(c),
            _ => anchor.push(c),
        }
    }
    let mut rel_segs: Vec<Component> = resource_path.components().collect();

    if delta > 0 {
        let n = delta as usize;
        if n > rel_segs.len() {
            return Err(TroveError::OutOfRangeShift {
                delta,
                available: rel_segs.len(),
            });
        }
        root_segs.extend(rel_segs.drain(..n));
    } else {
        let n = delta.unsigned_abs() as usize;
        if n == 0 || n > root_segs.len() {
            return Err(TroveError::OutOfRangeShift {
                delta,
                available: root_segs.len(),
            });
        }
        let mut moved = root_segs.split_off(root_segs.len() - n);
        moved.extend(rel_segs);
        rel_segs = moved;
    }

    let new_root: PathBuf = anchor.iter().chain(root_segs.iter()).collect();
    let new_rel: PathBuf = rel_segs.iter().collect();
    Ok((new_root, new_rel))
}
