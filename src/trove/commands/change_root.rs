use std::path::{Path, PathBuf};

use crate::commands::helpers;
use crate::error::{Result, TroveError};
use crate::handlers::HandlerRegistry;
use crate::model::{kwargs, path_value, HistoryEntry, Kwargs, MutationCmd, Resource};
use crate::mover;
use crate::path;
use crate::store::DocumentStore;

/// Physically relocate a resource's files to `new_root`.
///
/// The file set comes from the resource's handler when it can enumerate its
/// own files, otherwise from walking the resource directory. Originals are
/// deleted only after every copy is verified and only when `remove_origin`;
/// a failed copy aborts before any deletion and before any record or ledger
/// write, so the registry never reflects an incomplete move.
pub fn run<S: DocumentStore>(
    store: &mut S,
    registry: &HandlerRegistry,
    resource: &Resource,
    new_root: &Path,
    remove_origin: bool,
) -> Result<(Resource, HistoryEntry)> {
    helpers::assert_current(store, resource)?;

    let new_resource = Resource {
        root: new_root.to_path_buf(),
        ..resource.clone()
    };

    let src_base = resource.absolute_path();
    let dst_base = new_resource.absolute_path();
    match handler_file_list(store, registry, resource)? {
        Some(rel_files) => mover::move_files(&src_base, &dst_base, &rel_files, remove_origin)?,
        None => mover::move_tree(
            &resource.root,
            new_root,
            &resource.resource_path,
            remove_origin,
        )?,
    };

    let entry = HistoryEntry::new(
        helpers::mutation_time(store, &resource.uid)?,
        MutationCmd::ChangeRoot,
        kwargs([
            ("new_root", path_value(new_root)),
            ("remove_origin", serde_json::json!(remove_origin)),
        ]),
        resource.clone(),
        new_resource.clone(),
    );

    store.replace_resource(resource, &new_resource)?;
    store.append_history(&entry)?;
    log::info!(
        "change_root on {}: {} -> {}",
        resource.uid,
        resource.root.display(),
        new_root.display()
    );
    Ok((new_resource, entry))
}

/// Ask the resource's handler which files the registered datums refer to,
/// returned relative to the resource's absolute path. `None` when no handler
/// is registered or the handler cannot enumerate.
fn handler_file_list<S: DocumentStore>(
    store: &S,
    registry: &HandlerRegistry,
    resource: &Resource,
) -> Result<Option<Vec<PathBuf>>> {
    if !registry.is_registered(&resource.spec) {
        return Ok(None);
    }
    let base = resource.absolute_path();
    let handler = registry.make(&resource.spec, &base, &resource.resource_kwargs)?;
    let datum_kwargs: Vec<Kwargs> = store
        .datums_for_resource(&resource.uid)?
        .into_iter()
        .map(|d| d.datum_kwargs)
        .collect();

    match handler.file_list(&datum_kwargs) {
        None => Ok(None),
        Some(files) => files
            .iter()
            .map(|f| {
                path::split(&base, f)
                    .map(|(_, rel)| rel)
                    .map_err(|_| {
                        TroveError::Store(format!(
                            "handler file {} is outside {}",
                            f.display(),
                            base.display()
                        ))
                    })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::insert;
    use crate::store::memory::InMemoryStore;
    use std::fs;

    fn seeded_resource(store: &mut InMemoryStore, root: &Path) -> Resource {
        let res = insert::resource(
            store,
            "raw_series",
            Path::new("2016/04/28"),
            Kwargs::new(),
            root,
        )
        .unwrap();
        let dir = res.absolute_path();
        fs::create_dir_all(&dir).unwrap();
        for j in 0..3 {
            fs::write(dir.join(format!("point_{}.dat", j)), j.to_string()).unwrap();
        }
        res
    }

    #[test]
    fn files_move_and_record_supersedes() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = InMemoryStore::new();
        let res = seeded_resource(&mut store, tmp.path());
        let new_root = tmp.path().join("archive");

        let (moved, entry) = run(
            &mut store,
            &HandlerRegistry::new(),
            &res,
            &new_root,
            true,
        )
        .unwrap();

        assert_eq!(moved.root, new_root);
        assert_eq!(moved.resource_path, res.resource_path);
        for j in 0..3 {
            let rel = format!("2016/04/28/point_{}.dat", j);
            assert!(new_root.join(&rel).exists());
            assert!(!tmp.path().join(&rel).exists());
        }
        assert_eq!(entry.cmd, MutationCmd::ChangeRoot);
        assert_eq!(entry.cmd_kwargs["remove_origin"], serde_json::json!(true));
        assert_eq!(store.get_resource(&res.uid).unwrap(), moved);
        assert_eq!(store.get_history(&res.uid).unwrap(), vec![entry]);
    }

    #[test]
    fn partial_failure_changes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut store = InMemoryStore::new();
        let res = seeded_resource(&mut store, tmp.path());
        let new_root = tmp.path().join("archive");

        // Occupy one destination file so the copy set cannot complete.
        let blocked = new_root.join("2016/04/28/point_1.dat");
        fs::create_dir_all(blocked.parent().unwrap()).unwrap();
        fs::write(&blocked, "occupied").unwrap();

        let err = run(
            &mut store,
            &HandlerRegistry::new(),
            &res,
            &new_root,
            true,
        )
        .unwrap_err();
        assert!(matches!(err, TroveError::PartialMove { .. }));

        // Record, history, and every source file are untouched.
        assert_eq!(store.get_resource(&res.uid).unwrap(), res);
        assert!(store.get_history(&res.uid).unwrap().is_empty());
        for j in 0..3 {
            assert!(res.absolute_path().join(format!("point_{}.dat", j)).exists());
        }
    }
}
