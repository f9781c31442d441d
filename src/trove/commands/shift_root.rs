use crate::commands::helpers;
use crate::error::Result;
use crate::model::{kwargs, HistoryEntry, MutationCmd, Resource};
use crate::path;
use crate::store::DocumentStore;

/// Move the root / resource-path boundary by `shift` segments.
///
/// Pure bookkeeping: no filesystem I/O, the absolute location is unchanged.
/// The caller's snapshot must be the current record; the superseding record
/// and one ledger entry are persisted together, or nothing is.
pub fn run<S: DocumentStore>(
    store: &mut S,
    resource: &Resource,
    shift: i64,
) -> Result<(Resource, HistoryEntry)> {
    helpers::assert_current(store, resource)?;

    let (root, resource_path) = path::shift(&resource.root, &resource.resource_path, shift)?;
    let new_resource = Resource {
        root,
        resource_path,
        ..resource.clone()
    };

    let entry = HistoryEntry::new(
        helpers::mutation_time(store, &resource.uid)?,
        MutationCmd::ShiftRoot,
        kwargs([("shift", serde_json::json!(shift))]),
        resource.clone(),
        new_resource.clone(),
    );

    store.replace_resource(resource, &new_resource)?;
    store.append_history(&entry)?;
    log::debug!(
        "shift_root({}) on {}: root is now {}",
        shift,
        resource.uid,
        new_resource.root.display()
    );
    Ok((new_resource, entry))
}
