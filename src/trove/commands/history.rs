use uuid::Uuid;

use crate::error::Result;
use crate::model::HistoryEntry;
use crate::store::DocumentStore;

/// Full mutation history for a resource, oldest first.
pub fn run<S: DocumentStore>(store: &S, resource_uid: &Uuid) -> Result<Vec<HistoryEntry>> {
    store.get_history(resource_uid)
}
