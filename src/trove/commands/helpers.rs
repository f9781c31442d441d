use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::error::{Result, TroveError};
use crate::model::Resource;
use crate::store::DocumentStore;

/// Fail with `ConcurrentModification` unless `resource` is still the stored
/// current record. Mutations call this before doing any work so a stale
/// snapshot can never chain a history entry off the wrong predecessor.
pub fn assert_current<S: DocumentStore>(store: &S, resource: &Resource) -> Result<()> {
    let current = store.get_resource(&resource.uid)?;
    if &current != resource {
        return Err(TroveError::ConcurrentModification(resource.uid));
    }
    Ok(())
}

/// Timestamp for a new history entry, strictly after every existing entry
/// for the resource. When the wall clock has not advanced past the last
/// entry, the time is bumped by a microsecond instead.
pub fn mutation_time<S: DocumentStore>(store: &S, uid: &Uuid) -> Result<DateTime<Utc>> {
    let now = Utc::now();
    match store.get_history(uid)?.last().map(|e| e.time) {
        Some(last) if now <= last => Ok(last + Duration::microseconds(1)),
        _ => Ok(now),
    }
}
