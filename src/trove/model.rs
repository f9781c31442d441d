use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::path;

/// Free-form keyword parameters, opaque to the stores.
pub type Kwargs = serde_json::Map<String, serde_json::Value>;

/// A registered pointer to one or more files on a storage backend.
///
/// The absolute location is the join of `root` and `resource_path`; mutations
/// never edit a record in place but produce a superseding record with the
/// same `uid`, so history entries can hold old/new snapshots without aliasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub uid: Uuid,
    /// Type tag selecting a handler capability.
    pub spec: String,
    /// Absolute path prefix designating the storage root.
    pub root: PathBuf,
    /// Path relative to `root` at which the resource's files live.
    pub resource_path: PathBuf,
    /// Resource-specific configuration (e.g. filename format templates).
    pub resource_kwargs: Kwargs,
}

impl Resource {
    pub fn new(
        spec: impl Into<String>,
        resource_path: impl Into<PathBuf>,
        resource_kwargs: Kwargs,
        root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            uid: Uuid::new_v4(),
            spec: spec.into(),
            root: root.into(),
            resource_path: resource_path.into(),
            resource_kwargs,
        }
    }

    /// The absolute location of the resource's files.
    pub fn absolute_path(&self) -> PathBuf {
        path::join(&self.root, &self.resource_path)
    }
}

/// A single addressable data point within a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub datum_id: Uuid,
    /// The owning resource. A reference, not ownership.
    pub resource_uid: Uuid,
    /// Parameters the resource's handler uses to locate this element.
    pub datum_kwargs: Kwargs,
}

impl Datum {
    pub fn new(resource_uid: Uuid, datum_id: Option<Uuid>, datum_kwargs: Kwargs) -> Self {
        Self {
            datum_id: datum_id.unwrap_or_else(Uuid::new_v4),
            resource_uid,
            datum_kwargs,
        }
    }
}

/// Mutation names as they appear in the history ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationCmd {
    ShiftRoot,
    ChangeRoot,
}

/// One immutable record of a mutation applied to a resource.
///
/// For a given `resource_uid`, entries in time order form an unbroken chain:
/// entry i's `new` equals entry i+1's `old`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub resource_uid: Uuid,
    pub time: DateTime<Utc>,
    pub cmd: MutationCmd,
    /// The arguments passed to the mutation.
    pub cmd_kwargs: Kwargs,
    /// Full prior resource snapshot.
    pub old: Resource,
    /// Full resulting resource snapshot.
    pub new: Resource,
}

impl HistoryEntry {
    pub fn new(
        time: DateTime<Utc>,
        cmd: MutationCmd,
        cmd_kwargs: Kwargs,
        old: Resource,
        new: Resource,
    ) -> Self {
        Self {
            resource_uid: old.uid,
            time,
            cmd,
            cmd_kwargs,
            old,
            new,
        }
    }
}

/// Build a `Kwargs` map from key/value pairs.
pub fn kwargs<I, K>(pairs: I) -> Kwargs
where
    I: IntoIterator<Item = (K, serde_json::Value)>,
    K: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v)).collect()
}

/// Path as a kwargs value, using the platform's lossy string form.
pub fn path_value(p: &Path) -> serde_json::Value {
    serde_json::Value::String(p.to_string_lossy().into_owned())
}
