//! # Storage Layer
//!
//! This module defines the persistence abstraction for trove. The
//! [`DocumentStore`] trait is the boundary to the document database the
//! registry runs against; the core treats it purely as durable keyed storage
//! with sorted retrieval over three logical collections:
//!
//! - **resources**: the *current* record per resource `uid`. Mutations
//!   supersede the record via [`DocumentStore::replace_resource`], a
//!   compare-and-swap; the prior snapshots live in the history collection,
//!   never aliased by later changes.
//! - **datums**: data points keyed by `datum_id`, each naming its owning
//!   resource.
//! - **history**: append-only mutation records per resource `uid`,
//!   retrievable oldest first in non-decreasing time order.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: production file-based storage, one JSON document file
//!   per collection under a data directory.
//! - [`memory::InMemoryStore`]: in-memory storage for testing; no
//!   persistence, fast isolated test execution.
//!
//! Implementations must never reorder, mutate, or drop history entries.

use crate::error::Result;
use crate::model::{Datum, HistoryEntry, Resource};
use uuid::Uuid;

pub mod fs;
pub mod memory;

/// Abstract interface to the backing document database.
pub trait DocumentStore {
    /// Register a new resource record. Fails with `AlreadyExists` if the uid
    /// is already registered.
    fn insert_resource(&mut self, resource: &Resource) -> Result<()>;

    /// Current (latest) record for a resource. Fails with `UnknownResource`.
    fn get_resource(&self, uid: &Uuid) -> Result<Resource>;

    /// Supersede the current record for `expected.uid` with `new`.
    ///
    /// Compare-and-swap: fails with `ConcurrentModification` when the stored
    /// current record no longer equals `expected`, so two concurrent
    /// mutations can never both chain off the same predecessor.
    fn replace_resource(&mut self, expected: &Resource, new: &Resource) -> Result<()>;

    /// Register a datum. Fails with `AlreadyExists` on a duplicate datum_id.
    fn insert_datum(&mut self, datum: &Datum) -> Result<()>;

    /// Look up a datum by id. Fails with `UnknownDatum`.
    fn get_datum(&self, datum_id: &Uuid) -> Result<Datum>;

    /// All datums registered against a resource, in insertion order.
    fn datums_for_resource(&self, uid: &Uuid) -> Result<Vec<Datum>>;

    /// Append one history entry. Entries are immutable once stored.
    fn append_history(&mut self, entry: &HistoryEntry) -> Result<()>;

    /// History for a resource, oldest first, non-decreasing time.
    /// Re-querying yields the same sequence plus anything appended meanwhile.
    fn get_history(&self, uid: &Uuid) -> Result<Vec<HistoryEntry>>;
}
