//! # API Facade
//!
//! The single entry point for registry operations. `TroveApi` is a thin
//! dispatch layer over the command modules: it holds the document store and
//! the handler registry and forwards, leaving the business logic (and its
//! tests) in `commands/*.rs`.
//!
//! Generic over [`DocumentStore`]:
//! - Production: `TroveApi<FileStore>`
//! - Testing: `TroveApi<InMemoryStore>`

use std::path::Path;
use uuid::Uuid;

use crate::commands;
use crate::config::TroveConfig;
use crate::error::Result;
use crate::handlers::{self, HandlerFactory, HandlerRegistry};
use crate::model::{Datum, HistoryEntry, Kwargs, Resource};
use crate::store::fs::FileStore;
use crate::store::DocumentStore;

pub struct TroveApi<S: DocumentStore> {
    store: S,
    registry: HandlerRegistry,
}

impl TroveApi<FileStore> {
    /// File-backed registry under the configured data directory, using the
    /// process-wide handler registry.
    pub fn open(config: &TroveConfig) -> Self {
        Self::new(FileStore::new(&config.data_dir))
    }
}

impl<S: DocumentStore> TroveApi<S> {
    pub fn new(store: S) -> Self {
        Self::with_registry(store, handlers::global())
    }

    pub fn with_registry(store: S, registry: HandlerRegistry) -> Self {
        Self { store, registry }
    }

    /// Register a resource. No history entry is written for the insert.
    pub fn insert_resource(
        &mut self,
        spec: &str,
        resource_path: impl AsRef<Path>,
        resource_kwargs: Kwargs,
        root: impl AsRef<Path>,
    ) -> Result<Resource> {
        commands::insert::resource(
            &mut self.store,
            spec,
            resource_path.as_ref(),
            resource_kwargs,
            root.as_ref(),
        )
    }

    /// Register a datum, generating its id when `datum_id` is `None`.
    pub fn insert_datum(
        &mut self,
        resource: &Resource,
        datum_id: Option<Uuid>,
        datum_kwargs: Kwargs,
    ) -> Result<Datum> {
        commands::insert::datum(&mut self.store, resource, datum_id, datum_kwargs)
    }

    /// Current (latest) record for a resource.
    pub fn get_resource(&self, uid: &Uuid) -> Result<Resource> {
        self.store.get_resource(uid)
    }

    /// Current record of the resource owning a datum.
    pub fn get_resource_for_datum(&self, datum_id: &Uuid) -> Result<Resource> {
        let datum = self.store.get_datum(datum_id)?;
        self.store.get_resource(&datum.resource_uid)
    }

    /// Move the root / resource-path boundary. Bookkeeping only, no I/O.
    pub fn shift_root(
        &mut self,
        resource: &Resource,
        shift: i64,
    ) -> Result<(Resource, HistoryEntry)> {
        commands::shift_root::run(&mut self.store, resource, shift)
    }

    /// Physically move the resource's files to a new root.
    pub fn change_root(
        &mut self,
        resource: &Resource,
        new_root: impl AsRef<Path>,
        remove_origin: bool,
    ) -> Result<(Resource, HistoryEntry)> {
        commands::change_root::run(
            &mut self.store,
            &self.registry,
            resource,
            new_root.as_ref(),
            remove_origin,
        )
    }

    /// Mutation history for a resource, oldest first. Restartable: each call
    /// re-queries the ledger.
    pub fn get_history(&self, resource_uid: &Uuid) -> Result<std::vec::IntoIter<HistoryEntry>> {
        Ok(commands::history::run(&self.store, resource_uid)?.into_iter())
    }

    /// Bind a handler factory to a spec tag. Last registration wins.
    pub fn register_handler(&self, spec: impl Into<String>, factory: impl HandlerFactory + 'static) {
        self.registry.register(spec, factory);
    }

    /// Resolve a datum to decoded data via its resource's handler.
    pub fn retrieve(&self, datum_id: &Uuid) -> Result<serde_json::Value> {
        commands::retrieve::run(&self.store, &self.registry, datum_id)
    }
}
