//! # Trove Architecture
//!
//! Trove is a **library-level registry** for externally-stored data files.
//! It records, per resource, a storage root and a relative path plus
//! free-form metadata describing how to interpret the bytes at that path;
//! consumers register a resource once and later retrieve individual data
//! points by a stable identifier, without knowing the physical file layout.
//!
//! The load-bearing feature is **root migration with provenance**: the
//! boundary between root and relative path can be relocated (pure
//! bookkeeping), the underlying files can be moved to a new root on disk
//! (I/O with partial-failure exposure), and every mutation lands in an
//! append-only, time-ordered history so any resource's lineage can be
//! reconstructed.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Holds the document store and the handler registry        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One module per operation, pure business logic            │
//! │  - Generic over the storage backend                         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - Abstract DocumentStore trait                             │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Support modules sit beside the layers: [`path`] (pure math for the
//! root/relative-path split), [`mover`] (copy-verify-delete relocation),
//! and [`handlers`] (the registry mapping a resource's spec tag to its
//! decoding capability).
//!
//! ## Key Principle: Superseding Records, Never In-Place Mutation
//!
//! A mutation produces a *new* resource record with the same `uid`; the
//! store keeps the current record per uid and every mutation appends a
//! ledger entry holding full old/new snapshots. History entries therefore
//! never alias a record that later changes underneath them, and entry i's
//! `new` always equals entry i+1's `old`.
//!
//! ## Failure Discipline
//!
//! Mutations either complete fully (file I/O, record swap, ledger append)
//! or change nothing observable. Stale snapshots fail with
//! `ConcurrentModification`; incomplete file relocations fail with
//! `PartialMove` carrying the per-file breakdown, with sources untouched.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade—entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`Resource`, `Datum`, `HistoryEntry`)
//! - [`path`]: Root/relative-path split math
//! - [`handlers`]: Handler capability registry
//! - [`mover`]: Physical file relocation
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod model;
pub mod mover;
pub mod path;
pub mod store;
