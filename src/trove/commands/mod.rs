//! Business logic for each registry operation.
//!
//! Commands are free functions generic over [`DocumentStore`], so the same
//! logic runs against the file-backed store in production and the in-memory
//! store in tests. Mutation commands (`shift_root`, `change_root`) share the
//! transactional shape enforced by [`helpers`]: check the caller's snapshot
//! is current, do the work, swap the record, then append to the ledger.
//! A failure at any step leaves nothing observable behind.
//!
//! [`DocumentStore`]: crate::store::DocumentStore

pub mod change_root;
pub mod helpers;
pub mod history;
pub mod insert;
pub mod retrieve;
pub mod shift_root;
