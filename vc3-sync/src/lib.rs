//! Entity synchronization for the VC3 client.
//!
//! Moves typed entities between client code and the shared collection
//! documents of a [`DocumentStore`](vc3_infoclient::DocumentStore).
//!
//! # Reads
//!
//! Every read fetches the whole collection and decodes it fresh; nothing is
//! cached. A fragment that fails to decode is skipped by [`SyncEngine::list`]
//! and logged, so one corrupt or legacy entry never hides the rest.
//!
//! # Writes
//!
//! Each write touches exactly one entity and goes through the same loop:
//!
//! 1. fetch the collection and its version
//! 2. decide the new fragment from the current one
//! 3. send the difference as a merge patch, conditional on the version
//! 4. on conflict, back off and start over
//!
//! Concurrent writers to the same collection therefore never lose each
//! other's updates; they retry instead.

mod config;
mod engine;
mod error;

pub use config::{DuplicatePolicy, SyncConfig};
pub use engine::{ListReport, SkippedFragment, SyncEngine};
pub use error::{SyncError, SyncResult};
