//! Client side of the VC3 information service.
//!
//! The information service holds one JSON document per collection
//! (`user`, `project`, `resource`, ...). This crate provides:
//! - [`DocumentStore`]: the read/merge contract every backend implements
//! - [`InfoClient`]: HTTP backend talking to a remote information service
//! - [`MemoryDocumentStore`]: in-process backend for tests and embedding
//! - [`apply_merge_patch`] / [`merge_diff`]: RFC 7386 JSON merge patches
//!
//! Writes carry a [`WriteCondition`] so callers can do optimistic
//! compare-and-swap on a collection's [`DocumentVersion`].

mod config;
mod error;
mod http;
mod memory;
mod patch;
mod store;

pub use config::{InfoClientConfig, StoreAuth};
pub use error::{StoreError, StoreResult};
pub use http::InfoClient;
pub use memory::MemoryDocumentStore;
pub use patch::{apply_merge_patch, merge_diff};
pub use store::{DocumentStore, DocumentVersion, VersionedDocument, WriteCondition};
