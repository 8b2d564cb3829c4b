//! VC3 client API.
//!
//! [`Vc3Client`] is the entry point: define entities locally, store them in
//! the information service, then list or fetch them back as fresh values.
//!
//! ```no_run
//! # async fn demo() -> vc3_client::SyncResult<()> {
//! use std::sync::Arc;
//! use vc3_client::{MemoryDocumentStore, Vc3Client};
//!
//! let client = Vc3Client::new(Arc::new(MemoryDocumentStore::new()));
//! let alice = client.define_user("alice", "Alice", "A", "a@x.org", "Inst")?;
//! client.store_user(&alice).await?;
//! assert_eq!(client.list_users().await?.len(), 1);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;

pub use client::Vc3Client;
pub use config::{ClientConfig, ConfigError};

pub use vc3_infoclient::{DocumentStore, InfoClient, InfoClientConfig, MemoryDocumentStore, StoreAuth, StoreError};
pub use vc3_model::{
    AccessFlavor, AccessMethod, Allocation, Cluster, DocumentEntity, EntityKind, EntityName, Environment, Nodeset,
    Project, Request, Resource, ResourceType, User,
};
pub use vc3_sync::{DuplicatePolicy, SyncConfig, SyncError, SyncResult};
