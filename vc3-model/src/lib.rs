//! Entity model for the VC3 client.
//!
//! Defines the typed records that live in the information service and the
//! contract for moving them in and out of collection documents:
//! - [`EntityName`]: validated name, the entity's key inside its collection
//! - [`EntityKind`]: the closed set of entity types and their collections
//! - [`DocumentEntity`]: `to_fragment` / `from_fragment` over a flat JSON map
//! - [`User`], [`Project`], [`Resource`], [`Allocation`], [`Environment`],
//!   [`Cluster`], [`Request`]: the entities themselves
//!
//! Construction (`define`) is pure: it validates fields and never touches the
//! store. Persisting and loading is the job of `vc3-sync`.

mod allocation;
mod cluster;
mod entity;
mod environment;
mod error;
mod kind;
mod name;
mod project;
mod request;
mod resource;
mod user;

pub use allocation::Allocation;
pub use cluster::{Cluster, Nodeset};
pub use entity::{DocumentEntity, Fragment};
pub use environment::Environment;
pub use error::{ModelError, ModelResult};
pub use kind::EntityKind;
pub use name::{EntityName, MAX_NAME_LEN};
pub use project::Project;
pub use request::Request;
pub use resource::{AccessFlavor, AccessMethod, Resource, ResourceType};
pub use user::User;
