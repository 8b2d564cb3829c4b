use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of entity types, one collection each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Project,
    Resource,
    Allocation,
    Cluster,
    Environment,
    Request,
}

impl EntityKind {
    /// Every kind, in collection order.
    pub const ALL: [EntityKind; 7] = [
        EntityKind::User,
        EntityKind::Project,
        EntityKind::Resource,
        EntityKind::Allocation,
        EntityKind::Cluster,
        EntityKind::Environment,
        EntityKind::Request,
    ];

    /// Name of the top-level collection holding entities of this kind.
    pub const fn collection(self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Project => "project",
            EntityKind::Resource => "resource",
            EntityKind::Allocation => "allocation",
            EntityKind::Cluster => "cluster",
            EntityKind::Environment => "environment",
            EntityKind::Request => "request",
        }
    }

    /// Looks up a kind by its collection name.
    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.collection() == collection)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.collection())
    }
}
