use crate::entity::{require_text, DocumentEntity};
use crate::error::{ModelError, ModelResult};
use crate::{EntityKind, EntityName};
use serde::{Deserialize, Serialize};

/// A homogeneous group of nodes within a cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Nodeset {
    name: EntityName,
    node_number: u32,
    app_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    environment: Option<EntityName>,
}

impl Nodeset {
    pub fn new(name: &str, node_number: u32, app_type: impl Into<String>) -> ModelResult<Self> {
        let nodeset = Self {
            name: EntityName::parse(name)?,
            node_number,
            app_type: app_type.into(),
            environment: None,
        };
        nodeset.validate()?;
        Ok(nodeset)
    }

    /// Runs the nodeset's nodes inside the named environment.
    pub fn with_environment(mut self, environment: &str) -> ModelResult<Self> {
        self.environment = Some(EntityName::parse(environment)?);
        Ok(self)
    }

    pub fn name(&self) -> &EntityName {
        &self.name
    }

    pub fn node_number(&self) -> u32 {
        self.node_number
    }

    pub fn app_type(&self) -> &str {
        &self.app_type
    }

    pub fn environment(&self) -> Option<&EntityName> {
        self.environment.as_ref()
    }

    fn validate(&self) -> ModelResult<()> {
        if self.node_number == 0 {
            return Err(ModelError::validation(format!(
                "nodeset '{}' must have at least one node",
                self.name
            )));
        }
        require_text("app_type", &self.app_type)
    }
}

/// A virtual cluster template: named nodesets owned by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    name: EntityName,
    owner: EntityName,
    #[serde(default)]
    nodesets: Vec<Nodeset>,
}

impl Cluster {
    /// Defines a cluster with no nodesets.
    pub fn define(name: &str, owner: &str) -> ModelResult<Self> {
        Ok(Self {
            name: EntityName::parse(name)?,
            owner: EntityName::parse(owner)?,
            nodesets: Vec::new(),
        })
    }

    /// Adds a nodeset; nodeset names are unique within the cluster.
    pub fn with_nodeset(mut self, nodeset: Nodeset) -> ModelResult<Self> {
        if self.nodesets.iter().any(|n| n.name == nodeset.name) {
            return Err(ModelError::validation(format!(
                "cluster '{}' already has a nodeset named '{}'",
                self.name, nodeset.name
            )));
        }
        self.nodesets.push(nodeset);
        Ok(self)
    }

    pub fn owner(&self) -> &EntityName {
        &self.owner
    }

    pub fn nodesets(&self) -> &[Nodeset] {
        &self.nodesets
    }

    /// Environments referenced by any nodeset, without repeats.
    pub fn environments(&self) -> Vec<&EntityName> {
        let mut names: Vec<&EntityName> = Vec::new();
        for env in self.nodesets.iter().filter_map(Nodeset::environment) {
            if !names.contains(&env) {
                names.push(env);
            }
        }
        names
    }

    /// Total node count across nodesets.
    pub fn node_count(&self) -> u64 {
        self.nodesets.iter().map(|n| u64::from(n.node_number)).sum()
    }
}

impl DocumentEntity for Cluster {
    const KIND: EntityKind = EntityKind::Cluster;

    fn name(&self) -> &EntityName {
        &self.name
    }

    fn validate(&self) -> ModelResult<()> {
        for (i, nodeset) in self.nodesets.iter().enumerate() {
            nodeset.validate()?;
            if self.nodesets[..i].iter().any(|n| n.name == nodeset.name) {
                return Err(ModelError::validation(format!(
                    "cluster '{}' has two nodesets named '{}'",
                    self.name, nodeset.name
                )));
            }
        }
        Ok(())
    }
}
