use crate::entity::{has_duplicates, parse_names, require_text, unique_names, DocumentEntity};
use crate::error::{ModelError, ModelResult};
use crate::{EntityKind, EntityName};
use serde::{Deserialize, Serialize};

/// A request to stand up a cluster in an environment, drawing on one or
/// more allocations.
///
/// `policy` names the scheduling policy that splits the cluster across the
/// allocations; it is carried as-is and never interpreted client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    name: EntityName,
    owner: EntityName,
    cluster: EntityName,
    environment: EntityName,
    #[serde(deserialize_with = "unique_names")]
    allocations: Vec<EntityName>,
    policy: String,
}

impl Request {
    pub fn define<I, S>(
        name: &str,
        owner: &str,
        cluster: &str,
        environment: &str,
        allocations: I,
        policy: impl Into<String>,
    ) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let request = Self {
            name: EntityName::parse(name)?,
            owner: EntityName::parse(owner)?,
            cluster: EntityName::parse(cluster)?,
            environment: EntityName::parse(environment)?,
            allocations: parse_names(allocations)?,
            policy: policy.into(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn owner(&self) -> &EntityName {
        &self.owner
    }

    pub fn cluster(&self) -> &EntityName {
        &self.cluster
    }

    pub fn environment(&self) -> &EntityName {
        &self.environment
    }

    pub fn allocations(&self) -> &[EntityName] {
        &self.allocations
    }

    pub fn policy(&self) -> &str {
        &self.policy
    }
}

impl DocumentEntity for Request {
    const KIND: EntityKind = EntityKind::Request;

    fn name(&self) -> &EntityName {
        &self.name
    }

    fn validate(&self) -> ModelResult<()> {
        if self.allocations.is_empty() {
            return Err(ModelError::validation(format!(
                "request '{}' needs at least one allocation",
                self.name
            )));
        }
        if has_duplicates(&self.allocations) {
            return Err(ModelError::validation(format!(
                "request '{}' lists an allocation more than once",
                self.name
            )));
        }
        require_text("policy", &self.policy)
    }
}
