use crate::entity::{reject_null_attributes, require_text, DocumentEntity};
use crate::error::{ModelError, ModelResult};
use crate::{EntityKind, EntityName, MAX_NAME_LEN};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Grants a user access to a resource.
///
/// An allocation belongs to at most one project. Wire fields: `user`,
/// `resource`, `allocationtype`, `attributemap`, and `project` when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    name: EntityName,
    user: EntityName,
    resource: EntityName,
    #[serde(rename = "allocationtype")]
    allocation_type: String,
    #[serde(default, rename = "attributemap")]
    attributes: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    project: Option<EntityName>,
}

impl Allocation {
    /// Defines an allocation named `<user>.<resource>`.
    ///
    /// Fails if the joined name exceeds [`MAX_NAME_LEN`]; use
    /// [`define_named`](Self::define_named) to pick a shorter name.
    pub fn define(user: &str, resource: &str, allocation_type: impl Into<String>) -> ModelResult<Self> {
        let name = format!("{user}.{resource}");
        if name.len() > MAX_NAME_LEN {
            return Err(ModelError::validation(format!(
                "default allocation name for user '{user}' and resource '{resource}' is {} bytes, \
                 over the {MAX_NAME_LEN}-byte limit; use define_named",
                name.len()
            )));
        }
        Self::define_named(&name, user, resource, allocation_type)
    }

    /// Defines an allocation with an explicit name.
    pub fn define_named(
        name: &str,
        user: &str,
        resource: &str,
        allocation_type: impl Into<String>,
    ) -> ModelResult<Self> {
        let allocation = Self {
            name: EntityName::parse(name)?,
            user: EntityName::parse(user)?,
            resource: EntityName::parse(resource)?,
            allocation_type: allocation_type.into(),
            attributes: BTreeMap::new(),
            project: None,
        };
        allocation.validate()?;
        Ok(allocation)
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn user(&self) -> &EntityName {
        &self.user
    }

    pub fn resource(&self) -> &EntityName {
        &self.resource
    }

    pub fn allocation_type(&self) -> &str {
        &self.allocation_type
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }

    pub fn project(&self) -> Option<&EntityName> {
        self.project.as_ref()
    }

    /// Records the owning project.
    ///
    /// Returns `Ok(false)` if already assigned to `project`, and a validation
    /// error if assigned to a different one.
    pub fn assign_to_project(&mut self, project: EntityName) -> ModelResult<bool> {
        match &self.project {
            Some(current) if *current == project => Ok(false),
            Some(current) => Err(ModelError::validation(format!(
                "allocation '{}' already belongs to project '{current}'",
                self.name
            ))),
            None => {
                self.project = Some(project);
                Ok(true)
            }
        }
    }
}

impl DocumentEntity for Allocation {
    const KIND: EntityKind = EntityKind::Allocation;

    fn name(&self) -> &EntityName {
        &self.name
    }

    fn validate(&self) -> ModelResult<()> {
        require_text("allocationtype", &self.allocation_type)?;
        reject_null_attributes(&format!("allocation '{}'", self.name), &self.attributes)
    }
}
