use crate::entity::{has_duplicates, parse_names, unique_names, DocumentEntity};
use crate::error::{ModelError, ModelResult};
use crate::{EntityKind, EntityName};
use serde::{Deserialize, Serialize};

/// A project: an owner, a set of member users and the allocations the
/// project may draw on.
///
/// `members` and `allocations` are insertion-ordered sets stored as JSON
/// arrays. Both default to empty when absent from a fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    name: EntityName,
    owner: EntityName,
    #[serde(default, deserialize_with = "unique_names")]
    members: Vec<EntityName>,
    #[serde(default, deserialize_with = "unique_names")]
    allocations: Vec<EntityName>,
}

impl Project {
    /// Defines a new project. Repeated member names collapse to one entry.
    pub fn define<I, S>(name: &str, owner: &str, members: I) -> ModelResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let project = Self {
            name: EntityName::parse(name)?,
            owner: EntityName::parse(owner)?,
            members: parse_names(members)?,
            allocations: Vec::new(),
        };
        project.validate()?;
        Ok(project)
    }

    pub fn owner(&self) -> &EntityName {
        &self.owner
    }

    pub fn members(&self) -> &[EntityName] {
        &self.members
    }

    pub fn allocations(&self) -> &[EntityName] {
        &self.allocations
    }

    pub fn has_member(&self, user: &str) -> bool {
        self.members.iter().any(|m| m == user)
    }

    /// Adds a member. Returns false if the user was already a member.
    pub fn add_member(&mut self, user: EntityName) -> bool {
        if self.members.contains(&user) {
            return false;
        }
        self.members.push(user);
        true
    }

    /// Attaches an allocation. Returns false if it was already attached.
    pub fn add_allocation(&mut self, allocation: EntityName) -> bool {
        if self.allocations.contains(&allocation) {
            return false;
        }
        self.allocations.push(allocation);
        true
    }
}

impl DocumentEntity for Project {
    const KIND: EntityKind = EntityKind::Project;

    fn name(&self) -> &EntityName {
        &self.name
    }

    fn validate(&self) -> ModelResult<()> {
        if has_duplicates(&self.members) {
            return Err(ModelError::validation(format!(
                "project '{}' lists a member more than once",
                self.name
            )));
        }
        if has_duplicates(&self.allocations) {
            return Err(ModelError::validation(format!(
                "project '{}' lists an allocation more than once",
                self.name
            )));
        }
        Ok(())
    }
}
