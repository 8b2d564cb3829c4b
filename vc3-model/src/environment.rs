use crate::entity::{dedup_in_order, has_duplicates, require_text, DocumentEntity};
use crate::error::{ModelError, ModelResult};
use crate::{EntityKind, EntityName};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A software environment for cluster nodes: packages to install and
/// variables to export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    name: EntityName,
    owner: EntityName,
    #[serde(default, deserialize_with = "unique_packages")]
    packages: Vec<String>,
    #[serde(default)]
    envmap: BTreeMap<String, String>,
}

fn unique_packages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(dedup_in_order(Vec::<String>::deserialize(deserializer)?))
}

impl Environment {
    /// Defines an empty environment.
    pub fn define(name: &str, owner: &str) -> ModelResult<Self> {
        Ok(Self {
            name: EntityName::parse(name)?,
            owner: EntityName::parse(owner)?,
            packages: Vec::new(),
            envmap: BTreeMap::new(),
        })
    }

    /// Adds a package. Repeats are ignored.
    pub fn with_package(mut self, package: impl Into<String>) -> ModelResult<Self> {
        let package = package.into();
        require_text("package", &package)?;
        if !self.packages.contains(&package) {
            self.packages.push(package);
        }
        Ok(self)
    }

    /// Sets an environment variable.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> ModelResult<Self> {
        let key = key.into();
        validate_var(&key)?;
        self.envmap.insert(key, value.into());
        Ok(self)
    }

    pub fn owner(&self) -> &EntityName {
        &self.owner
    }

    pub fn packages(&self) -> &[String] {
        &self.packages
    }

    pub fn envmap(&self) -> &BTreeMap<String, String> {
        &self.envmap
    }
}

fn validate_var(key: &str) -> ModelResult<()> {
    require_text("environment variable", key)?;
    if key.contains('=') || key.chars().any(char::is_whitespace) {
        return Err(ModelError::validation(format!(
            "environment variable '{key}' must not contain '=' or whitespace"
        )));
    }
    Ok(())
}

impl DocumentEntity for Environment {
    const KIND: EntityKind = EntityKind::Environment;

    fn name(&self) -> &EntityName {
        &self.name
    }

    fn validate(&self) -> ModelResult<()> {
        for package in &self.packages {
            require_text("package", package)?;
        }
        if has_duplicates(&self.packages) {
            return Err(ModelError::validation(format!(
                "environment '{}' lists a package more than once",
                self.name
            )));
        }
        self.envmap.keys().try_for_each(|k| validate_var(k))
    }
}
