//! Entity names.
//!
//! A name is the entity's key inside its collection document and appears as
//! a path segment in store URLs, so the accepted alphabet is deliberately
//! narrow.

use crate::error::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

/// Longest accepted name, in bytes.
pub const MAX_NAME_LEN: usize = 128;

/// Unique name of an entity within its collection.
///
/// Names are ASCII letters, digits, `-`, `_` and `.`, start with a letter or
/// digit, and are at most [`MAX_NAME_LEN`] bytes long.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EntityName(String);

impl EntityName {
    /// Parses and validates a name.
    pub fn parse(name: impl Into<String>) -> ModelResult<Self> {
        let name = name.into();
        validate(&name)?;
        Ok(Self(name))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(name: &str) -> ModelResult<()> {
    if name.is_empty() {
        return Err(ModelError::validation("name must not be empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ModelError::validation(format!(
            "name '{name}' is longer than {MAX_NAME_LEN} bytes"
        )));
    }
    if !name.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err(ModelError::validation(format!(
            "name '{name}' must start with a letter or digit"
        )));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
    {
        return Err(ModelError::validation(format!(
            "name '{name}' contains invalid character {bad:?}"
        )));
    }
    Ok(())
}

impl TryFrom<String> for EntityName {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<&str> for EntityName {
    type Error = ModelError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<EntityName> for String {
    fn from(name: EntityName) -> Self {
        name.0
    }
}

impl FromStr for EntityName {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for EntityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for EntityName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for EntityName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for EntityName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
