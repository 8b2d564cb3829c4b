use crate::entity::{require_text, DocumentEntity};
use crate::error::{ModelError, ModelResult};
use crate::{EntityKind, EntityName};
use serde::{Deserialize, Serialize};

/// A VC3 user.
///
/// Wire fields: `first`, `last`, `email`, `institution`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    name: EntityName,
    first: String,
    last: String,
    email: String,
    institution: String,
}

impl User {
    /// Defines a new user. Performs no I/O.
    pub fn define(
        name: &str,
        first: impl Into<String>,
        last: impl Into<String>,
        email: impl Into<String>,
        institution: impl Into<String>,
    ) -> ModelResult<Self> {
        let user = Self {
            name: EntityName::parse(name)?,
            first: first.into(),
            last: last.into(),
            email: email.into(),
            institution: institution.into(),
        };
        user.validate()?;
        Ok(user)
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn institution(&self) -> &str {
        &self.institution
    }
}

fn validate_email(email: &str) -> ModelResult<()> {
    let invalid = || ModelError::validation(format!("email '{email}' is not a valid address"));
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
    {
        return Err(invalid());
    }
    Ok(())
}

impl DocumentEntity for User {
    const KIND: EntityKind = EntityKind::User;

    fn name(&self) -> &EntityName {
        &self.name
    }

    fn validate(&self) -> ModelResult<()> {
        require_text("first", &self.first)?;
        require_text("last", &self.last)?;
        require_text("institution", &self.institution)?;
        validate_email(&self.email)
    }
}
