use crate::entity::{reject_null_attributes, require_text, DocumentEntity};
use crate::error::{ModelError, ModelResult};
use crate::{EntityKind, EntityName};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Implements `as_str`, `Display` and `FromStr` over the serde spelling.
macro_rules! wire_enum {
    ($ty:ident, $what:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $ty {
            /// Every variant.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// The wire spelling.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| ModelError::validation(format!(concat!("unknown ", $what, " '{}'"), s)))
            }
        }
    };
}

/// How the resource is provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceType {
    Grid,
    RemoteBatch,
    LocalBatch,
    Cloud,
}

wire_enum!(ResourceType, "resource type", {
    Grid => "grid",
    RemoteBatch => "remote-batch",
    LocalBatch => "local-batch",
    Cloud => "cloud",
});

/// How the factory reaches the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessMethod {
    Ssh,
    Gsissh,
    Local,
}

wire_enum!(AccessMethod, "access method", {
    Ssh => "ssh",
    Gsissh => "gsissh",
    Local => "local",
});

/// The middleware or cloud API behind the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessFlavor {
    HtcondorCe,
    Slurm,
    Sge,
    Ec2,
    Nova,
    Gce,
}

wire_enum!(AccessFlavor, "access flavor", {
    HtcondorCe => "htcondor-ce",
    Slurm => "slurm",
    Sge => "sge",
    Ec2 => "ec2",
    Nova => "nova",
    Gce => "gce",
});

/// A compute resource a user can be allocated on.
///
/// Wire fields: `owner`, `resourcetype`, `accessmethod`, `accessflavor`,
/// `gridresource`, `mfa`, `attributemap`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    name: EntityName,
    owner: EntityName,
    #[serde(rename = "resourcetype")]
    resource_type: ResourceType,
    #[serde(rename = "accessmethod")]
    access_method: AccessMethod,
    #[serde(rename = "accessflavor")]
    access_flavor: AccessFlavor,
    /// Endpoint address: a CE hostname, a cloud API URL, a login node.
    #[serde(rename = "gridresource")]
    endpoint: String,
    /// Whether the site needs multi-factor auth (a head-node factory).
    #[serde(default)]
    mfa: bool,
    #[serde(default, rename = "attributemap")]
    attributes: BTreeMap<String, Value>,
}

impl Resource {
    /// Defines a new resource with `mfa` off and no attributes.
    pub fn define(
        name: &str,
        owner: &str,
        resource_type: ResourceType,
        access_method: AccessMethod,
        access_flavor: AccessFlavor,
        endpoint: impl Into<String>,
    ) -> ModelResult<Self> {
        let resource = Self {
            name: EntityName::parse(name)?,
            owner: EntityName::parse(owner)?,
            resource_type,
            access_method,
            access_flavor,
            endpoint: endpoint.into(),
            mfa: false,
            attributes: BTreeMap::new(),
        };
        resource.validate()?;
        Ok(resource)
    }

    #[must_use]
    pub fn with_mfa(mut self, mfa: bool) -> Self {
        self.mfa = mfa;
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_attributes(mut self, attributes: BTreeMap<String, Value>) -> Self {
        self.attributes.extend(attributes);
        self
    }

    pub fn owner(&self) -> &EntityName {
        &self.owner
    }

    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    pub fn access_method(&self) -> AccessMethod {
        self.access_method
    }

    pub fn access_flavor(&self) -> AccessFlavor {
        self.access_flavor
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn mfa(&self) -> bool {
        self.mfa
    }

    pub fn attributes(&self) -> &BTreeMap<String, Value> {
        &self.attributes
    }
}

impl DocumentEntity for Resource {
    const KIND: EntityKind = EntityKind::Resource;

    fn name(&self) -> &EntityName {
        &self.name
    }

    fn validate(&self) -> ModelResult<()> {
        require_text("gridresource", &self.endpoint)?;
        if self.attributes.keys().any(|k| k.is_empty()) {
            return Err(ModelError::validation(format!(
                "resource '{}' has an attribute with an empty key",
                self.name
            )));
        }
        reject_null_attributes(&format!("resource '{}'", self.name), &self.attributes)
    }
}
