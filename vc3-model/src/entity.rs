//! The fragment contract shared by every entity type.

use crate::error::{ModelError, ModelResult};
use crate::{EntityKind, EntityName};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::hash::Hash;

/// The serialized fields of one entity inside a collection document.
pub type Fragment = serde_json::Map<String, Value>;

/// Field carrying the entity name on the Rust side. It is the fragment's key
/// in the collection, so it never appears inside the fragment itself.
const NAME_FIELD: &str = "name";

/// An entity that can be stored as a named fragment of a collection document.
///
/// Field names in the fragment are a wire contract shared with every other
/// client of the information service; renaming one is a breaking change.
pub trait DocumentEntity:
    Serialize + DeserializeOwned + Clone + PartialEq + Send + Sync + 'static
{
    /// Which collection this type lives in.
    const KIND: EntityKind;

    /// The entity's unique name.
    fn name(&self) -> &EntityName;

    /// Checks field invariants that serde alone cannot express.
    fn validate(&self) -> ModelResult<()>;

    /// Serializes into `(name, fragment)`.
    fn to_fragment(&self) -> ModelResult<(EntityName, Fragment)> {
        self.validate()?;
        let value = serde_json::to_value(self).map_err(|e| {
            ModelError::validation(format!("{} '{}' is not serializable: {e}", Self::KIND, self.name()))
        })?;
        match value {
            Value::Object(mut fields) => {
                fields.remove(NAME_FIELD);
                Ok((self.name().clone(), fields))
            }
            other => Err(ModelError::validation(format!(
                "{} '{}' serialized to a non-object: {other}",
                Self::KIND,
                self.name()
            ))),
        }
    }

    /// Rebuilds an entity from its name and fragment.
    ///
    /// Unknown fields are ignored. A `name` field inside the fragment, as
    /// written by older clients, is overridden by the key.
    fn from_fragment(name: &str, fragment: &Fragment) -> ModelResult<Self> {
        let fail = |reason: String| ModelError::Deserialization {
            kind: Self::KIND,
            name: name.to_string(),
            reason,
        };

        let mut fields = fragment.clone();
        fields.insert(NAME_FIELD.to_string(), Value::String(name.to_string()));
        let entity: Self =
            serde_json::from_value(Value::Object(fields)).map_err(|e| fail(e.to_string()))?;
        entity.validate().map_err(|e| fail(e.to_string()))?;
        Ok(entity)
    }

    /// Like [`from_fragment`](Self::from_fragment), for a raw document value.
    fn from_value(name: &str, value: &Value) -> ModelResult<Self> {
        match value {
            Value::Object(fragment) => Self::from_fragment(name, fragment),
            other => Err(ModelError::Deserialization {
                kind: Self::KIND,
                name: name.to_string(),
                reason: format!("fragment is not an object: {other}"),
            }),
        }
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> ModelResult<()> {
    if value.trim().is_empty() {
        return Err(ModelError::validation(format!("{field} must not be empty")));
    }
    Ok(())
}

/// Rejects `null` object members in an attribute map, at any depth. A merge
/// patch reads a `null` member as "delete", so such a value cannot be stored.
pub(crate) fn reject_null_attributes<'a, I>(owner: &str, attributes: I) -> ModelResult<()>
where
    I: IntoIterator<Item = (&'a String, &'a Value)>,
{
    for (key, value) in attributes {
        match value {
            Value::Null => {
                return Err(ModelError::validation(format!(
                    "{owner}: attribute '{key}' is null"
                )));
            }
            Value::Object(members) => {
                reject_null_attributes(&format!("{owner}: attribute '{key}'"), members)?;
            }
            _ => {}
        }
    }
    Ok(())
}

/// Parses a list of names, dropping repeats but keeping first-seen order.
pub(crate) fn parse_names<I, S>(names: I) -> ModelResult<Vec<EntityName>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let parsed = names
        .into_iter()
        .map(|n| EntityName::parse(n.as_ref()))
        .collect::<ModelResult<Vec<_>>>()?;
    Ok(dedup_in_order(parsed))
}

pub(crate) fn dedup_in_order<T: Eq + Hash + Clone>(items: Vec<T>) -> Vec<T> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

pub(crate) fn has_duplicates<T: Eq + Hash>(items: &[T]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().any(|item| !seen.insert(item))
}

/// Serde helper for name sets stored as JSON arrays. Legacy documents may
/// repeat a name; the repeat is dropped rather than failing the fragment.
pub(crate) fn unique_names<'de, D>(deserializer: D) -> Result<Vec<EntityName>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = Vec::<EntityName>::deserialize(deserializer)?;
    Ok(dedup_in_order(names))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let items = vec!["b", "a", "b", "c", "a"];
        assert_eq!(dedup_in_order(items), vec!["b", "a", "c"]);
    }

    #[test]
    fn duplicates_detected() {
        assert!(has_duplicates(&[1, 2, 1]));
        assert!(!has_duplicates(&[1, 2, 3]));
        assert!(!has_duplicates::<u8>(&[]));
    }

    #[test]
    fn null_attributes_rejected_at_any_depth() {
        let flat = serde_json::json!({"cores": 8, "queue": null});
        let nested = serde_json::json!({"limits": {"wall": null}});
        let in_array = serde_json::json!({"tags": [null, "gpu"]});

        let err = reject_null_attributes("r1", flat.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("'queue'"));
        let err = reject_null_attributes("r1", nested.as_object().unwrap()).unwrap_err();
        assert!(err.to_string().contains("'wall'"));
        reject_null_attributes("r1", in_array.as_object().unwrap()).unwrap();
    }

    #[test]
    fn require_text_rejects_blank() {
        assert!(require_text("first", "  ").is_err());
        assert!(require_text("first", "Alice").is_ok());
    }
}
