//! Typed records for hashtag payloads and the functions that map raw JSON onto them.
//!
//! Mapping is exact-key and strict about required fields. Unknown keys are ignored so
//! newer servers can add fields without breaking the client.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MappingError {
    #[error("expected a {kind} object, got {found}")]
    NotAnObject {
        kind: &'static str,
        found: &'static str,
    },
    #[error("expected a list of {kind} objects, got {found}")]
    NotAnArray {
        kind: &'static str,
        found: &'static str,
    },
    #[error("invalid {kind}: {source}")]
    Field {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("item {index}: {source}")]
    Element {
        index: usize,
        #[source]
        source: Box<MappingError>,
    },
    #[error("invalid {kind} name `{name}`")]
    InvalidName { kind: &'static str, name: String },
}

/// A record shape that raw payloads can be mapped onto.
pub trait Entity: DeserializeOwned {
    const KIND: &'static str;

    fn name(&self) -> &str;

    fn url(&self) -> Option<&str> {
        None
    }

    /// Checks invariants serde cannot express.
    fn validate(&self) -> Result<(), MappingError> {
        if is_valid_tag_name(self.name()) {
            Ok(())
        } else {
            Err(MappingError::InvalidName {
                kind: Self::KIND,
                name: self.name().to_string(),
            })
        }
    }
}

/// A hashtag the current account can follow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(deserialize_with = "boolish")]
    pub following: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub history: Vec<TagHistory>,
}

/// Daily usage counters, most recent day first. Servers send these as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHistory {
    #[serde(deserialize_with = "stringish")]
    pub day: String,
    #[serde(deserialize_with = "stringish")]
    pub uses: String,
    #[serde(deserialize_with = "stringish")]
    pub accounts: String,
}

impl Tag {
    /// Total uses over the reported history window.
    pub fn total_uses(&self) -> u64 {
        self.history
            .iter()
            .filter_map(|h| h.uses.parse::<u64>().ok())
            .sum()
    }
}

impl Entity for Tag {
    const KIND: &'static str = "tag";

    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// A hashtag featured on the current account's profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedTag {
    #[serde(deserialize_with = "stringish")]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        deserialize_with = "optional_count",
        skip_serializing_if = "Option::is_none"
    )]
    pub statuses_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_status_at: Option<String>,
}

impl Entity for FeaturedTag {
    const KIND: &'static str = "featured tag";

    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    fn validate(&self) -> Result<(), MappingError> {
        if self.id.trim().is_empty() {
            return Err(MappingError::Field {
                kind: Self::KIND,
                source: de::Error::custom("`id` must not be empty"),
            });
        }
        if is_valid_tag_name(&self.name) {
            Ok(())
        } else {
            Err(MappingError::InvalidName {
                kind: Self::KIND,
                name: self.name.clone(),
            })
        }
    }
}

/// Serializes as `{}`; the payload of a successful unfeature.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct EmptyRecord {}

pub fn map_one<T: Entity>(raw: &Value) -> Result<T, MappingError> {
    if !raw.is_object() {
        return Err(MappingError::NotAnObject {
            kind: T::KIND,
            found: json_type(raw),
        });
    }
    let record = T::deserialize(raw).map_err(|source| MappingError::Field {
        kind: T::KIND,
        source,
    })?;
    record.validate()?;
    Ok(record)
}

/// Maps every element or none of them.
pub fn map_many<T: Entity>(raw: &Value) -> Result<Vec<T>, MappingError> {
    let items = raw.as_array().ok_or(MappingError::NotAnArray {
        kind: T::KIND,
        found: json_type(raw),
    })?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            map_one(item).map_err(|err| MappingError::Element {
                index,
                source: Box::new(err),
            })
        })
        .collect()
}

pub fn is_valid_tag_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn boolish<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Bool(b) => Ok(b),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(false),
            Some(1) => Ok(true),
            _ => Err(de::Error::custom(format!("expected a boolean, got {n}"))),
        },
        Value::String(s) => match s.to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(de::Error::custom(format!("expected a boolean, got \"{s}\""))),
        },
        other => Err(de::Error::custom(format!(
            "expected a boolean, got {}",
            json_type(&other)
        ))),
    }
}

fn stringish<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string, got {}",
            json_type(&other)
        ))),
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

fn optional_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("expected a count, got {n}"))),
        Some(Value::String(s)) => s
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a count, got \"{s}\""))),
        Some(other) => Err(de::Error::custom(format!(
            "expected a count, got {}",
            json_type(&other)
        ))),
    }
}
