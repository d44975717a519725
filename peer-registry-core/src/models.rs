use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{RegistryError, RegistryResult};

/// Field of the user data document holding the registered peers.
pub const PEERS_FIELD: &str = "peers";

/// JavaScript truthiness for a JSON value.
///
/// The document is shared with tooling that treats `null`, `false`, `0`
/// and `""` as "not set", so both the request field and the stored
/// `peers` list follow the same rule.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// An opaque peer identifier.
///
/// Normally a string, but any truthy JSON value is accepted and stored
/// as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeerId(Value);

impl PeerId {
    /// Rejects missing and falsy values.
    pub fn from_value(value: Option<&Value>) -> Option<Self> {
        match value {
            Some(v) if is_truthy(v) => Some(PeerId(v.clone())),
            _ => None,
        }
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl std::fmt::Display for PeerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for PeerId {
    fn from(s: &str) -> Self {
        PeerId(Value::String(s.to_string()))
    }
}

/// Outcome of adding a peer to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
    Added,
    AlreadyPresent,
}

/// The persisted user data document.
///
/// Only `peers` is interpreted; every other field is carried through
/// untouched and in its original key order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserData {
    fields: Map<String, Value>,
}

impl UserData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(raw: &str) -> RegistryResult<Self> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RegistryError::invalid(format!(
                "expected a JSON object at the top level, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Pretty JSON with two-space indentation and no trailing newline.
    pub fn to_pretty_json(&self) -> RegistryResult<String> {
        Ok(serde_json::to_string_pretty(&self.fields)?)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Registered peers in insertion order, empty when the field is unset.
    pub fn peers(&self) -> RegistryResult<&[Value]> {
        match self.fields.get(PEERS_FIELD) {
            Some(Value::Array(peers)) => Ok(peers),
            Some(value) if is_truthy(value) => Err(peers_not_an_array(value)),
            _ => Ok(&[]),
        }
    }

    /// Makes sure `peers` is an array, replacing a missing or falsy value
    /// with an empty one.
    pub fn ensure_peers(&mut self) -> RegistryResult<&mut Vec<Value>> {
        let needs_init = match self.fields.get(PEERS_FIELD) {
            Some(Value::Array(_)) => false,
            Some(value) if is_truthy(value) => return Err(peers_not_an_array(value)),
            _ => true,
        };
        if needs_init {
            self.fields
                .insert(PEERS_FIELD.to_string(), Value::Array(Vec::new()));
        }
        match self.fields.get_mut(PEERS_FIELD) {
            Some(Value::Array(peers)) => Ok(peers),
            _ => Err(RegistryError::invalid("peers field vanished during update")),
        }
    }

    /// Appends `peer_id` unless an equal value is already registered.
    /// Existing duplicates are left alone.
    pub fn add_peer(&mut self, peer_id: &PeerId) -> RegistryResult<Registration> {
        let peers = self.ensure_peers()?;
        if peers.iter().any(|p| p == peer_id.as_value()) {
            return Ok(Registration::AlreadyPresent);
        }
        peers.push(peer_id.as_value().clone());
        Ok(Registration::Added)
    }
}

fn peers_not_an_array(value: &Value) -> RegistryError {
    RegistryError::invalid(format!(
        "`{PEERS_FIELD}` must be an array, found {}",
        json_type_name(value)
    ))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
