//! Deterministic coordination keys derived from an operation's arguments.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;
use std::collections::BTreeMap;

/// Identity of one logical operation: its name plus all of its arguments.
///
/// Positional arguments keep their order; named arguments are sorted by name,
/// so the order they were supplied in does not matter. The arguments are
/// JSON-encoded, which keeps `["a,b"]` and `["a", "b"]` apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalKey {
    operation: String,
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl LogicalKey {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            positional: Vec::new(),
            named: BTreeMap::new(),
        }
    }

    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Later values for the same name replace earlier ones.
    pub fn named(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.named.insert(name.into(), value.into());
        self
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Base64url (unpadded) of the JSON form `[operation, [positional..], [[name, value]..]]`.
    pub fn encoding(&self) -> String {
        let named: Vec<Value> = self
            .named
            .iter()
            .map(|(name, value)| Value::Array(vec![Value::String(name.clone()), value.clone()]))
            .collect();
        let json = Value::Array(vec![
            Value::String(self.operation.clone()),
            Value::Array(self.positional.clone()),
            Value::Array(named),
        ]);
        URL_SAFE_NO_PAD.encode(json.to_string())
    }

    /// `<prefix><operation>_<encoding>`.
    pub fn render(&self, prefix: &str) -> String {
        format!("{prefix}{}_{}", self.operation, self.encoding())
    }
}
