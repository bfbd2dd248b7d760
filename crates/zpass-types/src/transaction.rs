use serde::{Deserialize, Serialize};

/// A ledger transaction as returned by the explorer REST API.
///
/// Only the fields the SDK inspects are modeled; unknown fields are ignored
/// so the model tolerates API additions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionResponse {
    /// Transaction type tag, e.g. "execute", "deploy", "fee".
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub execution: Option<Execution>,
}

/// The execution block of an "execute" transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Execution {
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

/// A single program transition within an execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transition {
    #[serde(default)]
    pub program: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub outputs: Vec<OutputJson>,
}

/// One transition output. `value` stays a raw JSON value since output shapes
/// differ per type (records carry ciphertext strings, futures carry nested
/// structures).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputJson {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl OutputJson {
    /// The output value as a string, when it is one.
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

/// A fully built, signed execution transaction ready for broadcast.
///
/// The id is known before submission; the payload is the serialized
/// transaction consumed verbatim by the broadcast endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizedTransaction {
    pub id: String,
    pub payload: String,
}
