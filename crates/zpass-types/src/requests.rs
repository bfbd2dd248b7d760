use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::network::NetworkId;
use crate::transaction::OutputJson;

/// Hash algorithm selector for credential signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Poseidon2,
    Bhp1024,
    Sha3_256,
    Keccak256,
}

/// A synthesized proving/verifying key pair, carried as opaque serialized strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPair {
    pub proving_key: String,
    pub verifying_key: String,
}

/// Opaque serialized substitute state letting local execution run without
/// live network queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfflineQuery(pub String);

/// Parameters for the on-chain execution path (issue/prove/interact).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainOptions {
    pub program_name: String,
    pub function_name: String,
    pub inputs: Vec<String>,
    /// Fee in microcredits.
    pub fee: u64,
    /// Pay the fee privately from `fee_record` rather than from public balance.
    pub private_fee: bool,
    pub fee_record: Option<String>,
}

/// Parameters for local proof generation against program source text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProveOffChainOptions {
    pub program: String,
    pub function_name: String,
    pub inputs: Vec<String>,
    pub offline_query: Option<OfflineQuery>,
}

/// Artifacts produced by a local (off-chain) execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffChainExecution {
    pub outputs: Vec<String>,
    pub execution: String,
    pub verifying_key: String,
}

/// Parameters for credential signing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignCredentialOptions {
    pub data: BTreeMap<String, String>,
    pub hash_type: HashAlgorithm,
    /// Overrides the account key when set.
    pub private_key: Option<String>,
}

/// A signature over a credential record together with the signed hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedCredential {
    pub signature: String,
    pub hash: String,
}

/// Parameters for ledger-side verification of a submitted transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOnChainOptions {
    pub transaction_id: String,
    pub url: Option<String>,
    pub network: NetworkId,
}

/// Verdict of ledger-side verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnChainVerification {
    pub has_execution: bool,
    pub outputs: Vec<OutputJson>,
}

/// Parameters for local verification of an execution trace.
///
/// At least one of `inputs` or `verifying_key` must be set; a supplied
/// verifying key takes precedence over key synthesis from inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOffChainOptions {
    pub execution: String,
    pub program: String,
    pub function_name: String,
    pub inputs: Option<Vec<String>>,
    pub verifying_key: Option<String>,
    pub url: Option<String>,
    pub network: NetworkId,
}
