//! Cryptographic engine abstraction.
//!
//! Every opaque cryptographic capability lives behind the [`ZkEngine`]
//! trait: field-element Merkle math, credential signing, key synthesis,
//! local program execution, execution verification, and record decryption.
//! Implementations return `anyhow::Result`; the SDK wraps failures with
//! call-site context.

use std::collections::BTreeMap;

use anyhow::Result;

use zpass_types::{
    AuthorizedTransaction, HashAlgorithm, KeyPair, NetworkId, OffChainExecution, OfflineQuery, SignedCredential,
};

pub mod worker;

/// Inputs for building a fee-bearing on-chain execution transaction.
#[derive(Debug, Clone)]
pub struct TransactionPlan {
    pub program: String,
    pub program_name: String,
    pub function_name: String,
    pub inputs: Vec<String>,
    /// Fee in microcredits.
    pub fee: u64,
    pub private_fee: bool,
    pub fee_record: Option<String>,
    pub keys: KeyPair,
    pub private_key: String,
}

/// Inputs for running a program locally to produce a proof artifact.
#[derive(Debug, Clone)]
pub struct LocalExecution {
    pub program: String,
    pub function_name: String,
    pub inputs: Vec<String>,
    /// Resolved sources of every transitively imported program.
    pub imports: BTreeMap<String, String>,
    pub keys: KeyPair,
    pub private_key: String,
    pub offline_query: Option<OfflineQuery>,
}

/// ZkEngine is the seam to the cryptographic runtime.
///
/// Methods take the network tag because field parameters differ per
/// deployment; nothing else in the SDK branches on it.
pub trait ZkEngine: Send + Sync {
    fn merkle_root(&self, network: NetworkId, leaves: &[String]) -> Result<String>;

    fn merkle_tree(&self, network: NetworkId, leaves: &[String]) -> Result<String>;

    fn merkle_proof(&self, network: NetworkId, leaves: &[String], index: usize) -> Result<Vec<String>>;

    fn leaf_hashes(&self, network: NetworkId, leaves: &[String]) -> Result<Vec<String>>;

    fn sign_merkle_root(&self, network: NetworkId, private_key: &str, root: &str) -> Result<String>;

    fn sign_message(
        &self,
        network: NetworkId,
        private_key: &str,
        data: &BTreeMap<String, String>,
        algorithm: HashAlgorithm,
    ) -> Result<SignedCredential>;

    fn derive_view_key(&self, network: NetworkId, private_key: &str) -> Result<String>;

    /// Synthesize the proving/verifying key pair for one program function.
    /// This is the expensive step the key cache exists to avoid.
    fn synthesize_keys(
        &self,
        network: NetworkId,
        program: &str,
        function_name: &str,
        inputs: &[String],
        private_key: Option<&str>,
    ) -> Result<KeyPair>;

    fn execute_local(&self, network: NetworkId, request: LocalExecution) -> Result<OffChainExecution>;

    fn build_execution_transaction(&self, network: NetworkId, plan: TransactionPlan)
        -> Result<AuthorizedTransaction>;

    fn verify_execution(
        &self,
        network: NetworkId,
        execution: &str,
        verifying_key: &str,
        program: &str,
        function_name: &str,
    ) -> Result<bool>;

    fn decrypt_record(&self, network: NetworkId, ciphertext: &str, view_key: &str) -> Result<String>;
}
