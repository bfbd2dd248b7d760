//! Deterministic test doubles for the engine and network seams.
//!
//! `MockEngine` implements the full engine surface with Keccak-based
//! arithmetic: Merkle math is a real binary hash tree, and execution
//! artifacts embed a fingerprint of the verifying key so proof and
//! verification agree without any actual circuit work. `StaticClient`
//! serves canned programs and transactions and records submissions.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use anyhow::{bail, Result};
use async_trait::async_trait;
use sha3::{Digest, Keccak256};

use zpass_client::{ClientError, NetworkClient};
use zpass_types::{
    AuthorizedTransaction, HashAlgorithm, KeyPair, NetworkId, OffChainExecution, SignedCredential,
    TransactionResponse,
};

use crate::engine::{LocalExecution, TransactionPlan, ZkEngine};

fn keccak(parts: &[&str]) -> String {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

fn hash_pair(left: &str, right: &str) -> String {
    keccak(&[left, right])
}

fn hashed_leaves(leaves: &[String]) -> Vec<String> {
    leaves.iter().map(|leaf| keccak(&[leaf])).collect()
}

fn tree_levels(leaves: &[String]) -> Result<Vec<Vec<String>>> {
    if leaves.is_empty() {
        bail!("cannot build a merkle tree from no leaves");
    }
    let mut levels = vec![hashed_leaves(leaves)];
    while levels.last().map(Vec::len).unwrap_or(0) > 1 {
        let prev = levels.last().unwrap();
        let mut next = Vec::with_capacity(prev.len().div_ceil(2));
        for pair in prev.chunks(2) {
            let left = &pair[0];
            let right = pair.get(1).unwrap_or(left);
            next.push(hash_pair(left, right));
        }
        levels.push(next);
    }
    Ok(levels)
}

fn verifying_key_for(network: NetworkId, program: &str, function_name: &str, inputs: &[String]) -> String {
    let joined = inputs.join(",");
    format!("vk1{}", keccak(&[&network.to_string(), program, function_name, &joined]))
}

fn execution_fingerprint(verifying_key: &str) -> String {
    keccak(&["exec", verifying_key])
}

/// Engine double with deterministic outputs and call counters.
#[derive(Default)]
pub struct MockEngine {
    calls: AtomicUsize,
    synthesize_calls: AtomicUsize,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total engine invocations across all methods.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Invocations of key synthesis specifically.
    pub fn synthesize_calls(&self) -> usize {
        self.synthesize_calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl ZkEngine for MockEngine {
    fn merkle_root(&self, _network: NetworkId, leaves: &[String]) -> Result<String> {
        self.record_call();
        let levels = tree_levels(leaves)?;
        Ok(levels.last().unwrap()[0].clone())
    }

    fn merkle_tree(&self, _network: NetworkId, leaves: &[String]) -> Result<String> {
        self.record_call();
        let levels = tree_levels(leaves)?;
        Ok(serde_json::to_string(&levels)?)
    }

    fn merkle_proof(&self, _network: NetworkId, leaves: &[String], index: usize) -> Result<Vec<String>> {
        self.record_call();
        if index >= leaves.len() {
            bail!("leaf index {index} out of bounds for {} leaves", leaves.len());
        }
        let levels = tree_levels(leaves)?;
        let mut proof = Vec::new();
        let mut position = index;
        for level in &levels[..levels.len() - 1] {
            let mut sibling = position ^ 1;
            if sibling >= level.len() {
                sibling = position;
            }
            proof.push(level[sibling].clone());
            position /= 2;
        }
        Ok(proof)
    }

    fn leaf_hashes(&self, _network: NetworkId, leaves: &[String]) -> Result<Vec<String>> {
        self.record_call();
        Ok(hashed_leaves(leaves))
    }

    fn sign_merkle_root(&self, _network: NetworkId, private_key: &str, root: &str) -> Result<String> {
        self.record_call();
        Ok(format!("sign1{}", keccak(&[private_key, root])))
    }

    fn sign_message(
        &self,
        _network: NetworkId,
        private_key: &str,
        data: &BTreeMap<String, String>,
        algorithm: HashAlgorithm,
    ) -> Result<SignedCredential> {
        self.record_call();
        let mut parts = vec![format!("{algorithm:?}")];
        for (key, value) in data {
            parts.push(format!("{key}={value}"));
        }
        let joined = parts.join(";");
        let hash = keccak(&[&joined]);
        let signature = format!("sign1{}", keccak(&[private_key, &hash]));
        Ok(SignedCredential { signature, hash })
    }

    fn derive_view_key(&self, _network: NetworkId, private_key: &str) -> Result<String> {
        self.record_call();
        Ok(format!("AViewKey1{}", &keccak(&[private_key])[..32]))
    }

    fn synthesize_keys(
        &self,
        network: NetworkId,
        program: &str,
        function_name: &str,
        inputs: &[String],
        private_key: Option<&str>,
    ) -> Result<KeyPair> {
        self.record_call();
        self.synthesize_calls.fetch_add(1, Ordering::SeqCst);
        let verifying_key = verifying_key_for(network, program, function_name, inputs);
        let owner = private_key.unwrap_or("anonymous");
        let proving_key = format!("pk1{}", keccak(&[owner, &verifying_key]));
        Ok(KeyPair { proving_key, verifying_key })
    }

    fn execute_local(&self, _network: NetworkId, request: LocalExecution) -> Result<OffChainExecution> {
        self.record_call();
        let fingerprint = execution_fingerprint(&request.keys.verifying_key);
        let inputs_digest = keccak(&[&request.inputs.join(",")]);
        Ok(OffChainExecution {
            outputs: request.inputs,
            execution: format!("execution1{fingerprint}:{inputs_digest}"),
            verifying_key: request.keys.verifying_key,
        })
    }

    fn build_execution_transaction(
        &self,
        _network: NetworkId,
        plan: TransactionPlan,
    ) -> Result<AuthorizedTransaction> {
        self.record_call();
        let joined = plan.inputs.join(",");
        let digest = keccak(&[&plan.program_name, &plan.function_name, &joined, &plan.fee.to_string()]);
        let payload = serde_json::json!({
            "type": "execute",
            "program": plan.program_name,
            "function": plan.function_name,
            "inputs": plan.inputs,
            "fee": plan.fee,
            "private_fee": plan.private_fee,
        });
        Ok(AuthorizedTransaction {
            id: format!("at1{}", &digest[..16]),
            payload: payload.to_string(),
        })
    }

    fn verify_execution(
        &self,
        _network: NetworkId,
        execution: &str,
        verifying_key: &str,
        _program: &str,
        _function_name: &str,
    ) -> Result<bool> {
        self.record_call();
        let Some(body) = execution.strip_prefix("execution1") else {
            bail!("malformed execution artifact");
        };
        let Some((fingerprint, _)) = body.split_once(':') else {
            bail!("malformed execution artifact");
        };
        Ok(fingerprint == execution_fingerprint(verifying_key))
    }

    fn decrypt_record(&self, _network: NetworkId, ciphertext: &str, view_key: &str) -> Result<String> {
        self.record_call();
        Ok(format!("record_plaintext:{}", keccak(&[view_key, ciphertext])))
    }
}

/// Network client double serving canned programs and transactions.
pub struct StaticClient {
    network: NetworkId,
    host: RwLock<String>,
    programs: HashMap<String, String>,
    transactions: HashMap<String, TransactionResponse>,
    submitted: Mutex<Vec<AuthorizedTransaction>>,
    requests: AtomicUsize,
}

impl StaticClient {
    pub fn new(network: NetworkId) -> Self {
        Self {
            network,
            host: RwLock::new("http://localhost:3030".to_string()),
            programs: HashMap::new(),
            transactions: HashMap::new(),
            submitted: Mutex::new(Vec::new()),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn with_program(mut self, id: impl Into<String>, source: impl Into<String>) -> Self {
        self.programs.insert(id.into(), source.into());
        self
    }

    pub fn with_transaction(mut self, id: impl Into<String>, transaction: TransactionResponse) -> Self {
        self.transactions.insert(id.into(), transaction);
        self
    }

    pub fn submitted(&self) -> Vec<AuthorizedTransaction> {
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn host(&self) -> String {
        self.host
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl NetworkClient for StaticClient {
    fn network(&self) -> NetworkId {
        self.network
    }

    fn set_host(&self, host: &str) -> zpass_client::Result<()> {
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = host.to_string();
        Ok(())
    }

    async fn get_program(&self, program_id: &str) -> zpass_client::Result<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.programs
            .get(program_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("program {program_id}")))
    }

    async fn get_transaction(&self, transaction_id: &str) -> zpass_client::Result<TransactionResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.transactions
            .get(transaction_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("transaction {transaction_id}")))
    }

    async fn submit_transaction(&self, transaction: &AuthorizedTransaction) -> zpass_client::Result<String> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.submitted
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(transaction.clone());
        Ok(transaction.id.clone())
    }
}
