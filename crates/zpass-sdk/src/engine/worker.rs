use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tokio::task::JoinError;

use zpass_types::{
    AuthorizedTransaction, HashAlgorithm, KeyPair, NetworkId, OffChainExecution, SignedCredential,
};

use super::{LocalExecution, TransactionPlan, ZkEngine};

/// Owned handle running engine calls off the async runtime.
///
/// Key synthesis and proof generation are blocking, CPU-heavy calls; the
/// worker moves each one onto `spawn_blocking` so orchestration stays
/// responsive. Handles are cheap to clone and fully independent: construct
/// one per engine instance, no process-wide state involved.
#[derive(Clone)]
pub struct ProverWorker {
    engine: Arc<dyn ZkEngine>,
}

fn join_failure(err: JoinError) -> anyhow::Error {
    anyhow!("prover worker task failed: {err}")
}

impl ProverWorker {
    pub fn new(engine: Arc<dyn ZkEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<dyn ZkEngine> {
        &self.engine
    }

    pub async fn merkle_root(&self, network: NetworkId, leaves: Vec<String>) -> Result<String> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.merkle_root(network, &leaves))
            .await
            .map_err(join_failure)?
    }

    pub async fn merkle_tree(&self, network: NetworkId, leaves: Vec<String>) -> Result<String> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.merkle_tree(network, &leaves))
            .await
            .map_err(join_failure)?
    }

    pub async fn merkle_proof(&self, network: NetworkId, leaves: Vec<String>, index: usize) -> Result<Vec<String>> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.merkle_proof(network, &leaves, index))
            .await
            .map_err(join_failure)?
    }

    pub async fn leaf_hashes(&self, network: NetworkId, leaves: Vec<String>) -> Result<Vec<String>> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.leaf_hashes(network, &leaves))
            .await
            .map_err(join_failure)?
    }

    pub async fn sign_merkle_root(&self, network: NetworkId, private_key: String, root: String) -> Result<String> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.sign_merkle_root(network, &private_key, &root))
            .await
            .map_err(join_failure)?
    }

    pub async fn sign_message(
        &self,
        network: NetworkId,
        private_key: String,
        data: BTreeMap<String, String>,
        algorithm: HashAlgorithm,
    ) -> Result<SignedCredential> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.sign_message(network, &private_key, &data, algorithm))
            .await
            .map_err(join_failure)?
    }

    pub async fn synthesize_keys(
        &self,
        network: NetworkId,
        program: String,
        function_name: String,
        inputs: Vec<String>,
        private_key: Option<String>,
    ) -> Result<KeyPair> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || {
            engine.synthesize_keys(network, &program, &function_name, &inputs, private_key.as_deref())
        })
        .await
        .map_err(join_failure)?
    }

    pub async fn execute_local(&self, network: NetworkId, request: LocalExecution) -> Result<OffChainExecution> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.execute_local(network, request))
            .await
            .map_err(join_failure)?
    }

    pub async fn build_execution_transaction(
        &self,
        network: NetworkId,
        plan: TransactionPlan,
    ) -> Result<AuthorizedTransaction> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.build_execution_transaction(network, plan))
            .await
            .map_err(join_failure)?
    }

    pub async fn verify_execution(
        &self,
        network: NetworkId,
        execution: String,
        verifying_key: String,
        program: String,
        function_name: String,
    ) -> Result<bool> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || {
            engine.verify_execution(network, &execution, &verifying_key, &program, &function_name)
        })
        .await
        .map_err(join_failure)?
    }

    pub async fn decrypt_record(&self, network: NetworkId, ciphertext: String, view_key: String) -> Result<String> {
        let engine = self.engine.clone();
        tokio::task::spawn_blocking(move || engine.decrypt_record(network, &ciphertext, &view_key))
            .await
            .map_err(join_failure)?
    }
}
