use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use zpass_client::{HttpNetworkClient, NetworkClient};
use zpass_types::{
    HashAlgorithm, KeyPair, NetworkId, OffChainExecution, OnChainOptions, OnChainVerification,
    ProveOffChainOptions, SignCredentialOptions, SignedCredential, VerifyOffChainOptions,
    VerifyOnChainOptions,
};

use crate::account::{validate_private_key, Account};
use crate::config::{SdkOptions, DEFAULT_HOST};
use crate::engine::worker::ProverWorker;
use crate::engine::{LocalExecution, TransactionPlan, ZkEngine};
use crate::error::{Result, SdkError};
use crate::keys::{program_digest, KeyCache};
use crate::program::ProgramHandle;
use crate::verify;

/// Client SDK for issuing, proving, and verifying zero-knowledge credentials.
///
/// Construction binds one network, one account, one network client, and one
/// prover worker. Every instance owns its own key cache; nothing is shared
/// process-wide, so independent instances never contend.
pub struct ZPassSdk {
    network: NetworkId,
    account: Account,
    client: Arc<dyn NetworkClient>,
    worker: ProverWorker,
    key_cache: Mutex<KeyCache>,
}

impl std::fmt::Debug for ZPassSdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZPassSdk")
            .field("network", &self.network)
            .finish_non_exhaustive()
    }
}

impl ZPassSdk {
    /// Build an SDK instance against the default HTTP network client.
    ///
    /// The private key prefix is checked before any key derivation or
    /// endpoint construction runs, so a malformed key fails without side
    /// effects.
    pub fn new(options: SdkOptions, engine: Arc<dyn ZkEngine>) -> Result<Self> {
        validate_private_key(&options.private_key)?;

        let host = options.host.as_deref().unwrap_or(DEFAULT_HOST);
        let client = HttpNetworkClient::new(host, options.network)
            .map_err(|e| SdkError::Configuration(format!("error initializing SDK: {e}")))?;

        Self::with_client(options, engine, Arc::new(client))
    }

    /// Build an SDK instance with an injected network client.
    pub fn with_client(
        options: SdkOptions,
        engine: Arc<dyn ZkEngine>,
        client: Arc<dyn NetworkClient>,
    ) -> Result<Self> {
        validate_private_key(&options.private_key)?;

        let view_key = engine
            .derive_view_key(options.network, &options.private_key)
            .map_err(|e| SdkError::Configuration(format!("error initializing SDK: {e}")))?;

        Ok(Self {
            network: options.network,
            account: Account::new(Some(options.private_key), Some(view_key)),
            client,
            worker: ProverWorker::new(engine),
            key_cache: Mutex::new(KeyCache::new(options.key_cache_capacity)),
        })
    }

    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Point subsequent network calls at a different explorer endpoint.
    pub fn set_host(&self, host: &str) -> Result<()> {
        self.client.set_host(host)?;
        Ok(())
    }

    /// Issue a credential on chain. Alias for the generic on-chain proof
    /// path, kept as a named operation because issuance is the primary flow.
    pub async fn issue_zpass(&self, options: OnChainOptions) -> Result<String> {
        self.on_chain_interact(options).await
    }

    /// Execute a program function on chain, producing a fee-bearing
    /// transaction, and return its id.
    pub async fn prove_on_chain(&self, options: OnChainOptions) -> Result<String> {
        self.on_chain_interact(options).await
    }

    async fn on_chain_interact(&self, options: OnChainOptions) -> Result<String> {
        let program = self.client.get_program(&options.program_name).await?;
        let handle = ProgramHandle::parse(&program)?;
        handle.expect_function(&options.function_name)?;

        let cache_key = format!("{}:{}", options.program_name, options.function_name);
        let keys = self
            .ensure_keys(&cache_key, &program, &options.function_name, &options.inputs)
            .await?;

        let plan = TransactionPlan {
            program,
            program_name: options.program_name.clone(),
            function_name: options.function_name.clone(),
            inputs: options.inputs,
            fee: options.fee,
            private_fee: options.private_fee,
            fee_record: options.fee_record,
            keys,
            private_key: self.account.private_key()?.to_string(),
        };

        let transaction = self
            .worker
            .build_execution_transaction(self.network, plan)
            .await
            .map_err(SdkError::engine("building execution transaction"))?;

        let transaction_id = self.client.submit_transaction(&transaction).await?;
        info!(
            program = %options.program_name,
            function = %options.function_name,
            transaction_id = %transaction_id,
            "submitted execution transaction"
        );
        Ok(transaction_id)
    }

    /// Execute a program locally and produce a portable proof artifact.
    ///
    /// The caller supplies the program source directly; imports are resolved
    /// through the network client before execution.
    pub async fn prove_off_chain(&self, options: ProveOffChainOptions) -> Result<OffChainExecution> {
        let handle = ProgramHandle::parse(&options.program)?;
        handle.expect_function(&options.function_name)?;

        let imports = self.client.get_program_imports(&options.program).await?;

        let cache_key = handle.cache_key(&options.function_name);
        let keys = self
            .ensure_keys(&cache_key, &options.program, &options.function_name, &options.inputs)
            .await?;

        let request = LocalExecution {
            program: options.program,
            function_name: options.function_name,
            inputs: options.inputs,
            imports,
            keys,
            private_key: self.account.private_key()?.to_string(),
            offline_query: options.offline_query,
        };

        self.worker
            .execute_local(self.network, request)
            .await
            .map_err(SdkError::engine("executing program locally"))
    }

    /// Fetch a transaction and decrypt the credential record it produced.
    pub async fn get_zpass_record(&self, transaction_id: &str) -> Result<String> {
        let transaction = self.client.get_transaction(transaction_id).await?;

        let outputs = transaction
            .execution
            .as_ref()
            .and_then(|execution| execution.transitions.first())
            .map(|transition| transition.outputs.as_slice())
            .ok_or_else(|| SdkError::NotFound("no outputs found in transaction".to_string()))?;

        let ciphertext = outputs
            .iter()
            .find(|output| output.kind == "record")
            .and_then(|output| output.value_str())
            .ok_or_else(|| SdkError::NotFound("no record found in transaction outputs".to_string()))?;

        let view_key = self.account.view_key()?.to_string();
        self.worker
            .decrypt_record(self.network, ciphertext.to_string(), view_key)
            .await
            .map_err(SdkError::engine("decrypting record"))
    }

    /// Check whether a transaction executed on chain and return the outputs
    /// of its first transition.
    pub async fn verify_on_chain(&self, transaction_id: &str) -> Result<OnChainVerification> {
        verify::verify_on_chain_with(self.client.as_ref(), transaction_id).await
    }

    /// Verify a local execution artifact against its program function.
    pub async fn verify_off_chain(&self, options: VerifyOffChainOptions) -> Result<bool> {
        verify::verify_off_chain_with(options, &self.worker).await
    }

    pub async fn merkle_root(&self, leaves: Vec<String>) -> Result<String> {
        self.worker
            .merkle_root(self.network, leaves)
            .await
            .map_err(SdkError::engine("computing merkle root"))
    }

    pub async fn merkle_tree(&self, leaves: Vec<String>) -> Result<String> {
        self.worker
            .merkle_tree(self.network, leaves)
            .await
            .map_err(SdkError::engine("building merkle tree"))
    }

    pub async fn merkle_proof(&self, leaves: Vec<String>, index: usize) -> Result<Vec<String>> {
        self.worker
            .merkle_proof(self.network, leaves, index)
            .await
            .map_err(SdkError::engine("computing merkle proof"))
    }

    pub async fn leaf_hashes(&self, leaves: Vec<String>) -> Result<Vec<String>> {
        self.worker
            .leaf_hashes(self.network, leaves)
            .await
            .map_err(SdkError::engine("hashing merkle leaves"))
    }

    /// Sign a Merkle root with the account private key.
    pub async fn sign_merkle_root(&self, root: String) -> Result<String> {
        let private_key = self.account.private_key()?.to_string();
        self.worker
            .sign_merkle_root(self.network, private_key, root)
            .await
            .map_err(SdkError::engine("signing merkle root"))
    }

    /// Hash and sign a credential's field map. Uses the caller-supplied
    /// private key when given, otherwise the account key.
    pub async fn sign_credential(&self, options: SignCredentialOptions) -> Result<SignedCredential> {
        let private_key = match options.private_key {
            Some(key) => key,
            None => self.account.private_key()?.to_string(),
        };
        self.sign_message(private_key, options.data, options.hash_type).await
    }

    async fn sign_message(
        &self,
        private_key: String,
        data: BTreeMap<String, String>,
        algorithm: HashAlgorithm,
    ) -> Result<SignedCredential> {
        self.worker
            .sign_message(self.network, private_key, data, algorithm)
            .await
            .map_err(SdkError::engine("signing credential"))
    }

    /// Synthesize keys for `cache_key`, consulting the cache first.
    ///
    /// The cache lock is held across synthesis. Concurrent callers for the
    /// same function therefore serialize, and the second caller observes the
    /// first one's freshly inserted entry instead of duplicating the work.
    async fn ensure_keys(
        &self,
        cache_key: &str,
        program: &str,
        function_name: &str,
        inputs: &[String],
    ) -> Result<KeyPair> {
        let digest = program_digest(program);
        let mut cache = self.key_cache.lock().await;

        if let Some(keys) = cache.get_if_current(cache_key, digest) {
            debug!(cache_key, "proving keys served from cache");
            return Ok(keys);
        }

        info!(cache_key, "synthesizing proving keys");
        let private_key = self.account.private_key().ok().map(str::to_string);
        let keys = self
            .worker
            .synthesize_keys(
                self.network,
                program.to_string(),
                function_name.to_string(),
                inputs.to_vec(),
                private_key,
            )
            .await
            .map_err(SdkError::engine("synthesizing keys"))?;

        cache.insert(cache_key.to_string(), digest, keys.clone());
        Ok(keys)
    }
}

/// Standalone on-chain verification against an explorer endpoint.
///
/// Builds a throwaway client from the options, so callers can verify
/// without constructing a full SDK instance.
pub async fn verify_on_chain(options: VerifyOnChainOptions) -> Result<OnChainVerification> {
    let host = options.url.as_deref().unwrap_or(DEFAULT_HOST);
    let client = HttpNetworkClient::new(host, options.network)?;
    verify::verify_on_chain_with(&client, &options.transaction_id).await
}
