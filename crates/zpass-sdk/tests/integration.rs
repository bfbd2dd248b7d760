use std::collections::BTreeMap;
use std::sync::Arc;

use sha3::{Digest, Keccak256};

use zpass_sdk::testing::{MockEngine, StaticClient};
use zpass_sdk::{SdkError, SdkOptions, ZPassSdk};
use zpass_types::{
    HashAlgorithm, NetworkId, OnChainOptions, ProveOffChainOptions, SignCredentialOptions,
    TransactionResponse, VerifyOffChainOptions,
};

const PRIVATE_KEY: &str = "APrivateKey1zkp8CZNn3yeCseEtxuVPbDCwSyhGW6yZKUYKfgXmcpoGPWH";
const OTHER_PRIVATE_KEY: &str = "APrivateKey1zkpFsQJVVBPWYZaVX5mTxEuBGxGK8N6bXUGT5eC2ZEPoMJh";

const CREDENTIAL_PROGRAM: &str = "program credential_v1.aleo;

function issue:
    input r0 as u8.private;
    input r1 as u8.private;
    output r0 as u8.private;

function revoke:
    input r0 as field.private;
";

const REGISTRY_PROGRAM: &str = "program registry.aleo;

function register:
    input r0 as u8.private;
";

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn keccak_hex(parts: &[&str]) -> String {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    hex::encode(hasher.finalize())
}

fn sdk_with_client(client: Arc<StaticClient>) -> (ZPassSdk, Arc<MockEngine>) {
    let engine = Arc::new(MockEngine::new());
    let options = SdkOptions::new(PRIVATE_KEY).with_network(NetworkId::Testnet);
    let sdk = ZPassSdk::with_client(options, engine.clone(), client).unwrap();
    (sdk, engine)
}

fn issue_options(inputs: &[&str]) -> OnChainOptions {
    OnChainOptions {
        program_name: "credential_v1.aleo".to_string(),
        function_name: "issue".to_string(),
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        fee: 10_000,
        private_fee: false,
        fee_record: None,
    }
}

fn off_chain_options(program: &str, function_name: &str, inputs: &[&str]) -> ProveOffChainOptions {
    ProveOffChainOptions {
        program: program.to_string(),
        function_name: function_name.to_string(),
        inputs: inputs.iter().map(|s| s.to_string()).collect(),
        offline_query: None,
    }
}

fn record_transaction() -> TransactionResponse {
    serde_json::from_value(serde_json::json!({
        "type": "execute",
        "id": "at1record",
        "execution": { "transitions": [{
            "program": "credential_v1.aleo",
            "function": "issue",
            "outputs": [
                { "type": "future", "id": "out0", "value": "{}" },
                { "type": "record", "id": "out1", "value": "record1qyqspexampleciphertext" }
            ]
        }]}
    }))
    .unwrap()
}

#[tokio::test]
async fn test_malformed_private_key_fails_without_side_effects() {
    init_logging();
    let engine = Arc::new(MockEngine::new());
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));

    let options = SdkOptions::new("AViewKey1notaprivatekey");
    let err = ZPassSdk::with_client(options, engine.clone(), client.clone()).unwrap_err();

    assert!(matches!(err, SdkError::Configuration(_)));
    assert_eq!(engine.calls(), 0);
    assert_eq!(client.request_count(), 0);
}

#[tokio::test]
async fn test_issue_zpass_submits_deterministic_transaction() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet).with_program("credential_v1.aleo", CREDENTIAL_PROGRAM));
    let (sdk, _engine) = sdk_with_client(client.clone());

    let transaction_id = sdk.issue_zpass(issue_options(&["1u8", "2u8"])).await.unwrap();

    let expected = format!(
        "at1{}",
        &keccak_hex(&["credential_v1.aleo", "issue", "1u8,2u8", "10000"])[..16]
    );
    assert_eq!(transaction_id, expected);

    let submitted = client.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].id, transaction_id);
    assert!(submitted[0].payload.contains("credential_v1.aleo"));
}

#[tokio::test]
async fn test_key_cache_avoids_resynthesis_across_inputs() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet).with_program("credential_v1.aleo", CREDENTIAL_PROGRAM));
    let (sdk, engine) = sdk_with_client(client.clone());

    sdk.issue_zpass(issue_options(&["1u8", "2u8"])).await.unwrap();
    sdk.prove_on_chain(issue_options(&["3u8", "4u8"])).await.unwrap();

    assert_eq!(engine.synthesize_calls(), 1);
    assert_eq!(client.submitted().len(), 2);
}

#[tokio::test]
async fn test_unknown_function_fails_before_synthesis() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet).with_program("credential_v1.aleo", CREDENTIAL_PROGRAM));
    let (sdk, engine) = sdk_with_client(client.clone());

    let mut options = issue_options(&["1u8", "2u8"]);
    options.function_name = "transfer".to_string();
    let err = sdk.prove_on_chain(options).await.unwrap_err();
    assert!(matches!(err, SdkError::NotFound(_)));
    assert_eq!(err.to_string(), "program credential_v1.aleo does not contain function transfer");

    let err = sdk
        .prove_off_chain(off_chain_options(CREDENTIAL_PROGRAM, "transfer", &["1u8"]))
        .await
        .unwrap_err();
    assert!(matches!(err, SdkError::NotFound(_)));

    assert_eq!(engine.synthesize_calls(), 0);
    assert!(client.submitted().is_empty());
}

#[tokio::test]
async fn test_program_body_change_forces_resynthesis() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));
    let (sdk, engine) = sdk_with_client(client);

    sdk.prove_off_chain(off_chain_options(CREDENTIAL_PROGRAM, "issue", &["1u8", "2u8"]))
        .await
        .unwrap();
    sdk.prove_off_chain(off_chain_options(CREDENTIAL_PROGRAM, "issue", &["3u8", "4u8"]))
        .await
        .unwrap();
    assert_eq!(engine.synthesize_calls(), 1);

    // Same program id, different body: the cached keys are stale.
    let updated = format!("{CREDENTIAL_PROGRAM}\nfunction extra:\n    input r0 as u8.private;\n");
    sdk.prove_off_chain(off_chain_options(&updated, "issue", &["1u8", "2u8"]))
        .await
        .unwrap();
    assert_eq!(engine.synthesize_calls(), 2);

    sdk.prove_off_chain(off_chain_options(&updated, "issue", &["5u8", "6u8"]))
        .await
        .unwrap();
    assert_eq!(engine.synthesize_calls(), 2);
}

#[tokio::test]
async fn test_cache_holds_multiple_programs() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));
    let (sdk, engine) = sdk_with_client(client);

    for _ in 0..2 {
        sdk.prove_off_chain(off_chain_options(CREDENTIAL_PROGRAM, "issue", &["1u8", "2u8"]))
            .await
            .unwrap();
        sdk.prove_off_chain(off_chain_options(REGISTRY_PROGRAM, "register", &["1u8"]))
            .await
            .unwrap();
    }

    assert_eq!(engine.synthesize_calls(), 2);
}

#[tokio::test]
async fn test_merkle_proof_folds_to_root() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));
    let (sdk, _engine) = sdk_with_client(client);

    let leaves: Vec<String> = ["alice", "bob", "carol", "dave", "erin"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    let root = sdk.merkle_root(leaves.clone()).await.unwrap();
    let hashes = sdk.leaf_hashes(leaves.clone()).await.unwrap();

    for (index, leaf_hash) in hashes.iter().enumerate() {
        let proof = sdk.merkle_proof(leaves.clone(), index).await.unwrap();
        let mut current = leaf_hash.clone();
        let mut position = index;
        for sibling in &proof {
            current = if position % 2 == 0 {
                keccak_hex(&[&current, sibling])
            } else {
                keccak_hex(&[sibling, &current])
            };
            position /= 2;
        }
        assert_eq!(current, root, "proof for leaf {index} must fold to the root");
    }

    let tree: Vec<Vec<String>> = serde_json::from_str(&sdk.merkle_tree(leaves.clone()).await.unwrap()).unwrap();
    assert_eq!(tree.first().unwrap(), &hashes);
    assert_eq!(tree.last().unwrap(), &[root]);

    let err = sdk.merkle_proof(leaves, 5).await.unwrap_err();
    assert!(matches!(err, SdkError::Engine { .. }));
}

#[tokio::test]
async fn test_sign_credential_falls_back_to_account_key() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));
    let (sdk, _engine) = sdk_with_client(client);

    let mut data = BTreeMap::new();
    data.insert("name".to_string(), "alice".to_string());
    data.insert("dob".to_string(), "2000-01-01".to_string());

    let with_account_key = sdk
        .sign_credential(SignCredentialOptions {
            data: data.clone(),
            hash_type: HashAlgorithm::Poseidon2,
            private_key: None,
        })
        .await
        .unwrap();

    let with_explicit_key = sdk
        .sign_credential(SignCredentialOptions {
            data,
            hash_type: HashAlgorithm::Poseidon2,
            private_key: Some(OTHER_PRIVATE_KEY.to_string()),
        })
        .await
        .unwrap();

    assert_eq!(with_account_key.hash, with_explicit_key.hash);
    assert_ne!(with_account_key.signature, with_explicit_key.signature);

    let signed_root = sdk.sign_merkle_root("123field".to_string()).await.unwrap();
    assert!(signed_root.starts_with("sign1"));
}

#[tokio::test]
async fn test_off_chain_prove_then_verify() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));
    let (sdk, _engine) = sdk_with_client(client);

    let execution = sdk
        .prove_off_chain(off_chain_options(CREDENTIAL_PROGRAM, "issue", &["1u8", "2u8"]))
        .await
        .unwrap();
    assert_eq!(execution.outputs, vec!["1u8", "2u8"]);

    let base = VerifyOffChainOptions {
        execution: execution.execution.clone(),
        program: CREDENTIAL_PROGRAM.to_string(),
        function_name: "issue".to_string(),
        inputs: None,
        verifying_key: None,
        url: None,
        network: NetworkId::Testnet,
    };

    let mut with_inputs = base.clone();
    with_inputs.inputs = Some(vec!["1u8".to_string(), "2u8".to_string()]);
    assert!(sdk.verify_off_chain(with_inputs).await.unwrap());

    let mut with_key = base.clone();
    with_key.verifying_key = Some(execution.verifying_key.clone());
    assert!(sdk.verify_off_chain(with_key).await.unwrap());

    let mut with_other_inputs = base;
    with_other_inputs.inputs = Some(vec!["9u8".to_string(), "9u8".to_string()]);
    assert!(!sdk.verify_off_chain(with_other_inputs).await.unwrap());
}

#[tokio::test]
async fn test_verify_off_chain_requires_inputs_or_key() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));
    let (sdk, engine) = sdk_with_client(client);
    let calls_before = engine.calls();

    let options = VerifyOffChainOptions {
        execution: "execution1deadbeef:cafe".to_string(),
        program: CREDENTIAL_PROGRAM.to_string(),
        function_name: "issue".to_string(),
        inputs: None,
        verifying_key: None,
        url: None,
        network: NetworkId::Testnet,
    };

    let err = sdk.verify_off_chain(options).await.unwrap_err();
    assert!(matches!(err, SdkError::Precondition(_)));
    assert_eq!(engine.calls(), calls_before);
}

#[tokio::test]
async fn test_verify_on_chain_reports_execution_presence() {
    init_logging();
    let deploy: TransactionResponse =
        serde_json::from_str(r#"{ "type": "deploy", "id": "at1deploy" }"#).unwrap();
    let client = Arc::new(
        StaticClient::new(NetworkId::Testnet)
            .with_transaction("at1record", record_transaction())
            .with_transaction("at1deploy", deploy),
    );
    let (sdk, _engine) = sdk_with_client(client);

    let verdict = sdk.verify_on_chain("at1record").await.unwrap();
    assert!(verdict.has_execution);
    assert_eq!(verdict.outputs.len(), 2);

    let verdict = sdk.verify_on_chain("at1deploy").await.unwrap();
    assert!(!verdict.has_execution);
    assert!(verdict.outputs.is_empty());

    let err = sdk.verify_on_chain("at1missing").await.unwrap_err();
    assert!(matches!(err, SdkError::Client(_)));
}

#[tokio::test]
async fn test_zpass_record_decryption() {
    init_logging();
    let no_record: TransactionResponse = serde_json::from_value(serde_json::json!({
        "type": "execute",
        "id": "at1norecord",
        "execution": { "transitions": [{
            "program": "credential_v1.aleo",
            "function": "revoke",
            "outputs": [{ "type": "future", "id": "out0", "value": "{}" }]
        }]}
    }))
    .unwrap();
    let deploy: TransactionResponse =
        serde_json::from_str(r#"{ "type": "deploy", "id": "at1deploy" }"#).unwrap();

    let client = Arc::new(
        StaticClient::new(NetworkId::Testnet)
            .with_transaction("at1record", record_transaction())
            .with_transaction("at1norecord", no_record)
            .with_transaction("at1deploy", deploy),
    );
    let (sdk, _engine) = sdk_with_client(client);

    let plaintext = sdk.get_zpass_record("at1record").await.unwrap();
    assert!(plaintext.starts_with("record_plaintext:"));

    let err = sdk.get_zpass_record("at1norecord").await.unwrap_err();
    assert_eq!(err.to_string(), "no record found in transaction outputs");

    let err = sdk.get_zpass_record("at1deploy").await.unwrap_err();
    assert_eq!(err.to_string(), "no outputs found in transaction");
}

#[tokio::test]
async fn test_concurrent_proofs_stay_independent() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));
    let (sdk, engine) = sdk_with_client(client);

    let (credential, registry) = tokio::join!(
        sdk.prove_off_chain(off_chain_options(CREDENTIAL_PROGRAM, "issue", &["1u8", "2u8"])),
        sdk.prove_off_chain(off_chain_options(REGISTRY_PROGRAM, "register", &["7u8"])),
    );
    let credential = credential.unwrap();
    let registry = registry.unwrap();

    assert_eq!(engine.synthesize_calls(), 2);
    assert_ne!(credential.verifying_key, registry.verifying_key);

    let verdict = sdk
        .verify_off_chain(VerifyOffChainOptions {
            execution: credential.execution,
            program: CREDENTIAL_PROGRAM.to_string(),
            function_name: "issue".to_string(),
            inputs: Some(vec!["1u8".to_string(), "2u8".to_string()]),
            verifying_key: None,
            url: None,
            network: NetworkId::Testnet,
        })
        .await
        .unwrap();
    assert!(verdict);
}

#[tokio::test]
async fn test_set_host_reaches_the_client() {
    init_logging();
    let client = Arc::new(StaticClient::new(NetworkId::Testnet));
    let (sdk, _engine) = sdk_with_client(client.clone());

    sdk.set_host("http://localhost:9999").unwrap();
    assert_eq!(client.host(), "http://localhost:9999");
}
