use tracing::debug;

use zpass_client::NetworkClient;
use zpass_types::{OnChainVerification, VerifyOffChainOptions};

use crate::engine::worker::ProverWorker;
use crate::error::{Result, SdkError};

/// Fetch a transaction and report whether it carries an execution, along
/// with the outputs of its first transition.
///
/// A transaction that exists but did not execute (a deployment, a rejected
/// transaction) is a successful verification with `has_execution == false`,
/// not an error.
pub async fn verify_on_chain_with(
    client: &dyn NetworkClient,
    transaction_id: &str,
) -> Result<OnChainVerification> {
    let transaction = client.get_transaction(transaction_id).await?;
    debug!(transaction_id, kind = %transaction.kind, "fetched transaction for verification");

    let has_execution = transaction.kind == "execute";
    let outputs = transaction
        .execution
        .as_ref()
        .and_then(|execution| execution.transitions.first())
        .map(|transition| transition.outputs.clone())
        .unwrap_or_default();

    Ok(OnChainVerification { has_execution, outputs })
}

/// Verify a local execution artifact.
///
/// The verifying key is resolved in order of preference: an explicit key in
/// the options wins; otherwise one is synthesized from the program and the
/// provided inputs. Synthesis here never uses a private key, so holders can
/// verify artifacts they did not produce. With neither a key nor inputs the
/// call is rejected before any engine work starts.
pub async fn verify_off_chain_with(
    options: VerifyOffChainOptions,
    worker: &ProverWorker,
) -> Result<bool> {
    let verifying_key = match (options.verifying_key, &options.inputs) {
        (Some(key), _) => key,
        (None, Some(inputs)) => {
            worker
                .synthesize_keys(
                    options.network,
                    options.program.clone(),
                    options.function_name.clone(),
                    inputs.clone(),
                    None,
                )
                .await
                .map_err(SdkError::engine("synthesizing verification keys"))?
                .verifying_key
        }
        (None, None) => {
            return Err(SdkError::Precondition(
                "either inputs or a verifying key must be provided".to_string(),
            ))
        }
    };

    worker
        .verify_execution(
            options.network,
            options.execution,
            verifying_key,
            options.program,
            options.function_name,
        )
        .await
        .map_err(SdkError::engine("verifying execution"))
}
