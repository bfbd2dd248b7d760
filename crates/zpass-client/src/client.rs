use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;
use tracing::{debug, info};
use url::Url;

use zpass_types::{AuthorizedTransaction, NetworkId, TransactionResponse};

use crate::error::{ClientError, Result};

/// Network access seam consumed by the SDK.
///
/// Implementations resolve programs by id, fetch transactions, and broadcast
/// signed transactions. Import resolution has a provided implementation that
/// walks `import` declarations transitively through `get_program`.
#[async_trait]
pub trait NetworkClient: Send + Sync {
    /// The network this client is bound to.
    fn network(&self) -> NetworkId;

    /// Swap the endpoint used by subsequent requests.
    fn set_host(&self, host: &str) -> Result<()>;

    /// Fetch a program's source text by program id.
    async fn get_program(&self, program_id: &str) -> Result<String>;

    /// Fetch a transaction by id.
    async fn get_transaction(&self, transaction_id: &str) -> Result<TransactionResponse>;

    /// Broadcast a built transaction, returning the id echoed by the network.
    async fn submit_transaction(&self, transaction: &AuthorizedTransaction) -> Result<String>;

    /// Resolve every program the given source imports, transitively.
    async fn get_program_imports(&self, source: &str) -> Result<BTreeMap<String, String>> {
        let mut imports = BTreeMap::new();
        let mut pending = parse_import_ids(source);
        while let Some(id) = pending.pop() {
            if imports.contains_key(&id) {
                continue;
            }
            let fetched = self.get_program(&id).await?;
            pending.extend(parse_import_ids(&fetched));
            imports.insert(id, fetched);
        }
        Ok(imports)
    }
}

/// Program ids named by `import <id>;` declarations in the source header.
pub fn parse_import_ids(source: &str) -> Vec<String> {
    source
        .lines()
        .map(str::trim)
        .filter_map(|line| line.strip_prefix("import "))
        .filter_map(|rest| rest.strip_suffix(';'))
        .map(|id| id.trim().to_string())
        .collect()
}

/// HTTP client for the explorer REST API.
///
/// Endpoints follow the `{host}/{network}/{path}` layout; the host can be
/// swapped at runtime via `set_host`.
pub struct HttpNetworkClient {
    network: NetworkId,
    host: RwLock<String>,
    http: reqwest::Client,
}

impl HttpNetworkClient {
    pub fn new(host: &str, network: NetworkId) -> Result<Self> {
        Url::parse(host)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder().default_headers(headers).build()?;

        debug!(host, %network, "created explorer client");
        Ok(Self {
            network,
            host: RwLock::new(host.trim_end_matches('/').to_string()),
            http,
        })
    }

    pub fn host(&self) -> String {
        self.host.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{}", self.host(), self.network, path)
    }

    async fn get(&self, path: &str) -> Result<String> {
        let endpoint = self.endpoint(path);
        let response = self.http.get(&endpoint).send().await?;
        Self::read_body(path, response).await
    }

    async fn read_body(path: &str, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                path: path.to_string(),
                body,
            });
        }
        Ok(response.text().await?)
    }
}

#[async_trait]
impl NetworkClient for HttpNetworkClient {
    fn network(&self) -> NetworkId {
        self.network
    }

    fn set_host(&self, host: &str) -> Result<()> {
        Url::parse(host)?;
        *self.host.write().unwrap_or_else(PoisonError::into_inner) = host.trim_end_matches('/').to_string();
        info!(host, "explorer host updated");
        Ok(())
    }

    async fn get_program(&self, program_id: &str) -> Result<String> {
        let body = self.get(&format!("program/{program_id}")).await?;
        // The API quotes program source as a JSON string.
        Ok(serde_json::from_str::<String>(&body).unwrap_or(body))
    }

    async fn get_transaction(&self, transaction_id: &str) -> Result<TransactionResponse> {
        let body = self.get(&format!("transaction/{transaction_id}")).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn submit_transaction(&self, transaction: &AuthorizedTransaction) -> Result<String> {
        let path = "transaction/broadcast";
        let endpoint = self.endpoint(path);
        debug!(transaction_id = %transaction.id, "broadcasting transaction");
        let response = self.http.post(&endpoint).body(transaction.payload.clone()).send().await?;
        let body = Self::read_body(path, response).await?;
        let id = serde_json::from_str::<String>(&body).unwrap_or_else(|_| body.trim().to_string());
        info!(transaction_id = %id, "transaction broadcast accepted");
        Ok(id)
    }
}
