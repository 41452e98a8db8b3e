//! NEAR JSON-RPC session: node checks, signer keys and transaction submission

use std::{
    fmt::Debug,
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use near_crypto::InMemorySigner;
use near_jsonrpc_client::{errors::JsonRpcError, methods, JsonRpcClient};
use near_jsonrpc_primitives::types::query::QueryResponseKind;
use near_primitives::{
    hash::CryptoHash,
    transaction::Transaction,
    types::{AccountId, BlockReference, Finality, Nonce},
    views::{FinalExecutionStatus, QueryRequest},
};
use tracing::{debug, info};

use crate::{
    config::{Environment, Network},
    constants::CREDENTIALS_DIR,
    errors::ScriptError,
    tx::{ChainClient, ChainConnector, TransactionOutcome, TransactionRequest},
};

/// Where and how to connect
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Network the node must serve
    pub network: Network,
    /// JSON-RPC endpoint
    pub node_url: String,
    /// Key store root, holding one directory per network
    pub credentials_dir: PathBuf,
}

/// Nonce of an access key, read at a final block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AccessKeyView {
    /// Last nonce used by the key
    pub nonce: Nonce,
    /// Block the key was read at, used as the transaction's reference block
    pub block_hash: CryptoHash,
}

/// A JSON-RPC session on one network, signing with keys from a credentials directory
pub struct NearRpcClient {
    /// Node connection
    rpc: JsonRpcClient,
    /// Network the node serves
    network: Network,
    /// Key store root
    credentials_dir: PathBuf,
}

impl NearRpcClient {
    /// Check the key store, then make sure the node is reachable and serves `network`
    pub async fn connect(config: &ConnectionConfig) -> Result<Self, ScriptError> {
        fs::read_dir(&config.credentials_dir).map_err(|e| {
            ScriptError::CredentialStoreUnavailable(format!(
                "{}: {}",
                config.credentials_dir.display(),
                e
            ))
        })?;

        let rpc = JsonRpcClient::connect(config.node_url.as_str());

        let status = rpc
            .call(methods::status::RpcStatusRequest)
            .await
            .map_err(|e| rpc_error("status", e))?;
        if status.chain_id != config.network.id() {
            return Err(ScriptError::ClientInitialization(format!(
                "{} serves chain {}, expected {}",
                config.node_url, status.chain_id, config.network
            )));
        }

        info!(
            "Connected to {} on chain {} (block {})",
            config.node_url, status.chain_id, status.sync_info.latest_block_height
        );

        Ok(NearRpcClient {
            rpc,
            network: config.network,
            credentials_dir: config.credentials_dir.clone(),
        })
    }

    /// Load the key of `account_id` from `<credentials_dir>/<network>/<account_id>.json`
    fn signer(&self, account_id: &AccountId) -> Result<InMemorySigner, ScriptError> {
        let key_path = key_path(&self.credentials_dir, self.network, account_id);
        if !key_path.exists() {
            return Err(ScriptError::MissingKey(format!(
                "{} (looked for {})",
                account_id,
                key_path.display()
            )));
        }

        let signer = InMemorySigner::from_file(&key_path)
            .map_err(|e| ScriptError::InvalidKey(format!("{}: {}", key_path.display(), e)))?;
        if &signer.account_id != account_id {
            return Err(ScriptError::InvalidKey(format!(
                "{} holds the key of {}",
                key_path.display(),
                signer.account_id
            )));
        }

        Ok(signer)
    }

    /// Fetch the nonce of the signer's access key, along with a final block hash
    pub async fn view_access_key(
        &self,
        signer: &InMemorySigner,
    ) -> Result<AccessKeyView, ScriptError> {
        let response = self
            .rpc
            .call(methods::query::RpcQueryRequest {
                block_reference: BlockReference::Finality(Finality::Final),
                request: QueryRequest::ViewAccessKey {
                    account_id: signer.account_id.clone(),
                    public_key: signer.public_key.clone(),
                },
            })
            .await
            .map_err(|e| rpc_error("query", e))?;

        match response.kind {
            QueryResponseKind::AccessKey(access_key) => Ok(AccessKeyView {
                nonce: access_key.nonce,
                block_hash: response.block_hash,
            }),
            other => Err(ScriptError::Rpc(format!(
                "unexpected view_access_key response: {other:?}"
            ))),
        }
    }
}

#[async_trait]
impl ChainClient for NearRpcClient {
    async fn sign_and_send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, ScriptError> {
        let signer = self.signer(&request.signer_id)?;

        let access_key = self.view_access_key(&signer).await?;
        debug!(
            "Access key {} nonce {} at block {}",
            signer.public_key, access_key.nonce, access_key.block_hash
        );

        let action_count = request.actions.len();
        let transaction = build_transaction(request, &signer, access_key);
        let nonce = transaction.nonce;
        let signed_transaction = transaction.sign(&signer);
        info!(
            "Sending transaction {} with {} actions (nonce {})",
            signed_transaction.get_hash(),
            action_count,
            nonce
        );

        let outcome = self
            .rpc
            .call(methods::broadcast_tx_commit::RpcBroadcastTxCommitRequest { signed_transaction })
            .await
            .map_err(|e| rpc_error("broadcast_tx_commit", e))?;

        if let FinalExecutionStatus::Failure(failure) = &outcome.status {
            return Err(ScriptError::TransactionFailed(format!(
                "{}: {:?}",
                outcome.transaction_outcome.id, failure
            )));
        }

        info!("Transaction {} succeeded", outcome.transaction_outcome.id);
        Ok(outcome.into())
    }
}

/// Connects to the node of an environment with keys from a credentials directory
#[derive(Clone, Debug)]
pub struct NearConnector {
    /// Key store location
    credentials_dir: PathBuf,
}

impl NearConnector {
    /// Connector reading keys under `credentials_dir`
    pub fn new(credentials_dir: impl Into<PathBuf>) -> Self {
        NearConnector {
            credentials_dir: credentials_dir.into(),
        }
    }
}

#[async_trait]
impl ChainConnector for NearConnector {
    type Client = NearRpcClient;

    async fn connect(&self, environment: &Environment) -> Result<NearRpcClient, ScriptError> {
        NearRpcClient::connect(&ConnectionConfig {
            network: environment.network,
            node_url: environment.node_url.clone(),
            credentials_dir: self.credentials_dir.clone(),
        })
        .await
    }
}

/// `~/.near-credentials`
pub fn default_credentials_dir() -> Result<PathBuf, ScriptError> {
    dirs::home_dir()
        .map(|home| home.join(CREDENTIALS_DIR))
        .ok_or(ScriptError::CredentialStoreUnavailable(String::from(
            "no home directory",
        )))
}

/// Key file of `account_id` on `network`
fn key_path(credentials_dir: &Path, network: Network, account_id: &AccountId) -> PathBuf {
    credentials_dir
        .join(network.id())
        .join(format!("{account_id}.json"))
}

/// The unsigned transaction, using the next free nonce unless the request sets one
fn build_transaction(
    request: TransactionRequest,
    signer: &InMemorySigner,
    access_key: AccessKeyView,
) -> Transaction {
    Transaction {
        signer_id: request.signer_id,
        public_key: signer.public_key.clone(),
        nonce: request.nonce.unwrap_or(access_key.nonce + 1),
        receiver_id: request.receiver_id,
        block_hash: access_key.block_hash,
        actions: request.actions,
    }
}

/// Map a failed call: transport failures mean the node is unreachable
fn rpc_error<E: Debug>(method: &str, err: JsonRpcError<E>) -> ScriptError {
    match err {
        JsonRpcError::TransportError(e) => {
            ScriptError::NetworkUnreachable(format!("{method}: {e:?}"))
        }
        JsonRpcError::ServerError(e) => ScriptError::Rpc(format!("{method}: {e:?}")),
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Mock, Server, ServerGuard};
    use near_crypto::{KeyType, SecretKey};
    use near_primitives::transaction::{Action, DeployContractAction};
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;

    const HASH: &str = "11111111111111111111111111111111";
    const CONTRACT: &str = "nearsend.testnet";

    /// Mock of the node answering `method` with `result`
    async fn mock_rpc(server: &mut ServerGuard, method: &str, result: Value) -> Mock {
        server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": method })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "jsonrpc": "2.0",
                    "id": "dontcare",
                    "result": result,
                })
                .to_string(),
            )
            .create_async()
            .await
    }

    fn status_result(chain_id: &str) -> Value {
        json!({
            "version": { "version": "1.38.0", "build": "test", "rustc_version": "1.75.0" },
            "chain_id": chain_id,
            "protocol_version": 64,
            "latest_protocol_version": 64,
            "rpc_addr": "0.0.0.0:3030",
            "validators": [],
            "sync_info": {
                "latest_block_hash": HASH,
                "latest_block_height": 150,
                "latest_state_root": HASH,
                "latest_block_time": "2024-01-01T00:00:00.000000000Z",
                "syncing": false,
                "earliest_block_hash": HASH,
                "earliest_block_height": 1,
                "earliest_block_time": "2024-01-01T00:00:00.000000000Z",
                "epoch_id": HASH,
                "epoch_start_height": 100
            },
            "validator_account_id": null,
            "validator_public_key": null,
            "node_public_key": format!("ed25519:{HASH}"),
            "node_key": null,
            "uptime_sec": 10,
            "genesis_hash": HASH,
            "detailed_debug_status": null
        })
    }

    fn access_key_result(nonce: u64) -> Value {
        json!({
            "nonce": nonce,
            "permission": "FullAccess",
            "block_height": 150,
            "block_hash": HASH
        })
    }

    fn outcome_with_id(executor: &str) -> Value {
        json!({
            "proof": [],
            "block_hash": HASH,
            "id": HASH,
            "outcome": {
                "logs": [],
                "receipt_ids": [],
                "gas_burnt": 1,
                "tokens_burnt": "0",
                "executor_id": executor,
                "status": { "SuccessValue": "" },
                "metadata": { "version": 1, "gas_profile": null }
            }
        })
    }

    fn broadcast_result(signer: &InMemorySigner, status: Value) -> Value {
        json!({
            "status": status,
            "transaction": {
                "signer_id": CONTRACT,
                "public_key": signer.public_key.to_string(),
                "nonce": 42,
                "receiver_id": CONTRACT,
                "actions": [],
                "signature": format!("ed25519:{}", "1".repeat(64)),
                "hash": HASH,
                "priority_fee": 0
            },
            "transaction_outcome": outcome_with_id(CONTRACT),
            "receipts_outcome": [outcome_with_id(CONTRACT)]
        })
    }

    /// Credentials directory holding a key for the contract account on testnet
    fn credentials_with_key() -> (TempDir, InMemorySigner) {
        let dir = TempDir::new().unwrap();
        let secret_key = SecretKey::from_seed(KeyType::ED25519, CONTRACT);
        let account_id: AccountId = CONTRACT.parse().unwrap();

        let network_dir = dir.path().join("testnet");
        fs::create_dir_all(&network_dir).unwrap();
        fs::write(
            network_dir.join(format!("{CONTRACT}.json")),
            json!({
                "account_id": CONTRACT,
                "public_key": secret_key.public_key().to_string(),
                "private_key": secret_key.to_string(),
            })
            .to_string(),
        )
        .unwrap();

        let signer = InMemorySigner::from_secret_key(account_id, secret_key);
        (dir, signer)
    }

    fn config(server: &ServerGuard, credentials_dir: &Path) -> ConnectionConfig {
        ConnectionConfig {
            network: Network::Testnet,
            node_url: server.url(),
            credentials_dir: credentials_dir.to_path_buf(),
        }
    }

    fn deploy_request(nonce: Option<Nonce>) -> TransactionRequest {
        TransactionRequest {
            signer_id: CONTRACT.parse().unwrap(),
            receiver_id: CONTRACT.parse().unwrap(),
            actions: vec![Action::DeployContract(DeployContractAction {
                code: b"\0asm".to_vec(),
            })],
            nonce,
        }
    }

    #[test]
    fn test_next_free_nonce_by_default() {
        let (_dir, signer) = credentials_with_key();
        let access_key = AccessKeyView {
            nonce: 41,
            block_hash: CryptoHash::default(),
        };

        let transaction = build_transaction(deploy_request(None), &signer, access_key);
        assert_eq!(transaction.nonce, 42);
        assert_eq!(transaction.public_key, signer.public_key);
        assert_eq!(transaction.signer_id.as_str(), CONTRACT);
        assert_eq!(transaction.receiver_id.as_str(), CONTRACT);
        assert_eq!(transaction.actions.len(), 1);
    }

    #[test]
    fn test_explicit_nonce_is_kept() {
        let (_dir, signer) = credentials_with_key();
        let access_key = AccessKeyView {
            nonce: 41,
            block_hash: CryptoHash::default(),
        };

        let transaction = build_transaction(deploy_request(Some(7)), &signer, access_key);
        assert_eq!(transaction.nonce, 7);
    }

    #[test]
    fn test_key_path_layout() {
        let path = key_path(
            Path::new("/home/me/.near-credentials"),
            Network::Mainnet,
            &"bulksender.near".parse().unwrap(),
        );
        assert_eq!(
            path,
            PathBuf::from("/home/me/.near-credentials/mainnet/bulksender.near.json")
        );
    }

    #[tokio::test]
    async fn test_connect_checks_chain_id() {
        let (dir, _) = credentials_with_key();
        let mut server = Server::new_async().await;
        let _status = mock_rpc(&mut server, "status", status_result("testnet")).await;

        let client = NearRpcClient::connect(&config(&server, dir.path())).await;
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_connect_rejects_other_chain() {
        let (dir, _) = credentials_with_key();
        let mut server = Server::new_async().await;
        let _status = mock_rpc(&mut server, "status", status_result("mainnet")).await;

        let err = NearRpcClient::connect(&config(&server, dir.path()))
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ScriptError::ClientInitialization(_)));
    }

    #[tokio::test]
    async fn test_view_access_key() {
        let (dir, signer) = credentials_with_key();
        let mut server = Server::new_async().await;
        let _status = mock_rpc(&mut server, "status", status_result("testnet")).await;
        let _query = mock_rpc(&mut server, "query", access_key_result(85)).await;

        let client = NearRpcClient::connect(&config(&server, dir.path()))
            .await
            .unwrap();
        let access_key = client.view_access_key(&signer).await.unwrap();

        assert_eq!(access_key.nonce, 85);
        assert_eq!(access_key.block_hash, CryptoHash::default());
    }

    #[tokio::test]
    async fn test_sign_and_send_transaction() {
        let (dir, signer) = credentials_with_key();
        let mut server = Server::new_async().await;
        let _status = mock_rpc(&mut server, "status", status_result("testnet")).await;
        let _query = mock_rpc(&mut server, "query", access_key_result(41)).await;
        let broadcast = mock_rpc(
            &mut server,
            "broadcast_tx_commit",
            broadcast_result(&signer, json!({ "SuccessValue": "" })),
        )
        .await;

        let client = NearRpcClient::connect(&config(&server, dir.path()))
            .await
            .unwrap();
        let outcome = client
            .sign_and_send_transaction(deploy_request(None))
            .await
            .unwrap();

        broadcast.assert_async().await;
        assert_eq!(outcome.transaction_hash.to_string(), HASH);
        assert_eq!(outcome.receipts_outcome.len(), 1);
    }

    #[tokio::test]
    async fn test_final_failure_is_an_error() {
        let (dir, signer) = credentials_with_key();
        let mut server = Server::new_async().await;
        let _status = mock_rpc(&mut server, "status", status_result("testnet")).await;
        let _query = mock_rpc(&mut server, "query", access_key_result(41)).await;
        let _broadcast = mock_rpc(
            &mut server,
            "broadcast_tx_commit",
            broadcast_result(&signer, json!({ "Failure": { "InvalidTxError": "Expired" } })),
        )
        .await;

        let client = NearRpcClient::connect(&config(&server, dir.path()))
            .await
            .unwrap();
        let err = client
            .sign_and_send_transaction(deploy_request(None))
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptError::TransactionFailed(_)));
    }

    #[tokio::test]
    async fn test_missing_key_sends_nothing() {
        let dir = TempDir::new().unwrap();
        let mut server = Server::new_async().await;
        let _status = mock_rpc(&mut server, "status", status_result("testnet")).await;
        let query = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({ "method": "query" })))
            .expect(0)
            .create_async()
            .await;

        let client = NearRpcClient::connect(&config(&server, dir.path()))
            .await
            .unwrap();
        let err = client
            .sign_and_send_transaction(deploy_request(None))
            .await
            .unwrap_err();

        assert!(matches!(err, ScriptError::MissingKey(_)));
        query.assert_async().await;
    }

    #[tokio::test]
    async fn test_connect_without_credentials() {
        let dir = TempDir::new().unwrap();
        let config = ConnectionConfig {
            network: Network::Testnet,
            node_url: "http://127.0.0.1:1".to_string(),
            credentials_dir: dir.path().join("missing"),
        };

        let err = NearRpcClient::connect(&config).await.err().unwrap();
        assert!(matches!(err, ScriptError::CredentialStoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_connect_unreachable_node() {
        let dir = TempDir::new().unwrap();
        let config = ConnectionConfig {
            network: Network::Testnet,
            node_url: "http://127.0.0.1:1".to_string(),
            credentials_dir: dir.path().to_path_buf(),
        };

        let err = NearRpcClient::connect(&config).await.err().unwrap();
        assert!(matches!(err, ScriptError::NetworkUnreachable(_)));
    }
}
