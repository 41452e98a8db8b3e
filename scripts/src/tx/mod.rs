//! Chain access: the transaction to submit, its outcome and the JSON-RPC client

use async_trait::async_trait;
use near_primitives::{
    hash::CryptoHash,
    transaction::Action,
    types::{AccountId, Nonce},
    views::{ExecutionOutcomeWithIdView, FinalExecutionOutcomeView},
};

use crate::{config::Environment, errors::ScriptError};

pub mod client;

/// An unsigned transaction, the client fills in the key, nonce and block hash
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionRequest {
    /// Account signing the transaction
    pub signer_id: AccountId,
    /// Account the actions are applied to
    pub receiver_id: AccountId,
    /// Actions, executed in order and atomically
    pub actions: Vec<Action>,
    /// Explicit access key nonce, the next free one when `None`
    pub nonce: Option<Nonce>,
}

/// What is kept of a committed transaction
#[derive(Clone, Debug)]
pub struct TransactionOutcome {
    /// Hash of the signed transaction
    pub transaction_hash: CryptoHash,
    /// Block including the transaction
    pub block_hash: CryptoHash,
    /// Outcomes of the receipts spawned by the transaction
    pub receipts_outcome: Vec<ExecutionOutcomeWithIdView>,
}

impl From<FinalExecutionOutcomeView> for TransactionOutcome {
    fn from(outcome: FinalExecutionOutcomeView) -> Self {
        TransactionOutcome {
            transaction_hash: outcome.transaction_outcome.id,
            block_hash: outcome.transaction_outcome.block_hash,
            receipts_outcome: outcome.receipts_outcome,
        }
    }
}

/// A session able to sign and submit transactions on one network
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Sign `request` with the signer's key, submit it and wait for its final outcome
    async fn sign_and_send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, ScriptError>;
}

/// Opens a [`ChainClient`] for an environment
#[async_trait]
pub trait ChainConnector: Send + Sync {
    /// Session type handed out by [`ChainConnector::connect`]
    type Client: ChainClient;

    /// Open a session on the environment's network, failing if the node can't be used
    async fn connect(&self, environment: &Environment) -> Result<Self::Client, ScriptError>;
}
