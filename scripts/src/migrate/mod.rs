//! The contract upgrade transaction

use near_primitives::{
    transaction::{Action, DeployContractAction, FunctionCallAction},
    types::{AccountId, Balance, Gas},
};
use serde::Serialize;
use serde_json::json;

use crate::{
    config::Environment,
    constants::{MIGRATE_GAS, MIGRATE_METHOD, SET_ORACLE_GAS, SET_ORACLE_METHOD},
    errors::ScriptError,
    tx::TransactionRequest,
};

pub mod runner;

pub use runner::MigrationRunner;

/// Tunables of the migration transaction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MigrationPlan {
    /// Gas attached to `migrate`
    pub migrate_gas: Gas,
    /// Gas attached to `set_oracle`
    pub set_oracle_gas: Gas,
    /// Deposit attached to `migrate`, in yoctoNEAR
    pub migrate_deposit: Balance,
    /// Explicit access key nonce, next free one when `None`
    pub nonce: Option<u64>,
}

impl Default for MigrationPlan {
    fn default() -> Self {
        MigrationPlan {
            migrate_gas: MIGRATE_GAS,
            set_oracle_gas: SET_ORACLE_GAS,
            migrate_deposit: 0,
            nonce: None,
        }
    }
}

/// Arguments of `set_oracle`
#[derive(Serialize)]
struct SetOracleArgs<'a> {
    /// Price oracle contract
    oracle_account_id: &'a str,
    /// Provider whose prices are read
    oracle_provider_id: &'a str,
}

/// A function call with json arguments
fn function_call(
    method_name: &str,
    args: &impl Serialize,
    gas: Gas,
    deposit: Balance,
) -> Result<Action, ScriptError> {
    let args = serde_json::to_vec(args)
        .map_err(|e| ScriptError::TransactionEncoding(format!("{method_name} args: {e}")))?;

    Ok(Action::FunctionCall(Box::new(FunctionCallAction {
        method_name: method_name.to_string(),
        args,
        gas,
        deposit,
    })))
}

/// Deploy `code`, run `migrate`, then point the contract to the environment's oracle
pub fn migration_actions(
    environment: &Environment,
    code: Vec<u8>,
    plan: &MigrationPlan,
) -> Result<Vec<Action>, ScriptError> {
    Ok(vec![
        Action::DeployContract(DeployContractAction { code }),
        function_call(
            MIGRATE_METHOD,
            &json!({}),
            plan.migrate_gas,
            plan.migrate_deposit,
        )?,
        function_call(
            SET_ORACLE_METHOD,
            &SetOracleArgs {
                oracle_account_id: &environment.oracle_account_id,
                oracle_provider_id: &environment.oracle_provider_id,
            },
            plan.set_oracle_gas,
            0,
        )?,
    ])
}

/// The single transaction, signed by and applied to the contract account
pub fn migration_request(
    environment: &Environment,
    code: Vec<u8>,
    plan: &MigrationPlan,
) -> Result<TransactionRequest, ScriptError> {
    let contract_id: AccountId = environment.contract_account_id.parse().map_err(|e| {
        ScriptError::InvalidAccountId(format!("{}: {}", environment.contract_account_id, e))
    })?;

    Ok(TransactionRequest {
        signer_id: contract_id.clone(),
        receiver_id: contract_id,
        actions: migration_actions(environment, code, plan)?,
        nonce: plan.nonce,
    })
}
