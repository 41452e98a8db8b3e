//! Drives one migration from the build to the submitted transaction

use std::fs;

use tracing::info;

use crate::{
    build::BuildService,
    config::{Environments, Network},
    errors::ScriptError,
    migrate::{migration_request, MigrationPlan},
    tx::{ChainClient, ChainConnector, TransactionOutcome},
};

/// Runs one build, deploy and migrate cycle against a network
pub struct MigrationRunner<'a, B, C> {
    /// Environment table
    environments: &'a Environments,
    /// Build step
    builder: B,
    /// Opens the session on the target network
    connector: C,
    /// Gas, deposit and nonce of the transaction
    plan: MigrationPlan,
}

impl<'a, B: BuildService, C: ChainConnector> MigrationRunner<'a, B, C> {
    /// Runner over `environments`, building with `builder` and connecting with `connector`
    pub fn new(
        environments: &'a Environments,
        builder: B,
        connector: C,
        plan: MigrationPlan,
    ) -> Self {
        MigrationRunner {
            environments,
            builder,
            connector,
            plan,
        }
    }

    /// Build the contract, then deploy it and configure it in a single transaction.
    ///
    /// A failed build stops everything before any network access.
    pub async fn run(&self, network: Network) -> Result<TransactionOutcome, ScriptError> {
        info!("Building contract...");
        self.builder.build()?;
        info!("Built with success");

        let environment = self.environments.get(network);
        info!(
            "Connecting to {} ({})...",
            environment.network, environment.node_url
        );
        let client = self.connector.connect(environment).await?;

        let code = fs::read(&environment.wasm_path).map_err(|e| {
            ScriptError::ContractRead(format!("{}: {}", environment.wasm_path.display(), e))
        })?;
        info!(
            "Deploying {} bytes from {} to {}",
            code.len(),
            environment.wasm_path.display(),
            environment.contract_account_id
        );

        let request = migration_request(environment, code, &self.plan)?;
        client.sign_and_send_transaction(request).await
    }
}
