//! Implementations of the CLI commands

use tracing::info;

use crate::{
    build::BuildService,
    cli::{BuildArgs, MigrateArgs},
    config::Environments,
    errors::ScriptError,
    migrate::{MigrationPlan, MigrationRunner},
    output_writer::{print_receipts_outcome, write_output_file},
    tx::client::{default_credentials_dir, NearConnector},
};

/// Build, deploy and migrate the contract on the selected network
pub async fn migrate_contract(args: MigrateArgs) -> Result<(), ScriptError> {
    let mut environments = Environments::default().with_wasm_path(&args.build.wasm_path);
    if let Some(node_url) = &args.node_url {
        environments = environments.with_node_url(args.network, node_url.clone());
    }

    let credentials_dir = match args.credentials_dir {
        Some(dir) => dir,
        None => default_credentials_dir()?,
    };

    let plan = MigrationPlan {
        migrate_deposit: args.migrate_deposit,
        nonce: args.nonce,
        ..MigrationPlan::default()
    };

    let runner = MigrationRunner::new(
        &environments,
        args.build.build_service(),
        NearConnector::new(credentials_dir),
        plan,
    );
    let outcome = runner.run(args.network).await?;

    print_receipts_outcome(&outcome);

    if let Some(output) = &args.output {
        let contract = &environments.get(args.network).contract_account_id;
        write_output_file(output, args.network, contract, &outcome)?;
        info!("Migration recorded in {}", output.display());
    }

    Ok(())
}

/// Only run the build step
pub fn build_contract(args: BuildArgs) -> Result<(), ScriptError> {
    args.build_service().build()?;
    info!("Built with success");
    Ok(())
}
