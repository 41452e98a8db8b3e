//! Build and migrate the testnet deployment, no arguments needed

use bulk_sender_scripts::{
    cli::MigrateArgs,
    commands::migrate_contract,
    config::Network,
    utils::{exit_with, init_tracing},
};
use clap::Parser;
use dotenv::dotenv;

#[tokio::main]
async fn main() {
    dotenv().ok();

    let mut args = MigrateArgs::parse();
    args.network = Network::Testnet;

    init_tracing();

    if let Err(err) = migrate_contract(args).await {
        exit_with(err);
    }
}
