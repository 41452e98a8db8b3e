//! Definitions of CLI arguments and commands for the migration scripts

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::{
    build::{BuildService, ScriptBuilder, WasmBuilder},
    commands::{build_contract, migrate_contract},
    config::Network,
    constants::{BUILD_SCRIPT, CONTRACT_PACKAGE, WASM_PATH},
    errors::ScriptError,
};

/// Scripts for building, deploying & migrating the bulk sender contract
#[derive(Parser)]
pub struct Cli {
    /// The command to run
    #[command(subcommand)]
    pub command: Command,
}

/// The possible CLI commands
#[derive(Subcommand)]
pub enum Command {
    /// Build the contract, deploy it, then run `migrate` and `set_oracle` in one transaction
    Migrate(MigrateArgs),
    /// Only build the contract
    Build(BuildArgs),
}

impl Command {
    /// Run the command
    pub async fn run(self) -> Result<(), ScriptError> {
        match self {
            Command::Migrate(args) => {
                info!("Migrating the {} contract...", args.network);
                migrate_contract(args).await
            }
            Command::Build(args) => {
                info!("Building contract...");
                build_contract(args)
            }
        }
    }
}

/// How the contract gets built
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builder {
    /// Run the build shell script
    Script,
    /// Call cargo directly
    Cargo,
}

/// Build step options
#[derive(Args, Clone, Debug)]
pub struct BuildArgs {
    /// Build strategy
    #[arg(long, value_enum, default_value_t = Builder::Script)]
    pub builder: Builder,

    /// Build script, for the `script` builder
    #[arg(long, env = "BUILD_SCRIPT", default_value = BUILD_SCRIPT)]
    pub build_script: PathBuf,

    /// Compiled contract location
    #[arg(long, env = "WASM_PATH", default_value = WASM_PATH)]
    pub wasm_path: PathBuf,
}

impl BuildArgs {
    /// The build service matching these options
    pub fn build_service(&self) -> Box<dyn BuildService> {
        match self.builder {
            Builder::Script => Box::new(ScriptBuilder::new(&self.build_script)),
            Builder::Cargo => Box::new(WasmBuilder::new(".", CONTRACT_PACKAGE, &self.wasm_path)),
        }
    }
}

/// Migration options
#[derive(Parser, Clone, Debug)]
pub struct MigrateArgs {
    /// Target network
    #[arg(short, long, value_enum, default_value_t = Network::Testnet)]
    pub network: Network,

    /// Key store directory, `~/.near-credentials` by default
    #[arg(long, env = "NEAR_CREDENTIALS_DIR")]
    pub credentials_dir: Option<PathBuf>,

    /// Node url, replacing the network's default one
    #[arg(long, env = "NEAR_NODE_URL")]
    pub node_url: Option<String>,

    /// Access key nonce of the transaction, the next free one by default
    #[arg(long)]
    pub nonce: Option<u64>,

    /// yoctoNEAR attached to the `migrate` call
    #[arg(long, default_value_t = 0)]
    pub migrate_deposit: u128,

    /// Json file recording the migration transaction
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Build step options
    #[command(flatten)]
    pub build: BuildArgs,
}
