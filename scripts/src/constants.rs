//! Constants used in the migration scripts

/// Testnet JSON-RPC endpoint
pub const TESTNET_RPC: &str = "https://rpc.testnet.near.org";

/// Mainnet JSON-RPC endpoint
pub const MAINNET_RPC: &str = "https://rpc.mainnet.near.org";

/// Name of the credentials directory, relative to the user's home
pub const CREDENTIALS_DIR: &str = ".near-credentials";

/// Shell script producing the contract wasm
pub const BUILD_SCRIPT: &str = "shell-script/build.sh";

/// Where the build step leaves the compiled contract
pub const WASM_PATH: &str = "./target/res/bulk_sender.wasm";

/// Cargo package of the contract, used by the cargo builder
pub const CONTRACT_PACKAGE: &str = "bulk_sender";

/// The target triple for the WASM build target
pub const WASM_TARGET_TRIPLE: &str = "wasm32-unknown-unknown";

/// Contract entry point run right after the code upgrade
pub const MIGRATE_METHOD: &str = "migrate";

/// Contract entry point configuring the price oracle
pub const SET_ORACLE_METHOD: &str = "set_oracle";

/// Gas attached to the `migrate` call (200 Tgas)
pub const MIGRATE_GAS: u64 = 200_000_000_000_000;

/// Gas attached to the `set_oracle` call (30 Tgas)
pub const SET_ORACLE_GAS: u64 = 30_000_000_000_000;
