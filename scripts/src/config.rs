//! Per network settings of the bulk sender deployments

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use clap::ValueEnum;

use crate::constants::{MAINNET_RPC, TESTNET_RPC, WASM_PATH};

/// The networks the contract is deployed on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum Network {
    /// NEAR testnet
    Testnet,
    /// NEAR mainnet
    Mainnet,
}

impl Network {
    /// Network id, as reported by the node and used in the key store layout
    pub fn id(&self) -> &'static str {
        match self {
            Network::Testnet => "testnet",
            Network::Mainnet => "mainnet",
        }
    }

    /// Default node url of this network
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Network::Testnet => TESTNET_RPC,
            Network::Mainnet => MAINNET_RPC,
        }
    }
}

impl Display for Network {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Everything needed to run a migration against one network
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environment {
    /// Target network
    pub network: Network,
    /// Account holding the contract, signer and receiver of the transaction
    pub contract_account_id: String,
    /// Price oracle contract
    pub oracle_account_id: String,
    /// Provider whose prices are read from the oracle
    pub oracle_provider_id: String,
    /// JSON-RPC endpoint
    pub node_url: String,
    /// Compiled contract
    pub wasm_path: PathBuf,
}

impl Environment {
    /// Built-in settings for `network`
    pub fn for_network(network: Network) -> Self {
        let (contract, oracle, provider) = match network {
            Network::Testnet => ("nearsend.testnet", "fpo.opfilabs.testnet", "opfilabs.testnet"),
            Network::Mainnet => ("bulksender.near", "fpo.opfilabs.near", "opfilabs.near"),
        };

        Environment {
            network,
            contract_account_id: contract.to_string(),
            oracle_account_id: oracle.to_string(),
            oracle_provider_id: provider.to_string(),
            node_url: network.rpc_url().to_string(),
            wasm_path: PathBuf::from(WASM_PATH),
        }
    }
}

/// Immutable table of the environments, one per network
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Environments {
    /// Testnet deployment
    testnet: Environment,
    /// Mainnet deployment
    mainnet: Environment,
}

impl Environments {
    /// The environment of `network`
    pub fn get(&self, network: Network) -> &Environment {
        match network {
            Network::Testnet => &self.testnet,
            Network::Mainnet => &self.mainnet,
        }
    }

    /// Point every environment to another compiled contract
    pub fn with_wasm_path(mut self, wasm_path: impl Into<PathBuf>) -> Self {
        let wasm_path = wasm_path.into();
        self.testnet.wasm_path = wasm_path.clone();
        self.mainnet.wasm_path = wasm_path;
        self
    }

    /// Override the node url of a single network
    pub fn with_node_url(mut self, network: Network, node_url: impl Into<String>) -> Self {
        match network {
            Network::Testnet => self.testnet.node_url = node_url.into(),
            Network::Mainnet => self.mainnet.node_url = node_url.into(),
        }
        self
    }
}

impl Default for Environments {
    fn default() -> Self {
        Environments {
            testnet: Environment::for_network(Network::Testnet),
            mainnet: Environment::for_network(Network::Mainnet),
        }
    }
}
