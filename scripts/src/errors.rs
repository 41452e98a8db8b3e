//! Definitions of errors that can occur during the execution of the migration scripts

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur during the execution of the migration scripts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    /// Error when writing the deployment record
    JsonOutputError(String),
    /// Error compiling the contract (the build step exited non-zero)
    ContractCompilation(String),
    /// Error reading the compiled contract binary
    ContractRead(String),
    /// The credentials directory is missing or unreadable
    CredentialStoreUnavailable(String),
    /// No key file for the given account in the credentials directory
    MissingKey(String),
    /// A key file exists but its content can't be used to sign
    InvalidKey(String),
    /// The node could not be reached
    NetworkUnreachable(String),
    /// Error when creating the client
    ClientInitialization(String),
    /// The node answered with a JSON-RPC error
    Rpc(String),
    /// An account id of the environment is not a valid NEAR account id
    InvalidAccountId(String),
    /// Error encoding the arguments of a function call
    TransactionEncoding(String),
    /// The transaction was executed but its final status is a failure
    TransactionFailed(String),
}

impl ScriptError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScriptError::JsonOutputError(s) => write!(f, "error writing json output: {}", s),
            ScriptError::ContractCompilation(s) => {
                write!(f, "failed to build smart contract: {}", s)
            }
            ScriptError::ContractRead(s) => write!(f, "error reading contract binary: {}", s),
            ScriptError::CredentialStoreUnavailable(s) => {
                write!(f, "credential store unavailable: {}", s)
            }
            ScriptError::MissingKey(s) => write!(f, "no key found: {}", s),
            ScriptError::InvalidKey(s) => write!(f, "invalid key: {}", s),
            ScriptError::NetworkUnreachable(s) => write!(f, "network unreachable: {}", s),
            ScriptError::ClientInitialization(s) => write!(f, "error during client init: {}", s),
            ScriptError::Rpc(s) => write!(f, "rpc error: {}", s),
            ScriptError::InvalidAccountId(s) => write!(f, "invalid account id: {}", s),
            ScriptError::TransactionEncoding(s) => {
                write!(f, "error encoding transaction: {}", s)
            }
            ScriptError::TransactionFailed(s) => write!(f, "transaction failed: {}", s),
        }
    }
}

impl Error for ScriptError {}
