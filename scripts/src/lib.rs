//! Scripts for building, deploying and migrating the bulk sender contract.

#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod errors;
pub mod utils;

/// Our build utils
pub mod build;

/// Our migration utils
pub mod migrate;

/// Our output utils
pub mod output_writer;

pub mod tx;
