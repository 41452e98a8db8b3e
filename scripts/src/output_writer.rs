use std::{fs, fs::File, io::Read, path::Path};

use json::JsonValue;

use crate::{config::Network, errors::ScriptError, tx::TransactionOutcome};

/// Print the receipt outcomes, then the detail of each of them
pub fn print_receipts_outcome(outcome: &TransactionOutcome) {
    println!("{:#?}", outcome.receipts_outcome);
    for receipt in &outcome.receipts_outcome {
        println!("{:#?}", receipt.outcome);
    }
}

/// Record the migration of `network` in the json file at `file_path`
pub fn write_output_file(
    file_path: &Path,
    network: Network,
    contract_account_id: &str,
    outcome: &TransactionOutcome,
) -> Result<(), ScriptError> {
    // If the file doesn't exist, create it
    if !file_path.exists() {
        fs::write(file_path, "{}").map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;
    }

    let mut parsed_json = get_json_from_file(file_path)?;

    // Only touch the entry of this network
    let entry = &mut parsed_json[network.id()];
    entry["contract"] = JsonValue::String(contract_account_id.to_string());
    entry["migrate"] = JsonValue::String(outcome.transaction_hash.to_string());
    entry["block_hash"] = JsonValue::String(outcome.block_hash.to_string());

    fs::write(file_path, json::stringify_pretty(parsed_json, 4))
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    Ok(())
}

/// Parses the JSON file at the given path
fn get_json_from_file(file_path: &Path) -> Result<JsonValue, ScriptError> {
    let mut file_contents = String::new();
    File::open(file_path)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?
        .read_to_string(&mut file_contents)
        .map_err(|e| ScriptError::JsonOutputError(e.to_string()))?;

    json::parse(&file_contents).map_err(|e| ScriptError::JsonOutputError(e.to_string()))
}
