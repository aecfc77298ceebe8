use alloy::json_abi::JsonAbi;
use serde_json::Value;

use crate::consts::REQUIRED_FUNCTIONS;
use crate::error::StakingError;

/// Parses an ABI document and checks that it covers the staking contract surface.
///
/// Accepts either a bare ABI array or a build artifact carrying the array
/// under an `abi` key.
pub fn parse_abi(json: &str) -> Result<JsonAbi, StakingError> {
    let value: Value = serde_json::from_str(json).map_err(|_| StakingError::AbiLoad)?;
    let value = match value {
        Value::Object(mut artifact) if artifact.contains_key("abi") => {
            artifact.remove("abi").unwrap_or(Value::Null)
        }
        other => other,
    };
    let abi: JsonAbi = serde_json::from_value(value).map_err(|_| StakingError::AbiLoad)?;
    validate_abi(&abi)?;
    Ok(abi)
}

pub fn validate_abi(abi: &JsonAbi) -> Result<(), StakingError> {
    if missing_functions(abi).is_empty() {
        Ok(())
    } else {
        Err(StakingError::AbiLoad)
    }
}

/// Required functions the ABI does not declare.
pub fn missing_functions(abi: &JsonAbi) -> Vec<&'static str> {
    REQUIRED_FUNCTIONS
        .iter()
        .copied()
        .filter(|name| abi.function(name).is_none())
        .collect()
}

/// Position of a named output in a function's return tuple.
///
/// Public mapping getters return struct fields as separate outputs, so the
/// `amount` of `dogeStakes` is located by name. Falls back to the first output.
pub fn output_index(abi: &JsonAbi, function: &str, output: &str) -> usize {
    abi.function(function)
        .and_then(|overloads| overloads.first())
        .and_then(|f| f.outputs.iter().position(|param| param.name == output))
        .unwrap_or(0)
}
