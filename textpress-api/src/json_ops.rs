use serde_json::Value;

use crate::error::TransformError;
use crate::repair::repair;

pub const VALIDATION_PASSED: &str = "JSON validation passed";

pub fn compress(text: &str) -> Result<String, TransformError> {
    let repaired = repair(text)?;
    let value: Value = serde_json::from_str(&repaired)?;
    Ok(serde_json::to_string(&value)?)
}

pub fn format(text: &str) -> Result<String, TransformError> {
    let repaired = repair(text)?;
    let value: Value = serde_json::from_str(&repaired)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

// Confirms the input parses; the parsed data itself is never returned.
pub fn validate(text: &str) -> Result<String, TransformError> {
    let repaired = repair(text)?;
    let _: Value = serde_json::from_str(&repaired)?;
    Ok(VALIDATION_PASSED.to_string())
}
