//! The `{ "success": true, ... }` shape shared by every JSON answer.

use serde::Serialize;
use serde_json::Value;

/// Serialize `report` and mark it successful. Non-object reports are returned
/// as-is.
pub fn success<T: Serialize>(report: &T) -> serde_json::Result<Value> {
    let mut value = serde_json::to_value(report)?;
    if let Some(map) = value.as_object_mut() {
        map.insert("success".to_string(), Value::Bool(true));
    }
    Ok(value)
}
