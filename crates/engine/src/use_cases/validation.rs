//! Common validation helpers for the write paths.

use serde_json::{Map, Value};

use pokedex_domain::{DomainError, TrainerId};

/// Require the request body to be a non-empty JSON object.
pub fn require_document<'a>(
    value: &'a Value,
    what: &'static str,
) -> Result<&'a Map<String, Value>, DomainError> {
    match value.as_object() {
        Some(map) if !map.is_empty() => Ok(map),
        _ => Err(DomainError::validation(format!(
            "{what} must be a non-empty object"
        ))),
    }
}

/// Extract the owning trainer's domain id from a pokemon document.
pub fn require_trainer_id(doc: &Map<String, Value>) -> Result<TrainerId, DomainError> {
    doc.get("trainerID")
        .and_then(Value::as_i64)
        .map(TrainerId::new)
        .ok_or_else(|| DomainError::validation("trainerID is required and must be an integer"))
}
