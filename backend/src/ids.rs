use serde_json::Value;
use uuid::Uuid;

/// Length of a hyphenated UUID string.
pub const CANONICAL_LENGTH: usize = 36;

pub fn generate() -> String {
    Uuid::new_v4().to_string()
}

/// True for the 36-character hyphenated UUID form only.
pub fn is_canonical(candidate: &str) -> bool {
    candidate.len() == CANONICAL_LENGTH && Uuid::parse_str(candidate).is_ok()
}

/// Keeps a supplied canonical id, otherwise hands out a fresh one.
pub fn resolve(candidate: Option<&Value>) -> String {
    match candidate.and_then(Value::as_str) {
        Some(id) if is_canonical(id) => id.to_string(),
        _ => generate(),
    }
}
