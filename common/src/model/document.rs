use serde_json::{Map, Value};

/// A raw JSON object as it travels between the HTTP layer, the validators and the store.
pub type Document = Map<String, Value>;
