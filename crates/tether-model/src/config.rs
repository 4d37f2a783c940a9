use serde::{Deserialize, Serialize};

/// Configuration shared by records and collections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Name of the field holding a record's identifier.
    pub id_attribute: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id_attribute: "id".to_string(),
        }
    }
}

impl ModelConfig {
    pub fn with_id_attribute(id_attribute: impl Into<String>) -> Self {
        Self {
            id_attribute: id_attribute.into(),
        }
    }
}
