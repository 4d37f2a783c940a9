use serde::{Deserialize, Serialize};
use tether_types::{PathResult, SlicePath};

/// Declarative description of a binding.
///
/// ```json
/// { "slice_path": "song.listeners", "model_attribute": "listeners" }
/// ```
///
/// The path is validated while deserializing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindConfig {
    /// Where the domain object lives in the state tree.
    pub slice_path: SlicePath,
    /// Bind only this field of a record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_attribute: Option<String>,
}

impl BindConfig {
    /// Whole-object binding at `slice_path`.
    pub fn new(slice_path: &str) -> PathResult<Self> {
        Ok(Self {
            slice_path: SlicePath::parse(slice_path)?,
            model_attribute: None,
        })
    }

    pub fn with_model_attribute(mut self, field: impl Into<String>) -> Self {
        self.model_attribute = Some(field.into());
        self
    }
}
