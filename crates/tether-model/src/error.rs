use tether_types::ValueKind;

/// Errors from domain object operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A record can only be built from or replaced by an object.
    #[error("expected an object, found {found}")]
    NotAnObject { found: ValueKind },

    /// A collection can only be built from or replaced by an array.
    #[error("expected an array, found {found}")]
    NotAnArray { found: ValueKind },

    /// A collection member must be an object.
    #[error("collection member {index} must be an object, found {found}")]
    InvalidMember { index: usize, found: ValueKind },

    /// Another member of the collection already uses this identifier.
    #[error("duplicate identifier {id} in collection")]
    DuplicateId { id: String },

    /// Single-field access on a collection, which has no fields of its own.
    #[error("collection has no field '{field}'")]
    FieldOnCollection { field: String },
}

/// Result alias for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
