use tether_types::PathError;

/// Errors rejected by [`bind`](crate::bind) before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// A collection has no fields of its own to bind one of.
    #[error("cannot bind field '{field}' of a collection")]
    FieldOnCollection { field: String },

    #[error("invalid slice path: {0}")]
    Path(#[from] PathError),
}

/// Result alias for binding operations.
pub type BindResult<T> = Result<T, BindError>;
