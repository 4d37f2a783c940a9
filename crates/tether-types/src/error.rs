use thiserror::Error;

/// Errors produced when parsing or building a [`SlicePath`](crate::SlicePath).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("slice path is empty")]
    Empty,

    #[error("empty segment at position {index} in slice path '{path}'")]
    EmptySegment { path: String, index: usize },
}

/// Result alias for path operations.
pub type PathResult<T> = Result<T, PathError>;
