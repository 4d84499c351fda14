use thiserror::Error;

/// Coarse classification of [`PolyhedraError`], stable across variant additions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required setting (the representation kind) was never set.
    Configuration,
    /// Row lengths disagree with each other or with the receiver.
    Shape,
    /// A row index outside `0..row_count`.
    Range,
    /// Malformed numeric literal or cdd text.
    Parse,
    InvalidArgument,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolyhedraError {
    #[error("representation kind is not set (required by {operation})")]
    MissingRepresentation { operation: &'static str },

    #[error("ragged rows: row {row} has {found} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column count mismatch (expected={expected}, found={found})")]
    ColumnMismatch { expected: usize, found: usize },

    #[error("row index {index} out of range for {len} rows")]
    RowOutOfRange { index: usize, len: usize },

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid number `{token}`")]
    InvalidNumber { token: String },

    #[error("non-finite floating value")]
    NonFinite,

    #[error("invalid argument: {context}")]
    InvalidArgument { context: &'static str },
}

impl PolyhedraError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PolyhedraError::MissingRepresentation { .. } => ErrorKind::Configuration,
            PolyhedraError::RaggedRows { .. } | PolyhedraError::ColumnMismatch { .. } => {
                ErrorKind::Shape
            }
            PolyhedraError::RowOutOfRange { .. } => ErrorKind::Range,
            PolyhedraError::Parse { .. }
            | PolyhedraError::InvalidNumber { .. }
            | PolyhedraError::NonFinite => ErrorKind::Parse,
            PolyhedraError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
        }
    }
}

pub type Result<T> = std::result::Result<T, PolyhedraError>;
