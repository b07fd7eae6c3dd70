use core::ops::Range;

use mirror_types::BuildError;
use thiserror::Error;

/// Error found while reading a schema. Spans are byte ranges into the
/// schema source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("{message}")]
    Syntax { message: String, span: Range<usize> },

    #[error("unknown type `{name}`")]
    UnknownType { name: String, span: Range<usize> },

    #[error("type `{name}` is declared twice")]
    DuplicateType {
        name: String,
        span: Range<usize>,
        first: Range<usize>,
    },

    #[error("invalid recursive type `{name}`")]
    Cycle { name: String, span: Range<usize> },

    #[error("type nesting exceeds maximum of {max} levels")]
    TooDeep { max: usize, span: Range<usize> },

    #[error("{source}")]
    Build {
        source: BuildError,
        span: Option<Range<usize>>,
    },
}

impl SchemaError {
    /// Primary location of the error, if it has one.
    pub fn span(&self) -> Option<Range<usize>> {
        match self {
            SchemaError::Syntax { span, .. }
            | SchemaError::UnknownType { span, .. }
            | SchemaError::DuplicateType { span, .. }
            | SchemaError::Cycle { span, .. }
            | SchemaError::TooDeep { span, .. } => Some(span.clone()),
            SchemaError::Build { span, .. } => span.clone(),
        }
    }

    /// Short label for the primary location.
    pub fn label(&self) -> &'static str {
        match self {
            SchemaError::Syntax { .. } => "here",
            SchemaError::UnknownType { .. } => "not declared",
            SchemaError::DuplicateType { .. } => "declared again here",
            SchemaError::Cycle { .. } => "refers to itself",
            SchemaError::TooDeep { .. } => "nested too deeply",
            SchemaError::Build { .. } => "in this declaration",
        }
    }
}
