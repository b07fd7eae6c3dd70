//! Top-level error type.

use mirror_core::{SchemaError, TagError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A schema failed to parse. `text` is the schema source the spans
    /// point into.
    #[error("{error}")]
    Schema { error: SchemaError, text: String },

    #[error(transparent)]
    Tag(#[from] TagError),

    #[cfg(feature = "fmt")]
    #[error(transparent)]
    Render(#[from] mirror_fmt::RenderError),

    #[error("type `{0}` is not declared in the schema")]
    UnknownType(String),

    #[error("{0}")]
    Input(String),
}
