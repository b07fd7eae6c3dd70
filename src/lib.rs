//! Mirror: structural type descriptors and the tools built on them.
//!
//! # Overview
//!
//! A schema written in a small Go-like type language is lowered into a
//! [`TypeRegistry`] of immutable descriptors. On top of the registry sit
//! a depth-first graph walker that numbers every distinct type once, a tag
//! policy for per-field presentation flags, and a checker for binary
//! layout compatibility between two registries.
//!
//! # Quick Start
//!
//! ```
//! use mirror::{Flow, load_schema, walk_with};
//!
//! let schema = load_schema("type Node struct { next *Node; val int }").unwrap();
//! let mut seen = Vec::new();
//! walk_with(schema.get("Node").unwrap(), |field, index, depth| {
//!     if let Some(field) = field {
//!         seen.push((depth, field.ty.to_string(), index));
//!     }
//!     Ok::<_, ()>(Flow::Continue)
//! })
//! .unwrap();
//! assert_eq!(seen[0], (0, "Node".to_string(), 0));
//! assert_eq!(seen.len(), 4);
//! ```
//!
//! Errors from [`load_schema`] carry byte spans into the source and can be
//! shown with [`render_error_to`].

pub mod error;
pub mod error_renderer;

pub use error::Error;
pub use error_renderer::{CharSet, RenderConfig, render_error, render_error_to};

pub use mirror_core::tags::{self, TagTable};
pub use mirror_core::{
    Flow, Schema, SchemaError, TagError, TagFlags, layout_compatible, parse_schema, walk,
    walk_with,
};
pub use mirror_types::{
    BuildError, ChanDir, Field, Kind, Primitive, Ty, TypeBuilder, TypeId, TypeKind, TypeRegistry,
};

#[cfg(feature = "fmt")]
pub use mirror_fmt::{RenderError, RenderOptions, Style, render, render_page, render_with};

/// Parse schema `text`, keeping the text for error reports.
pub fn load_schema(text: &str) -> Result<Schema, Error> {
    parse_schema(text).map_err(|error| Error::Schema {
        error,
        text: text.to_string(),
    })
}

/// Declared type `name` of `schema`.
pub fn lookup<'s>(schema: &'s Schema, name: &str) -> Result<Ty<'s>, Error> {
    schema
        .get(name)
        .ok_or_else(|| Error::UnknownType(name.to_string()))
}
