//! Traversal and checks over the mirror type model.
//!
//! - [`walk`] visits every type reachable from a root exactly once in
//!   depth-first order, assigning stable indices.
//! - [`tags`] parses per-field tag lists into a [`TagFlags`] bitmask.
//! - [`layout`] decides whether two record types share a memory layout.
//! - [`schema`] builds a registry from Go-like type declarations.

pub mod layout;
pub mod schema;
pub mod tags;
pub mod walk;

pub use layout::layout_compatible;
pub use schema::{Schema, SchemaError, parse_schema};
pub use tags::{TagError, TagFlags};
pub use walk::{Flow, walk, walk_with};

static_assertions::assert_eq_size!(TagFlags, u16);
static_assertions::assert_impl_all!(Schema: Send, Sync);
static_assertions::assert_impl_all!(tags::TagTable: Send, Sync);
