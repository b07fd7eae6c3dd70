//! Type descriptor model for the mirror type walker.
//!
//! Types are built with a [`TypeBuilder`], frozen into a [`TypeRegistry`]
//! and then inspected through copyable [`Ty`] handles. Descriptors refer to
//! each other by [`TypeId`], so recursive graphs need no reference counting.
//!
//! # Example
//!
//! ```
//! use mirror_types::{FieldDef, Kind, Primitive, TypeBuilder};
//!
//! let mut b = TypeBuilder::new();
//! let int = b.primitive(Primitive::Int);
//! let ints = b.sequence(int);
//! let pair = b.record([FieldDef::new("a", int), FieldDef::new("b", ints)]);
//!
//! let registry = b.finish().unwrap();
//! let pair = registry.ty(pair);
//! assert_eq!(pair.kind(), Kind::Record);
//! assert_eq!(pair.to_string(), "struct { a int; b []int }");
//! ```

#![no_std]
extern crate alloc;

mod builder;
mod desc;
mod display;
mod field;
mod kind;
mod registry;

pub use builder::{BuildError, TypeBuilder};
pub use desc::{FieldDef, MethodDef, TypeDesc, TypeId, TypeKind};
pub use field::{Field, METHOD_INDEX};
pub use kind::{ChanDir, Kind, Primitive};
pub use registry::{Ty, TypeRegistry};

static_assertions::assert_eq_size!(TypeId, u32);
static_assertions::assert_impl_all!(Ty<'static>: Copy, Send, Sync);
static_assertions::assert_impl_all!(TypeRegistry: Send, Sync);
