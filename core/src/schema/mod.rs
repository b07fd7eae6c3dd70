//! Textual schemas of Go-like type declarations.
//!
//! ```
//! use mirror_core::parse_schema;
//!
//! let schema = parse_schema(
//!     "type Pair struct { a *Node; b Node }
//!      type Node struct {
//!          next *Node
//!          val  int
//!      }",
//! )
//! .unwrap();
//! let pair = schema.get("Pair").unwrap();
//! assert_eq!(pair.size(), 24);
//! assert_eq!(schema.names().collect::<Vec<_>>(), ["Pair", "Node"]);
//! ```
//!
//! Primitive names (`int`, `uint8`, `byte`, `string`, `unsafe.Pointer`, ...)
//! are predeclared, as are `error` and `any`. Declarations may refer to
//! types declared later in the same schema.

mod error;
mod parser;

use core::str::FromStr;

use mirror_types::{Ty, TypeRegistry};

pub use error::SchemaError;
pub use parser::parse_schema;

/// A frozen registry together with the names declared in the source.
#[derive(Debug)]
pub struct Schema {
    registry: TypeRegistry,
    names: Vec<String>,
}

impl Schema {
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Declared (or predeclared and used) type called `name`.
    pub fn get(&self, name: &str) -> Option<Ty<'_>> {
        self.registry.lookup(name)
    }

    /// Declared names in source order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl FromStr for Schema {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_schema(s)
    }
}
