use alloc::{string::String, vec::Vec};

use crate::kind::{ChanDir, Kind, Primitive};

/// Dense identity of a descriptor inside one registry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A declared record field.
///
/// `offset` is zero until the builder is finished, the registry then holds
/// the computed byte offset.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeId,
    pub tag: Option<String>,
    pub anonymous: bool,
    pub offset: u64,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
            tag: None,
            anonymous: false,
            offset: 0,
        }
    }

    /// An embedded member. Its name is the name of its type.
    pub fn embedded(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            anonymous: true,
            ..Self::new(name, ty)
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

/// A declared interface method. `ty` is always a callable without receiver.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MethodDef {
    pub name: String,
    pub ty: TypeId,
}

impl MethodDef {
    pub fn new(name: impl Into<String>, ty: TypeId) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Kind-specific shape of a type.
///
/// Child types are referenced by [`TypeId`], which is what allows records to
/// point back at themselves.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Primitive(Primitive),
    Pointer(TypeId),
    Array { len: u64, elem: TypeId },
    Sequence(TypeId),
    Map { key: TypeId, elem: TypeId },
    Channel { dir: ChanDir, elem: TypeId },
    Callable { params: Vec<TypeId>, results: Vec<TypeId> },
    /// Methods sorted by name.
    Interface(Vec<MethodDef>),
    /// Fields in declaration order.
    Record(Vec<FieldDef>),
}

impl TypeKind {
    pub fn kind(&self) -> Kind {
        match self {
            TypeKind::Primitive(_) => Kind::Primitive,
            TypeKind::Pointer(_) => Kind::Pointer,
            TypeKind::Array { .. } => Kind::Array,
            TypeKind::Sequence(_) => Kind::Sequence,
            TypeKind::Map { .. } => Kind::Map,
            TypeKind::Channel { .. } => Kind::Channel,
            TypeKind::Callable { .. } => Kind::Callable,
            TypeKind::Interface(_) => Kind::Interface,
            TypeKind::Record(_) => Kind::Record,
        }
    }

    /// Element type of single-child kinds (and the map element).
    pub fn elem(&self) -> Option<TypeId> {
        match *self {
            TypeKind::Pointer(elem)
            | TypeKind::Array { elem, .. }
            | TypeKind::Sequence(elem)
            | TypeKind::Map { elem, .. }
            | TypeKind::Channel { elem, .. } => Some(elem),
            _ => None,
        }
    }
}

/// A type descriptor as stored in the registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDesc {
    pub(crate) name: Option<String>,
    pub(crate) kind: TypeKind,
    pub(crate) size: u64,
    pub(crate) align: u64,
}

impl TypeDesc {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }
}
