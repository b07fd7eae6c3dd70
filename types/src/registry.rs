use core::{fmt, hash, ptr};

use alloc::{string::String, vec::Vec};
use hashbrown::HashMap;
use smallvec::smallvec;

use crate::desc::{TypeDesc, TypeId, TypeKind};
use crate::field::{Field, METHOD_INDEX};
use crate::kind::{ChanDir, Kind, Primitive};

/// Frozen, read-only type graph produced by
/// [`TypeBuilder::finish`](crate::TypeBuilder::finish).
#[derive(Debug)]
pub struct TypeRegistry {
    types: Vec<TypeDesc>,
    names: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub(crate) fn new(types: Vec<TypeDesc>, names: HashMap<String, TypeId>) -> Self {
        Self { types, names }
    }

    /// Handle for `id`.
    ///
    /// # Panics
    ///
    /// If `id` was not produced by the builder this registry was finished from.
    pub fn ty(&self, id: TypeId) -> Ty<'_> {
        assert!(id.index() < self.types.len(), "foreign type id #{}", id.0);
        Ty { registry: self, id }
    }

    pub fn get(&self, id: TypeId) -> Option<Ty<'_>> {
        (id.index() < self.types.len()).then_some(Ty { registry: self, id })
    }

    pub fn lookup(&self, name: &str) -> Option<Ty<'_>> {
        self.names.get(name).map(|&id| self.ty(id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// All types in id order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Ty<'_>> {
        (0..self.types.len()).map(|i| Ty {
            registry: self,
            id: TypeId(i as u32),
        })
    }
}

/// Lightweight handle to one descriptor of a [`TypeRegistry`].
///
/// Two handles are equal when they name the same descriptor of the same
/// registry, which is what the walker's index table keys on.
#[derive(Clone, Copy)]
pub struct Ty<'r> {
    registry: &'r TypeRegistry,
    id: TypeId,
}

impl PartialEq for Ty<'_> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.registry, other.registry) && self.id == other.id
    }
}

impl Eq for Ty<'_> {}

impl hash::Hash for Ty<'_> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        ptr::hash(self.registry, state);
        self.id.hash(state);
    }
}

impl fmt::Debug for Ty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ty(#{} {})", self.id.0, self)
    }
}

impl<'r> Ty<'r> {
    pub fn id(self) -> TypeId {
        self.id
    }

    pub fn registry(self) -> &'r TypeRegistry {
        self.registry
    }

    pub fn desc(self) -> &'r TypeDesc {
        &self.registry.types[self.id.index()]
    }

    pub fn type_kind(self) -> &'r TypeKind {
        &self.desc().kind
    }

    pub fn kind(self) -> Kind {
        self.type_kind().kind()
    }

    pub fn name(self) -> Option<&'r str> {
        self.desc().name()
    }

    pub fn size(self) -> u64 {
        self.desc().size
    }

    pub fn align(self) -> u64 {
        self.desc().align
    }

    fn at(self, id: TypeId) -> Ty<'r> {
        Ty {
            registry: self.registry,
            id,
        }
    }

    pub fn primitive(self) -> Option<Primitive> {
        match *self.type_kind() {
            TypeKind::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Referent of a pointer, element of an array, sequence, map or channel.
    pub fn elem(self) -> Option<Ty<'r>> {
        self.type_kind().elem().map(|id| self.at(id))
    }

    pub fn key(self) -> Option<Ty<'r>> {
        match *self.type_kind() {
            TypeKind::Map { key, .. } => Some(self.at(key)),
            _ => None,
        }
    }

    pub fn len(self) -> Option<u64> {
        match *self.type_kind() {
            TypeKind::Array { len, .. } => Some(len),
            _ => None,
        }
    }

    pub fn dir(self) -> Option<ChanDir> {
        match *self.type_kind() {
            TypeKind::Channel { dir, .. } => Some(dir),
            _ => None,
        }
    }

    /// Parameter types, empty unless callable.
    pub fn params(self) -> impl ExactSizeIterator<Item = Ty<'r>> + DoubleEndedIterator {
        let params: &'r [TypeId] = match self.type_kind() {
            TypeKind::Callable { params, .. } => params,
            _ => &[],
        };
        params.iter().map(move |&id| self.at(id))
    }

    /// Result types, empty unless callable.
    pub fn results(self) -> impl ExactSizeIterator<Item = Ty<'r>> + DoubleEndedIterator {
        let results: &'r [TypeId] = match self.type_kind() {
            TypeKind::Callable { results, .. } => results,
            _ => &[],
        };
        results.iter().map(move |&id| self.at(id))
    }

    pub fn num_fields(self) -> usize {
        match self.type_kind() {
            TypeKind::Record(fields) => fields.len(),
            _ => 0,
        }
    }

    /// Field descriptor of record field `i`.
    pub fn field(self, i: usize) -> Option<Field<'r>> {
        let TypeKind::Record(fields) = self.type_kind() else {
            return None;
        };
        let def = fields.get(i)?;
        Some(Field {
            name: &def.name,
            ty: self.at(def.ty),
            index: smallvec![i as i32],
            offset: def.offset,
            tag: def.tag.as_deref(),
            anonymous: def.anonymous,
        })
    }

    pub fn fields(self) -> impl Iterator<Item = Field<'r>> {
        (0..self.num_fields()).filter_map(move |i| self.field(i))
    }

    pub fn num_methods(self) -> usize {
        match self.type_kind() {
            TypeKind::Interface(methods) => methods.len(),
            _ => 0,
        }
    }

    /// Synthetic field describing interface method `i`. Its index path
    /// starts with [`METHOD_INDEX`].
    pub fn method(self, i: usize) -> Option<Field<'r>> {
        let TypeKind::Interface(methods) = self.type_kind() else {
            return None;
        };
        let def = methods.get(i)?;
        Some(Field {
            name: &def.name,
            ty: self.at(def.ty),
            index: smallvec![METHOD_INDEX, i as i32],
            offset: 0,
            tag: None,
            anonymous: false,
        })
    }

    pub fn methods(self) -> impl Iterator<Item = Field<'r>> {
        (0..self.num_methods()).filter_map(move |i| self.method(i))
    }
}
