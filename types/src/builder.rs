use alloc::{format, string::String, vec, vec::Vec};
use hashbrown::{HashMap, HashSet};
use thiserror::Error;

use crate::desc::{FieldDef, MethodDef, TypeDesc, TypeId, TypeKind};
use crate::kind::{ChanDir, Kind, Primitive};
use crate::registry::TypeRegistry;

/// Errors detected while freezing a [`TypeBuilder`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("type `{name}` is declared twice")]
    DuplicateName { name: String },

    #[error("type `{name}` is declared but never defined")]
    Undefined { name: String },

    #[error("type `{name}` is already defined")]
    AlreadyDefined { name: String },

    #[error("type #{id} does not belong to this builder")]
    UnknownId { id: u32 },

    #[error("invalid recursive type `{name}`: it contains itself by value")]
    InfiniteSize { name: String },

    #[error("size of `{name}` overflows")]
    SizeOverflow { name: String },

    #[error("duplicate field `{field}` in `{record}`")]
    DuplicateField { record: String, field: String },

    #[error("duplicate method `{method}` in `{interface}`")]
    DuplicateMethod { interface: String, method: String },

    #[error("method `{method}` of `{interface}` is not a callable type")]
    MethodNotCallable { interface: String, method: String },
}

#[derive(Debug)]
struct Slot {
    name: Option<String>,
    kind: Option<TypeKind>,
}

/// Mutable construction phase of a type graph.
///
/// Unnamed types are interned by structure: requesting `*int` twice gives
/// back the same [`TypeId`]. Named types are nominal and are created in two
/// steps, [`declare`](Self::declare) then [`define`](Self::define), so that
/// a record can refer to itself before its fields are known.
///
/// ```
/// use mirror_types::{FieldDef, Primitive, TypeBuilder, TypeKind};
///
/// let mut b = TypeBuilder::new();
/// let node = b.declare("Node").unwrap();
/// let next = b.pointer(node);
/// let val = b.primitive(Primitive::Int);
/// b.define(node, TypeKind::Record(vec![
///     FieldDef::new("next", next),
///     FieldDef::new("val", val),
/// ])).unwrap();
///
/// let registry = b.finish().unwrap();
/// let node = registry.lookup("Node").unwrap();
/// assert_eq!(node.size(), 16);
/// assert_eq!(node.field(1).unwrap().offset, 8);
/// ```
#[derive(Debug, Default)]
pub struct TypeBuilder {
    slots: Vec<Slot>,
    interned: HashMap<TypeKind, TypeId>,
    names: HashMap<String, TypeId>,
}

impl TypeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: Option<String>, kind: Option<TypeKind>) -> TypeId {
        let id = TypeId(self.slots.len() as u32);
        self.slots.push(Slot { name, kind });
        id
    }

    fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }
        let id = self.push(None, Some(kind.clone()));
        self.interned.insert(kind, id);
        id
    }

    // === Unnamed, interned constructors ===

    pub fn primitive(&mut self, p: Primitive) -> TypeId {
        self.intern(TypeKind::Primitive(p))
    }

    pub fn pointer(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeKind::Pointer(elem))
    }

    pub fn array(&mut self, len: u64, elem: TypeId) -> TypeId {
        self.intern(TypeKind::Array { len, elem })
    }

    pub fn sequence(&mut self, elem: TypeId) -> TypeId {
        self.intern(TypeKind::Sequence(elem))
    }

    pub fn map(&mut self, key: TypeId, elem: TypeId) -> TypeId {
        self.intern(TypeKind::Map { key, elem })
    }

    pub fn channel(&mut self, dir: ChanDir, elem: TypeId) -> TypeId {
        self.intern(TypeKind::Channel { dir, elem })
    }

    pub fn callable(
        &mut self,
        params: impl IntoIterator<Item = TypeId>,
        results: impl IntoIterator<Item = TypeId>,
    ) -> TypeId {
        self.intern(TypeKind::Callable {
            params: params.into_iter().collect(),
            results: results.into_iter().collect(),
        })
    }

    pub fn interface(&mut self, methods: impl IntoIterator<Item = MethodDef>) -> TypeId {
        self.intern(normalize(TypeKind::Interface(methods.into_iter().collect())))
    }

    pub fn record(&mut self, fields: impl IntoIterator<Item = FieldDef>) -> TypeId {
        self.intern(normalize(TypeKind::Record(fields.into_iter().collect())))
    }

    /// Interned id of an arbitrary unnamed shape.
    pub fn unnamed(&mut self, kind: TypeKind) -> TypeId {
        self.intern(normalize(kind))
    }

    // === Named, nominal types ===

    /// Reserve a named type. It must be [`define`](Self::define)d before
    /// [`finish`](Self::finish).
    pub fn declare(&mut self, name: impl Into<String>) -> Result<TypeId, BuildError> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(BuildError::DuplicateName { name });
        }
        let id = self.push(Some(name.clone()), None);
        self.names.insert(name, id);
        Ok(id)
    }

    /// Give a declared type its shape.
    pub fn define(&mut self, id: TypeId, kind: TypeKind) -> Result<(), BuildError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(BuildError::UnknownId { id: id.0 })?;
        match (&slot.name, &slot.kind) {
            (Some(_), None) => {
                slot.kind = Some(normalize(kind));
                Ok(())
            }
            (name, _) => Err(BuildError::AlreadyDefined {
                name: name.clone().unwrap_or_else(|| format!("#{}", id.0)),
            }),
        }
    }

    /// Declare and define in one step, for types that are not self-referential.
    pub fn named(&mut self, name: impl Into<String>, kind: TypeKind) -> Result<TypeId, BuildError> {
        let id = self.declare(name)?;
        self.define(id, kind)?;
        Ok(id)
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.names.get(name).copied()
    }

    /// Shape of `id`, `None` while a named type is only declared.
    pub fn kind_of(&self, id: TypeId) -> Option<&TypeKind> {
        self.slots.get(id.index()).and_then(|slot| slot.kind.as_ref())
    }

    fn describe(&self, id: TypeId) -> String {
        match self.slots.get(id.index()) {
            Some(Slot { name: Some(name), .. }) => name.clone(),
            Some(Slot { kind: Some(kind), .. }) => format!("<{} #{}>", kind.kind(), id.0),
            _ => format!("#{}", id.0),
        }
    }

    /// Freeze the graph and compute sizes, alignments and field offsets.
    pub fn finish(self) -> Result<TypeRegistry, BuildError> {
        let mut kinds = Vec::with_capacity(self.slots.len());
        for (i, slot) in self.slots.iter().enumerate() {
            let id = TypeId(i as u32);
            let Some(kind) = &slot.kind else {
                return Err(BuildError::Undefined {
                    name: self.describe(id),
                });
            };
            self.validate(id, kind)?;
            kinds.push(kind);
        }

        let layouts = compute_layouts(&kinds, |id| self.describe(id))?;

        let mut types = Vec::with_capacity(self.slots.len());
        for ((slot, kind), layout) in self.slots.iter().zip(kinds).zip(layouts) {
            let mut kind = kind.clone();
            if let TypeKind::Record(fields) = &mut kind {
                for (field, offset) in fields.iter_mut().zip(&layout.offsets) {
                    field.offset = *offset;
                }
            }
            types.push(TypeDesc {
                name: slot.name.clone(),
                kind,
                size: layout.size,
                align: layout.align,
            });
        }
        tracing::debug!(types = types.len(), "type registry finished");
        Ok(TypeRegistry::new(types, self.names))
    }

    fn validate(&self, id: TypeId, kind: &TypeKind) -> Result<(), BuildError> {
        let check = |child: TypeId| {
            if child.index() < self.slots.len() {
                Ok(())
            } else {
                Err(BuildError::UnknownId { id: child.0 })
            }
        };
        match kind {
            TypeKind::Primitive(_) => Ok(()),
            TypeKind::Pointer(elem)
            | TypeKind::Array { elem, .. }
            | TypeKind::Sequence(elem)
            | TypeKind::Channel { elem, .. } => check(*elem),
            TypeKind::Map { key, elem } => {
                check(*key)?;
                check(*elem)
            }
            TypeKind::Callable { params, results } => {
                params.iter().chain(results).try_for_each(|&t| check(t))
            }
            TypeKind::Interface(methods) => {
                let mut seen = HashSet::new();
                for method in methods {
                    check(method.ty)?;
                    if !seen.insert(method.name.as_str()) {
                        return Err(BuildError::DuplicateMethod {
                            interface: self.describe(id),
                            method: method.name.clone(),
                        });
                    }
                    let callable = matches!(
                        self.kind_of(method.ty).map(TypeKind::kind),
                        Some(Kind::Callable)
                    );
                    if !callable {
                        return Err(BuildError::MethodNotCallable {
                            interface: self.describe(id),
                            method: method.name.clone(),
                        });
                    }
                }
                Ok(())
            }
            TypeKind::Record(fields) => {
                let mut seen = HashSet::new();
                for field in fields {
                    check(field.ty)?;
                    if field.name != "_" && !seen.insert(field.name.as_str()) {
                        return Err(BuildError::DuplicateField {
                            record: self.describe(id),
                            field: field.name.clone(),
                        });
                    }
                }
                Ok(())
            }
        }
    }
}

fn normalize(kind: TypeKind) -> TypeKind {
    match kind {
        TypeKind::Interface(mut methods) => {
            methods.sort_by(|a, b| a.name.cmp(&b.name));
            TypeKind::Interface(methods)
        }
        TypeKind::Record(mut fields) => {
            for field in &mut fields {
                field.offset = 0;
            }
            TypeKind::Record(fields)
        }
        other => other,
    }
}

// === Layout ===

const WORD: u64 = 8;

#[derive(Clone, Debug, Default)]
struct Layout {
    size: u64,
    align: u64,
    offsets: Vec<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Pending,
    Visiting,
    Done,
}

fn align_up(offset: u64, align: u64) -> Option<u64> {
    offset.checked_next_multiple_of(align)
}

/// Natural-alignment layout of every type. Only by-value containment
/// (arrays and record fields) needs the child's layout, so reaching a type
/// that is still being visited is an infinitely sized type.
///
/// Post-order over an explicit stack: a type is pushed `Pending`, turns
/// `Visiting` when its by-value children are pushed above it, and is laid
/// out once it surfaces again.
fn compute_layouts(
    kinds: &[&TypeKind],
    describe: impl Fn(TypeId) -> String,
) -> Result<Vec<Layout>, BuildError> {
    let mut layouts = vec![Layout::default(); kinds.len()];
    let mut states = vec![State::Pending; kinds.len()];
    let mut stack = Vec::new();

    for i in 0..kinds.len() {
        stack.push(TypeId(i as u32));
        while let Some(&id) = stack.last() {
            match states[id.index()] {
                State::Done => {
                    stack.pop();
                }
                State::Visiting => {
                    stack.pop();
                    let layout = layout_of(id, kinds[id.index()], &layouts, &describe)?;
                    layouts[id.index()] = layout;
                    states[id.index()] = State::Done;
                }
                State::Pending => {
                    states[id.index()] = State::Visiting;
                    for child in by_value(kinds[id.index()]).rev() {
                        match states[child.index()] {
                            State::Done => {}
                            State::Visiting => {
                                return Err(BuildError::InfiniteSize {
                                    name: describe(child),
                                });
                            }
                            State::Pending => stack.push(child),
                        }
                    }
                }
            }
        }
    }
    Ok(layouts)
}

/// Types whose layout is part of `kind`'s own layout.
fn by_value(kind: &TypeKind) -> impl DoubleEndedIterator<Item = TypeId> + '_ {
    let (elem, fields): (Option<TypeId>, &[FieldDef]) = match kind {
        TypeKind::Array { elem, .. } => (Some(*elem), &[]),
        TypeKind::Record(fields) => (None, fields),
        _ => (None, &[]),
    };
    elem.into_iter().chain(fields.iter().map(|field| field.ty))
}

/// Layout of `id` once every by-value child is laid out.
fn layout_of(
    id: TypeId,
    kind: &TypeKind,
    layouts: &[Layout],
    describe: &impl Fn(TypeId) -> String,
) -> Result<Layout, BuildError> {
    let overflow = || BuildError::SizeOverflow { name: describe(id) };
    let layout = match kind {
        TypeKind::Primitive(p) => Layout {
            size: p.size(),
            align: p.align(),
            offsets: Vec::new(),
        },
        TypeKind::Pointer(_)
        | TypeKind::Map { .. }
        | TypeKind::Channel { .. }
        | TypeKind::Callable { .. } => Layout {
            size: WORD,
            align: WORD,
            offsets: Vec::new(),
        },
        // Data pointer, length and capacity.
        TypeKind::Sequence(_) => Layout {
            size: 3 * WORD,
            align: WORD,
            offsets: Vec::new(),
        },
        // Method table and data pointer.
        TypeKind::Interface(_) => Layout {
            size: 2 * WORD,
            align: WORD,
            offsets: Vec::new(),
        },
        TypeKind::Array { len, elem } => {
            let elem = &layouts[elem.index()];
            Layout {
                size: elem.size.checked_mul(*len).ok_or_else(overflow)?,
                align: elem.align,
                offsets: Vec::new(),
            }
        }
        TypeKind::Record(fields) => {
            let mut offset = 0u64;
            let mut max_align = 1u64;
            let mut offsets = Vec::with_capacity(fields.len());
            for field in fields {
                let child = &layouts[field.ty.index()];
                offset = align_up(offset, child.align).ok_or_else(overflow)?;
                offsets.push(offset);
                offset = offset.checked_add(child.size).ok_or_else(overflow)?;
                max_align = max_align.max(child.align);
            }
            Layout {
                size: align_up(offset, max_align).ok_or_else(overflow)?,
                align: max_align,
                offsets,
            }
        }
    };
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interning_unnamed() {
        let mut b = TypeBuilder::new();
        let int = b.primitive(Primitive::Int);
        assert_eq!(b.primitive(Primitive::Int), int);
        let p1 = b.pointer(int);
        let p2 = b.pointer(int);
        assert_eq!(p1, p2);
        assert_ne!(b.sequence(int), p1);
    }

    #[test]
    fn test_named_types_are_nominal() {
        let mut b = TypeBuilder::new();
        let int = b.primitive(Primitive::Int);
        let a = b.named("A", TypeKind::Primitive(Primitive::Int)).unwrap();
        assert_ne!(a, int);
        assert_eq!(
            b.declare("A"),
            Err(BuildError::DuplicateName { name: "A".into() })
        );
    }

    #[test]
    fn test_define_twice() {
        let mut b = TypeBuilder::new();
        let a = b.named("A", TypeKind::Record(vec![])).unwrap();
        assert_eq!(
            b.define(a, TypeKind::Record(vec![])),
            Err(BuildError::AlreadyDefined { name: "A".into() })
        );
        let int = b.primitive(Primitive::Int);
        assert!(matches!(
            b.define(int, TypeKind::Primitive(Primitive::Bool)),
            Err(BuildError::AlreadyDefined { .. })
        ));
    }

    #[test]
    fn test_undefined_declaration() {
        let mut b = TypeBuilder::new();
        b.declare("Ghost").unwrap();
        assert_eq!(
            b.finish().unwrap_err(),
            BuildError::Undefined {
                name: "Ghost".into()
            }
        );
    }

    #[test]
    fn test_infinite_size() {
        let mut b = TypeBuilder::new();
        let s = b.declare("S").unwrap();
        let arr = b.array(2, s);
        b.define(s, TypeKind::Record(vec![FieldDef::new("inner", arr)]))
            .unwrap();
        assert!(matches!(
            b.finish(),
            Err(BuildError::InfiniteSize { .. })
        ));
    }

    #[test]
    fn test_methods_are_sorted() {
        let mut b = TypeBuilder::new();
        let f = b.callable([], []);
        let i1 = b.interface([MethodDef::new("b", f), MethodDef::new("a", f)]);
        let i2 = b.interface([MethodDef::new("a", f), MethodDef::new("b", f)]);
        assert_eq!(i1, i2);
    }

    #[test]
    fn test_method_must_be_callable() {
        let mut b = TypeBuilder::new();
        let int = b.primitive(Primitive::Int);
        b.interface([MethodDef::new("Len", int)]);
        assert!(matches!(
            b.finish(),
            Err(BuildError::MethodNotCallable { .. })
        ));
    }

    #[test]
    fn test_duplicate_field() {
        let mut b = TypeBuilder::new();
        let int = b.primitive(Primitive::Int);
        b.record([
            FieldDef::new("_", int),
            FieldDef::new("_", int),
            FieldDef::new("a", int),
            FieldDef::new("a", int),
        ]);
        assert!(matches!(
            b.finish(),
            Err(BuildError::DuplicateField { field, .. }) if field == "a"
        ));
    }

    #[test]
    fn test_long_by_value_chain() {
        // T0 contains T1 contains T2 ... so laying out T0 goes all the way down.
        let mut b = TypeBuilder::new();
        let ids: Vec<TypeId> = (0..200_000)
            .map(|i| b.declare(format!("T{i}")).unwrap())
            .collect();
        let int = b.primitive(Primitive::Int32);
        for (i, &id) in ids.iter().enumerate() {
            let inner = ids.get(i + 1).copied().unwrap_or(int);
            b.define(id, TypeKind::Record(vec![FieldDef::new("inner", inner)]))
                .unwrap();
        }
        let reg = b.finish().unwrap();
        assert_eq!(reg.ty(ids[0]).size(), 4);
        assert_eq!(reg.ty(ids[0]).align(), 4);
    }

    #[test]
    fn test_array_overflow() {
        let mut b = TypeBuilder::new();
        let int = b.primitive(Primitive::Int);
        b.array(u64::MAX, int);
        assert!(matches!(b.finish(), Err(BuildError::SizeOverflow { .. })));
    }
}
