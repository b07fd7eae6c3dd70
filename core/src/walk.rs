//! Depth-first, cycle-safe traversal of a type graph.
//!
//! The walker keeps an explicit work stack instead of recursing, so the
//! depth of the graph never translates into call-stack depth. Every distinct
//! type gets an index the first time it is *discovered* (when it is pushed),
//! and only the node that discovered a type expands it. If the visitor skips
//! that node, the next occurrence visited after it expands the type instead.
//! Every type is expanded at most once, which bounds the work by the number
//! of distinct types and makes self-referential graphs terminate.
//!
//! Child order: record fields in declaration order, map key then element,
//! callable params then results, interface methods sorted by name. Children
//! are indexed in that order and pushed in reverse so that popping the
//! stack visits them in that order too.

use hashbrown::{HashMap, HashSet};
use mirror_types::{Field, Ty, TypeKind};

/// What the walker does with the children of the node just visited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Expand the node's children unless another node expands them.
    #[default]
    Continue,
    /// Do not expand. The node's type keeps its index and is expanded by
    /// its next occurrence, if any.
    Skip,
}

/// Insertion-ordered first-seen index of every type discovered so far.
#[derive(Debug, Default)]
struct TypeIndex<'r> {
    indices: HashMap<Ty<'r>, usize>,
    order: Vec<Ty<'r>>,
}

impl<'r> TypeIndex<'r> {
    /// Index of `ty`, assigning the next one if unseen. The flag tells
    /// whether `ty` had been indexed before this call.
    fn index(&mut self, ty: Ty<'r>) -> (usize, bool) {
        if let Some(&index) = self.indices.get(&ty) {
            return (index, true);
        }
        let index = self.order.len();
        self.indices.insert(ty, index);
        self.order.push(ty);
        (index, false)
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

struct Node<'r> {
    field: Field<'r>,
    index: usize,
    depth: usize,
    /// The type had an index before this node was pushed.
    known: bool,
}

/// Visit every type reachable from `root`.
///
/// `visit` receives the field through which a type was reached, the type's
/// visitation index and its depth (the root is wrapped in a synthetic field
/// at depth 0). After the last node it is called once more with `None` at
/// depth 0 so that consumers can flush open scopes. The first error returned
/// by `visit` aborts the walk and is returned unchanged.
///
/// ```
/// use mirror_core::walk;
/// use mirror_types::{FieldDef, Primitive, TypeBuilder, TypeKind};
///
/// let mut b = TypeBuilder::new();
/// let node = b.declare("Node").unwrap();
/// let next = b.pointer(node);
/// b.define(node, TypeKind::Record(vec![FieldDef::new("next", next)])).unwrap();
/// let registry = b.finish().unwrap();
///
/// let mut seen = Vec::new();
/// walk(registry.ty(node), |field, index, depth| {
///     seen.push((field.map(|f| f.ty.to_string()), index, depth));
///     Ok::<_, ()>(())
/// })
/// .unwrap();
/// assert_eq!(seen, vec![
///     (Some("Node".to_string()), 0, 0),
///     (Some("*Node".to_string()), 1, 1),
///     (Some("Node".to_string()), 0, 2),
///     (None, 0, 0),
/// ]);
/// ```
pub fn walk<'r, E, F>(root: Ty<'r>, mut visit: F) -> Result<(), E>
where
    F: FnMut(Option<&Field<'r>>, usize, usize) -> Result<(), E>,
{
    walk_with(root, |field, index, depth| {
        visit(field, index, depth).map(|()| Flow::Continue)
    })
}

/// Like [`walk`], but the visitor decides per node whether its children
/// are expanded. The [`Flow`] returned for the `None` sentinel is ignored.
pub fn walk_with<'r, E, F>(root: Ty<'r>, mut visit: F) -> Result<(), E>
where
    F: FnMut(Option<&Field<'r>>, usize, usize) -> Result<Flow, E>,
{
    tracing::debug!(root = %root, "walk started");

    let mut table = TypeIndex::default();
    let (index, known) = table.index(root);
    let mut stack = vec![Node {
        field: Field::wrap(root),
        index,
        depth: 0,
        known,
    }];
    let mut children = Vec::new();
    // Types whose discovering node was skipped and that nothing expanded yet.
    let mut orphans = HashSet::new();

    while let Some(node) = stack.pop() {
        let flow = visit(Some(&node.field), node.index, node.depth)?;
        let ty = node.field.ty;
        let expand = match flow {
            Flow::Skip => {
                if !node.known {
                    orphans.insert(ty);
                }
                false
            }
            Flow::Continue => !node.known || orphans.remove(&ty),
        };
        if !expand {
            continue;
        }

        push_children(ty, &mut children);
        tracing::trace!(
            ty = %ty,
            index = node.index,
            depth = node.depth,
            children = children.len(),
            "expanding"
        );

        let first = stack.len();
        let depth = node.depth + 1;
        for field in children.drain(..) {
            let (index, known) = table.index(field.ty);
            stack.push(Node {
                field,
                index,
                depth,
                known,
            });
        }
        stack[first..].reverse();
    }

    tracing::debug!(types = table.len(), "walk finished");
    visit(None, 0, 0).map(|_| ())
}

/// Children of `ty` in visitation order.
fn push_children<'r>(ty: Ty<'r>, out: &mut Vec<Field<'r>>) {
    match ty.type_kind() {
        TypeKind::Primitive(_) => {}
        TypeKind::Pointer(_)
        | TypeKind::Array { .. }
        | TypeKind::Sequence(_)
        | TypeKind::Channel { .. } => out.extend(ty.elem().map(Field::wrap)),
        TypeKind::Map { .. } => {
            out.extend(ty.key().map(Field::wrap));
            out.extend(ty.elem().map(Field::wrap));
        }
        TypeKind::Callable { .. } => {
            out.extend(ty.params().chain(ty.results()).map(Field::wrap));
        }
        TypeKind::Interface(_) => out.extend(ty.methods()),
        TypeKind::Record(_) => out.extend(ty.fields()),
    }
}
