//! Memory layout compatibility of record types.

use hashbrown::HashMap;
use mirror_types::{Kind, Ty, TypeKind};

/// Whether records `a` and `b` have the same memory layout.
///
/// Both must be records with the same name and field count, and every field
/// must agree on name, offset and shape at the same position. Shapes are
/// compared by unwrapping pointers, arrays, sequences, maps and channels in
/// lockstep. Primitives must be identical, array lengths equal and
/// interfaces the same by name, or by method set when unnamed. A nested
/// record is compared field by field while `max_depth` allows it and by
/// name once the budget is used up.
///
/// The handles may come from different registries. Record pairs are
/// checked from a work list, so neither a deep budget nor a recursive
/// record grows the call stack.
pub fn layout_compatible(a: Ty<'_>, b: Ty<'_>, max_depth: u32) -> bool {
    let mut work = WorkList::default();
    work.push(a, b, max_depth);
    while let Some((a, b, budget)) = work.stack.pop() {
        if !records_match(a, b, budget, &mut work) {
            return false;
        }
    }
    true
}

/// Record pairs still to compare, with the budget left for each.
#[derive(Default)]
struct WorkList<'r> {
    stack: Vec<(Ty<'r>, Ty<'r>, u32)>,
    /// Largest budget each pair was queued with.
    queued: HashMap<(Ty<'r>, Ty<'r>), u32>,
}

impl<'r> WorkList<'r> {
    /// Queue `(a, b)` unless it was already queued with at least `budget`.
    /// A repeat is assumed to match, which ends recursive records.
    fn push(&mut self, a: Ty<'r>, b: Ty<'r>, budget: u32) {
        if self.queued.get(&(a, b)).is_some_and(|&seen| seen >= budget) {
            return;
        }
        self.queued.insert((a, b), budget);
        self.stack.push((a, b, budget));
    }
}

fn records_match<'r>(a: Ty<'r>, b: Ty<'r>, budget: u32, work: &mut WorkList<'r>) -> bool {
    if a.kind() != Kind::Record
        || b.kind() != Kind::Record
        || a.name() != b.name()
        || a.num_fields() != b.num_fields()
    {
        return false;
    }
    if a == b {
        return true;
    }

    a.fields().zip(b.fields()).all(|(fa, fb)| {
        let matches = fa.name == fb.name
            && fa.offset == fb.offset
            && shapes_match(fa.ty, fb.ty, budget, work);
        if !matches {
            tracing::trace!(record = %a, field = fa.name, "layout mismatch");
        }
        matches
    })
}

fn shapes_match<'r>(mut a: Ty<'r>, mut b: Ty<'r>, budget: u32, work: &mut WorkList<'r>) -> bool {
    loop {
        if a.kind() != b.kind() {
            return false;
        }
        match (a.type_kind(), b.type_kind()) {
            (TypeKind::Primitive(pa), TypeKind::Primitive(pb)) => return pa == pb,
            (TypeKind::Array { len: la, .. }, TypeKind::Array { len: lb, .. }) if la != lb => {
                return false;
            }
            (
                TypeKind::Pointer(_)
                | TypeKind::Array { .. }
                | TypeKind::Sequence(_)
                | TypeKind::Map { .. }
                | TypeKind::Channel { .. },
                _,
            ) => {
                let (Some(ea), Some(eb)) = (a.elem(), b.elem()) else {
                    return false;
                };
                (a, b) = (ea, eb);
            }
            (TypeKind::Interface(_), _) => return same_interface(a, b),
            (TypeKind::Record(_), _) => {
                if a.name() != b.name() {
                    return false;
                }
                if budget > 0 {
                    work.push(a, b, budget - 1);
                }
                return true;
            }
            // Callables are a single code pointer whatever their signature.
            _ => return true,
        }
    }
}

/// Named interfaces match by name. Unnamed ones match when their method
/// sets render the same, which compares names and signatures.
fn same_interface(a: Ty<'_>, b: Ty<'_>) -> bool {
    if a == b {
        return true;
    }
    match (a.name(), b.name()) {
        (Some(na), Some(nb)) => na == nb,
        (None, None) => a.to_string() == b.to_string(),
        _ => false,
    }
}
