//! Tests for registry handles, layout computation and type display.

use mirror_types::{
    BuildError, ChanDir, FieldDef, Kind, MethodDef, Primitive, TypeBuilder, TypeKind,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_record_offsets_follow_alignment() {
    let mut b = TypeBuilder::new();
    let u8_ = b.primitive(Primitive::Uint8);
    let u16_ = b.primitive(Primitive::Uint16);
    let u32_ = b.primitive(Primitive::Uint32);
    let u64_ = b.primitive(Primitive::Uint64);
    let rec = b.record([
        FieldDef::new("a", u8_),
        FieldDef::new("b", u16_),
        FieldDef::new("c", u32_),
        FieldDef::new("d", u64_),
        FieldDef::new("e", u8_),
    ]);
    let reg = b.finish().unwrap();
    let rec = reg.ty(rec);

    let offsets: Vec<u64> = rec.fields().map(|f| f.offset).collect();
    assert_eq!(offsets, vec![0, 2, 4, 8, 16]);
    assert_eq!(rec.size(), 24);
    assert_eq!(rec.align(), 8);
}

#[test]
fn test_container_sizes() {
    let mut b = TypeBuilder::new();
    let int = b.primitive(Primitive::Int);
    let ptr = b.pointer(int);
    let seq = b.sequence(int);
    let arr = b.array(3, int);
    let map = b.map(int, int);
    let chan = b.channel(ChanDir::Both, int);
    let func = b.callable([int], [int]);
    let iface = b.interface([]);
    let empty = b.record([]);
    let reg = b.finish().unwrap();

    let sizes: Vec<(u64, u64)> = [ptr, seq, arr, map, chan, func, iface, empty]
        .into_iter()
        .map(|id| (reg.ty(id).size(), reg.ty(id).align()))
        .collect();
    assert_eq!(
        sizes,
        vec![(8, 8), (24, 8), (24, 8), (8, 8), (8, 8), (8, 8), (16, 8), (0, 1)]
    );
}

#[test]
fn test_nested_record_layout() {
    let mut b = TypeBuilder::new();
    let c64 = b.primitive(Primitive::Complex64);
    let b8 = b.primitive(Primitive::Bool);
    let inner = b
        .named(
            "Inner",
            TypeKind::Record(vec![FieldDef::new("x", b8), FieldDef::new("y", c64)]),
        )
        .unwrap();
    let outer = b.record([FieldDef::new("flag", b8), FieldDef::embedded("Inner", inner)]);
    let reg = b.finish().unwrap();

    let inner = reg.ty(inner);
    assert_eq!((inner.size(), inner.align()), (12, 4));
    let outer = reg.ty(outer);
    let embedded = outer.field(1).unwrap();
    assert!(embedded.anonymous);
    assert_eq!(embedded.offset, 4);
    assert_eq!(outer.size(), 16);
}

#[test]
fn test_self_reference_through_pointer_is_finite() {
    let mut b = TypeBuilder::new();
    let node = b.declare("Node").unwrap();
    let next = b.pointer(node);
    let kids = b.sequence(node);
    b.define(
        node,
        TypeKind::Record(vec![FieldDef::new("next", next), FieldDef::new("kids", kids)]),
    )
    .unwrap();
    let reg = b.finish().unwrap();
    assert_eq!(reg.lookup("Node").unwrap().size(), 32);
}

#[test]
fn test_mutual_value_recursion_is_rejected() {
    let mut b = TypeBuilder::new();
    let a = b.declare("A").unwrap();
    let bb = b.declare("B").unwrap();
    b.define(a, TypeKind::Record(vec![FieldDef::new("b", bb)]))
        .unwrap();
    b.define(bb, TypeKind::Record(vec![FieldDef::new("a", a)]))
        .unwrap();
    assert_eq!(
        b.finish().unwrap_err(),
        BuildError::InfiniteSize { name: "A".into() }
    );
}

// ============================================================================
// Handles
// ============================================================================

#[test]
fn test_handle_accessors() {
    let mut b = TypeBuilder::new();
    let string = b.primitive(Primitive::String);
    let int = b.primitive(Primitive::Int);
    let map = b.map(string, int);
    let arr = b.array(4, int);
    let recv = b.channel(ChanDir::Recv, arr);
    let func = b.callable([string, int], [int]);
    let reg = b.finish().unwrap();

    let map = reg.ty(map);
    assert_eq!(map.kind(), Kind::Map);
    assert_eq!(map.key(), Some(reg.ty(string)));
    assert_eq!(map.elem(), Some(reg.ty(int)));

    assert_eq!(reg.ty(arr).len(), Some(4));
    assert_eq!(reg.ty(recv).dir(), Some(ChanDir::Recv));
    assert_eq!(reg.ty(int).primitive(), Some(Primitive::Int));
    assert_eq!(reg.ty(int).elem(), None);

    let func = reg.ty(func);
    assert_eq!(func.params().collect::<Vec<_>>(), vec![reg.ty(string), reg.ty(int)]);
    assert_eq!(func.results().len(), 1);
}

#[test]
fn test_methods_have_sentinel_index() {
    let mut b = TypeBuilder::new();
    let string = b.primitive(Primitive::String);
    let f = b.callable([], [string]);
    let g = b.callable([], []);
    let iface = b.interface([MethodDef::new("Name", f), MethodDef::new("Close", g)]);
    let reg = b.finish().unwrap();

    let iface = reg.ty(iface);
    let methods: Vec<_> = iface.methods().collect();
    assert_eq!(methods.len(), 2);
    assert_eq!(methods[0].name, "Close");
    assert_eq!(methods[0].index.as_slice(), &[-1, 0]);
    assert!(methods[0].is_method());
    assert_eq!(methods[1].name, "Name");
    assert_eq!(methods[1].ty, reg.ty(f));
    assert!(!methods[1].is_data_field());
}

#[test]
fn test_handles_from_different_registries_differ() {
    let build = || {
        let mut b = TypeBuilder::new();
        b.primitive(Primitive::Int);
        b.finish().unwrap()
    };
    let (r1, r2) = (build(), build());
    let a = r1.iter().next().unwrap();
    let b = r2.iter().next().unwrap();
    assert_eq!(a.id(), b.id());
    assert_ne!(a, b);
}

// ============================================================================
// Display
// ============================================================================

#[test]
fn test_display() {
    let mut b = TypeBuilder::new();
    let int = b.primitive(Primitive::Int);
    let string = b.primitive(Primitive::String);
    let boolean = b.primitive(Primitive::Bool);
    let u16_ = b.primitive(Primitive::Uint16);
    let uintptr = b.primitive(Primitive::Uintptr);
    let arr = b.array(2, uintptr);
    let recv = b.channel(ChanDir::Recv, arr);
    let send = b.channel(ChanDir::Send, arr);
    let precv = b.pointer(recv);
    let rune = b.primitive(Primitive::Int32);
    let map = b.map(rune, precv);
    let pmap = b.pointer(map);
    let func = b.callable([string, int], [boolean, u16_]);
    let single = b.callable([recv, send], [string]);
    let error_fn = b.callable([], [string]);
    let error = b
        .named(
            "error",
            TypeKind::Interface(vec![MethodDef::new("Error", error_fn)]),
        )
        .unwrap();
    let err_fn = b.callable([], [error]);
    let iface = b.interface([MethodDef::new("Do", err_fn), MethodDef::new("Id", single)]);
    let empty_iface = b.interface([]);
    let ptr_int = b.pointer(int);
    let rec = b.record([
        FieldDef::new("a", ptr_int),
        FieldDef::new("c", empty_iface).with_tag("ctag"),
        FieldDef::embedded("error", error),
    ]);
    let reg = b.finish().unwrap();

    let show = |id| reg.ty(id).to_string();
    assert_eq!(show(pmap), "*map[int32]*<-chan [2]uintptr");
    assert_eq!(show(func), "func(string, int) (bool, uint16)");
    assert_eq!(show(single), "func(<-chan [2]uintptr, chan<- [2]uintptr) string");
    assert_eq!(show(error), "error");
    assert_eq!(
        show(iface),
        "interface { Do() error; Id(<-chan [2]uintptr, chan<- [2]uintptr) string }"
    );
    assert_eq!(
        show(rec),
        r#"struct { a *int; c interface {} "ctag"; error }"#
    );
    assert_eq!(format!("{:?}", reg.ty(int)), "Ty(#0 int)");
}
