use core::fmt;

/// Discriminant of a type descriptor.
///
/// This is the coarse classification used by tag kind restrictions and by
/// the walker to decide how a node expands. The data for each kind lives in
/// [`TypeKind`](crate::TypeKind).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Primitive,
    Pointer,
    Array,
    Sequence,
    Map,
    Channel,
    Callable,
    Interface,
    Record,
}

impl Kind {
    pub const ALL: [Kind; 9] = [
        Kind::Primitive,
        Kind::Pointer,
        Kind::Array,
        Kind::Sequence,
        Kind::Map,
        Kind::Channel,
        Kind::Callable,
        Kind::Interface,
        Kind::Record,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Kind::Primitive => "Primitive",
            Kind::Pointer => "Pointer",
            Kind::Array => "Array",
            Kind::Sequence => "Sequence",
            Kind::Map => "Map",
            Kind::Channel => "Channel",
            Kind::Callable => "Callable",
            Kind::Interface => "Interface",
            Kind::Record => "Record",
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Kind> {
        Kind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Primitive (leaf) types.
///
/// Sizes follow a 64-bit target: `Int`, `Uint` and `Uintptr` are 8 bytes wide.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Primitive {
    Bool,
    Int,
    Int8,
    Int16,
    Int32,
    Int64,
    Uint,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Uintptr,
    Float32,
    Float64,
    Complex64,
    Complex128,
    String,
    /// Untyped raw pointer, never followed by the walker.
    RawPointer,
}

impl Primitive {
    pub const ALL: [Primitive; 18] = [
        Primitive::Bool,
        Primitive::Int,
        Primitive::Int8,
        Primitive::Int16,
        Primitive::Int32,
        Primitive::Int64,
        Primitive::Uint,
        Primitive::Uint8,
        Primitive::Uint16,
        Primitive::Uint32,
        Primitive::Uint64,
        Primitive::Uintptr,
        Primitive::Float32,
        Primitive::Float64,
        Primitive::Complex64,
        Primitive::Complex128,
        Primitive::String,
        Primitive::RawPointer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Primitive::Bool => "bool",
            Primitive::Int => "int",
            Primitive::Int8 => "int8",
            Primitive::Int16 => "int16",
            Primitive::Int32 => "int32",
            Primitive::Int64 => "int64",
            Primitive::Uint => "uint",
            Primitive::Uint8 => "uint8",
            Primitive::Uint16 => "uint16",
            Primitive::Uint32 => "uint32",
            Primitive::Uint64 => "uint64",
            Primitive::Uintptr => "uintptr",
            Primitive::Float32 => "float32",
            Primitive::Float64 => "float64",
            Primitive::Complex64 => "complex64",
            Primitive::Complex128 => "complex128",
            Primitive::String => "string",
            Primitive::RawPointer => "unsafe.Pointer",
        }
    }

    /// Lookup by name. `byte` and `rune` are accepted as aliases of
    /// `uint8` and `int32`.
    pub fn from_name(name: &str) -> Option<Primitive> {
        match name {
            "byte" => Some(Primitive::Uint8),
            "rune" => Some(Primitive::Int32),
            _ => Primitive::ALL.into_iter().find(|p| p.name() == name),
        }
    }

    /// Size in bytes.
    pub fn size(self) -> u64 {
        match self {
            Primitive::Bool | Primitive::Int8 | Primitive::Uint8 => 1,
            Primitive::Int16 | Primitive::Uint16 => 2,
            Primitive::Int32 | Primitive::Uint32 | Primitive::Float32 => 4,
            Primitive::Int
            | Primitive::Int64
            | Primitive::Uint
            | Primitive::Uint64
            | Primitive::Uintptr
            | Primitive::Float64
            | Primitive::Complex64
            | Primitive::RawPointer => 8,
            Primitive::Complex128 | Primitive::String => 16,
        }
    }

    /// Alignment in bytes.
    pub fn align(self) -> u64 {
        match self {
            // Two float32 halves.
            Primitive::Complex64 => 4,
            // Two float64 halves, or pointer + length.
            Primitive::Complex128 | Primitive::String => 8,
            other => other.size(),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a channel type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChanDir {
    #[default]
    Both,
    Send,
    Recv,
}

impl ChanDir {
    pub fn name(self) -> &'static str {
        match self {
            ChanDir::Both => "both",
            ChanDir::Send => "send",
            ChanDir::Recv => "receive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_name() {
        assert_eq!(Kind::from_name("record"), Some(Kind::Record));
        assert_eq!(Kind::from_name("Interface"), Some(Kind::Interface));
        assert_eq!(Kind::from_name("struct"), None);
    }

    #[test]
    fn test_primitive_names_round_trip() {
        for p in Primitive::ALL {
            assert_eq!(Primitive::from_name(p.name()), Some(p));
        }
        assert_eq!(Primitive::from_name("byte"), Some(Primitive::Uint8));
        assert_eq!(Primitive::from_name("rune"), Some(Primitive::Int32));
    }

    #[test]
    fn test_primitive_align_divides_size() {
        for p in Primitive::ALL {
            assert_eq!(p.size() % p.align(), 0, "{p}");
        }
    }
}
