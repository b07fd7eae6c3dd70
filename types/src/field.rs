use smallvec::SmallVec;

use crate::registry::Ty;

/// First path index of a [`Field`] that describes an interface method rather
/// than a data field.
pub const METHOD_INDEX: i32 = -1;

/// Field descriptor: one member reached while traversing a type.
///
/// Record fields carry `[i]` as their index path, interface methods carry
/// `[METHOD_INDEX, i]`. Element, argument and result slots are synthetic
/// and have an empty path and name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field<'r> {
    pub name: &'r str,
    pub ty: Ty<'r>,
    pub index: SmallVec<[i32; 2]>,
    /// Byte offset inside the enclosing record, zero for anything else.
    pub offset: u64,
    pub tag: Option<&'r str>,
    pub anonymous: bool,
}

impl<'r> Field<'r> {
    /// Synthetic, unnamed slot of type `ty`.
    pub fn wrap(ty: Ty<'r>) -> Self {
        Self {
            name: "",
            ty,
            index: SmallVec::new(),
            offset: 0,
            tag: None,
            anonymous: false,
        }
    }

    pub fn is_method(&self) -> bool {
        self.index.first() == Some(&METHOD_INDEX)
    }

    /// True for record data fields.
    pub fn is_data_field(&self) -> bool {
        self.index.len() == 1
    }

    /// True for the blank identifier `_`.
    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }
}
