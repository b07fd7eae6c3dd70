use mirror_types::Kind;
use thiserror::Error;

use super::TagFlags;

/// Failure to turn a field's tag text into a consistent [`TagFlags`] mask.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("unknown tag '{tag}'")]
    UnknownTag { tag: String },

    /// Mutually exclusive flags are set together.
    #[error("tags[{explicit}] and defaults [{inherited}] conflict with [{conflicts}]")]
    Conflict {
        explicit: TagFlags,
        inherited: TagFlags,
        conflicts: TagFlags,
    },

    /// Flags restricted to another field kind.
    #[error("tags [{tags}] do not apply to {kind} fields")]
    Inapplicable { tags: TagFlags, kind: Kind },
}

/// Malformed entry in a tag group list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("unknown flag '{name}' in group \"{group}\"")]
    UnknownFlag { group: String, name: String },

    #[error("unknown kind '{name}' in group \"{group}\"")]
    UnknownKind { group: String, name: String },

    #[error("flag '{name}' appears in more than one group")]
    DuplicateFlag { name: String },

    #[error("group \"{group}\" has no members")]
    EmptyGroup { group: String },

    #[error("group \"{group}\" marks more than one default for {which} fields")]
    AmbiguousDefault { group: String, which: &'static str },

    #[error("flags [{flags}] belong to no group")]
    Uncovered { flags: TagFlags },
}
