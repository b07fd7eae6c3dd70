//! Per-field traversal policy encoded as a bitmask.
//!
//! A field's tag text is a comma separated list of flag names, for example
//! `"nofieldname, nofollow"`. Flags are partitioned into groups of mutually
//! exclusive members (see [`table`]); parsing fails when a group ends up
//! with more than one member set.

mod error;
pub mod table;

use core::fmt;
use core::str::FromStr;

use bitflags::bitflags;
use mirror_types::Kind;

pub use error::{TableError, TagError};
pub use table::{TagGroup, TagTable};

bitflags! {
    /// Set of tag flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TagFlags: u16 {
        const IGNORE = 1 << 0;
        const FIELDNAME = 1 << 1;
        const NOFIELDNAME = 1 << 2;
        const TYPENAME = 1 << 3;
        const NOTYPENAME = 1 << 4;
        const TYPE = 1 << 5;
        const NOTYPE = 1 << 6;
        const FOLLOW = 1 << 7;
        const NOFOLLOW = 1 << 8;
        const SAME = 1 << 9;
        const METHODS = 1 << 10;
        const ASSIGNABLE = 1 << 11;
    }
}

/// Tag names in ascending bit order.
const TAG_NAMES: [(&str, TagFlags); 12] = [
    ("ignore", TagFlags::IGNORE),
    ("fieldname", TagFlags::FIELDNAME),
    ("nofieldname", TagFlags::NOFIELDNAME),
    ("typename", TagFlags::TYPENAME),
    ("notypename", TagFlags::NOTYPENAME),
    ("type", TagFlags::TYPE),
    ("notype", TagFlags::NOTYPE),
    ("follow", TagFlags::FOLLOW),
    ("nofollow", TagFlags::NOFOLLOW),
    ("same", TagFlags::SAME),
    ("methods", TagFlags::METHODS),
    ("assignable", TagFlags::ASSIGNABLE),
];

const DELIMITER: char = ',';

impl TagFlags {
    /// Flag spelled `name` in tag text.
    pub fn from_tag(name: &str) -> Option<TagFlags> {
        TAG_NAMES
            .iter()
            .find(|(n, _)| *n == name)
            .map(|&(_, flag)| flag)
    }

    /// Tag names of the set flags in ascending bit order.
    pub fn tag_names(self) -> impl Iterator<Item = &'static str> {
        TAG_NAMES
            .into_iter()
            .filter(move |&(_, flag)| self.contains(flag))
            .map(|(name, _)| name)
    }

    /// Parse `text` on top of `seed`. See [`parse`].
    pub fn parse(seed: TagFlags, text: &str) -> Result<TagFlags, TagError> {
        parse(seed, text)
    }

    /// True if every set flag may be used on a field of type `kind`.
    pub fn applies_to(self, kind: Kind) -> bool {
        TagTable::global().inapplicable(self, kind).is_empty()
    }

    /// Inherited defaults of a named (or blank, `_`) field of type `kind`.
    pub fn defaults(named: bool, kind: Kind) -> TagFlags {
        TagTable::global().defaults(named, kind)
    }

    /// Set the flags of `other`, clearing the flags they exclude.
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: TagFlags) -> TagFlags {
        TagTable::global().add(self, other)
    }

    /// Conflicting bits, empty for a consistent mask.
    pub fn conflicts(self) -> TagFlags {
        TagTable::global().conflicts(self)
    }
}

impl fmt::Display for TagFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.tag_names().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

impl FromStr for TagFlags {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(TagFlags::empty(), s)
    }
}

/// Parse comma separated tag `text`, OR-ing every flag into `seed`.
///
/// ```
/// use mirror_core::tags::{self, TagFlags};
///
/// assert_eq!(tags::parse(TagFlags::empty(), "ignore"), Ok(TagFlags::IGNORE));
///
/// let err = tags::parse(TagFlags::empty(), "follow,nofollow").unwrap_err();
/// assert_eq!(err.to_string(), "tags[follow,nofollow] and defaults [] conflict with [follow,nofollow]");
/// ```
pub fn parse(seed: TagFlags, text: &str) -> Result<TagFlags, TagError> {
    let mut mask = seed;
    if !text.trim().is_empty() {
        for token in text.split(DELIMITER).map(str::trim) {
            mask |= TagFlags::from_tag(token).ok_or_else(|| TagError::UnknownTag {
                tag: token.to_string(),
            })?;
        }
    }

    let conflicts = mask.conflicts();
    if !conflicts.is_empty() {
        tracing::debug!(%mask, %conflicts, "tag conflict");
        return Err(TagError::Conflict {
            explicit: mask - seed,
            inherited: seed,
            conflicts,
        });
    }
    Ok(mask)
}

/// Parse explicit tag `text` and overlay it on `defaults`.
///
/// Conflicts among the explicit flags are errors. Conflicts with defaults
/// are resolved in favour of the explicit flags.
pub fn parse_with_defaults(defaults: TagFlags, text: &str) -> Result<TagFlags, TagError> {
    let explicit = parse(TagFlags::empty(), text)?;
    Ok(defaults.add(explicit))
}

/// Fail with [`TagError::Inapplicable`] unless `mask` applies to `kind`.
pub fn check_applies(mask: TagFlags, kind: Kind) -> Result<(), TagError> {
    let tags = TagTable::global().inapplicable(mask, kind);
    if tags.is_empty() {
        Ok(())
    } else {
        Err(TagError::Inapplicable { tags, kind })
    }
}

/// Value of `key` in a struct tag of the form `key:"value" other:"..."`.
///
/// A raw tag that does not use that form has no keys, so it yields `None`
/// like any missing key. Escapes inside values are not interpreted.
pub fn tag_value<'a>(raw: &'a str, key: &str) -> Option<&'a str> {
    let mut rest = raw;
    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return None;
        }
        let colon = rest.find(':')?;
        let name = &rest[..colon];
        let quoted = rest[colon + 1..].strip_prefix('"')?;

        let mut end = None;
        let mut escaped = false;
        for (i, c) in quoted.char_indices() {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => {
                    end = Some(i);
                    break;
                }
                _ => {}
            }
        }
        let end = end?;
        if name == key {
            return Some(&quoted[..end]);
        }
        rest = &quoted[end + 1..];
    }
}
