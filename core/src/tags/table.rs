//! Tag group table.
//!
//! Groups are written in a small declarative syntax, one string per group:
//! members separated by spaces, an optional leading `[Kind]` restricting the
//! group to fields of that kind, and member suffixes `*` (default for named
//! fields), `_` (default for blank fields) and `^` (setting this member
//! excludes every flag outside the group).

use mirror_types::Kind;
use once_cell::sync::Lazy;

use super::TagFlags;
use super::error::TableError;

/// The built-in groups.
pub const GROUPS: &[&str] = &[
    "ignore^",
    "fieldname* nofieldname_",
    "typename* notypename_",
    "type* notype_",
    "[Record] follow* nofollow",
    "[Interface] same methods assignable*",
];

static TABLE: Lazy<TagTable> = Lazy::new(|| {
    TagTable::from_groups(GROUPS).expect("Bug: built-in tag groups must be well-formed")
});

/// One group of mutually exclusive flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagGroup {
    pub source: String,
    /// Field kind the group is restricted to, if any.
    pub kind: Option<Kind>,
    pub members: TagFlags,
    pub exclusive: bool,
    pub named_default: TagFlags,
    pub blank_default: TagFlags,
}

impl TagGroup {
    fn parse(source: &str) -> Result<Self, TableError> {
        let mut rest = source.trim();
        let mut kind = None;
        if let Some(tail) = rest.strip_prefix('[') {
            let (name, tail) = tail.split_once(']').ok_or_else(|| TableError::UnknownKind {
                group: source.to_string(),
                name: tail.to_string(),
            })?;
            kind = Some(
                Kind::from_name(name.trim()).ok_or_else(|| TableError::UnknownKind {
                    group: source.to_string(),
                    name: name.to_string(),
                })?,
            );
            rest = tail;
        }

        let mut group = TagGroup {
            source: source.to_string(),
            kind,
            members: TagFlags::empty(),
            exclusive: false,
            named_default: TagFlags::empty(),
            blank_default: TagFlags::empty(),
        };
        for token in rest.split_whitespace() {
            let name = token.trim_end_matches(['*', '_', '^']);
            let marks = &token[name.len()..];
            let flag = TagFlags::from_tag(name).ok_or_else(|| TableError::UnknownFlag {
                group: source.to_string(),
                name: name.to_string(),
            })?;
            group.members |= flag;
            for mark in marks.chars() {
                let slot = match mark {
                    '^' => {
                        group.exclusive = true;
                        continue;
                    }
                    '*' => (&mut group.named_default, "named"),
                    _ => (&mut group.blank_default, "blank"),
                };
                if !slot.0.is_empty() {
                    return Err(TableError::AmbiguousDefault {
                        group: source.to_string(),
                        which: slot.1,
                    });
                }
                *slot.0 = flag;
            }
        }
        if group.members.is_empty() {
            return Err(TableError::EmptyGroup {
                group: source.to_string(),
            });
        }
        Ok(group)
    }

    fn applies_to(&self, kind: Kind) -> bool {
        self.kind.is_none_or(|k| k == kind)
    }
}

/// Partition of all [`TagFlags`] into groups.
#[derive(Debug, Clone)]
pub struct TagTable {
    groups: Vec<TagGroup>,
}

impl TagTable {
    /// The process-wide table built from [`GROUPS`].
    pub fn global() -> &'static TagTable {
        &TABLE
    }

    /// Build a table from group strings. Every flag must belong to exactly
    /// one group.
    pub fn from_groups<S: AsRef<str>>(groups: &[S]) -> Result<Self, TableError> {
        let mut seen = TagFlags::empty();
        let mut parsed = Vec::with_capacity(groups.len());
        for source in groups {
            let group = TagGroup::parse(source.as_ref())?;
            if let Some(dup) = (group.members & seen).iter().next() {
                return Err(TableError::DuplicateFlag {
                    name: dup.to_string(),
                });
            }
            seen |= group.members;
            parsed.push(group);
        }
        let uncovered = TagFlags::all() - seen;
        if !uncovered.is_empty() {
            return Err(TableError::Uncovered { flags: uncovered });
        }
        Ok(Self { groups: parsed })
    }

    pub fn groups(&self) -> &[TagGroup] {
        &self.groups
    }

    /// Group containing `flag`, which should be a single flag.
    pub fn group_of(&self, flag: TagFlags) -> Option<&TagGroup> {
        self.groups.iter().find(|g| g.members.contains(flag))
    }

    /// Bits of `mask` that violate a group: every member of a group with
    /// more than one member set, and the whole mask when an exclusive group
    /// is mixed with anything else.
    pub fn conflicts(&self, mask: TagFlags) -> TagFlags {
        let mut conflicts = TagFlags::empty();
        for group in &self.groups {
            let set = mask & group.members;
            if set.bits().count_ones() > 1 {
                conflicts |= set;
            }
            if group.exclusive && !set.is_empty() && !(mask - group.members).is_empty() {
                conflicts |= mask;
            }
        }
        conflicts
    }

    /// Set each flag of `other` on `mask`, first clearing the flags it
    /// excludes.
    pub fn add(&self, mut mask: TagFlags, other: TagFlags) -> TagFlags {
        for flag in other.iter() {
            let Some(group) = self.group_of(flag) else {
                continue;
            };
            if group.exclusive {
                mask = TagFlags::empty();
            }
            mask -= group.members;
            for g in self.groups.iter().filter(|g| g.exclusive) {
                mask -= g.members;
            }
            mask |= flag;
        }
        mask
    }

    /// Bits of `mask` whose group is restricted to a kind other than `kind`.
    pub fn inapplicable(&self, mask: TagFlags, kind: Kind) -> TagFlags {
        self.groups
            .iter()
            .filter(|g| !g.applies_to(kind))
            .fold(TagFlags::empty(), |acc, g| acc | (mask & g.members))
    }

    /// Inherited defaults of a named or blank field of `kind`.
    pub fn defaults(&self, named: bool, kind: Kind) -> TagFlags {
        self.groups
            .iter()
            .filter(|g| g.applies_to(kind))
            .fold(TagFlags::empty(), |acc, g| {
                acc | if named {
                    g.named_default
                } else {
                    g.blank_default
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_groups() {
        let table = TagTable::global();
        assert_eq!(table.groups().len(), GROUPS.len());

        let ignore = &table.groups()[0];
        assert!(ignore.exclusive);
        assert_eq!(ignore.members, TagFlags::IGNORE);
        assert_eq!(ignore.named_default, TagFlags::empty());

        let follow = &table.groups()[4];
        assert_eq!(follow.kind, Some(Kind::Record));
        assert_eq!(follow.members, TagFlags::FOLLOW | TagFlags::NOFOLLOW);
        assert_eq!(follow.named_default, TagFlags::FOLLOW);
        assert_eq!(follow.blank_default, TagFlags::empty());

        let iface = &table.groups()[5];
        assert_eq!(iface.kind, Some(Kind::Interface));
        assert_eq!(iface.named_default, TagFlags::ASSIGNABLE);
    }

    #[test]
    fn test_group_errors() {
        assert_eq!(
            TagTable::from_groups(&["ignore^", "bogus"]).unwrap_err(),
            TableError::UnknownFlag {
                group: "bogus".into(),
                name: "bogus".into()
            }
        );
        assert!(matches!(
            TagTable::from_groups(&["[Sandwich] follow nofollow"]),
            Err(TableError::UnknownKind { .. })
        ));
        assert!(matches!(
            TagTable::from_groups(&["fieldname* nofieldname*"]),
            Err(TableError::AmbiguousDefault { which: "named", .. })
        ));
        assert!(matches!(
            TagTable::from_groups(&["ignore", "ignore"]),
            Err(TableError::DuplicateFlag { .. })
        ));
        assert!(matches!(
            TagTable::from_groups(&["ignore"]),
            Err(TableError::Uncovered { .. })
        ));
    }

    #[test]
    fn test_defaults_by_kind() {
        let table = TagTable::global();
        assert_eq!(
            table.defaults(true, Kind::Record),
            TagFlags::FIELDNAME | TagFlags::TYPENAME | TagFlags::TYPE | TagFlags::FOLLOW
        );
        assert_eq!(
            table.defaults(false, Kind::Record),
            TagFlags::NOFIELDNAME | TagFlags::NOTYPENAME | TagFlags::NOTYPE
        );
        assert_eq!(
            table.defaults(true, Kind::Interface),
            TagFlags::FIELDNAME | TagFlags::TYPENAME | TagFlags::TYPE | TagFlags::ASSIGNABLE
        );
        assert_eq!(
            table.defaults(true, Kind::Primitive),
            TagFlags::FIELDNAME | TagFlags::TYPENAME | TagFlags::TYPE
        );
    }

    #[test]
    fn test_add_overrides_group_mates() {
        let table = TagTable::global();
        let defaults = table.defaults(true, Kind::Record);
        let mask = table.add(defaults, TagFlags::NOFOLLOW);
        assert_eq!(
            mask,
            TagFlags::FIELDNAME | TagFlags::TYPENAME | TagFlags::TYPE | TagFlags::NOFOLLOW
        );
        assert_eq!(table.add(defaults, TagFlags::IGNORE), TagFlags::IGNORE);
        assert_eq!(
            table.add(TagFlags::IGNORE, TagFlags::NOTYPE),
            TagFlags::NOTYPE
        );
    }
}
