//! The `tags` command - parse tag text and show the tag groups.

use std::process::ExitCode;

use mirror::tags::{self, check_applies, parse_with_defaults};
use mirror::{TagFlags, TagTable};

use crate::cli::{TagsArgs, TagsCommand, TagsParseArgs};
use crate::common::CliResult;

/// Run the tags command.
pub fn run(args: TagsArgs) -> CliResult<ExitCode> {
    match args.command {
        TagsCommand::Parse(args) => {
            println!("{}", parse(&args)?);
        }
        TagsCommand::Table => print!("{}", table(TagTable::global())),
    }
    Ok(ExitCode::SUCCESS)
}

/// Effective mask for `args`.
///
/// With `--seed`, explicit tags conflicting with the seed are an error.
/// Otherwise, with `--kind`, the kind defaults are overridden by explicit
/// tags. Whenever a kind is given the result must apply to it.
pub fn parse(args: &TagsParseArgs) -> CliResult<TagFlags> {
    let mask = match (&args.seed, args.kind) {
        (Some(seed), _) => tags::parse(seed.parse()?, &args.text)?,
        (None, Some(kind)) => {
            parse_with_defaults(TagFlags::defaults(!args.blank, kind), &args.text)?
        }
        (None, None) => tags::parse(TagFlags::empty(), &args.text)?,
    };
    if let Some(kind) = args.kind {
        check_applies(mask, kind)?;
    }
    Ok(mask)
}

/// One line per group: its source followed by what it means.
pub fn table(table: &TagTable) -> String {
    let mut out = String::new();
    for group in table.groups() {
        let mut details = Vec::new();
        if group.exclusive {
            details.push("exclusive".to_string());
        }
        if !group.named_default.is_empty() {
            details.push(format!("named={}", group.named_default));
        }
        if !group.blank_default.is_empty() {
            details.push(format!("blank={}", group.blank_default));
        }
        let line = format!("{:<40}{}", group.source, details.join(" "));
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirror::Kind;

    fn args(text: &str) -> TagsParseArgs {
        TagsParseArgs {
            text: text.to_string(),
            kind: None,
            blank: false,
            seed: None,
        }
    }

    #[test]
    fn test_kind_defaults_are_overridden() {
        let mask = parse(&TagsParseArgs {
            kind: Some(Kind::Record),
            ..args("nofollow")
        })
        .unwrap();
        assert_eq!(mask.to_string(), "fieldname,typename,type,nofollow");
    }

    #[test]
    fn test_seed_conflicts() {
        let err = parse(&TagsParseArgs {
            seed: Some("follow".into()),
            ..args("nofollow")
        })
        .unwrap_err();
        assert!(matches!(err.error, mirror::Error::Tag(_)));
    }

    #[test]
    fn test_seed_with_kind_must_apply() {
        let err = parse(&TagsParseArgs {
            seed: Some("fieldname".into()),
            kind: Some(Kind::Pointer),
            ..args("methods")
        })
        .unwrap_err();
        assert!(matches!(
            err.error,
            mirror::Error::Tag(mirror::TagError::Inapplicable { .. })
        ));

        let mask = parse(&TagsParseArgs {
            seed: Some("fieldname".into()),
            kind: Some(Kind::Record),
            ..args("nofollow")
        })
        .unwrap();
        assert_eq!(mask.to_string(), "fieldname,nofollow");
    }

    #[test]
    fn test_table_lines() {
        let out = table(TagTable::global());
        assert_eq!(out.lines().count(), TagTable::global().groups().len());
        assert!(out.lines().next().unwrap().ends_with("exclusive"));
    }
}
