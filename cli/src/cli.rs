//! Command-line interface definitions.
//!
//! This module contains only clap struct definitions - no business logic.
//! All command implementations are in the `commands` module.

use clap::{Args, Parser, Subcommand};
use mirror::Kind;

/// Mirror - walk, tag and compare type schemas
#[derive(Parser, Debug)]
#[command(name = "mirror", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the walk of a type
    Walk(WalkArgs),

    /// Parse tag text or show the tag groups
    Tags(TagsArgs),

    /// Check whether two types share a binary layout
    Layout(LayoutArgs),
}

/// Arguments for the `walk` command.
#[derive(Args, Debug)]
pub struct WalkArgs {
    /// Schema file, or `-` for stdin
    pub schema: String,

    /// Name of the type to walk
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Render nested HTML elements instead of an outline
    #[arg(long)]
    pub html: bool,

    /// Wrap the HTML in a complete page
    #[arg(long, requires = "html")]
    pub page: bool,

    /// Apply `mirror` field tags
    #[arg(long)]
    pub honor_tags: bool,
}

/// Arguments for the `tags` command.
#[derive(Args, Debug)]
pub struct TagsArgs {
    #[command(subcommand)]
    pub command: TagsCommand,
}

#[derive(Subcommand, Debug)]
pub enum TagsCommand {
    /// Parse tag text and print the resulting flags
    Parse(TagsParseArgs),

    /// Print the tag groups, one per line
    Table,
}

/// Arguments for the `tags parse` command.
#[derive(Args, Debug)]
pub struct TagsParseArgs {
    /// Comma separated tag text
    #[arg(allow_hyphen_values = true)]
    pub text: String,

    /// Kind of the field the tags are attached to
    #[arg(long, value_parser = parse_kind)]
    pub kind: Option<Kind>,

    /// Use the defaults of a blank `_` field
    #[arg(long, requires = "kind", conflicts_with = "seed")]
    pub blank: bool,

    /// Flags that explicit tags must not conflict with, in place of the
    /// kind defaults
    #[arg(long)]
    pub seed: Option<String>,
}

/// Arguments for the `layout` command.
#[derive(Args, Debug)]
pub struct LayoutArgs {
    /// First schema file, or `-` for stdin
    pub schema_a: String,

    /// Second schema file, or `-` for stdin
    pub schema_b: String,

    /// Type to compare
    #[arg(value_name = "TYPE")]
    pub type_name: String,

    /// Name of the type in the second schema, if it differs
    #[arg(long)]
    pub type_b: Option<String>,

    /// How many levels of nested records are compared field by field
    #[arg(long, default_value_t = 1)]
    pub depth: u32,
}

fn parse_kind(name: &str) -> Result<Kind, String> {
    Kind::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Kind::ALL.iter().map(|k| k.name()).collect();
        format!("unknown kind '{name}', expected one of {}", known.join(", "))
    })
}
