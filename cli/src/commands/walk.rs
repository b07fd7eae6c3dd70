//! The `walk` command - print the walk of a type.

use std::process::ExitCode;

use mirror::{RenderOptions, Style, lookup, render_page, render_with};

use crate::cli::WalkArgs;
use crate::common::CliResult;
use crate::common::input::read_schema;

/// Run the walk command.
pub fn run(args: WalkArgs) -> CliResult<ExitCode> {
    let schema = read_schema(&args.schema)?;
    let root = lookup(&schema, &args.type_name)?;
    let options = RenderOptions {
        honor_tags: args.honor_tags,
    };

    let out = if args.page {
        render_page(root, &options)?
    } else {
        let style = if args.html { Style::Html } else { Style::Outline };
        render_with(root, style, &options)?
    };
    print!("{out}");
    Ok(ExitCode::SUCCESS)
}
