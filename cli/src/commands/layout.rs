//! The `layout` command - compare the binary layout of two types.

use std::process::ExitCode;

use mirror::{layout_compatible, lookup};

use crate::cli::LayoutArgs;
use crate::common::CliResult;
use crate::common::input::{is_stdin, read_schema};

/// Run the layout command. Exits with 0 when compatible, 1 otherwise.
pub fn run(args: LayoutArgs) -> CliResult<ExitCode> {
    if is_stdin(&args.schema_a) && is_stdin(&args.schema_b) {
        return Err(mirror::Error::Input("only one schema can be read from stdin".into()).into());
    }
    let a = read_schema(&args.schema_a)?;
    let b = read_schema(&args.schema_b)?;
    let ty_a = lookup(&a, &args.type_name)?;
    let ty_b = lookup(&b, args.type_b.as_deref().unwrap_or(&args.type_name))?;

    if layout_compatible(ty_a, ty_b, args.depth) {
        println!("compatible");
        Ok(ExitCode::SUCCESS)
    } else {
        println!("incompatible");
        Ok(ExitCode::FAILURE)
    }
}
