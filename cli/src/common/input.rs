//! File input utilities.

use std::io::Read;

use mirror::{Error, Schema, load_schema};

use super::{CliError, CliResult};

/// Read input from a file path or stdin if path is "-".
///
/// Returns the content and a display name for error messages.
pub fn read_input(path: &str) -> Result<(String, String), String> {
    if is_stdin(path) {
        let mut content = String::new();
        std::io::stdin()
            .read_to_string(&mut content)
            .map_err(|e| format!("<stdin>: {e}"))?;
        Ok((content, "<stdin>".to_string()))
    } else {
        let content = std::fs::read_to_string(path).map_err(|e| format!("{path}: {e}"))?;
        Ok((content, path.to_string()))
    }
}

/// Check if the path represents stdin.
pub fn is_stdin(path: &str) -> bool {
    path == "-"
}

/// Read and parse the schema at `path`.
pub fn read_schema(path: &str) -> CliResult<Schema> {
    let (content, name) = read_input(path).map_err(Error::Input)?;
    tracing::debug!(file = %name, bytes = content.len(), "loading schema");
    load_schema(&content).map_err(|e| CliError::in_file(e, &name))
}
