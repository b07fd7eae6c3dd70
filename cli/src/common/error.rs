//! Error handling utilities for the CLI.

use mirror::{Error, RenderConfig, render_error_to};

/// Exit code for anything that is not a plain answer.
pub const EXIT_ERROR: i32 = 2;

/// An error together with the input it came from.
#[derive(Debug)]
pub struct CliError {
    pub error: Error,
    pub filename: Option<String>,
}

impl CliError {
    pub fn in_file(error: impl Into<Error>, filename: &str) -> Self {
        Self {
            error: error.into(),
            filename: Some(filename.to_string()),
        }
    }
}

impl From<Error> for CliError {
    fn from(error: Error) -> Self {
        Self {
            error,
            filename: None,
        }
    }
}

impl From<mirror::TagError> for CliError {
    fn from(error: mirror::TagError) -> Self {
        Error::from(error).into()
    }
}

impl From<mirror::RenderError> for CliError {
    fn from(error: mirror::RenderError) -> Self {
        Error::from(error).into()
    }
}

/// Result type for CLI commands.
pub type CliResult<T> = Result<T, CliError>;

/// Render an error to stderr and exit with [`EXIT_ERROR`].
pub fn render_and_exit(error: CliError, no_color: bool) -> ! {
    let config = RenderConfig {
        color: !no_color,
        filename: error.filename.as_deref(),
        ..Default::default()
    };
    render_error_to(&error.error, &mut std::io::stderr(), &config).ok();
    std::process::exit(EXIT_ERROR);
}
