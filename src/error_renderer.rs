//! Error rendering with ariadne.
//!
//! Schema errors are shown with the offending source lines and labels;
//! every other error is a single `error: ...` line.

use crate::Error;
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use mirror_core::SchemaError;
use std::io::Write;

/// Character set for rendering error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CharSet {
    #[default]
    Unicode,
    Ascii,
}

/// Configuration for error rendering.
#[derive(Debug, Clone)]
pub struct RenderConfig<'a> {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
    /// The filename to display in error messages.
    /// Defaults to "<unknown>" if not provided.
    pub filename: Option<&'a str>,
    pub charset: CharSet,
}

impl Default for RenderConfig<'_> {
    fn default() -> Self {
        RenderConfig::default()
    }
}

impl RenderConfig<'_> {
    const fn default() -> Self {
        Self {
            color: true,
            filename: None,
            charset: CharSet::Unicode,
        }
    }
}

/// Render an error to stderr using the default config.
pub fn render_error(error: &Error) {
    render_error_to(error, &mut std::io::stderr(), &RenderConfig::default()).ok();
}

/// Render an error to a writer with the given configuration.
///
/// # Example
/// ```
/// use mirror::{RenderConfig, load_schema, render_error_to};
///
/// let err = load_schema("type A struct { b B }").unwrap_err();
/// let mut buf = Vec::new();
/// let config = RenderConfig { color: false, ..Default::default() };
/// render_error_to(&err, &mut buf, &config).unwrap();
/// let output = String::from_utf8_lossy(&buf);
/// assert!(output.contains("unknown type `B`"));
/// ```
pub fn render_error_to(
    error: &Error,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    match error {
        Error::Schema { error, text } => render_schema_error(error, text, writer, config),
        other => writeln!(writer, "error: {other}"),
    }
}

fn render_schema_error(
    error: &SchemaError,
    text: &str,
    writer: &mut dyn Write,
    config: &RenderConfig,
) -> std::io::Result<()> {
    let filename = config.filename.unwrap_or("<unknown>");
    let Some(span) = error.span() else {
        return writeln!(writer, "error: {filename}: {error}");
    };

    let mut colors = ColorGenerator::new();
    colors.next(); // Skip the first color.

    let charset = match config.charset {
        CharSet::Unicode => ariadne::CharSet::Unicode,
        CharSet::Ascii => ariadne::CharSet::Ascii,
    };
    let ariadne_config = ariadne::Config::default()
        .with_color(config.color)
        .with_char_set(charset);

    let message = error.to_string();
    let mut report = Report::build(ReportKind::Error, (filename, span.clone()))
        .with_message(&message)
        .with_config(ariadne_config)
        .with_label(
            Label::new((filename, span))
                .with_message(error.label())
                .with_color(colors.next()),
        );

    match error {
        SchemaError::DuplicateType { first, .. } => {
            report = report.with_label(
                Label::new((filename, first.clone()))
                    .with_message("first declared here")
                    .with_color(colors.next()),
            );
        }
        SchemaError::Cycle { .. } => {
            report = report.with_help("a named type cannot be defined only as another name");
        }
        SchemaError::Build {
            source: mirror_types::BuildError::InfiniteSize { .. },
            ..
        } => {
            report = report.with_help("break the cycle with a pointer, slice or map");
        }
        _ => {}
    }

    report
        .finish()
        .write((filename, Source::from(text)), &mut *writer)
}
