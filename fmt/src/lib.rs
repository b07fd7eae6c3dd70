//! Render the walk of a type as a nested document.
//!
//! Two styles are available: an indented text outline and nested HTML
//! `<div>` elements carrying `data-*` attributes. Both are produced from a
//! single [`walk_with`] pass, so shared types appear once and later
//! occurrences only repeat their index.

mod html;
mod outline;

use mirror_core::tags::{check_applies, parse_with_defaults, tag_value};
use mirror_core::{Flow, TagError, TagFlags, walk_with};
use mirror_types::{Field, Ty};
use thiserror::Error;

pub use html::PAGE_STYLE;

/// Key looked up in `key:"value"` struct tags.
pub const TAG_KEY: &str = "mirror";

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("field `{field}`: {source}")]
    Tag {
        field: String,
        #[source]
        source: TagError,
    },

    #[error("formatting failed")]
    Fmt(#[from] core::fmt::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Style {
    #[default]
    Outline,
    Html,
}

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Parse `mirror` tags on record fields and apply them.
    pub honor_tags: bool,
}

/// One walk event handed to a [`Sink`].
pub(crate) struct Node<'a, 'r> {
    pub field: &'a Field<'r>,
    pub index: usize,
    pub depth: usize,
    /// Effective tag mask. Empty when tags are not honored or the node is
    /// not a record field.
    pub flags: TagFlags,
}

impl Node<'_, '_> {
    pub fn show_name(&self) -> bool {
        !self.flags.contains(TagFlags::NOFIELDNAME)
    }

    pub fn show_type_name(&self) -> bool {
        !self.flags.contains(TagFlags::NOTYPENAME)
    }

    pub fn show_kind(&self) -> bool {
        !self.flags.contains(TagFlags::NOTYPE)
    }
}

pub(crate) trait Sink {
    /// Write `node`, closing any scope at or below its depth first.
    fn node(&mut self, node: &Node<'_, '_>) -> core::fmt::Result;

    /// Close every scope still open.
    fn finish(&mut self) -> core::fmt::Result;

    fn into_string(self) -> String;
}

/// Render `root` in `style` with default options.
///
/// # Examples
///
/// ```
/// # use mirror_core::parse_schema;
/// # use mirror_fmt::{Style, render};
/// let schema = parse_schema("type Pair struct { a *int; b int }").unwrap();
/// assert_eq!(
///     render(schema.get("Pair").unwrap(), Style::Outline).unwrap(),
///     "Record Pair #0\n  Pointer a *int #1 @0\n    Primitive int #2\n  Primitive b int #2 @8\n"
/// );
/// ```
pub fn render(root: Ty<'_>, style: Style) -> Result<String, RenderError> {
    render_with(root, style, &RenderOptions::default())
}

pub fn render_with(
    root: Ty<'_>,
    style: Style,
    options: &RenderOptions,
) -> Result<String, RenderError> {
    tracing::debug!(root = %root, ?style, honor_tags = options.honor_tags, "rendering");
    match style {
        Style::Outline => drive(root, options, outline::Outline::default()),
        Style::Html => drive(root, options, html::Html::default()),
    }
}

/// A complete HTML document around the [`Style::Html`] rendering of `root`.
pub fn render_page(root: Ty<'_>, options: &RenderOptions) -> Result<String, RenderError> {
    let body = render_with(root, Style::Html, options)?;
    Ok(html::page(&root.to_string(), &body))
}

fn drive<S: Sink>(
    root: Ty<'_>,
    options: &RenderOptions,
    mut sink: S,
) -> Result<String, RenderError> {
    walk_with(root, |field, index, depth| -> Result<Flow, RenderError> {
        let Some(field) = field else {
            sink.finish()?;
            return Ok(Flow::Continue);
        };
        let flags = if options.honor_tags {
            field_flags(field)?
        } else {
            TagFlags::empty()
        };
        if flags.contains(TagFlags::IGNORE) {
            tracing::trace!(field = field.name, "ignored");
            return Ok(Flow::Skip);
        }
        sink.node(&Node {
            field,
            index,
            depth,
            flags,
        })?;
        Ok(if flags.contains(TagFlags::NOFOLLOW) {
            Flow::Skip
        } else {
            Flow::Continue
        })
    })?;
    Ok(sink.into_string())
}

/// Effective tag mask of a record field: its kind defaults overlaid with
/// the `mirror` tag, if any.
fn field_flags(field: &Field<'_>) -> Result<TagFlags, RenderError> {
    if !field.is_data_field() {
        return Ok(TagFlags::empty());
    }
    let kind = field.ty.kind();
    let defaults = TagFlags::defaults(!field.is_blank(), kind);
    let text = field
        .tag
        .and_then(|raw| tag_value(raw, TAG_KEY))
        .unwrap_or("");
    parse_with_defaults(defaults, text)
        .and_then(|mask| check_applies(mask, kind).map(|()| mask))
        .map_err(|source| RenderError::Tag {
            field: field.name.to_string(),
            source,
        })
}
