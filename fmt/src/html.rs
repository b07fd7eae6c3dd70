use core::fmt::{self, Write};

use mirror_types::Kind;

use crate::{Node, Sink};

/// Stylesheet embedded by [`crate::render_page`].
pub const PAGE_STYLE: &str = "\
div { margin-left: 1.5em; padding: 1px 4px; border-left: 2px solid #ccc; font-family: monospace; }
div[data-kind=Pointer] { border-color: #8a8; }
div[data-kind=Array], div[data-kind=Sequence] { border-color: #88c; }
div[data-kind=Map] { border-color: #c8c; }
div[data-kind=Channel] { border-color: #c88; }
div[data-kind=Callable] { border-color: #cc8; }
div[data-kind=Interface] { border-color: #8cc; }
div[data-kind=Record] { border-color: #555; }
div::before { content: attr(data-kind) ' ' attr(data-field) ' ' attr(data-type) ' #' attr(data-typeid); }
";

/// Nested `<div>` elements, one per node. A node's children are the
/// elements that follow it one level deeper.
#[derive(Default)]
pub(crate) struct Html {
    out: String,
    open: usize,
}

impl Html {
    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.out.push_str("  ");
        }
    }

    fn close_to(&mut self, depth: usize) {
        while self.open > depth {
            self.open -= 1;
            let level = self.open;
            self.indent(level);
            self.out.push_str("</div>\n");
        }
    }

    fn attr(&mut self, name: &str, value: &str) {
        self.out.push(' ');
        self.out.push_str(name);
        self.out.push_str("=\"");
        escape_into(&mut self.out, value);
        self.out.push('"');
    }
}

impl Sink for Html {
    fn node(&mut self, node: &Node<'_, '_>) -> fmt::Result {
        let field = node.field;
        let ty = field.ty;
        self.close_to(node.depth);
        self.indent(node.depth);
        self.out.push_str("<div");

        if node.show_kind() {
            self.attr("data-kind", ty.kind().name());
        }
        if node.show_type_name() {
            self.attr("data-type", &ty.to_string());
        }
        write!(
            self.out,
            " data-size=\"{}\" data-typeid=\"{}\"",
            ty.size(),
            node.index
        )?;

        if !field.index.is_empty() {
            if node.show_name() {
                self.attr("data-field", field.name);
            }
            let path: Vec<String> = field.index.iter().map(|i| i.to_string()).collect();
            self.attr("data-index", &path.join(" "));
            write!(self.out, " data-offset=\"{}\"", field.offset)?;
            self.attr("data-tag", field.tag.unwrap_or(""));
            if field.anonymous {
                self.out.push_str(" data-embedded");
            }
        }

        match ty.kind() {
            Kind::Channel => {
                let dir = ty.dir().unwrap_or_default();
                self.attr("data-direction", dir.name());
            }
            Kind::Map => {
                if let Some(key) = ty.key() {
                    self.attr("data-keytype", &key.to_string());
                }
            }
            Kind::Array => {
                write!(self.out, " data-length=\"{}\"", ty.len().unwrap_or(0))?;
            }
            Kind::Callable => {
                write!(
                    self.out,
                    " data-args-in=\"{}\" data-args-out=\"{}\"",
                    ty.params().len(),
                    ty.results().len()
                )?;
            }
            _ => {}
        }

        self.out.push_str(">\n");
        self.open = node.depth + 1;
        Ok(())
    }

    fn finish(&mut self) -> fmt::Result {
        self.close_to(0);
        Ok(())
    }

    fn into_string(self) -> String {
        self.out
    }
}

pub(crate) fn page(title: &str, body: &str) -> String {
    let mut out = String::with_capacity(body.len() + PAGE_STYLE.len() + 128);
    out.push_str("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>");
    escape_into(&mut out, title);
    out.push_str("</title><style>\n");
    out.push_str(PAGE_STYLE);
    out.push_str("</style></head><body>\n");
    out.push_str(body);
    out.push_str("</body></html>\n");
    out
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        let mut out = String::new();
        escape_into(&mut out, r#"<-chan "x" & 'y'"#);
        assert_eq!(out, "&lt;-chan &quot;x&quot; &amp; &#39;y&#39;");
    }

    #[test]
    fn test_page_wraps_body() {
        let page = page("map[string]int", "<div></div>\n");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>map[string]int</title>"));
        assert!(page.contains("<body>\n<div></div>\n</body>"));
    }
}
