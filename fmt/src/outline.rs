use core::fmt::{self, Write};

use crate::{Node, Sink};

/// One line per node, indented two spaces per level.
#[derive(Default)]
pub(crate) struct Outline {
    out: String,
}

impl Sink for Outline {
    fn node(&mut self, node: &Node<'_, '_>) -> fmt::Result {
        let field = node.field;
        for _ in 0..node.depth {
            self.out.push_str("  ");
        }

        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if node.show_kind() {
            parts.push(field.ty.kind().name());
        }
        if node.show_name() && !field.name.is_empty() {
            parts.push(field.name);
        }
        let ty = field.ty.to_string();
        if node.show_type_name() {
            parts.push(&ty);
        }
        for part in parts {
            write!(self.out, "{part} ")?;
        }
        write!(self.out, "#{}", node.index)?;

        if field.is_data_field() {
            write!(self.out, " @{}", field.offset)?;
        }
        if let Some(tag) = field.tag {
            write!(self.out, " `{tag}`")?;
        }
        if field.anonymous {
            self.out.push_str(" embedded");
        }
        self.out.push('\n');
        Ok(())
    }

    fn finish(&mut self) -> fmt::Result {
        Ok(())
    }

    fn into_string(self) -> String {
        self.out
    }
}
