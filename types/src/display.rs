//! Go-like rendering of type expressions.
//!
//! Named types print as their name, so rendering never follows a cycle.

use core::fmt::{self, Display, Write};

use crate::desc::TypeKind;
use crate::kind::ChanDir;
use crate::registry::Ty;

impl Display for Ty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.name() {
            return f.write_str(name);
        }
        match self.type_kind() {
            TypeKind::Primitive(p) => f.write_str(p.name()),
            TypeKind::Pointer(_) => write!(f, "*{}", elem(*self)),
            TypeKind::Array { len, .. } => write!(f, "[{len}]{}", elem(*self)),
            TypeKind::Sequence(_) => write!(f, "[]{}", elem(*self)),
            TypeKind::Map { .. } => {
                let key = self.key().ok_or(fmt::Error)?;
                write!(f, "map[{key}]{}", elem(*self))
            }
            TypeKind::Channel { dir, .. } => {
                let prefix = match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                };
                write!(f, "{prefix}{}", elem(*self))
            }
            TypeKind::Callable { .. } => {
                f.write_str("func")?;
                write_signature(f, *self)
            }
            TypeKind::Interface(_) => {
                if self.num_methods() == 0 {
                    return f.write_str("interface {}");
                }
                f.write_str("interface {")?;
                for (i, method) in self.methods().enumerate() {
                    let sep = if i == 0 { " " } else { "; " };
                    write!(f, "{sep}{}", method.name)?;
                    write_signature(f, method.ty)?;
                }
                f.write_str(" }")
            }
            TypeKind::Record(_) => {
                if self.num_fields() == 0 {
                    return f.write_str("struct {}");
                }
                f.write_str("struct {")?;
                for (i, field) in self.fields().enumerate() {
                    f.write_str(if i == 0 { " " } else { "; " })?;
                    if field.anonymous {
                        write!(f, "{}", field.ty)?;
                    } else {
                        write!(f, "{} {}", field.name, field.ty)?;
                    }
                    if let Some(tag) = field.tag {
                        write!(f, " {tag:?}")?;
                    }
                }
                f.write_str(" }")
            }
        }
    }
}

struct Elem<'r>(Option<Ty<'r>>);

fn elem(ty: Ty<'_>) -> Elem<'_> {
    Elem(ty.elem())
}

impl Display for Elem<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ty) => write!(f, "{ty}"),
            None => Err(fmt::Error),
        }
    }
}

/// `(params)`, then nothing, ` R` or ` (R1, R2)` for the results.
fn write_signature(f: &mut fmt::Formatter<'_>, callable: Ty<'_>) -> fmt::Result {
    f.write_char('(')?;
    for (i, param) in callable.params().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{param}")?;
    }
    f.write_char(')')?;
    let results = callable.results();
    match results.len() {
        0 => Ok(()),
        1 => {
            for result in results {
                write!(f, " {result}")?;
            }
            Ok(())
        }
        _ => {
            f.write_str(" (")?;
            for (i, result) in results.enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{result}")?;
            }
            f.write_char(')')
        }
    }
}
