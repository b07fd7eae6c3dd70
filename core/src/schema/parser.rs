use core::ops::Range;

use hashbrown::HashMap;
use mirror_types::{
    BuildError, ChanDir, FieldDef, MethodDef, Primitive, TypeBuilder, TypeId, TypeKind,
};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::Pair;
use pest_derive::Parser;

use super::Schema;
use super::error::SchemaError;

#[derive(Parser)]
#[grammar = "schema/schema.pest"]
struct SchemaParser;

/// Deepest nesting of type literals accepted in one declaration.
const MAX_DEPTH: usize = 256;

struct Decl<'i> {
    name: &'i str,
    span: Range<usize>,
    body: Pair<'i, Rule>,
    id: TypeId,
}

struct Lowering<'i> {
    builder: TypeBuilder,
    names: HashMap<&'i str, TypeId>,
    depth: usize,
}

/// Parse `src` and freeze the declared types into a [`Schema`].
pub fn parse_schema(src: &str) -> Result<Schema, SchemaError> {
    let root = SchemaParser::parse(Rule::schema, src)
        .map_err(syntax_error)?
        .next()
        .ok_or_else(|| SchemaError::Syntax {
            message: "empty parse".to_string(),
            span: 0..0,
        })?;

    let mut lowering = Lowering {
        builder: TypeBuilder::new(),
        names: HashMap::new(),
        depth: 0,
    };

    let mut decls: Vec<Decl<'_>> = Vec::new();
    for pair in root.into_inner().filter(|p| p.as_rule() == Rule::decl) {
        let mut inner = operands(pair);
        let (Some(ident), Some(body)) = (inner.next(), inner.next()) else {
            continue;
        };
        let name = ident.as_str();
        let span = to_range(&ident);
        if let Some(first) = decls.iter().find(|d| d.name == name) {
            return Err(SchemaError::DuplicateType {
                name: name.to_string(),
                span,
                first: first.span.clone(),
            });
        }
        let id = lowering
            .builder
            .declare(name)
            .map_err(|source| SchemaError::Build {
                source,
                span: Some(span.clone()),
            })?;
        lowering.names.insert(name, id);
        decls.push(Decl {
            name,
            span,
            body,
            id,
        });
    }

    // A declaration that names another declared type copies its shape, so
    // it has to wait until that type is defined.
    let mut pending: Vec<&Decl<'_>> = decls.iter().collect();
    while !pending.is_empty() {
        let before = pending.len();
        let mut deferred = Vec::new();
        for decl in pending {
            match lowering.decl_kind(decl)? {
                Some(kind) => {
                    lowering
                        .builder
                        .define(decl.id, kind)
                        .map_err(|source| SchemaError::Build {
                            source,
                            span: Some(decl.span.clone()),
                        })?
                }
                None => deferred.push(decl),
            }
        }
        if deferred.len() == before {
            let decl = deferred[0];
            return Err(SchemaError::Cycle {
                name: decl.name.to_string(),
                span: decl.span.clone(),
            });
        }
        pending = deferred;
    }

    let registry = lowering.builder.finish().map_err(|source| {
        let span = build_subject(&source)
            .and_then(|name| decls.iter().find(|d| d.name == name))
            .map(|d| d.span.clone());
        SchemaError::Build { source, span }
    })?;
    tracing::debug!(decls = decls.len(), types = registry.len(), "schema parsed");

    Ok(Schema {
        registry,
        names: decls.iter().map(|d| d.name.to_string()).collect(),
    })
}

impl<'i> Lowering<'i> {
    /// Shape of a declaration, `None` while it copies an undefined type.
    fn decl_kind(&mut self, decl: &Decl<'i>) -> Result<Option<TypeKind>, SchemaError> {
        if decl.body.as_rule() != Rule::named {
            return self.kind_of(decl.body.clone()).map(Some);
        }
        let id = self.resolve(&decl.body)?;
        Ok(self.builder.kind_of(id).cloned())
    }

    fn type_of(&mut self, pair: Pair<'i, Rule>) -> Result<TypeId, SchemaError> {
        if pair.as_rule() == Rule::named {
            return self.resolve(&pair);
        }
        let kind = self.kind_of(pair)?;
        Ok(self.builder.unnamed(kind))
    }

    fn kind_of(&mut self, pair: Pair<'i, Rule>) -> Result<TypeKind, SchemaError> {
        if self.depth >= MAX_DEPTH {
            return Err(SchemaError::TooDeep {
                max: MAX_DEPTH,
                span: to_range(&pair),
            });
        }
        self.depth += 1;
        let result = self.lower(pair);
        self.depth -= 1;
        result
    }

    fn lower(&mut self, pair: Pair<'i, Rule>) -> Result<TypeKind, SchemaError> {
        let span = to_range(&pair);
        let rule = pair.as_rule();
        let mut inner = operands(pair);
        let mut next = || {
            inner.next().ok_or_else(|| SchemaError::Syntax {
                message: format!("incomplete {}", rule_name(&rule)),
                span: span.clone(),
            })
        };

        let kind = match rule {
            Rule::pointer => TypeKind::Pointer(self.type_of(next()?)?),
            Rule::slice => TypeKind::Sequence(self.type_of(next()?)?),
            Rule::array => {
                let len = next()?;
                let len_span = to_range(&len);
                let len = len.as_str().parse().map_err(|_| SchemaError::Syntax {
                    message: "array length out of range".to_string(),
                    span: len_span,
                })?;
                TypeKind::Array {
                    len,
                    elem: self.type_of(next()?)?,
                }
            }
            Rule::map => {
                let key = self.type_of(next()?)?;
                TypeKind::Map {
                    key,
                    elem: self.type_of(next()?)?,
                }
            }
            Rule::chan | Rule::send_chan | Rule::recv_chan => {
                let dir = match rule {
                    Rule::send_chan => ChanDir::Send,
                    Rule::recv_chan => ChanDir::Recv,
                    _ => ChanDir::Both,
                };
                TypeKind::Channel {
                    dir,
                    elem: self.type_of(next()?)?,
                }
            }
            Rule::func => {
                let (params, results) = self.signature(inner)?;
                TypeKind::Callable { params, results }
            }
            Rule::interface => {
                let mut methods = Vec::new();
                for method in inner {
                    let mut parts = operands(method);
                    let Some(name) = parts.next() else { continue };
                    let (params, results) = self.signature(parts)?;
                    let ty = self.builder.callable(params, results);
                    methods.push(MethodDef::new(name.as_str(), ty));
                }
                TypeKind::Interface(methods)
            }
            Rule::record => {
                let mut fields = Vec::new();
                for field in inner {
                    self.field(field, &mut fields)?;
                }
                TypeKind::Record(fields)
            }
            other => {
                return Err(SchemaError::Syntax {
                    message: format!("unexpected {}", rule_name(&other)),
                    span,
                });
            }
        };
        Ok(kind)
    }

    /// Params and results following a `func` keyword or a method name.
    fn signature(
        &mut self,
        mut parts: impl Iterator<Item = Pair<'i, Rule>>,
    ) -> Result<(Vec<TypeId>, Vec<TypeId>), SchemaError> {
        let params = match parts.next() {
            Some(params) => self.type_list(params)?,
            None => Vec::new(),
        };
        let results = match parts.next().and_then(|r| r.into_inner().next()) {
            Some(list) if list.as_rule() == Rule::params => self.type_list(list)?,
            Some(single) => vec![self.type_of(single)?],
            None => Vec::new(),
        };
        Ok((params, results))
    }

    fn type_list(&mut self, params: Pair<'i, Rule>) -> Result<Vec<TypeId>, SchemaError> {
        params.into_inner().map(|p| self.type_of(p)).collect()
    }

    fn field(&mut self, pair: Pair<'i, Rule>, out: &mut Vec<FieldDef>) -> Result<(), SchemaError> {
        let mut parts = pair.into_inner();
        let Some(head) = parts.next() else {
            return Ok(());
        };
        let mut rest: Vec<Pair<'i, Rule>> = parts.collect();
        let tag = match rest.last() {
            Some(last) if last.as_rule() == Rule::tag => rest.pop().map(tag_text),
            _ => None,
        };

        let with_tag = |def: FieldDef| match &tag {
            Some(tag) => def.with_tag(tag.clone()),
            None => def,
        };

        match head.as_rule() {
            Rule::embedded => {
                let ty = self.resolve(&head)?;
                let full = head.as_str();
                let name = full.rsplit('.').next().unwrap_or(full);
                out.push(with_tag(FieldDef::embedded(name, ty)));
            }
            _ => {
                let Some(expr) = rest.pop() else {
                    return Ok(());
                };
                let ty = self.type_of(expr)?;
                for name in head.into_inner() {
                    out.push(with_tag(FieldDef::new(name.as_str(), ty)));
                }
            }
        }
        Ok(())
    }

    /// Id of the type named by a `named` or `embedded` pair.
    fn resolve(&mut self, pair: &Pair<'i, Rule>) -> Result<TypeId, SchemaError> {
        let name = pair.as_str().trim();
        if let Some(&id) = self.names.get(name) {
            return Ok(id);
        }
        if let Some(p) = Primitive::from_name(name) {
            return Ok(self.builder.primitive(p));
        }
        match name {
            "any" => Ok(self.builder.interface([])),
            "error" => {
                let string = self.builder.primitive(Primitive::String);
                let method = self.builder.callable([], [string]);
                let id = self
                    .builder
                    .named("error", TypeKind::Interface(vec![MethodDef::new("Error", method)]))
                    .map_err(|source| SchemaError::Build {
                        source,
                        span: Some(to_range(pair)),
                    })?;
                self.names.insert("error", id);
                Ok(id)
            }
            _ => Err(SchemaError::UnknownType {
                name: name.to_string(),
                span: to_range(pair),
            }),
        }
    }
}

/// Inner pairs without keyword tokens.
fn operands<'i>(pair: Pair<'i, Rule>) -> impl Iterator<Item = Pair<'i, Rule>> {
    pair.into_inner().filter(|p| {
        !matches!(
            p.as_rule(),
            Rule::kw_type
                | Rule::kw_map
                | Rule::kw_chan
                | Rule::kw_func
                | Rule::kw_interface
                | Rule::kw_struct
        )
    })
}

fn tag_text(pair: Pair<'_, Rule>) -> String {
    let Some(inner) = pair.into_inner().next() else {
        return String::new();
    };
    match inner.as_rule() {
        Rule::quoted_tag => unescape(inner.as_str()),
        _ => inner.as_str().to_string(),
    }
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn to_range(pair: &Pair<'_, Rule>) -> Range<usize> {
    let span = pair.as_span();
    span.start()..span.end()
}

/// Declared name a build error is about.
fn build_subject(err: &BuildError) -> Option<&str> {
    match err {
        BuildError::DuplicateName { name }
        | BuildError::Undefined { name }
        | BuildError::AlreadyDefined { name }
        | BuildError::InfiniteSize { name }
        | BuildError::SizeOverflow { name } => Some(name.as_str()),
        BuildError::DuplicateField { record, .. } => Some(record.as_str()),
        BuildError::DuplicateMethod { interface, .. }
        | BuildError::MethodNotCallable { interface, .. } => Some(interface.as_str()),
        BuildError::UnknownId { .. } => None,
    }
}

fn rule_name(rule: &Rule) -> String {
    match rule {
        Rule::EOI => "end of input",
        Rule::decl => "type declaration",
        Rule::ident | Rule::named | Rule::embedded | Rule::names => "identifier",
        Rule::integer => "array length",
        Rule::pointer
        | Rule::slice
        | Rule::array
        | Rule::map
        | Rule::send_chan
        | Rule::recv_chan
        | Rule::chan
        | Rule::func
        | Rule::interface
        | Rule::record => "type",
        Rule::params => "parameter list",
        Rule::results => "result list",
        Rule::method => "method",
        Rule::field => "field",
        Rule::tag | Rule::raw_tag | Rule::quoted_tag => "tag",
        Rule::kw_type => "`type`",
        Rule::kw_map => "`map`",
        Rule::kw_chan => "`chan`",
        Rule::kw_func => "`func`",
        Rule::kw_interface => "`interface`",
        Rule::kw_struct => "`struct`",
        Rule::schema => "schema",
        _ => "token",
    }
    .to_string()
}

fn syntax_error(err: pest::error::Error<Rule>) -> SchemaError {
    let span = match err.location {
        InputLocation::Pos(pos) => pos..pos,
        InputLocation::Span((start, end)) => start..end,
    };
    let err = err.renamed_rules(rule_name);
    SchemaError::Syntax {
        message: err.variant.message().into_owned(),
        span,
    }
}
