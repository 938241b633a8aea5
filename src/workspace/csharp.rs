//! C# document indexing
//!
//! One pass per document producing a plain-data model: every declared type
//! (with its base-list identifier tokens) plus an index of identifier
//! occurrences. Identifiers in name position of a declaration are not
//! occurrences, so a type's own declaration never counts as a usage of it.

use crate::model::Span;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use tree_sitter::{Node, Parser};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeDeclKind {
    Class,
    Struct,
    Interface,
    Record,
    Enum,
}

#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeDeclKind,
    pub name: String,
    pub arity: usize,
    pub qualname: String,
    pub name_span: Span,
    pub span: Span,
    pub base_idents: Vec<String>,
}

#[derive(Debug, Default)]
pub struct DocumentIndex {
    pub types: Vec<TypeDecl>,
    pub idents: HashMap<String, Vec<Span>>,
}

impl DocumentIndex {
    pub fn occurrences(&self, name: &str) -> &[Span] {
        self.idents.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Clone)]
struct Context {
    namespace_stack: Vec<String>,
    type_stack: Vec<String>,
}

pub struct CSharpIndexer {
    parser: Parser,
}

impl CSharpIndexer {
    pub fn new() -> Result<Self> {
        let mut parser = Parser::new();
        let language = tree_sitter_c_sharp::LANGUAGE;
        parser.set_language(&language.into())?;
        Ok(Self { parser })
    }

    pub fn index(&mut self, source: &str) -> Result<DocumentIndex> {
        let tree = self
            .parser
            .parse(source, None)
            .ok_or_else(|| anyhow!("syntax tree unavailable"))?;
        let root = tree.root_node();
        let mut output = DocumentIndex::default();
        let ctx = Context {
            namespace_stack: Vec::new(),
            type_stack: Vec::new(),
        };
        if root.kind() == "compilation_unit" {
            walk_compilation_unit(root, &ctx, source, &mut output);
        } else {
            walk_node(root, &ctx, source, &mut output);
        }
        Ok(output)
    }
}

fn walk_compilation_unit(node: Node<'_>, ctx: &Context, source: &str, output: &mut DocumentIndex) {
    let mut file_ns_name = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "file_scoped_namespace_declaration" {
            file_ns_name = namespace_name(child, source);
            break;
        }
    }

    let mut next_ctx = ctx.clone();
    if let Some(name) = file_ns_name {
        next_ctx.namespace_stack = namespace_parts(&name);
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "file_scoped_namespace_declaration" {
            let name_id = child.child_by_field_name("name").map(|n| n.id());
            let mut inner = child.walk();
            for member in child.named_children(&mut inner) {
                if Some(member.id()) == name_id {
                    continue;
                }
                walk_node(member, &next_ctx, source, output);
            }
            continue;
        }
        walk_node(child, &next_ctx, source, output);
    }
}

fn walk_node(node: Node<'_>, ctx: &Context, source: &str, output: &mut DocumentIndex) {
    match node.kind() {
        "namespace_declaration" => {
            handle_namespace(node, ctx, source, output);
            return;
        }
        "class_declaration" => {
            handle_type(node, ctx, source, output, TypeDeclKind::Class);
            return;
        }
        "struct_declaration" => {
            handle_type(node, ctx, source, output, TypeDeclKind::Struct);
            return;
        }
        "interface_declaration" => {
            handle_type(node, ctx, source, output, TypeDeclKind::Interface);
            return;
        }
        "record_declaration" => {
            handle_type(node, ctx, source, output, TypeDeclKind::Record);
            return;
        }
        "enum_declaration" => {
            handle_type(node, ctx, source, output, TypeDeclKind::Enum);
            return;
        }
        "identifier" => {
            if !is_declaration_name(node) {
                record_ident(node, source, output);
            }
            return;
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk_node(child, ctx, source, output);
    }
}

fn handle_namespace(node: Node<'_>, ctx: &Context, source: &str, output: &mut DocumentIndex) {
    let Some(name) = namespace_name(node, source) else {
        return;
    };
    let parts = namespace_parts(&name);
    if parts.is_empty() {
        return;
    }
    let mut next_ctx = ctx.clone();
    next_ctx.namespace_stack.extend(parts);
    if let Some(body) = node.child_by_field_name("body") {
        walk_children(body, &next_ctx, source, output);
    }
}

fn handle_type(
    node: Node<'_>,
    ctx: &Context,
    source: &str,
    output: &mut DocumentIndex,
    kind: TypeDeclKind,
) {
    let Some(name_node) = node.child_by_field_name("name") else {
        return;
    };
    let name = node_text(name_node, source);
    if name.is_empty() {
        return;
    }
    let qualname = build_qualname(ctx, &name);
    output.types.push(TypeDecl {
        kind,
        name: name.clone(),
        arity: type_arity(node),
        qualname,
        name_span: span(name_node),
        span: span(node),
        base_idents: base_list_identifiers(node, source),
    });

    let mut next_ctx = ctx.clone();
    next_ctx.type_stack.push(name);
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.id() == name_node.id() || child.kind() == "type_parameter_list" {
            continue;
        }
        if child.kind() == "declaration_list" || child.kind() == "enum_member_declaration_list" {
            walk_children(child, &next_ctx, source, output);
        } else {
            walk_node(child, ctx, source, output);
        }
    }
}

fn walk_children(node: Node<'_>, ctx: &Context, source: &str, output: &mut DocumentIndex) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        walk_node(child, ctx, source, output);
    }
}

fn record_ident(node: Node<'_>, source: &str, output: &mut DocumentIndex) {
    let text = node_text(node, source);
    if text.is_empty() {
        return;
    }
    output.idents.entry(text).or_default().push(span(node));
}

fn is_declaration_name(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    let is_name_field = parent
        .child_by_field_name("name")
        .map(|name| name.id() == node.id())
        .unwrap_or(false);
    if !is_name_field {
        return false;
    }
    matches!(
        parent.kind(),
        "class_declaration"
            | "struct_declaration"
            | "interface_declaration"
            | "record_declaration"
            | "enum_declaration"
            | "delegate_declaration"
            | "method_declaration"
            | "local_function_statement"
            | "constructor_declaration"
            | "destructor_declaration"
            | "property_declaration"
            | "event_declaration"
            | "indexer_declaration"
            | "enum_member_declaration"
            | "parameter"
            | "type_parameter"
            | "variable_declarator"
            | "namespace_declaration"
            | "file_scoped_namespace_declaration"
            | "using_directive"
    )
}

fn base_list_identifiers(node: Node<'_>, source: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "base_list" {
            collect_base_idents(child, source, &mut out);
        }
    }
    out
}

fn collect_base_idents(node: Node<'_>, source: &str, out: &mut Vec<String>) {
    if node.kind() == "argument_list" {
        return;
    }
    if node.kind() == "identifier" {
        let text = node_text(node, source);
        if !text.is_empty() {
            out.push(text);
        }
        return;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect_base_idents(child, source, out);
    }
}

fn type_arity(node: Node<'_>) -> usize {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() == "type_parameter_list" {
            let mut inner = child.walk();
            return child
                .named_children(&mut inner)
                .filter(|param| param.kind() == "type_parameter")
                .count();
        }
    }
    0
}

fn namespace_name(node: Node<'_>, source: &str) -> Option<String> {
    node.child_by_field_name("name")
        .map(|n| node_text(n, source))
        .filter(|value| !value.is_empty())
}

fn namespace_parts(name: &str) -> Vec<String> {
    let normalized = name.replace("::", ".");
    normalized
        .split('.')
        .filter(|part| !part.trim().is_empty())
        .map(|part| part.trim().to_string())
        .collect()
}

fn build_qualname(ctx: &Context, name: &str) -> String {
    let mut parts = Vec::new();
    if !ctx.namespace_stack.is_empty() {
        parts.push(ctx.namespace_stack.join("."));
    }
    if !ctx.type_stack.is_empty() {
        parts.push(ctx.type_stack.join("."));
    }
    parts.push(name.to_string());
    parts.join(".")
}

fn span(node: Node<'_>) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span {
        start_line: start.row as i64 + 1,
        start_col: start.column as i64 + 1,
        end_line: end.row as i64 + 1,
        end_col: end.column as i64 + 1,
        start_byte: node.start_byte() as i64,
        end_byte: node.end_byte() as i64,
    }
}

fn node_text(node: Node<'_>, source: &str) -> String {
    let start = node.start_byte();
    let end = node.end_byte();
    source.get(start..end).unwrap_or("").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{CSharpIndexer, TypeDeclKind};

    #[test]
    fn indexes_types_with_bases_and_arity() {
        let source = r#"
namespace Billing.Application {
    public class ChargeCommandHandler : IRequestHandler<ChargeCommand, bool> {
        public Task<bool> Handle(ChargeCommand request) { return Task.FromResult(true); }
    }
    public record PagedQuery<T>(int Page);
}
"#;
        let mut indexer = CSharpIndexer::new().unwrap();
        let index = indexer.index(source).unwrap();

        let handler = index
            .types
            .iter()
            .find(|t| t.name == "ChargeCommandHandler")
            .unwrap();
        assert_eq!(handler.kind, TypeDeclKind::Class);
        assert_eq!(handler.qualname, "Billing.Application.ChargeCommandHandler");
        assert!(handler.base_idents.contains(&"IRequestHandler".to_string()));
        assert!(handler.base_idents.contains(&"ChargeCommand".to_string()));

        let paged = index.types.iter().find(|t| t.name == "PagedQuery").unwrap();
        assert_eq!(paged.kind, TypeDeclKind::Record);
        assert_eq!(paged.arity, 1);
    }

    #[test]
    fn declaration_names_are_not_occurrences() {
        let source = r#"
namespace Billing.Application;

public class ChargeCommand {
    public ChargeCommand() {}
    public static ChargeCommand Empty() { return new ChargeCommand(); }
}
"#;
        let mut indexer = CSharpIndexer::new().unwrap();
        let index = indexer.index(source).unwrap();
        assert_eq!(index.types.len(), 1);
        assert_eq!(index.types[0].qualname, "Billing.Application.ChargeCommand");
        // return type and object creation, but neither the class nor the
        // constructor declaration name
        assert_eq!(index.occurrences("ChargeCommand").len(), 2);
    }
}
