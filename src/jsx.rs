//! JSX/TSX source host.
//!
//! Parses a module with oxc, mirrors its JSX elements and enclosing
//! declarations into an [`ElementTree`] whose tokens are source-text
//! snippets, rewrites the tree, and splices the lowered calls back into the
//! source text. Everything outside JSX elements is kept byte-for-byte.

use crate::emit;
use crate::error::{ConfigError, Diagnostic, SYNTAX_ERROR_CODE};
use crate::lowerer::{Lowered, TagName};
use crate::options::{CompileOptions, Config};
use crate::scope::{ClassScope, FunctionScope, ScopeDecl};
use crate::span::Span;
use crate::tree::{
    AttributeNode, AttributeSlot, ChildNode, CodePart, ElementNode, ElementTree, Host, NodeId,
    TreeRewriter,
};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::{walk, Visit};
use oxc_parser::Parser;
use oxc_span::{GetSpan, SourceType};
use oxc_syntax::scope::ScopeFlags;
use std::collections::{HashMap, HashSet};

// ═══════════════════════════════════════════════════════════════════════════════
// STRING HOST
// ═══════════════════════════════════════════════════════════════════════════════

/// Host whose tokens are JavaScript source text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceHost;

impl Host for SourceHost {
    type Token = String;

    fn splice(&self, parts: Vec<String>) -> String {
        parts.concat()
    }

    fn emit(&self, lowered: Lowered<String>) -> String {
        emit::lowered(&lowered)
    }
}

/// Resolve serialisable options, installing the requested built-in transforms.
pub fn config_from_options(options: &CompileOptions) -> Result<Config<String>, ConfigError> {
    let mut config = Config::from_options(options)?;
    for builtin in options.attribute_transforms.iter().copied() {
        config = config.with_attribute_transform(move |attr| builtin.apply(attr));
    }
    Ok(config)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    pub code: String,
    pub elements_lowered: usize,
}

/// Lower every JSX element in `source` and prepend the template import.
///
/// Fails on the first error; no partial output is produced.
pub fn transform(
    source: &str,
    filename: &str,
    config: &Config<String>,
) -> Result<TransformOutput, Diagnostic> {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_typescript(true)
        .with_module(true)
        .with_jsx(true);

    let ret = Parser::new(&allocator, source, source_type).parse();
    if let Some(error) = ret.errors.first() {
        let span = error
            .labels
            .as_ref()
            .and_then(|labels| labels.first())
            .map(|label| Span::new(label.offset() as u32, (label.offset() + label.len()) as u32))
            .unwrap_or_default();
        let diagnostic = Diagnostic::new(
            SYNTAX_ERROR_CODE,
            format!("invalid syntax: {}", error.message),
            filename,
            source,
            span,
        );
        eprintln!("[jsx2ttl] Failed to parse {}", diagnostic);
        return Err(diagnostic);
    }
    let program = ret.program;

    let import_offset = program
        .directives
        .iter()
        .map(|d| d.span.end)
        .chain(program.hashbang.as_ref().map(|h| h.span.end))
        .max()
        .unwrap_or(0) as usize;

    let mut builder = TreeBuilder::new(source);
    builder.visit_program(&program);
    let tree = builder.finish();

    let host = SourceHost;
    let output = TreeRewriter::new(&host, config)
        .rewrite(tree)
        .map_err(|error| {
            let fallback = Span::new(0, source.len() as u32);
            let diagnostic = Diagnostic::from_lower_error(&error, filename, source, fallback);
            eprintln!("[jsx2ttl] Error processing JSX element at {}", diagnostic);
            diagnostic
        })?;

    let import = emit::import_statement(config);
    let code = if import_offset == 0 {
        format!("{}\n{}", import, output.root)
    } else {
        let (head, tail) = output.root.split_at(import_offset.min(output.root.len()));
        format!("{}\n{}{}", head, import, tail)
    };

    Ok(TransformOutput {
        code,
        elements_lowered: output.elements_lowered,
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// TREE BUILDER
// ═══════════════════════════════════════════════════════════════════════════════

struct CodeFrame {
    id: NodeId,
    span: Span,
    saved_parent: NodeId,
    /// Outermost elements directly inside this code span.
    holes: Vec<(Span, NodeId)>,
}

/// Mirrors the oxc AST into an [`ElementTree`].
///
/// Functions, arrows and classes become scope nodes. JSX elements become
/// element nodes. The program, every expression container and every spread
/// argument become code nodes, cut at the spans of the elements they contain.
struct TreeBuilder<'s> {
    source: &'s str,
    tree: ElementTree<String>,
    parent: NodeId,
    code_stack: Vec<CodeFrame>,
    /// Initialiser start offset → name of the variable it is bound to.
    binding_names: HashMap<u32, String>,
    /// Start offsets of functions that are class or object methods.
    method_functions: HashSet<u32>,
}

impl<'s> TreeBuilder<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            tree: ElementTree::new(Span::new(0, source.len() as u32)),
            parent: NodeId::ROOT,
            code_stack: Vec::new(),
            binding_names: HashMap::new(),
            method_functions: HashSet::new(),
        }
    }

    fn finish(self) -> ElementTree<String> {
        self.tree
    }

    fn text(&self, span: Span) -> &'s str {
        span.source_text(self.source)
    }

    // ─── code containers ───────────────────────────────────────────────────────

    fn open_code(&mut self, id: NodeId, span: Span) {
        self.code_stack.push(CodeFrame {
            id,
            span,
            saved_parent: self.parent,
            holes: Vec::new(),
        });
        self.parent = id;
    }

    fn close_code(&mut self) {
        let Some(mut frame) = self.code_stack.pop() else {
            return;
        };
        frame.holes.sort_by_key(|(span, _)| span.start);

        let mut parts = Vec::with_capacity(frame.holes.len() * 2 + 1);
        let mut cursor = frame.span.start;
        for (span, id) in frame.holes {
            if span.start > cursor {
                parts.push(CodePart::Token(
                    self.text(Span::new(cursor, span.start)).to_string(),
                ));
            }
            parts.push(CodePart::Node(id));
            cursor = span.end;
        }
        if cursor < frame.span.end {
            parts.push(CodePart::Token(
                self.text(Span::new(cursor, frame.span.end)).to_string(),
            ));
        }

        self.tree.set_code(frame.id, parts);
        self.parent = frame.saved_parent;
    }

    /// Mirror one embedded expression as a code node.
    fn build_code(&mut self, expr: &Expression<'_>) -> NodeId {
        let span = Span::from(expr.span());
        let id = self.tree.add_code(self.parent, span);
        self.open_code(id, span);
        self.visit_expression(expr);
        self.close_code();
        id
    }

    fn register_hole(&mut self, span: Span, id: NodeId) {
        if let Some(frame) = self.code_stack.last_mut() {
            frame.holes.push((span, id));
        }
    }

    // ─── scopes ────────────────────────────────────────────────────────────────

    fn enter_scope(&mut self, span: Span, decl: ScopeDecl) -> NodeId {
        let saved = self.parent;
        self.parent = self.tree.add_scope(saved, span, decl);
        saved
    }

    fn leave_scope(&mut self, saved: NodeId) {
        self.parent = saved;
    }

    fn binding_name(&self, start: u32) -> Option<String> {
        self.binding_names.get(&start).cloned()
    }

    // ─── elements ──────────────────────────────────────────────────────────────

    fn build_element(&mut self, element: &JSXElement<'_>) -> NodeId {
        let node = ElementNode {
            tag: tag_name(&element.opening_element.name),
            attributes: Vec::new(),
            children: Vec::new(),
            has_closing_tag: element.closing_element.is_some(),
        };
        let id = self.tree.add_element(self.parent, element.span.into(), node);
        let saved = self.parent;
        self.parent = id;

        let attributes: Vec<AttributeNode> = element
            .opening_element
            .attributes
            .iter()
            .map(|item| self.build_attribute(item))
            .collect();
        let children = self.build_children(&element.children);

        self.parent = saved;
        if let Some(node) = self.tree.element_mut(id) {
            node.attributes = attributes;
            node.children = children;
        }
        id
    }

    fn build_fragment(&mut self, fragment: &JSXFragment<'_>) -> NodeId {
        let node = ElementNode {
            tag: TagName::Fragment,
            attributes: Vec::new(),
            children: Vec::new(),
            has_closing_tag: true,
        };
        let id = self.tree.add_element(self.parent, fragment.span.into(), node);
        let saved = self.parent;
        self.parent = id;
        let children = self.build_children(&fragment.children);
        self.parent = saved;
        if let Some(node) = self.tree.element_mut(id) {
            node.children = children;
        }
        id
    }

    fn build_attribute(&mut self, item: &JSXAttributeItem<'_>) -> AttributeNode {
        match item {
            JSXAttributeItem::Attribute(attr) => {
                let name = match &attr.name {
                    JSXAttributeName::Identifier(id) => id.name.to_string(),
                    JSXAttributeName::NamespacedName(ns) => {
                        format!("{}:{}", ns.namespace.name, ns.name.name)
                    }
                };
                let value = match &attr.value {
                    None => AttributeSlot::Absent,
                    Some(JSXAttributeValue::StringLiteral(s)) => {
                        AttributeSlot::StringLiteral(s.value.to_string())
                    }
                    Some(JSXAttributeValue::ExpressionContainer(container)) => {
                        match container.expression.as_expression() {
                            Some(expr) => AttributeSlot::Expression(self.build_code(expr)),
                            None => AttributeSlot::EmptyExpression,
                        }
                    }
                    Some(JSXAttributeValue::Element(el)) => {
                        AttributeSlot::Element(self.build_element(el))
                    }
                    Some(JSXAttributeValue::Fragment(frag)) => {
                        AttributeSlot::Element(self.build_fragment(frag))
                    }
                };
                AttributeNode {
                    name: Some(name),
                    value,
                    span: attr.span.into(),
                }
            }
            JSXAttributeItem::SpreadAttribute(spread) => AttributeNode {
                name: None,
                value: AttributeSlot::Spread(self.build_code(&spread.argument)),
                span: spread.span.into(),
            },
        }
    }

    fn build_children(&mut self, children: &[JSXChild<'_>]) -> Vec<ChildNode> {
        let mut nodes = Vec::with_capacity(children.len());
        for child in children {
            match child {
                JSXChild::Text(t) => nodes.push(ChildNode::Text {
                    text: t.value.to_string(),
                    span: t.span.into(),
                }),
                JSXChild::Element(el) => nodes.push(ChildNode::Element(self.build_element(el))),
                JSXChild::Fragment(frag) => {
                    nodes.push(ChildNode::Element(self.build_fragment(frag)))
                }
                JSXChild::ExpressionContainer(container) => {
                    // `{/* comment */}` renders nothing.
                    if let Some(expr) = container.expression.as_expression() {
                        let node = self.build_code(expr);
                        nodes.push(ChildNode::Expression {
                            node,
                            span: container.span.into(),
                        });
                    }
                }
                JSXChild::Spread(spread) => nodes.push(ChildNode::Other {
                    kind: "JSXSpreadChild".to_string(),
                    span: spread.span.into(),
                }),
            }
        }
        nodes
    }

    fn class_scope(&self, class: &Class<'_>) -> ClassScope {
        let name = class
            .id
            .as_ref()
            .map(|id| id.name.to_string())
            .or_else(|| self.binding_name(class.span.start));

        let superclass_names = match &class.super_class {
            Some(Expression::Identifier(id)) => vec![id.name.to_string()],
            Some(Expression::ArrayExpression(array)) => array
                .elements
                .iter()
                .filter_map(|el| match el.as_expression() {
                    Some(Expression::Identifier(id)) => Some(id.name.to_string()),
                    _ => None,
                })
                .collect(),
            Some(Expression::StaticMemberExpression(member)) => {
                vec![self.text(member.span.into()).to_string()]
            }
            _ => Vec::new(),
        };

        let implemented_interface_names = class
            .implements
            .iter()
            .map(|implements| interface_name(self.text(implements.span.into())))
            .collect();

        ClassScope {
            name,
            superclass_names,
            implemented_interface_names,
        }
    }
}

impl<'a> Visit<'a> for TreeBuilder<'_> {
    fn visit_program(&mut self, program: &Program<'a>) {
        self.open_code(NodeId::ROOT, Span::new(0, self.source.len() as u32));
        walk::walk_program(self, program);
        self.close_code();
    }

    fn visit_jsx_element(&mut self, element: &JSXElement<'a>) {
        let id = self.build_element(element);
        self.register_hole(element.span.into(), id);
    }

    fn visit_jsx_fragment(&mut self, fragment: &JSXFragment<'a>) {
        let id = self.build_fragment(fragment);
        self.register_hole(fragment.span.into(), id);
    }

    fn visit_variable_declarator(&mut self, decl: &VariableDeclarator<'a>) {
        if let (BindingPattern::BindingIdentifier(id), Some(init)) = (&decl.id, &decl.init) {
            let start = match init {
                Expression::ArrowFunctionExpression(arrow) => Some(arrow.span.start),
                Expression::FunctionExpression(func) if func.id.is_none() => Some(func.span.start),
                Expression::ClassExpression(class) if class.id.is_none() => Some(class.span.start),
                _ => None,
            };
            if let Some(start) = start {
                self.binding_names.insert(start, id.name.to_string());
            }
        }
        walk::walk_variable_declarator(self, decl);
    }

    fn visit_method_definition(&mut self, method: &MethodDefinition<'a>) {
        self.method_functions.insert(method.value.span.start);
        walk::walk_method_definition(self, method);
    }

    fn visit_object_property(&mut self, property: &ObjectProperty<'a>) {
        if property.method || !matches!(property.kind, PropertyKind::Init) {
            if let Expression::FunctionExpression(func) = &property.value {
                self.method_functions.insert(func.span.start);
            }
        }
        walk::walk_object_property(self, property);
    }

    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        // Methods do not count as enclosing functions; the class (if any) does.
        if self.method_functions.contains(&func.span.start) {
            walk::walk_function(self, func, flags);
            return;
        }
        let name = func
            .id
            .as_ref()
            .map(|id| id.name.to_string())
            .or_else(|| self.binding_name(func.span.start));
        let saved = self.enter_scope(
            func.span.into(),
            ScopeDecl::Function(FunctionScope {
                name,
                is_arrow: false,
            }),
        );
        walk::walk_function(self, func, flags);
        self.leave_scope(saved);
    }

    fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        let saved = self.enter_scope(
            arrow.span.into(),
            ScopeDecl::Function(FunctionScope {
                name: self.binding_name(arrow.span.start),
                is_arrow: true,
            }),
        );
        walk::walk_arrow_function_expression(self, arrow);
        self.leave_scope(saved);
    }

    fn visit_class(&mut self, class: &Class<'a>) {
        let scope = self.class_scope(class);
        let saved = self.enter_scope(class.span.into(), ScopeDecl::Class(scope));
        walk::walk_class(self, class);
        self.leave_scope(saved);
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAMES
// ═══════════════════════════════════════════════════════════════════════════════

fn tag_name(name: &JSXElementName<'_>) -> TagName {
    match name {
        JSXElementName::Identifier(id) => TagName::Identifier(id.name.to_string()),
        JSXElementName::IdentifierReference(id) => TagName::Identifier(id.name.to_string()),
        JSXElementName::NamespacedName(ns) => TagName::Namespaced {
            namespace: ns.namespace.name.to_string(),
            name: ns.name.name.to_string(),
        },
        JSXElementName::MemberExpression(member) => {
            let mut segments = Vec::new();
            member_segments(member, &mut segments);
            TagName::Member(segments)
        }
        JSXElementName::ThisExpression(_) => TagName::Identifier("this".to_string()),
    }
}

fn member_segments(member: &JSXMemberExpression<'_>, segments: &mut Vec<String>) {
    match &member.object {
        JSXMemberExpressionObject::IdentifierReference(id) => segments.push(id.name.to_string()),
        JSXMemberExpressionObject::MemberExpression(inner) => member_segments(inner, segments),
        _ => segments.push("this".to_string()),
    }
    segments.push(member.property.name.to_string());
}

/// `Comparable<T>` → `Comparable`
fn interface_name(text: &str) -> String {
    text.split('<').next().unwrap_or(text).trim().to_string()
}
