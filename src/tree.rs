//! Arena element tree and the post-order tree rewriter.
//!
//! Nodes live in a `Vec` and are addressed by [`NodeId`]. A node may only
//! reference nodes created after it, so visiting ids in reverse creation order
//! is a post-order traversal: by the time an element is lowered, every element
//! below it has already been overwritten with its lowered token.
//!
//! Rules:
//! 1. The root (id 0) is a [`NodeKind::Code`] node.
//! 2. `parent` links drive scope resolution; structural references (code parts,
//!    attribute values, children) drive rewriting.
//! 3. Each element slot is consumed exactly once and overwritten in place.

use crate::attributes::{Attribute, AttributeValue};
use crate::children::Child;
use crate::error::{LowerError, LowerErrorKind, LowerResult};
use crate::lowerer::{Element, ElementLowerer, Lowered, TagName};
use crate::options::Config;
use crate::scope::{resolve_scope, ScopeDecl, ScopeMetadata};
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub const ROOT: NodeId = NodeId(0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODES
// ═══════════════════════════════════════════════════════════════════════════════

/// Part of an opaque host expression: host text/tokens interleaved with nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum CodePart<T> {
    Token(T),
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeSlot {
    Absent,
    StringLiteral(String),
    /// Expression container; refers to a code node.
    Expression(NodeId),
    EmptyExpression,
    /// Spread argument; refers to a code node.
    Spread(NodeId),
    /// Nested element used as a value.
    Element(NodeId),
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeNode {
    /// `None` for spread attributes.
    pub name: Option<String>,
    pub value: AttributeSlot,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChildNode {
    Text { text: String, span: Span },
    /// Expression container; refers to a code node.
    Expression { node: NodeId, span: Span },
    Element(NodeId),
    Other { kind: String, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub tag: TagName,
    pub attributes: Vec<AttributeNode>,
    pub children: Vec<ChildNode>,
    pub has_closing_tag: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind<T> {
    Code(Vec<CodePart<T>>),
    Scope(ScopeDecl),
    Element(ElementNode),
    Lowered(T),
    /// Taken by the rewriter; never observable after a successful rewrite.
    Consumed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub parent: Option<NodeId>,
    pub span: Span,
    pub kind: NodeKind<T>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TREE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct ElementTree<T> {
    nodes: Vec<Node<T>>,
}

impl<T> ElementTree<T> {
    /// A tree whose root code node spans `span`.
    pub fn new(span: Span) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                span,
                kind: NodeKind::Code(Vec::new()),
            }],
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.nodes.get(id.0)
    }

    fn push(&mut self, parent: NodeId, span: Span, kind: NodeKind<T>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            span,
            kind,
        });
        id
    }

    pub fn add_code(&mut self, parent: NodeId, span: Span) -> NodeId {
        self.push(parent, span, NodeKind::Code(Vec::new()))
    }

    pub fn add_scope(&mut self, parent: NodeId, span: Span, decl: ScopeDecl) -> NodeId {
        self.push(parent, span, NodeKind::Scope(decl))
    }

    pub fn add_element(&mut self, parent: NodeId, span: Span, element: ElementNode) -> NodeId {
        self.push(parent, span, NodeKind::Element(element))
    }

    /// Replace the parts of a code node.
    pub fn set_code(&mut self, id: NodeId, parts: Vec<CodePart<T>>) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.kind = NodeKind::Code(parts);
        }
    }

    /// Mutable access to an element under construction.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementNode> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    /// Parent chain of `id`, innermost first, excluding `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_, T> {
        Ancestors {
            tree: self,
            next: self.get(id).and_then(|n| n.parent),
        }
    }

    /// Classify the nearest enclosing declaration of `id`.
    pub fn scope_of(&self, id: NodeId) -> ScopeMetadata {
        resolve_scope(self.ancestors(id).map(|node| match &node.kind {
            NodeKind::Scope(decl) => Some(decl),
            _ => None,
        }))
    }
}

pub struct Ancestors<'t, T> {
    tree: &'t ElementTree<T>,
    next: Option<NodeId>,
}

impl<'t, T> Iterator for Ancestors<'t, T> {
    type Item = &'t Node<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tree.get(self.next?)?;
        self.next = node.parent;
        Some(node)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// HOST
// ═══════════════════════════════════════════════════════════════════════════════

/// What the rewriter needs from the host that owns the opaque tokens.
pub trait Host {
    type Token;

    /// Join the parts of one code node into a single token.
    fn splice(&self, parts: Vec<Self::Token>) -> Self::Token;

    /// Turn a lowered element into the token that replaces it.
    fn emit(&self, lowered: Lowered<Self::Token>) -> Self::Token;
}

// ═══════════════════════════════════════════════════════════════════════════════
// REWRITER
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub struct RewriteOutput<T> {
    pub root: T,
    pub elements_lowered: usize,
}

pub struct TreeRewriter<'h, H: Host> {
    host: &'h H,
    config: &'h Config<H::Token>,
}

impl<'h, H: Host> TreeRewriter<'h, H> {
    pub fn new(host: &'h H, config: &'h Config<H::Token>) -> Self {
        Self { host, config }
    }

    /// Rewrite every element of `tree` and return the spliced root token.
    ///
    /// Fails on the first lowering error; the error span names the innermost
    /// offending node, falling back to the failing element.
    pub fn rewrite(&self, mut tree: ElementTree<H::Token>) -> LowerResult<RewriteOutput<H::Token>> {
        let lowerer = ElementLowerer::new(self.config);
        let mut elements_lowered = 0;

        for index in (0..tree.nodes.len()).rev() {
            let id = NodeId(index);
            let span = tree.nodes[index].span;
            let kind = std::mem::replace(&mut tree.nodes[index].kind, NodeKind::Consumed);
            let replacement = match kind {
                NodeKind::Code(parts) => {
                    let tokens = parts
                        .into_iter()
                        .map(|part| match part {
                            CodePart::Token(token) => Ok(token),
                            CodePart::Node(child) => take_lowered(&mut tree, child, span),
                        })
                        .collect::<LowerResult<Vec<_>>>()?;
                    NodeKind::Lowered(self.host.splice(tokens))
                }
                NodeKind::Element(element) => {
                    let scope = tree.scope_of(id);
                    let element = resolve_element(&mut tree, element, span)?;
                    let lowered = lowerer.lower(element, &scope)?;
                    elements_lowered += 1;
                    NodeKind::Lowered(self.host.emit(lowered))
                }
                other => other,
            };
            tree.nodes[index].kind = replacement;
        }

        match std::mem::replace(&mut tree.nodes[0].kind, NodeKind::Consumed) {
            NodeKind::Lowered(root) => Ok(RewriteOutput {
                root,
                elements_lowered,
            }),
            _ => Err(LowerError::at(
                LowerErrorKind::InternalOrderingError {
                    tag: "<root>".to_string(),
                },
                tree.nodes[0].span,
            )),
        }
    }
}

/// Take the lowered token of `id`. A node that is still an element was
/// referenced before it could be lowered.
fn take_lowered<T>(tree: &mut ElementTree<T>, id: NodeId, referrer: Span) -> LowerResult<T> {
    let Some(node) = tree.nodes.get_mut(id.0) else {
        return Err(LowerError::at(
            LowerErrorKind::InternalOrderingError {
                tag: format!("#{}", id.0),
            },
            referrer,
        ));
    };
    match std::mem::replace(&mut node.kind, NodeKind::Consumed) {
        NodeKind::Lowered(token) => Ok(token),
        other => {
            let tag = match &other {
                NodeKind::Element(element) => element.tag.to_string(),
                _ => format!("#{}", id.0),
            };
            let span = node.span;
            node.kind = other;
            Err(LowerError::at(
                LowerErrorKind::InternalOrderingError { tag },
                span,
            ))
        }
    }
}

/// Turn an arena element into lowerer input, taking the tokens of its
/// already-rewritten attribute values and children.
fn resolve_element<T>(
    tree: &mut ElementTree<T>,
    element: ElementNode,
    span: Span,
) -> LowerResult<Element<T>> {
    let mut attributes = Vec::with_capacity(element.attributes.len());
    for attr in element.attributes {
        let value = match attr.value {
            AttributeSlot::Spread(node) => {
                attributes.push(Attribute::Spread {
                    argument: take_lowered(tree, node, attr.span)?,
                    span: attr.span,
                });
                continue;
            }
            AttributeSlot::Absent => AttributeValue::Absent,
            AttributeSlot::StringLiteral(s) => AttributeValue::StringLiteral(s),
            AttributeSlot::Expression(node) => {
                AttributeValue::Expression(take_lowered(tree, node, attr.span)?)
            }
            AttributeSlot::EmptyExpression => AttributeValue::EmptyExpression,
            AttributeSlot::Element(node) => {
                AttributeValue::Element(take_lowered(tree, node, attr.span)?)
            }
            AttributeSlot::Other(kind) => AttributeValue::Other(kind),
        };
        attributes.push(Attribute::named(
            attr.name.unwrap_or_default(),
            value,
            attr.span,
        ));
    }

    let mut children = Vec::with_capacity(element.children.len());
    for child in element.children {
        children.push(match child {
            ChildNode::Text { text, span } => Child::Text { text, span },
            ChildNode::Expression { node, span } => Child::Expression {
                value: take_lowered(tree, node, span)?,
                span,
            },
            ChildNode::Element(node) => {
                let child_span = tree.get(node).map(|n| n.span).unwrap_or(span);
                match take_lowered(tree, node, child_span) {
                    Ok(value) => Child::Lowered {
                        value,
                        span: child_span,
                    },
                    Err(LowerError {
                        kind: LowerErrorKind::InternalOrderingError { tag },
                        ..
                    }) => Child::RawElement {
                        tag,
                        span: child_span,
                    },
                    Err(e) => return Err(e),
                }
            }
            ChildNode::Other { kind, span } => Child::Other { kind, span },
        });
    }

    Ok(Element {
        tag: element.tag,
        attributes,
        children,
        has_closing_tag: element.has_closing_tag,
        span,
    })
}
