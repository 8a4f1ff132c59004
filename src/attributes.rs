//! Attribute compilation.
//!
//! Component references receive their attributes as a properties map; plain
//! elements render them into the opening tag as static text and dynamic slots.

use crate::error::{LowerError, LowerErrorKind, LowerResult};
use crate::options::Config;
use crate::span::Span;
use crate::template::TemplateParts;

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue<T> {
    /// `<input disabled />`
    Absent,
    /// `id="main"`
    StringLiteral(String),
    /// `id={expr}`
    Expression(T),
    /// `id={}` or `id={/* comment */}`
    EmptyExpression,
    /// `icon=<Icon />`, already lowered.
    Element(T),
    /// A value kind the host could not map; carries the host's name for it.
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedAttribute<T> {
    /// Attribute name as written; namespaced names keep their colon (`xlink:href`).
    pub name: String,
    pub value: AttributeValue<T>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute<T> {
    Named(NamedAttribute<T>),
    /// `{...props}`
    Spread { argument: T, span: Span },
}

impl<T> Attribute<T> {
    pub fn named(name: impl Into<String>, value: AttributeValue<T>, span: Span) -> Self {
        Attribute::Named(NamedAttribute {
            name: name.into(),
            value,
            span,
        })
    }

    pub fn span(&self) -> Span {
        match self {
            Attribute::Named(attr) => attr.span,
            Attribute::Spread { span, .. } => *span,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROPERTIES MODE
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum PropValue<T> {
    String(String),
    Null,
    Expression(T),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropEntry<T> {
    Property { key: String, value: PropValue<T> },
    Spread(T),
}

/// Build the properties map passed to a component.
pub fn compile_props<T>(attributes: Vec<Attribute<T>>) -> LowerResult<Vec<PropEntry<T>>> {
    attributes
        .into_iter()
        .map(|attribute| match attribute {
            Attribute::Named(attr) => {
                let value = match attr.value {
                    AttributeValue::Absent | AttributeValue::EmptyExpression => PropValue::Null,
                    AttributeValue::StringLiteral(s) => PropValue::String(s),
                    AttributeValue::Expression(e) | AttributeValue::Element(e) => {
                        PropValue::Expression(e)
                    }
                    AttributeValue::Other(kind) => {
                        return Err(LowerError::at(
                            LowerErrorKind::UnsupportedAttributeValueKind { kind },
                            attr.span,
                        ))
                    }
                };
                Ok(PropEntry::Property {
                    key: attr.name,
                    value,
                })
            }
            Attribute::Spread { argument, .. } => Ok(PropEntry::Spread(argument)),
        })
        .collect()
}

// ═══════════════════════════════════════════════════════════════════════════════
// TAG-FRAGMENT MODE
// ═══════════════════════════════════════════════════════════════════════════════

/// Render one attribute of a plain element into `parts`.
///
/// The configured attribute transform runs first on named attributes; it may
/// rename an attribute or replace its value, and the rendering follows the
/// value it returns.
pub fn compile_tag_attribute<T>(
    attribute: Attribute<T>,
    parts: &mut TemplateParts<T>,
    config: &Config<T>,
) -> LowerResult<()> {
    match attribute {
        Attribute::Named(attr) => {
            let attr = config.transform_attribute(attr);
            let name = attr.name;
            match attr.value {
                AttributeValue::Absent | AttributeValue::EmptyExpression => {}
                AttributeValue::StringLiteral(value) => {
                    parts.append_static(&format!(" {}=\"{}\"", name, escape_attribute(&value)));
                }
                AttributeValue::Expression(e) | AttributeValue::Element(e) => {
                    parts.append_static(&format!(" {}=\"", name));
                    parts.push_dynamic(e);
                    parts.push_static("\"");
                }
                AttributeValue::Other(kind) => {
                    return Err(LowerError::at(
                        LowerErrorKind::UnhandledAttributeValueKind { kind },
                        attr.span,
                    ))
                }
            }
        }
        Attribute::Spread { argument, .. } => {
            parts.append_static(" ");
            parts.push_dynamic(argument);
            parts.push_static("");
        }
    }
    Ok(())
}

fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}
