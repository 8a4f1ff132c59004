//! Built-in attribute transforms.
//!
//! These run on plain-element attributes before they are rendered into the
//! opening tag. Component properties are never transformed; the component
//! renders its own markup.

use crate::attributes::{AttributeValue, NamedAttribute};
use crate::span::Span;
use lazy_static::lazy_static;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, ObjectPropertyKind, PropertyKey};
use oxc_parser::Parser;
use oxc_span::SourceType;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref CAMEL_BOUNDARY_RE: Regex = Regex::new(r"([a-z0-9])([A-Z])").unwrap();
    /// `WebkitTransition`, `MozAppearance`, `msTransform`
    static ref VENDOR_PREFIX_RE: Regex = Regex::new(r"^(?:[A-Z]|ms[A-Z])").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BuiltinTransform {
    /// `className="x"` → `class="x"`
    ClassNameToClass,
    /// `style={{ fontSize: 12 }}` → `style="font-size: 12;"`
    StyleObjectToCss,
}

impl BuiltinTransform {
    pub fn apply(self, attribute: NamedAttribute<String>) -> NamedAttribute<String> {
        match self {
            BuiltinTransform::ClassNameToClass => class_name_to_class(attribute),
            BuiltinTransform::StyleObjectToCss => style_object_to_css(attribute),
        }
    }
}

pub fn class_name_to_class<T>(mut attribute: NamedAttribute<T>) -> NamedAttribute<T> {
    if attribute.name == "className" {
        attribute.name = "class".to_string();
    }
    attribute
}

/// `fontSize` → `font-size`, `WebkitTransition` → `-webkit-transition`
pub fn kebab_case(name: &str) -> String {
    let kebab = CAMEL_BOUNDARY_RE
        .replace_all(name, "$1-$2")
        .to_lowercase();
    if VENDOR_PREFIX_RE.is_match(name) {
        format!("-{}", kebab)
    } else {
        kebab
    }
}

/// Flatten an object-literal `style` expression into CSS text. Attributes whose
/// value is not a plain object literal of simple values are returned unchanged.
pub fn style_object_to_css(attribute: NamedAttribute<String>) -> NamedAttribute<String> {
    if attribute.name != "style" {
        return attribute;
    }
    let css = match &attribute.value {
        AttributeValue::Expression(code) => object_literal_to_css(code),
        _ => None,
    };
    match css {
        Some(css) => NamedAttribute {
            value: AttributeValue::StringLiteral(css),
            ..attribute
        },
        None => attribute,
    }
}

fn object_literal_to_css(code: &str) -> Option<String> {
    let allocator = Allocator::default();
    let source_type = SourceType::default()
        .with_typescript(true)
        .with_module(true)
        .with_jsx(true);
    let expr = Parser::new(&allocator, code, source_type)
        .parse_expression()
        .ok()?;

    let Expression::ObjectExpression(object) = expr else {
        return None;
    };

    let mut declarations = Vec::with_capacity(object.properties.len());
    for property in &object.properties {
        let ObjectPropertyKind::ObjectProperty(prop) = property else {
            return None;
        };
        if prop.computed {
            return None;
        }
        let key = match &prop.key {
            PropertyKey::StaticIdentifier(id) => id.name.to_string(),
            PropertyKey::StringLiteral(s) => s.value.to_string(),
            _ => return None,
        };
        let value = match &prop.value {
            Expression::StringLiteral(s) => s.value.to_string(),
            Expression::NumericLiteral(n) => Span::from(n.span).source_text(code).to_string(),
            Expression::BooleanLiteral(b) => b.value.to_string(),
            Expression::TemplateLiteral(t) => t.quasis.first()?.value.raw.to_string(),
            Expression::Identifier(id) => id.name.to_string(),
            _ => return None,
        };
        declarations.push(format!("{}: {};", kebab_case(&key), value));
    }
    Some(declarations.join(" "))
}
