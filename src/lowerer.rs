//! Element lowering.
//!
//! An element whose tag starts with an uppercase character is a component
//! reference and becomes a call (or construction) of that component with a
//! properties map. Every other element becomes a template construction:
//!
//! ```text
//! <div id={y}>z</div>   =>   new Template(["<div id=\"", "\">z</div>"], [y])
//! ```

use crate::attributes::{compile_props, compile_tag_attribute, Attribute, PropEntry};
use crate::children::{flatten_children, Child};
use crate::error::{LowerError, LowerErrorKind, LowerResult};
use crate::options::Config;
use crate::scope::ScopeMetadata;
use crate::span::Span;
use crate::template::{LoweredForm, TemplateParts};
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    /// JSX identifiers may contain `-` (`<my-element>`, `aria-label`).
    static ref JSX_IDENT_RE: Regex = Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$-]*$").unwrap();
    static ref JS_IDENT_RE: Regex = Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*$").unwrap();
}

// ═══════════════════════════════════════════════════════════════════════════════
// TAG NAMES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagName {
    /// `div`, `Foo`, `my-element`
    Identifier(String),
    /// `Foo.Bar.Baz`
    Member(Vec<String>),
    /// `svg:rect`
    Namespaced { namespace: String, name: String },
    /// `<>...</>`
    Fragment,
}

impl TagName {
    pub fn identifier(name: impl Into<String>) -> Self {
        TagName::Identifier(name.into())
    }

    /// A component reference iff the leading character is unchanged by
    /// uppercasing: `Card`, `_Card`, `$card`. Fragments never are.
    pub fn is_component(&self) -> bool {
        let leading = match self {
            TagName::Identifier(name) => name.chars().next(),
            TagName::Member(segments) => segments.first().and_then(|s| s.chars().next()),
            TagName::Namespaced { namespace, .. } => namespace.chars().next(),
            TagName::Fragment => None,
        };
        leading.is_some_and(|c| !c.is_lowercase())
    }

    fn validate(&self) -> Result<(), String> {
        match self {
            TagName::Identifier(name) => {
                if !JSX_IDENT_RE.is_match(name) {
                    return Err("not a valid JSX identifier".to_string());
                }
                if self.is_component() && !JS_IDENT_RE.is_match(name) {
                    return Err("component tags must be valid JavaScript identifiers".to_string());
                }
            }
            TagName::Member(segments) => {
                if segments.len() < 2 {
                    return Err("member tags need an object and a property".to_string());
                }
                if let Some(bad) = segments.iter().find(|s| !JS_IDENT_RE.is_match(s)) {
                    return Err(format!("invalid member segment '{}'", bad));
                }
            }
            TagName::Namespaced { namespace, name } => {
                if !JSX_IDENT_RE.is_match(namespace) || !JSX_IDENT_RE.is_match(name) {
                    return Err("namespace and name must be JSX identifiers".to_string());
                }
                if self.is_component() {
                    return Err("namespaced tags cannot reference components".to_string());
                }
            }
            TagName::Fragment => {}
        }
        Ok(())
    }
}

impl fmt::Display for TagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagName::Identifier(name) => f.write_str(name),
            TagName::Member(segments) => f.write_str(&segments.join(".")),
            TagName::Namespaced { namespace, name } => write!(f, "{}:{}", namespace, name),
            TagName::Fragment => Ok(()),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOWERER INPUT / OUTPUT
// ═══════════════════════════════════════════════════════════════════════════════

/// One element with every descendant already lowered.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<T> {
    pub tag: TagName,
    pub attributes: Vec<Attribute<T>>,
    pub children: Vec<Child<T>>,
    pub has_closing_tag: bool,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentStyle {
    /// `Tag(props)`
    Invoke,
    /// `new Tag(props).render()`
    ConstructAndRender,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentCall<T> {
    pub tag: String,
    pub props: Vec<PropEntry<T>>,
    pub style: ComponentStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateCall<T> {
    /// The configured import alias.
    pub callee: String,
    /// `new callee(...)` when true, `callee(...)` otherwise.
    pub construct: bool,
    pub form: LoweredForm<T>,
}

/// Replacement for one element.
#[derive(Debug, Clone, PartialEq)]
pub enum Lowered<T> {
    Component(ComponentCall<T>),
    Template(TemplateCall<T>),
}

// ═══════════════════════════════════════════════════════════════════════════════
// LOWERER
// ═══════════════════════════════════════════════════════════════════════════════

pub struct ElementLowerer<'c, T> {
    config: &'c Config<T>,
}

impl<'c, T> ElementLowerer<'c, T> {
    pub fn new(config: &'c Config<T>) -> Self {
        Self { config }
    }

    /// Lower one element. Errors without a more specific location carry the element's span.
    pub fn lower(&self, element: Element<T>, scope: &ScopeMetadata) -> LowerResult<Lowered<T>> {
        let span = element.span;
        self.lower_inner(element, scope)
            .map_err(|e| e.or_span(span))
    }

    fn lower_inner(&self, element: Element<T>, scope: &ScopeMetadata) -> LowerResult<Lowered<T>> {
        let tag = element.tag.to_string();
        element.tag.validate().map_err(|reason| {
            LowerError::new(LowerErrorKind::MalformedTagName {
                tag: tag.clone(),
                reason,
            })
        })?;

        if element.tag.is_component() {
            self.lower_component(tag, element.attributes, scope)
                .map(Lowered::Component)
        } else {
            self.lower_plain(element, scope).map(Lowered::Template)
        }
    }

    fn lower_component(
        &self,
        tag: String,
        attributes: Vec<Attribute<T>>,
        scope: &ScopeMetadata,
    ) -> LowerResult<ComponentCall<T>> {
        let props = compile_props(attributes)?;
        let style = match scope {
            ScopeMetadata::Function(_) => ComponentStyle::Invoke,
            ScopeMetadata::Class(_) => ComponentStyle::ConstructAndRender,
            ScopeMetadata::Unknown => {
                return Err(LowerError::new(
                    LowerErrorKind::UnresolvedComponentContext { tag },
                ))
            }
        };
        Ok(ComponentCall { tag, props, style })
    }

    fn lower_plain(&self, element: Element<T>, scope: &ScopeMetadata) -> LowerResult<TemplateCall<T>> {
        let is_fragment = element.tag == TagName::Fragment;
        let tag = element.tag.to_string();

        let mut parts = if is_fragment {
            TemplateParts::seeded("")
        } else {
            TemplateParts::seeded(format!("<{}", tag))
        };

        if !is_fragment {
            for attribute in element.attributes {
                compile_tag_attribute(attribute, &mut parts, self.config)?;
            }
            if element.children.is_empty() && !element.has_closing_tag {
                parts.append_static(" />");
            } else {
                parts.append_static(">");
            }
        }
        parts.reset_last_operation();

        flatten_children(element.children, &mut parts)?;

        if is_fragment {
            // A trailing dynamic still needs its closing static.
            parts.text("");
        } else if element.has_closing_tag {
            parts.text(&format!("</{}>", tag));
        }

        let mut form = parts.finish()?;
        form.extra_args = self.config.extra_args(scope);
        Ok(TemplateCall {
            callee: self.config.import_as().to_string(),
            construct: self.config.use_constructor_call(),
            form,
        })
    }
}
