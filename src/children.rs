//! Child flattening into the alternating static/dynamic sequence.

use crate::error::{LowerError, LowerErrorKind, LowerResult};
use crate::span::Span;
use crate::template::TemplateParts;

#[derive(Debug, Clone, PartialEq)]
pub enum Child<T> {
    Text { text: String, span: Span },
    /// `{expr}`
    Expression { value: T, span: Span },
    /// A descendant element that has already been replaced by its lowered form.
    Lowered { value: T, span: Span },
    /// A descendant element that has not been lowered yet.
    RawElement { tag: String, span: Span },
    /// A child kind the host could not map.
    Other { kind: String, span: Span },
}

impl<T> Child<T> {
    pub fn text(text: impl Into<String>, span: Span) -> Self {
        Child::Text {
            text: text.into(),
            span,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Child::Text { span, .. }
            | Child::Expression { span, .. }
            | Child::Lowered { span, .. }
            | Child::RawElement { span, .. }
            | Child::Other { span, .. } => *span,
        }
    }
}

/// Flatten `children` left to right into `parts`.
pub fn flatten_children<T>(children: Vec<Child<T>>, parts: &mut TemplateParts<T>) -> LowerResult<()> {
    for child in children {
        match child {
            Child::Text { text, .. } => parts.text(&text),
            Child::Expression { value, .. } | Child::Lowered { value, .. } => {
                parts.push_dynamic(value)
            }
            Child::RawElement { tag, span } => {
                return Err(LowerError::at(
                    LowerErrorKind::InternalOrderingError { tag },
                    span,
                ))
            }
            Child::Other { kind, span } => {
                return Err(LowerError::at(
                    LowerErrorKind::UnexpectedChildKind { kind },
                    span,
                ))
            }
        }
    }
    Ok(())
}
