//! Error taxonomy and diagnostics for the lowering pass.

use crate::span::{LineColumn, LineIndex, Span};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// LOWERING ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LowerErrorKind {
    /// Component properties cannot represent this attribute value.
    #[error("unsupported JSX attribute value type: {kind}")]
    UnsupportedAttributeValueKind { kind: String },

    /// Plain-element attribute value with no tag-fragment rendering.
    #[error("unhandled JSX attribute value type: {kind}")]
    UnhandledAttributeValueKind { kind: String },

    #[error("unexpected JSX child: {kind}")]
    UnexpectedChildKind { kind: String },

    /// A child element reached its parent before being lowered.
    #[error("unexpected JSX element child <{tag}>: descendants must be lowered before their parent")]
    InternalOrderingError { tag: String },

    #[error(
        "statics should have one more item than dynamics: statics.length={statics}, dynamics.length={dynamics}"
    )]
    TemplateInvariantViolation { statics: usize, dynamics: usize },

    #[error("component <{tag}> is not inside a function or class")]
    UnresolvedComponentContext { tag: String },

    #[error("malformed tag name '{tag}': {reason}")]
    MalformedTagName { tag: String, reason: String },
}

impl LowerErrorKind {
    /// Stable diagnostic code, in the style `JSX2TTL-ERR-*`.
    pub fn code(&self) -> &'static str {
        match self {
            LowerErrorKind::UnsupportedAttributeValueKind { .. } => "JSX2TTL-ERR-PROPS",
            LowerErrorKind::UnhandledAttributeValueKind { .. } => "JSX2TTL-ERR-ATTR",
            LowerErrorKind::UnexpectedChildKind { .. } => "JSX2TTL-ERR-CHILD",
            LowerErrorKind::InternalOrderingError { .. } => "JSX2TTL-ERR-ORDER",
            LowerErrorKind::TemplateInvariantViolation { .. } => "JSX2TTL-ERR-INVARIANT",
            LowerErrorKind::UnresolvedComponentContext { .. } => "JSX2TTL-ERR-CONTEXT",
            LowerErrorKind::MalformedTagName { .. } => "JSX2TTL-ERR-TAG",
        }
    }
}

/// A lowering failure. `span` names the most specific offending node when known;
/// the tree rewriter falls back to the element span otherwise.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct LowerError {
    pub kind: LowerErrorKind,
    pub span: Option<Span>,
}

impl LowerError {
    pub fn new(kind: LowerErrorKind) -> Self {
        Self { kind, span: None }
    }

    pub fn at(kind: LowerErrorKind, span: Span) -> Self {
        Self {
            kind,
            span: Some(span),
        }
    }

    pub fn or_span(mut self, span: Span) -> Self {
        self.span.get_or_insert(span);
        self
    }
}

pub type LowerResult<T> = Result<T, LowerError>;

// ═══════════════════════════════════════════════════════════════════════════════
// CONFIGURATION ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("option '{0}' is required and must not be empty")]
    MissingOption(&'static str),

    #[error("invalid options JSON: {0}")]
    InvalidJson(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// DIAGNOSTICS
// ═══════════════════════════════════════════════════════════════════════════════

pub const SYNTAX_ERROR_CODE: &str = "JSX2TTL-ERR-SYNTAX";
pub const CONFIG_ERROR_CODE: &str = "JSX2TTL-ERR-CONFIG";

/// A located, reportable failure for one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub file: String,
    pub start: LineColumn,
    pub end: LineColumn,
    pub snippet: String,
}

impl Diagnostic {
    pub fn new(code: &str, message: String, file: &str, source: &str, span: Span) -> Self {
        let index = LineIndex::new(source);
        Self {
            code: code.to_string(),
            message,
            file: file.to_string(),
            start: index.line_column(span.start),
            end: index.line_column(span.end),
            snippet: span.source_text(source).to_string(),
        }
    }

    pub fn from_lower_error(error: &LowerError, file: &str, source: &str, fallback: Span) -> Self {
        Self::new(
            error.kind.code(),
            error.kind.to_string(),
            file,
            source,
            error.span.unwrap_or(fallback),
        )
    }
}

impl Diagnostic {
    /// Options that never reached a source file.
    pub fn from_config_error(error: &ConfigError, file: &str) -> Self {
        Self::new(CONFIG_ERROR_CODE, error.to_string(), file, "", Span::default())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}-{}:{} [{}] {}\n\t{}",
            self.file,
            self.start.line,
            self.start.column,
            self.end.line,
            self.end.column,
            self.code,
            self.message,
            self.snippet
        )
    }
}

impl std::error::Error for Diagnostic {}
