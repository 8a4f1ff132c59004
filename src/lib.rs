//! # JSX → Tagged Template Lowering
//!
//! Rewrites every JSX element in a module into a call or construction that
//! carries `[statics, dynamics, ...extraArgs]`:
//!
//! ```text
//! <div class="a">{x}</div>  =>  new Template(["<div class=\"a\">", "</div>"], [x])
//! <Card title="t" />        =>  Card({ title: "t" })                  (inside a function)
//!                           =>  new Card({ title: "t" }).render()     (inside a class)
//! ```
//!
//! ## Layers
//!
//! 1. **Core** (`template`, `attributes`, `children`, `lowerer`): lowers one
//!    element whose descendants are already lowered. Generic over an opaque
//!    token type `T`; expressions are carried, never inspected.
//! 2. **Tree** (`tree`, `scope`): an arena of elements, code and scope nodes,
//!    rewritten in a single post-order pass through a [`Host`].
//! 3. **Source host** (`jsx`, `emit`, `transforms`): parses JSX/TSX with oxc
//!    and splices the lowered calls back into the source text.
//! 4. **Drivers** (`batch`, this file): parallel batch runs and the Node.js
//!    binding behind the `napi` feature.
//!
//! ## Invariants
//!
//! - Every template form satisfies `statics.len() == dynamics.len() + 1`.
//! - Each element is lowered exactly once, after all of its descendants.
//! - Output is all-or-nothing: any error aborts the file.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod attributes;
pub mod batch;
pub mod children;
pub mod emit;
pub mod error;
pub mod jsx;
pub mod lowerer;
pub mod options;
pub mod scope;
pub mod span;
pub mod template;
pub mod transforms;
pub mod tree;

#[cfg(test)]
mod lowering_tests;
#[cfg(test)]
mod options_tests;

pub use attributes::{Attribute, AttributeValue, NamedAttribute, PropEntry, PropValue};
pub use batch::{report_failures, transform_all, FileResult, SourceFile};
pub use children::Child;
pub use error::{ConfigError, Diagnostic, LowerError, LowerErrorKind, LowerResult};
pub use jsx::{config_from_options, transform, SourceHost, TransformOutput};
pub use lowerer::{Element, ElementLowerer, Lowered, TagName};
pub use options::{CompileOptions, Config};
pub use scope::{ClassScope, FunctionScope, ScopeDecl, ScopeMetadata};
pub use span::Span;
pub use template::LoweredForm;
pub use transforms::BuiltinTransform;
pub use tree::{ElementTree, Host, NodeId, TreeRewriter};

/// Lower one module with serialisable options.
pub fn jsx_to_ttl(
    source: &str,
    filename: &str,
    options: &CompileOptions,
) -> Result<String, Diagnostic> {
    let config = config_from_options(options)
        .map_err(|e| Diagnostic::from_config_error(&e, filename))?;
    transform(source, filename, &config).map(|output| output.code)
}

// ═══════════════════════════════════════════════════════════════════════════════
// NODE BINDING
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn napi_config(options_json: &str) -> napi::Result<Config<String>> {
    let options = CompileOptions::from_json(options_json)
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    config_from_options(&options).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn jsx_to_ttl_native(
    code: String,
    options_json: String,
    filename: Option<String>,
) -> napi::Result<String> {
    let config = napi_config(&options_json)?;
    let filename = filename.unwrap_or_else(|| "<input>".to_string());
    transform(&code, &filename, &config)
        .map(|output| output.code)
        .map_err(|d| napi::Error::from_reason(d.to_string()))
}

/// `filesJson` is `[{ "path": ..., "code": ... }]`; returns the results as JSON.
#[cfg(feature = "napi")]
#[napi]
pub fn jsx_to_ttl_batch_native(files_json: String, options_json: String) -> napi::Result<String> {
    let config = napi_config(&options_json)?;
    let files: Vec<SourceFile> = serde_json::from_str(&files_json)
        .map_err(|e| napi::Error::from_reason(format!("Files parse error: {}", e)))?;
    let results = transform_all(&files, &config);
    report_failures(&results);
    serde_json::to_string(&results)
        .map_err(|e| napi::Error::from_reason(format!("Serialize error: {}", e)))
}
