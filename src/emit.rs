//! JavaScript text emission for lowered elements.

use crate::attributes::{PropEntry, PropValue};
use crate::lowerer::{ComponentCall, ComponentStyle, Lowered, TemplateCall};
use crate::options::Config;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref JS_IDENT_RE: Regex = Regex::new(r"^[\p{L}_$][\p{L}\p{N}_$]*$").unwrap();
}

/// Quote `value` as a JavaScript string literal.
pub fn string_literal(value: &str) -> String {
    // A JSON string is a valid JS string literal.
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value.escape_default()))
}

/// Object literal key: bare if it is an identifier, quoted otherwise (`"data-id"`, `"xlink:href"`).
pub fn property_key(key: &str) -> String {
    if JS_IDENT_RE.is_match(key) {
        key.to_string()
    } else {
        string_literal(key)
    }
}

pub fn props_object(props: &[PropEntry<String>]) -> String {
    if props.is_empty() {
        return "{}".to_string();
    }
    let entries: Vec<String> = props
        .iter()
        .map(|entry| match entry {
            PropEntry::Property { key, value } => {
                let value = match value {
                    PropValue::String(s) => string_literal(s),
                    PropValue::Null => "null".to_string(),
                    PropValue::Expression(e) => e.clone(),
                };
                format!("{}: {}", property_key(key), value)
            }
            PropEntry::Spread(argument) => format!("...{}", argument),
        })
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

pub fn component_call(call: &ComponentCall<String>) -> String {
    let props = props_object(&call.props);
    match call.style {
        ComponentStyle::Invoke => format!("{}({})", call.tag, props),
        ComponentStyle::ConstructAndRender => format!("new {}({}).render()", call.tag, props),
    }
}

pub fn template_call(call: &TemplateCall<String>) -> String {
    let statics: Vec<String> = call.form.statics.iter().map(|s| string_literal(s)).collect();
    let mut args = vec![
        format!("[{}]", statics.join(", ")),
        format!("[{}]", call.form.dynamics.join(", ")),
    ];
    args.extend(call.form.extra_args.iter().cloned());

    let new_kw = if call.construct { "new " } else { "" };
    format!("{}{}({})", new_kw, call.callee, args.join(", "))
}

pub fn lowered(lowered: &Lowered<String>) -> String {
    match lowered {
        Lowered::Component(call) => component_call(call),
        Lowered::Template(call) => template_call(call),
    }
}

/// The import statement naming the template constructor.
pub fn import_statement<T>(config: &Config<T>) -> String {
    let path = string_literal(config.import_path());
    if config.is_default_import() {
        format!("import {} from {};", config.import_as(), path)
    } else if config.import_as() == config.import_name() {
        format!("import {{ {} }} from {};", config.import_name(), path)
    } else {
        format!(
            "import {{ {} as {} }} from {};",
            config.import_name(),
            config.import_as(),
            path
        )
    }
}
