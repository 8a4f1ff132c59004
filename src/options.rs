//! Configuration for the lowering pass.
//!
//! [`CompileOptions`] is the serialisable surface (camelCase JSON, as accepted by
//! the Node binding). [`Config`] is the resolved, immutable value the pass runs
//! with; it adds the two hooks that cannot be expressed as data.

use crate::attributes::NamedAttribute;
use crate::error::ConfigError;
use crate::scope::ScopeMetadata;
use crate::transforms::BuiltinTransform;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Rewrites one named attribute of a plain element before it is compiled.
pub type AttributeTransform<T> = Arc<dyn Fn(NamedAttribute<T>) -> NamedAttribute<T> + Send + Sync>;

/// Produces trailing arguments for a template construction from the enclosing scope.
pub type ExtraArgsFn<T> = Arc<dyn Fn(&ScopeMetadata) -> Vec<T> + Send + Sync>;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileOptions {
    /// Module specifier the template constructor is imported from.
    pub import_path: String,
    /// Exported name of the template constructor.
    pub import_name: String,
    /// Local alias; defaults to `import_name`.
    #[serde(default)]
    pub import_as: Option<String>,
    #[serde(default)]
    pub is_default_import: bool,
    /// `new Alias(...)` when true, `Alias(...)` otherwise.
    #[serde(default = "default_true")]
    pub use_constructor_call: bool,
    /// Built-in attribute transforms, applied in order.
    #[serde(default)]
    pub attribute_transforms: Vec<BuiltinTransform>,
}

impl CompileOptions {
    pub fn new(import_path: impl Into<String>, import_name: impl Into<String>) -> Self {
        Self {
            import_path: import_path.into(),
            import_name: import_name.into(),
            import_as: None,
            is_default_import: false,
            use_constructor_call: true,
            attribute_transforms: vec![],
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::InvalidJson(e.to_string()))
    }
}

/// Resolved options. Every default has been applied; nothing changes after construction.
pub struct Config<T> {
    import_path: String,
    import_name: String,
    import_as: String,
    is_default_import: bool,
    use_constructor_call: bool,
    attribute_transform: Option<AttributeTransform<T>>,
    extra_args: Option<ExtraArgsFn<T>>,
}

impl<T> Config<T> {
    pub fn new(
        import_path: impl Into<String>,
        import_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        Self::from_options(&CompileOptions::new(import_path, import_name))
    }

    /// Resolve the data-only options. Built-in transforms are host-specific and
    /// are installed by the host (see `jsx::config_from_options`).
    pub fn from_options(options: &CompileOptions) -> Result<Self, ConfigError> {
        if options.import_path.trim().is_empty() {
            return Err(ConfigError::MissingOption("importPath"));
        }
        if options.import_name.trim().is_empty() {
            return Err(ConfigError::MissingOption("importName"));
        }
        let import_as = match &options.import_as {
            Some(alias) if !alias.trim().is_empty() => alias.clone(),
            _ => options.import_name.clone(),
        };
        Ok(Self {
            import_path: options.import_path.clone(),
            import_name: options.import_name.clone(),
            import_as,
            is_default_import: options.is_default_import,
            use_constructor_call: options.use_constructor_call,
            attribute_transform: None,
            extra_args: None,
        })
    }

    pub fn with_import_as(mut self, alias: impl Into<String>) -> Self {
        self.import_as = alias.into();
        self
    }

    pub fn with_default_import(mut self, is_default_import: bool) -> Self {
        self.is_default_import = is_default_import;
        self
    }

    pub fn with_constructor_call(mut self, use_constructor_call: bool) -> Self {
        self.use_constructor_call = use_constructor_call;
        self
    }

    /// Install an attribute transform. An already installed transform runs first.
    pub fn with_attribute_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(NamedAttribute<T>) -> NamedAttribute<T> + Send + Sync + 'static,
        T: 'static,
    {
        let combined: AttributeTransform<T> = match self.attribute_transform.take() {
            Some(previous) => Arc::new(move |attr: NamedAttribute<T>| transform(previous(attr))),
            None => Arc::new(transform),
        };
        self.attribute_transform = Some(combined);
        self
    }

    pub fn with_extra_args<F>(mut self, extra_args: F) -> Self
    where
        F: Fn(&ScopeMetadata) -> Vec<T> + Send + Sync + 'static,
    {
        self.extra_args = Some(Arc::new(extra_args));
        self
    }

    pub fn import_path(&self) -> &str {
        &self.import_path
    }

    pub fn import_name(&self) -> &str {
        &self.import_name
    }

    pub fn import_as(&self) -> &str {
        &self.import_as
    }

    pub fn is_default_import(&self) -> bool {
        self.is_default_import
    }

    pub fn use_constructor_call(&self) -> bool {
        self.use_constructor_call
    }

    pub fn transform_attribute(&self, attribute: NamedAttribute<T>) -> NamedAttribute<T> {
        match &self.attribute_transform {
            Some(transform) => transform(attribute),
            None => attribute,
        }
    }

    pub fn extra_args(&self, scope: &ScopeMetadata) -> Vec<T> {
        match &self.extra_args {
            Some(extra_args) => extra_args(scope),
            None => vec![],
        }
    }
}

impl<T> Clone for Config<T> {
    fn clone(&self) -> Self {
        Self {
            import_path: self.import_path.clone(),
            import_name: self.import_name.clone(),
            import_as: self.import_as.clone(),
            is_default_import: self.is_default_import,
            use_constructor_call: self.use_constructor_call,
            attribute_transform: self.attribute_transform.clone(),
            extra_args: self.extra_args.clone(),
        }
    }
}

impl<T> fmt::Debug for Config<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("import_path", &self.import_path)
            .field("import_name", &self.import_name)
            .field("import_as", &self.import_as)
            .field("is_default_import", &self.is_default_import)
            .field("use_constructor_call", &self.use_constructor_call)
            .field("attribute_transform", &self.attribute_transform.is_some())
            .field("extra_args", &self.extra_args.is_some())
            .finish()
    }
}
