#[cfg(test)]
mod tests {
    use crate::attributes::{AttributeValue, NamedAttribute};
    use crate::emit::import_statement;
    use crate::error::ConfigError;
    use crate::options::{CompileOptions, Config};
    use crate::scope::ScopeMetadata;
    use crate::span::Span;
    use crate::transforms::BuiltinTransform;
    use pretty_assertions::assert_eq;

    fn attr(name: &str) -> NamedAttribute<String> {
        NamedAttribute {
            name: name.to_string(),
            value: AttributeValue::Absent,
            span: Span::new(0, 1),
        }
    }

    #[test]
    fn test_options_from_json_defaults() {
        let options =
            CompileOptions::from_json(r#"{ "importPath": "rt", "importName": "Template" }"#).unwrap();
        assert_eq!(options.import_path, "rt");
        assert_eq!(options.import_as, None);
        assert!(!options.is_default_import);
        assert!(options.use_constructor_call);
        assert!(options.attribute_transforms.is_empty());

        let config: Config<String> = Config::from_options(&options).unwrap();
        assert_eq!(config.import_as(), "Template");
        assert!(config.use_constructor_call());
    }

    #[test]
    fn test_options_from_json_full() {
        let options = CompileOptions::from_json(
            r#"{
                "importPath": "@lib/tpl",
                "importName": "default",
                "importAs": "Tpl",
                "isDefaultImport": true,
                "useConstructorCall": false,
                "attributeTransforms": ["classNameToClass", "styleObjectToCss"]
            }"#,
        )
        .unwrap();
        assert_eq!(options.import_as.as_deref(), Some("Tpl"));
        assert_eq!(
            options.attribute_transforms,
            vec![BuiltinTransform::ClassNameToClass, BuiltinTransform::StyleObjectToCss]
        );

        let config: Config<String> = Config::from_options(&options).unwrap();
        assert!(config.is_default_import());
        assert!(!config.use_constructor_call());
        assert_eq!(import_statement(&config), "import Tpl from \"@lib/tpl\";");
    }

    #[test]
    fn test_missing_options_are_rejected() {
        let err = Config::<String>::new("", "Template").unwrap_err();
        assert_eq!(err, ConfigError::MissingOption("importPath"));

        let err = Config::<String>::new("rt", " ").unwrap_err();
        assert_eq!(err, ConfigError::MissingOption("importName"));

        let err = CompileOptions::from_json(r#"{ "importName": "T" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidJson(_)));
    }

    #[test]
    fn test_import_statement_forms() {
        let config: Config<String> = Config::new("rt", "Template").unwrap();
        assert_eq!(import_statement(&config), "import { Template } from \"rt\";");

        let config = config.with_import_as("T");
        assert_eq!(import_statement(&config), "import { Template as T } from \"rt\";");
    }

    #[test]
    fn test_attribute_transforms_compose_in_order() {
        let config: Config<String> = Config::new("rt", "Template")
            .unwrap()
            .with_attribute_transform(|mut a| {
                a.name.push_str("-first");
                a
            })
            .with_attribute_transform(|mut a| {
                a.name.push_str("-second");
                a
            });
        assert_eq!(config.transform_attribute(attr("x")).name, "x-first-second");
    }

    #[test]
    fn test_hooks_default_to_identity() {
        let config: Config<String> = Config::new("rt", "Template").unwrap();
        assert_eq!(config.transform_attribute(attr("id")), attr("id"));
        assert!(config.extra_args(&ScopeMetadata::Unknown).is_empty());
    }

    #[test]
    fn test_config_clone_shares_hooks() {
        let config: Config<String> = Config::new("rt", "Template")
            .unwrap()
            .with_extra_args(|_| vec!["ctx".to_string()]);
        let cloned = config.clone();
        assert_eq!(cloned.extra_args(&ScopeMetadata::Unknown), vec!["ctx".to_string()]);
        assert!(format!("{:?}", cloned).contains("extra_args: true"));
    }
}
