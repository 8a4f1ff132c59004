//! Element lowering tests over string tokens.
//!
//! Covers both attribute modes, child flattening, component call shapes and
//! the alternating statics/dynamics invariant.

#[cfg(test)]
mod tests {
    use crate::attributes::{Attribute, AttributeValue, PropEntry, PropValue};
    use crate::children::Child;
    use crate::error::LowerErrorKind;
    use crate::lowerer::{ComponentStyle, Element, ElementLowerer, Lowered, TagName};
    use crate::options::Config;
    use crate::scope::{ClassScope, FunctionScope, ScopeMetadata};
    use crate::span::Span;
    use crate::template::LoweredForm;
    use pretty_assertions::assert_eq;

    fn config() -> Config<String> {
        Config::new("@lib/runtime", "Template").unwrap()
    }

    fn function_scope() -> ScopeMetadata {
        ScopeMetadata::Function(FunctionScope {
            name: Some("App".to_string()),
            is_arrow: false,
        })
    }

    fn class_scope() -> ScopeMetadata {
        ScopeMetadata::Class(ClassScope {
            name: Some("Page".to_string()),
            ..Default::default()
        })
    }

    fn span(start: u32, end: u32) -> Span {
        Span::new(start, end)
    }

    fn element(tag: &str) -> Element<String> {
        Element {
            tag: TagName::identifier(tag),
            attributes: vec![],
            children: vec![],
            has_closing_tag: true,
            span: span(0, 100),
        }
    }

    fn expr(code: &str) -> AttributeValue<String> {
        AttributeValue::Expression(code.to_string())
    }

    fn text(t: &str) -> Child<String> {
        Child::text(t, span(0, 0))
    }

    fn dynamic(code: &str) -> Child<String> {
        Child::Expression {
            value: code.to_string(),
            span: span(0, 0),
        }
    }

    fn lower_template(config: &Config<String>, el: Element<String>) -> LoweredForm<String> {
        match ElementLowerer::new(config).lower(el, &function_scope()).unwrap() {
            Lowered::Template(call) => call.form,
            other => panic!("expected a template, got {:?}", other),
        }
    }

    fn statics(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // PLAIN ELEMENTS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_string_attribute_and_expression_child() {
        let mut el = element("div");
        el.attributes = vec![Attribute::named(
            "class",
            AttributeValue::StringLiteral("a".to_string()),
            span(5, 14),
        )];
        el.children = vec![dynamic("x")];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<div class=\"a\">", "</div>"]));
        assert_eq!(form.dynamics, vec!["x".to_string()]);
        assert!(form.extra_args.is_empty());
    }

    #[test]
    fn test_expression_attribute_opens_dynamic_slot() {
        let mut el = element("div");
        el.attributes = vec![Attribute::named("id", expr("y"), span(5, 11))];
        el.children = vec![text("z")];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<div id=\"", "\">z</div>"]));
        assert_eq!(form.dynamics, vec!["y".to_string()]);
    }

    #[test]
    fn test_self_closing_without_children() {
        let mut el = element("br");
        el.has_closing_tag = false;

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<br />"]));
        assert!(form.dynamics.is_empty());
    }

    #[test]
    fn test_absent_and_empty_expression_values_are_skipped() {
        let mut el = element("input");
        el.has_closing_tag = false;
        el.attributes = vec![
            Attribute::named("disabled", AttributeValue::Absent, span(7, 15)),
            Attribute::named("value", AttributeValue::EmptyExpression, span(16, 24)),
        ];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<input />"]));
    }

    #[test]
    fn test_spread_attribute_keeps_invariant() {
        let mut el = element("div");
        el.attributes = vec![Attribute::Spread {
            argument: "props".to_string(),
            span: span(5, 15),
        }];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<div ", "></div>"]));
        assert_eq!(form.dynamics, vec!["props".to_string()]);
    }

    #[test]
    fn test_string_attribute_quotes_are_escaped() {
        let mut el = element("p");
        el.attributes = vec![Attribute::named(
            "title",
            AttributeValue::StringLiteral("say \"hi\"".to_string()),
            span(3, 20),
        )];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<p title=\"say &quot;hi&quot;\"></p>"]));
    }

    #[test]
    fn test_element_valued_attribute_is_dynamic() {
        let mut el = element("div");
        el.attributes = vec![Attribute::named(
            "icon",
            AttributeValue::Element("ICON".to_string()),
            span(5, 20),
        )];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<div icon=\"", "\"></div>"]));
        assert_eq!(form.dynamics, vec!["ICON".to_string()]);
    }

    #[test]
    fn test_text_after_dynamic_starts_new_static() {
        let mut el = element("p");
        el.children = vec![text("a"), dynamic("b"), text("c"), text("d")];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<p>a", "cd</p>"]));
        assert_eq!(form.dynamics, vec!["b".to_string()]);
    }

    #[test]
    fn test_adjacent_dynamics_are_separated_by_empty_static() {
        let mut el = element("p");
        el.children = vec![
            dynamic("a"),
            Child::Lowered {
                value: "CHILD".to_string(),
                span: span(10, 20),
            },
        ];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<p>", "", "</p>"]));
        assert_eq!(form.dynamics, vec!["a".to_string(), "CHILD".to_string()]);
    }

    #[test]
    fn test_invariant_holds_for_mixed_shapes() {
        let cases: Vec<Vec<Child<String>>> = vec![
            vec![],
            vec![text("only")],
            vec![dynamic("a")],
            vec![dynamic("a"), dynamic("b"), dynamic("c")],
            vec![text("x"), dynamic("a"), text("y"), dynamic("b")],
        ];
        for children in cases {
            let mut el = element("div");
            el.attributes = vec![
                Attribute::named("id", expr("i"), span(0, 1)),
                Attribute::Spread {
                    argument: "s".to_string(),
                    span: span(2, 3),
                },
            ];
            el.children = children;
            let form = lower_template(&config(), el);
            assert_eq!(form.statics.len(), form.dynamics.len() + 1);
        }
    }

    #[test]
    fn test_fragment_has_no_tag_text() {
        let mut el = element("");
        el.tag = TagName::Fragment;
        el.children = vec![text("hi "), dynamic("name")];

        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["hi ", ""]));
        assert_eq!(form.dynamics, vec!["name".to_string()]);
    }

    #[test]
    fn test_template_call_shape_follows_config() {
        let config = config().with_import_as("T").with_constructor_call(false);
        let lowered = ElementLowerer::new(&config)
            .lower(element("span"), &ScopeMetadata::Unknown)
            .unwrap();
        match lowered {
            Lowered::Template(call) => {
                assert_eq!(call.callee, "T");
                assert!(!call.construct);
            }
            other => panic!("expected a template, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_args_receive_scope() {
        let config = config().with_extra_args(|scope: &ScopeMetadata| {
            vec![format!("\"{}\"", scope.name().unwrap_or("?"))]
        });
        let lowered = ElementLowerer::new(&config)
            .lower(element("div"), &class_scope())
            .unwrap();
        match lowered {
            Lowered::Template(call) => assert_eq!(call.form.extra_args, vec!["\"Page\"".to_string()]),
            other => panic!("expected a template, got {:?}", other),
        }
    }

    #[test]
    fn test_attribute_transform_runs_before_rendering() {
        let config = config().with_attribute_transform(|mut attr| {
            if attr.name == "className" {
                attr.name = "class".to_string();
            }
            attr
        });
        let mut el = element("div");
        el.attributes = vec![Attribute::named(
            "className",
            AttributeValue::StringLiteral("box".to_string()),
            span(5, 20),
        )];

        let form = lower_template(&config, el);
        assert_eq!(form.statics, statics(&["<div class=\"box\"></div>"]));
    }

    #[test]
    fn test_unhandled_attribute_value_in_tag_mode() {
        let mut el = element("div");
        el.attributes = vec![Attribute::named(
            "x",
            AttributeValue::Other("JSXWeird".to_string()),
            span(5, 12),
        )];

        let err = ElementLowerer::new(&config())
            .lower(el, &function_scope())
            .unwrap_err();
        assert_eq!(
            err.kind,
            LowerErrorKind::UnhandledAttributeValueKind {
                kind: "JSXWeird".to_string()
            }
        );
        assert_eq!(err.span, Some(span(5, 12)));
    }

    #[test]
    fn test_unexpected_child_reports_child_span() {
        let mut el = element("ul");
        el.children = vec![Child::Other {
            kind: "JSXSpreadChild".to_string(),
            span: span(4, 12),
        }];

        let err = ElementLowerer::new(&config())
            .lower(el, &function_scope())
            .unwrap_err();
        assert_eq!(err.kind.code(), "JSX2TTL-ERR-CHILD");
        assert_eq!(err.span, Some(span(4, 12)));
    }

    #[test]
    fn test_raw_child_element_is_ordering_error() {
        let mut el = element("ul");
        el.children = vec![Child::RawElement {
            tag: "li".to_string(),
            span: span(4, 13),
        }];

        let err = ElementLowerer::new(&config())
            .lower(el, &function_scope())
            .unwrap_err();
        assert_eq!(
            err.kind,
            LowerErrorKind::InternalOrderingError {
                tag: "li".to_string()
            }
        );
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // COMPONENTS
    // ═══════════════════════════════════════════════════════════════════════════════

    fn card() -> Element<String> {
        let mut el = element("Card");
        el.has_closing_tag = false;
        el.attributes = vec![
            Attribute::named("title", AttributeValue::StringLiteral("t".to_string()), span(6, 15)),
            Attribute::named("onClick", expr("handle"), span(16, 32)),
            Attribute::named("disabled", AttributeValue::Absent, span(33, 41)),
            Attribute::Spread {
                argument: "rest".to_string(),
                span: span(42, 51),
            },
        ];
        el
    }

    #[test]
    fn test_component_in_function_is_invoked() {
        let lowered = ElementLowerer::new(&config())
            .lower(card(), &function_scope())
            .unwrap();
        let Lowered::Component(call) = lowered else {
            panic!("expected a component call");
        };
        assert_eq!(call.tag, "Card");
        assert_eq!(call.style, ComponentStyle::Invoke);
        assert_eq!(
            call.props,
            vec![
                PropEntry::Property {
                    key: "title".to_string(),
                    value: PropValue::String("t".to_string()),
                },
                PropEntry::Property {
                    key: "onClick".to_string(),
                    value: PropValue::Expression("handle".to_string()),
                },
                PropEntry::Property {
                    key: "disabled".to_string(),
                    value: PropValue::Null,
                },
                PropEntry::Spread("rest".to_string()),
            ]
        );
    }

    #[test]
    fn test_component_in_class_is_constructed() {
        let lowered = ElementLowerer::new(&config())
            .lower(card(), &class_scope())
            .unwrap();
        let Lowered::Component(call) = lowered else {
            panic!("expected a component call");
        };
        assert_eq!(call.style, ComponentStyle::ConstructAndRender);
    }

    #[test]
    fn test_component_props_are_not_transformed() {
        let config = config().with_attribute_transform(|mut attr| {
            attr.name = "renamed".to_string();
            attr
        });
        let Lowered::Component(call) = ElementLowerer::new(&config)
            .lower(card(), &function_scope())
            .unwrap()
        else {
            panic!("expected a component call");
        };
        assert!(matches!(&call.props[0], PropEntry::Property { key, .. } if key == "title"));
    }

    #[test]
    fn test_component_without_scope_fails_at_element() {
        let err = ElementLowerer::new(&config())
            .lower(card(), &ScopeMetadata::Unknown)
            .unwrap_err();
        assert_eq!(
            err.kind,
            LowerErrorKind::UnresolvedComponentContext {
                tag: "Card".to_string()
            }
        );
        assert_eq!(err.span, Some(span(0, 100)));
    }

    #[test]
    fn test_unsupported_prop_value_reports_attribute() {
        let mut el = card();
        el.attributes.push(Attribute::named(
            "weird",
            AttributeValue::Other("JSXWeird".to_string()),
            span(52, 60),
        ));
        let err = ElementLowerer::new(&config())
            .lower(el, &function_scope())
            .unwrap_err();
        assert_eq!(err.kind.code(), "JSX2TTL-ERR-PROPS");
        assert_eq!(err.span, Some(span(52, 60)));
    }

    #[test]
    fn test_member_component_tag() {
        let mut el = element("");
        el.tag = TagName::Member(vec!["UI".to_string(), "Button".to_string()]);
        let Lowered::Component(call) = ElementLowerer::new(&config())
            .lower(el, &function_scope())
            .unwrap()
        else {
            panic!("expected a component call");
        };
        assert_eq!(call.tag, "UI.Button");
    }

    #[test]
    fn test_lowercase_member_tag_is_plain() {
        let mut el = element("");
        el.tag = TagName::Member(vec!["ui".to_string(), "Button".to_string()]);
        let form = lower_template(&config(), el);
        assert_eq!(form.statics, statics(&["<ui.Button></ui.Button>"]));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // TAG VALIDATION
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_malformed_tags_are_rejected() {
        let bad = vec![
            TagName::identifier(""),
            TagName::identifier("1div"),
            TagName::identifier("My-Widget"),
            TagName::Member(vec!["Solo".to_string()]),
            TagName::Member(vec!["UI".to_string(), "".to_string()]),
            TagName::Namespaced {
                namespace: "Svg".to_string(),
                name: "rect".to_string(),
            },
            TagName::Namespaced {
                namespace: "_svg".to_string(),
                name: "rect".to_string(),
            },
        ];
        for tag in bad {
            let mut el = element("");
            el.tag = tag.clone();
            let err = ElementLowerer::new(&config())
                .lower(el, &function_scope())
                .unwrap_err();
            assert_eq!(err.kind.code(), "JSX2TTL-ERR-TAG", "tag {:?}", tag);
        }
    }

    #[test]
    fn test_custom_elements_and_namespaces_are_plain() {
        let mut el = element("my-widget");
        el.has_closing_tag = false;
        assert_eq!(lower_template(&config(), el).statics, statics(&["<my-widget />"]));

        let mut el = element("");
        el.tag = TagName::Namespaced {
            namespace: "svg".to_string(),
            name: "rect".to_string(),
        };
        el.has_closing_tag = false;
        assert_eq!(lower_template(&config(), el).statics, statics(&["<svg:rect />"]));
    }

    #[test]
    fn test_component_classification() {
        assert!(TagName::identifier("Card").is_component());
        assert!(TagName::identifier("Étoile").is_component());
        assert!(!TagName::identifier("div").is_component());
        assert!(TagName::identifier("_Private").is_component());
        assert!(TagName::identifier("$store").is_component());
        assert!(!TagName::identifier("div").is_component());
        assert!(!TagName::identifier("my-element").is_component());
        assert!(!TagName::Fragment.is_component());
    }
}
