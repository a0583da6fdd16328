//! Tests for the export engine.

use serde_json::{Value, json};

use super::test_fixtures::{
    COMPONENT_A, COMPONENT_A2, component_a, component_a2, configuration, default_document,
    merge_type,
};
use super::*;
use crate::descriptor::{DeclaredType, HolderChain, TagKind, TypeKind};

/// Registers the given components with a fresh exporter.
fn exporter_with(components: Vec<ComponentMeta>) -> ConfigExporter {
    let mut exporter = ConfigExporter::new();
    for mut meta in components {
        exporter.on_component_registered(&mut meta).unwrap();
    }
    exporter
}

fn keys(tree: &PropertyTree) -> Vec<String> {
    tree.iter().map(|(k, _)| k.to_string()).collect()
}

/// Operator configuration used by the merge tests.
fn operator_config() -> Value {
    json!({
        "Demo": {
            "a": "this is a test",
            "b": 20,
            "slice": ["hello", "world"],
            "array": [999, 888, 777],
            "m": {"select": 1},
        },
        "Merge": {
            "b": false,
            "s": "string",
            "sub": {"sub": "subSub"},
        },
        "app": {"configA": "cfgA", "configB": "cfgB"},
        "config": "hello",
    })
}

mod default_mode {
    use super::*;

    #[test]
    fn emits_declared_defaults() {
        let mut exporter = exporter_with(vec![component_a()]);
        let tree = exporter.get_config(Mode::empty());

        assert_eq!(tree.expand(), default_document());
    }

    #[test]
    fn ignores_existing_configuration() {
        let mut exporter = exporter_with(vec![component_a()]).with_existing(operator_config());
        let tree = exporter.get_config(Mode::empty());

        assert_eq!(tree.expand(), default_document());
    }

    #[test]
    fn emits_exactly_the_traversed_leaves() {
        let mut exporter = exporter_with(vec![component_a(), component_a2()]);
        let mut streamed = PropertyTree::new();
        exporter.for_each_leaf(|_, leaf| streamed.set(leaf.path, leaf.value.clone()));

        let tree = exporter.get_config(Mode::empty());
        assert_eq!(keys(&tree), keys(&streamed));
        assert_eq!(tree, streamed);
    }

    #[test]
    fn empty_map_fields_produce_no_leaves() {
        let mut exporter = exporter_with(vec![component_a()]);
        let tree = exporter.get_config(Mode::empty());

        assert!(!tree.contains("Demo.m"));
        assert!(!tree.contains("Merge.m2"));
        assert!(tree.iter().all(|(k, _)| !k.starts_with("Demo.m.")));
    }
}

mod for_each_leaf {
    use super::*;

    #[test]
    fn reports_root_and_owning_descriptor() {
        let mut exporter = exporter_with(vec![component_a()]);
        let mut seen = Vec::new();
        exporter.for_each_leaf(|property, leaf| {
            if leaf.root == "Merge" {
                seen.push((property.field.clone(), leaf.path.to_string()));
            }
        });

        assert!(seen.contains(&("Merge".to_string(), "Merge.subP.sub".to_string())));
        assert!(seen.iter().all(|(field, _)| field == "Merge"));
    }

    #[test]
    fn scalar_root_is_its_own_leaf() {
        let mut exporter = exporter_with(vec![component_a()]);
        let mut leaves = Vec::new();
        exporter.for_each_leaf(|_, leaf| {
            if leaf.root == "config" {
                leaves.push((leaf.path.to_string(), leaf.value.clone()));
            }
        });

        assert_eq!(leaves, vec![("config".to_string(), json!(""))]);
    }

    #[test]
    fn sees_declared_arguments_not_registration_overrides() {
        let meta = ComponentMeta::new("demo/V").with_property(
            configuration("demo/V", "Field", DeclaredType::scalar::<String>().unwrap(), "v")
                .with_arg("validate", ["eq=b"]),
        );
        let mut exporter = exporter_with(vec![meta]);

        let mut required = Vec::new();
        exporter.for_each_leaf(|property, _| {
            required.push(property.args.get(&crate::descriptor::ArgKind::Required).is_some());
        });

        assert_eq!(required, vec![false]);
    }
}

mod only_new {
    use super::*;

    #[test]
    fn skips_leaves_defined_in_existing_configuration() {
        let existing = operator_config();
        let mut exporter = exporter_with(vec![component_a()]).with_existing(existing.clone());
        let tree = exporter.get_config(Mode::ONLY_NEW);

        let mut all = exporter_with(vec![component_a()]);
        for (path, _) in all.get_config(Mode::empty()).iter() {
            assert_eq!(
                tree.contains(path),
                existing.lookup(path).is_none(),
                "path {path}"
            );
        }
    }

    #[test]
    fn keeps_new_leaves_with_defaults() {
        let mut exporter =
            exporter_with(vec![component_a()]).with_existing(operator_config());
        let tree = exporter.get_config(Mode::ONLY_NEW);

        assert_eq!(tree.get("Merge.s2"), Some(&json!("")));
        assert_eq!(tree.get("Merge.subP.sub"), Some(&json!("")));
        assert_eq!(tree.get("app.configSlice"), Some(&json!(["a", "b"])));
        assert!(!tree.contains("Demo.a"));
        assert!(!tree.contains("Merge.sub.sub"));
        assert!(!tree.contains("config"));
    }

    #[test]
    fn wins_over_append() {
        let mut exporter =
            exporter_with(vec![component_a()]).with_existing(operator_config());
        let tree = exporter.get_config(Mode::ONLY_NEW | Mode::APPEND);

        assert!(!tree.contains("Demo.a"));
        assert_eq!(tree.get("Merge.s2"), Some(&json!("")));
    }
}

mod append {
    use super::*;

    #[test]
    fn substitutes_existing_values_verbatim() {
        let mut exporter =
            exporter_with(vec![component_a()]).with_existing(operator_config());
        let tree = exporter.get_config(Mode::APPEND);

        assert_eq!(tree.get("Demo.a"), Some(&json!("this is a test")));
        assert_eq!(tree.get("Demo.b"), Some(&json!(20)));
        assert_eq!(tree.get("Demo.array"), Some(&json!([999, 888, 777])));
        assert_eq!(tree.get("Merge.sub.sub"), Some(&json!("subSub")));
        assert_eq!(tree.get("app.configB"), Some(&json!("cfgB")));
        assert_eq!(tree.get("config"), Some(&json!("hello")));
    }

    #[test]
    fn never_filters_leaves() {
        let mut exporter =
            exporter_with(vec![component_a()]).with_existing(operator_config());
        let appended = exporter.get_config(Mode::APPEND);
        let schema = exporter.get_config(Mode::empty());

        assert!(schema.iter().all(|(path, _)| appended.contains(path)));
        assert_eq!(appended.get("Merge.s2"), Some(&json!("")));
    }

    #[test]
    fn keeps_existing_map_entries_without_defaults() {
        let mut exporter =
            exporter_with(vec![component_a()]).with_existing(operator_config());
        let document = exporter.get_config(Mode::APPEND).expand();

        assert_eq!(document["Demo"]["m"], json!({"select": 1}));
        assert_eq!(document["Demo"]["a"], json!("this is a test"));
    }

    #[test]
    fn map_root_with_empty_default_takes_existing_entries() {
        let meta = ComponentMeta::new("demo/M").with_property(configuration(
            "demo/M",
            "Limits",
            DeclaredType::map::<std::collections::HashMap<String, i64>>().unwrap(),
            "Demo.m",
        ));
        let mut exporter = exporter_with(vec![meta])
            .with_existing(json!({"Demo": {"m": {"select": 1}}}));

        assert_eq!(
            exporter.get_config(Mode::APPEND).expand(),
            json!({"Demo": {"m": {"select": 1}}})
        );
        assert!(exporter.get_config(Mode::empty()).is_empty());
        assert!(exporter.get_config(Mode::APPEND | Mode::ONLY_NEW).is_empty());
    }

    #[test]
    fn scalar_roots_take_no_extra_entries() {
        let mut exporter = exporter_with(vec![component_a()])
            .with_existing(json!({"config": {"unexpected": true}}));
        let tree = exporter.get_config(Mode::APPEND);

        assert_eq!(tree.get("config"), Some(&json!({"unexpected": true})));
        assert!(!tree.contains("config.unexpected"));
    }
}

mod annotation_source {
    use super::*;

    #[test]
    fn accumulates_components_in_registration_order() {
        let mut exporter = exporter_with(vec![component_a(), component_a2()]);
        let tree = exporter.get_config(Mode::ANNOTATION_SOURCE);

        assert_eq!(
            tree.get("Merge@Sources"),
            Some(&json!([COMPONENT_A, COMPONENT_A2]))
        );
        assert_eq!(
            tree.get("Demo@Sources"),
            Some(&json!([COMPONENT_A, COMPONENT_A2]))
        );
    }

    #[test]
    fn renders_embedding_chain() {
        let mut exporter = exporter_with(vec![component_a()]);
        let tree = exporter.get_config(Mode::ANNOTATION_SOURCE);

        assert_eq!(
            tree.get("Merge.s2@Sources"),
            Some(&json!(["demo/A.Embed(MergeParent)"]))
        );
        assert_eq!(tree.get("app.configA@Sources"), Some(&json!(["demo/A"])));
    }

    #[test]
    fn each_root_of_a_descriptor_is_annotated() {
        let mut exporter = exporter_with(vec![component_a()]);
        let tree = exporter.get_config(Mode::ANNOTATION_SOURCE);

        assert_eq!(tree.get("app.configB@Sources"), Some(&json!(["demo/A"])));
        assert_eq!(tree.get("config@Sources"), Some(&json!(["demo/A"])));
    }

    #[test]
    fn survives_only_new_filtering() {
        let mut exporter = exporter_with(vec![component_a(), component_a2()])
            .with_existing(json!({"Demo": {"a": "x", "b": 1, "array": [], "slice": []}}));
        let tree = exporter.get_config(Mode::ANNOTATION_SOURCE | Mode::ONLY_NEW);

        assert!(tree.iter().all(|(k, _)| !k.starts_with("Demo.")));
        assert_eq!(
            tree.expand()["Demo@Sources"],
            json!([COMPONENT_A, COMPONENT_A2])
        );
    }

    #[test]
    fn property_variant_overrides_plain_rendering() {
        let mut exporter = exporter_with(vec![component_a(), component_a2()]);
        let tree = exporter
            .get_config(Mode::ANNOTATION_SOURCE | Mode::ANNOTATION_SOURCE_PROPERTY);

        assert_eq!(
            tree.get("Merge@Sources"),
            Some(&json!([
                "demo/A.Field(Merge).Tag(prop:'Merge').Type(MergeConfig)",
                "demo/A2.Field(MergeConfig).Tag(prop:'Merge').Type(MergeConfig)",
            ]))
        );
        assert_eq!(
            tree.get("config@Sources"),
            Some(&json!([
                "demo/A.Field(ConfigB).Tag(prop:'config').Raw('${app.configB:config}').Type(String)"
            ]))
        );
        assert_eq!(
            tree.get("Merge.b2@Sources"),
            Some(&json!([
                "demo/A.Embed(MergeParent).Field(B2).Tag(prop:'Merge.b2').Type(bool)"
            ]))
        );
    }
}

mod annotation_args {
    use super::*;

    fn validated_component() -> ComponentMeta {
        ComponentMeta::new("demo/V")
            .with_property(
                configuration("demo/V", "Name", DeclaredType::scalar::<String>().unwrap(), "v.name")
                    .with_arg("required", Vec::<String>::new())
                    .with_arg("validate", ["eq=b"]),
            )
            .with_property(
                configuration("demo/V", "Flag", DeclaredType::scalar::<bool>().unwrap(), "v.flag")
                    .with_arg("required", [""]),
            )
    }

    #[test]
    fn renders_flags_and_value_lists() {
        let mut exporter = exporter_with(vec![validated_component()]);
        let tree = exporter.get_config(Mode::ANNOTATION_ARGS);

        assert_eq!(tree.get("v.name@Args.required"), Some(&json!(true)));
        assert_eq!(tree.get("v.name@Args.validate"), Some(&json!(["eq=b"])));
        assert_eq!(tree.get("v.flag@Args.required"), Some(&json!(true)));
        assert_eq!(
            tree.expand()["v"]["name@Args"],
            json!({"required": true, "validate": ["eq=b"]})
        );
    }

    #[test]
    fn undeclared_arguments_are_not_annotated() {
        let mut exporter = exporter_with(vec![component_a()]);
        let tree = exporter.get_config(Mode::ANNOTATION_ARGS);

        assert!(tree.iter().all(|(k, _)| !k.contains(ARGS_SUFFIX)));
    }

    #[test]
    fn mode_without_flag_writes_no_annotations() {
        let mut exporter = exporter_with(vec![validated_component()]);
        let tree = exporter.get_config(Mode::APPEND);

        assert!(tree.iter().all(|(k, _)| !k.contains('@')));
    }
}

mod repeatability {
    use super::*;

    #[test]
    fn earlier_passes_do_not_leak_into_later_ones() {
        let modes = [
            Mode::empty(),
            Mode::APPEND,
            Mode::ONLY_NEW,
            Mode::ANNOTATION_ARGS | Mode::ANNOTATION_SOURCE,
            Mode::ANNOTATION_SOURCE_PROPERTY | Mode::APPEND,
        ];
        for first in modes {
            for second in modes {
                let fresh = || {
                    exporter_with(vec![component_a(), component_a2()])
                        .with_existing(operator_config())
                };
                let mut direct = fresh();
                let expected = direct.get_config(second);

                let mut chained = fresh();
                let _ = chained.get_config(first);
                assert_eq!(chained.get_config(second), expected, "{first:?} then {second:?}");
            }
        }
    }

    #[test]
    fn mutated_arguments_are_restored_from_snapshot() {
        let meta = ComponentMeta::new("demo/V").with_property(
            configuration("demo/V", "Name", DeclaredType::scalar::<String>().unwrap(), "v")
                .with_arg("validate", ["eq=b"]),
        );
        let mut exporter = exporter_with(vec![meta]);
        exporter.properties[0]
            .args
            .set(crate::descriptor::ArgKind::Validate, vec!["tampered".to_string()]);

        let tree = exporter.get_config(Mode::ANNOTATION_ARGS);
        assert_eq!(tree.get("v@Args.validate"), Some(&json!(["eq=b"])));
        assert!(!tree.contains("v@Args.required"));
    }

    #[test]
    fn missing_snapshot_means_no_arguments() {
        let mut exporter = ConfigExporter::new();
        exporter.properties.push(
            configuration("demo/X", "Name", DeclaredType::scalar::<String>().unwrap(), "x")
                .with_arg("required", ["true"]),
        );

        let tree = exporter.get_config(Mode::ANNOTATION_ARGS);
        assert_eq!(keys(&tree), vec!["x"]);
    }
}

mod fallbacks {
    use super::*;

    fn misdeclared() -> ComponentMeta {
        ComponentMeta::new("demo/F")
            .with_property(
                Property::new(HolderChain::new("demo/F"), "Broken", merge_type(), TagKind::Prop)
                    .with_tag("broken", "broken")
                    .with_configuration("broken", json!("not a map")),
            )
            .with_property(
                configuration("demo/F", "Mapped", merge_type(), "mapped")
                    .with_arg("mapper", ["xml"]),
            )
            .with_property(
                configuration("demo/F", "After", DeclaredType::scalar::<i32>().unwrap(), "after"),
            )
    }

    #[test]
    fn non_map_default_is_emitted_raw() {
        let mut exporter = exporter_with(vec![misdeclared()]);
        let tree = exporter.get_config(Mode::empty());

        assert_eq!(tree.get("broken"), Some(&json!("not a map")));
    }

    #[test]
    fn unknown_mapper_emits_zero_value_unflattened() {
        let mut exporter = exporter_with(vec![misdeclared()]);
        let tree = exporter.get_config(Mode::empty());

        assert_eq!(tree.get("mapped"), Some(&merge_type().zero));
        assert!(!tree.contains("mapped.s"));
    }

    #[test]
    fn traversal_continues_after_a_failure() {
        let mut exporter = exporter_with(vec![misdeclared()]);
        let tree = exporter.get_config(Mode::empty());

        assert_eq!(tree.get("after"), Some(&json!(0)));
    }

    #[test]
    fn mapper_argument_renames_fields() {
        #[derive(Debug, Default, serde::Serialize)]
        struct Pool {
            max_conns: u32,
        }

        let meta = ComponentMeta::new("demo/P").with_property(
            configuration("demo/P", "Pool", DeclaredType::structure::<Pool>().unwrap(), "pool")
                .with_arg("mapper", ["camelCase"]),
        );
        let mut exporter = exporter_with(vec![meta]);
        let tree = exporter.get_config(Mode::empty());

        assert_eq!(keys(&tree), vec!["pool.maxConns"]);
    }

    #[test]
    fn explicit_scalar_default_wins_over_zero() {
        let meta = ComponentMeta::new("demo/S").with_property(
            configuration(
                "demo/S",
                "Port",
                DeclaredType::new("u16", TypeKind::Scalar, json!(0)),
                "port",
            )
            .with_configuration("port", json!(8080)),
        );
        let mut exporter = exporter_with(vec![meta]);

        assert_eq!(exporter.get_config(Mode::empty()).get("port"), Some(&json!(8080)));
    }
}
