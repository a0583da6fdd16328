//! Shared component fixtures for exporter tests.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Value, json};

use crate::descriptor::{DeclaredType, HolderChain, Property, TagKind};

use super::ComponentMeta;

pub const COMPONENT_A: &str = "demo/A";
pub const COMPONENT_A2: &str = "demo/A2";

#[derive(Debug, Default, Serialize)]
pub struct SubConfig {
    pub sub: String,
}

#[derive(Debug, Default, Serialize)]
pub struct Config {
    pub a: String,
    pub b: i64,
    pub slice: Vec<String>,
    pub array: [f64; 3],
    pub m: HashMap<String, i64>,
}

#[derive(Debug, Default, Serialize)]
pub struct MergeConfig {
    pub s: String,
    pub b: bool,
    pub m: HashMap<String, i64>,
    pub slice: Vec<f64>,
    pub sub: SubConfig,
    #[serde(rename = "subP")]
    pub sub_p: Option<SubConfig>,
}

fn scalar<T: Serialize + Default>() -> DeclaredType {
    DeclaredType::scalar::<T>().unwrap()
}

fn sub_type() -> DeclaredType {
    DeclaredType::structure::<SubConfig>().unwrap()
}

pub fn config_type() -> DeclaredType {
    DeclaredType::structure::<Config>()
        .unwrap()
        .with_field("m", DeclaredType::map::<HashMap<String, i64>>().unwrap())
        .optional()
}

pub fn merge_type() -> DeclaredType {
    DeclaredType::structure::<MergeConfig>()
        .unwrap()
        .with_field("m", DeclaredType::map::<HashMap<String, i64>>().unwrap())
        .with_field("subP", sub_type().optional())
        .optional()
}

fn prop(holder: &HolderChain, field: &str, ty: DeclaredType, kind: TagKind, tag: &str) -> Property {
    Property::new(holder.clone(), field, ty, kind).with_tag(tag, tag)
}

/// Bare configuration field rooted at `prefix`.
pub fn configuration(component: &str, field: &str, ty: DeclaredType, prefix: &str) -> Property {
    prop(&HolderChain::new(component), field, ty, TagKind::Configuration, prefix)
        .with_configuration(prefix, Value::Null)
}

/// Fields of the `MergeParent` struct embedded in component A.
fn merge_parent(component: &str) -> Vec<Property> {
    let holder = HolderChain::new(component).embed("MergeParent");
    let field = |name: &str, ty: DeclaredType, path: &str| {
        prop(&holder, name, ty, TagKind::Prop, path).with_configuration(path, Value::Null)
    };
    vec![
        field("S2", scalar::<String>(), "Merge.s2"),
        field("B2", scalar::<bool>(), "Merge.b2"),
        field(
            "M2",
            DeclaredType::map::<HashMap<String, String>>().unwrap(),
            "Merge.m2",
        ),
        field("Slice2", scalar::<Vec<i64>>(), "Merge.slice2"),
        field("Sub2", sub_type(), "Merge.sub2"),
        field("SubP2", sub_type().optional(), "Merge.subP2"),
    ]
}

/// Component A: embedded parent, placeholder props, two configurations and a wiring field.
pub fn component_a() -> ComponentMeta {
    let holder = HolderChain::new(COMPONENT_A);
    let mut meta = ComponentMeta::new(COMPONENT_A);
    meta.properties.extend(merge_parent(COMPONENT_A));
    meta.properties.extend([
        prop(&holder, "ConfigA", scalar::<String>(), TagKind::Prop, "app.configA")
            .with_configuration("app.configA", Value::Null),
        prop(&holder, "ConfigB", scalar::<String>(), TagKind::Prop, "config")
            .with_tag("${app.configB:config}", "config")
            .with_configuration("app.configB", json!("config"))
            .with_configuration("config", Value::Null),
        prop(&holder, "ConfigSlice", scalar::<Vec<String>>(), TagKind::Value, "")
            .with_tag("${app.configSlice:[a,b]}", r#"["a","b"]"#)
            .with_configuration("app.configSlice", json!(["a", "b"])),
        prop(&holder, "ValueA", scalar::<String>(), TagKind::Value, "abc"),
        prop(&holder, "ValueB", scalar::<String>(), TagKind::Value, "")
            .with_tag("${app.valueB:abc}", "abc")
            .with_configuration("app.valueB", json!("abc")),
        configuration(COMPONENT_A, "Config", config_type(), "Demo"),
        configuration(COMPONENT_A, "Merge", merge_type(), "Merge"),
        prop(&holder, "Greeting", scalar::<String>(), TagKind::Prop, "").as_component(),
    ]);
    meta
}

/// Component A2: the same two configurations as A, under different field names.
pub fn component_a2() -> ComponentMeta {
    ComponentMeta::new(COMPONENT_A2)
        .with_property(configuration(COMPONENT_A2, "Config", config_type(), "Demo"))
        .with_property(configuration(COMPONENT_A2, "MergeConfig", merge_type(), "Merge"))
}

/// Expanded output of an empty-mode export of component A.
pub fn default_document() -> Value {
    json!({
        "Merge": {
            "s2": "",
            "b2": false,
            "slice2": [],
            "sub2": {"sub": ""},
            "subP2": {"sub": ""},
            "b": false,
            "s": "",
            "slice": [],
            "sub": {"sub": ""},
            "subP": {"sub": ""},
        },
        "app": {
            "configA": "",
            "configB": "config",
            "configSlice": ["a", "b"],
            "valueB": "abc",
        },
        "config": "",
        "Demo": {
            "a": "",
            "array": [0.0, 0.0, 0.0],
            "b": 0,
            "slice": [],
        },
    })
}
