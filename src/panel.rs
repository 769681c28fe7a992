//! Per-mount parameter panel built from a sample's JSON Schema.
//!
//! A sample declares its parameters as a plain struct deriving
//! [`JsonSchema`], [`Serialize`], [`Deserialize`] and [`Default`]. Each
//! top-level field of that struct is a *group*; each field of a group is a
//! *control*. Control kinds are derived from the schema:
//!
//! | schema                                    | control              |
//! |-------------------------------------------|----------------------|
//! | `number` / `integer` with `range`, `step` | [`ControlKind::Slider`] |
//! | `boolean`                                 | [`ControlKind::Toggle`] |
//! | string enum (`enum` or `oneOf`/`const`)   | [`ControlKind::Choice`] |
//! | `string` with `format = "color"`          | [`ControlKind::Color`]  |
//! | any other `string`                        | [`ControlKind::Text`]   |
//!
//! ```ignore
//! #[derive(Serialize, Deserialize, JsonSchema)]
//! #[schemars(title = "Cube", inline)]
//! #[serde(default)]
//! struct CubeParams {
//!     #[schemars(range(min = 0.1, max = 3.0), extend("step" = 0.1))]
//!     size: f32,
//!     #[schemars(extend("format" = "color"))]
//!     color: String,
//! }
//! ```
//!
//! A [`ParameterPanel`] holds the live values for one mount and is dropped
//! with it.

use schemars::JsonSchema;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::VistaError;
use crate::scene::parse_hex_color;

/// Kind of control rendered for one parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
    /// Numeric slider.
    Slider {
        /// Lower bound (inclusive).
        min: f64,
        /// Upper bound (inclusive).
        max: f64,
        /// Increment between values.
        step: f64,
        /// Values are whole numbers.
        integer: bool,
    },
    /// On/off switch.
    Toggle,
    /// Pick one of a fixed set of strings.
    Choice {
        /// Allowed values in declaration order.
        options: Vec<String>,
    },
    /// `#rrggbb` color picker.
    Color,
    /// Free text.
    Text,
}

/// One control inside a [`ParameterGroup`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterField {
    /// Property name in the parameter struct.
    pub key: String,
    /// Display label.
    pub label: String,
    /// Control kind and constraints.
    #[serde(flatten)]
    pub kind: ControlKind,
    /// Value the field starts with and resets to.
    pub default: Value,
}

/// Titled group of controls (one folder in the panel).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterGroup {
    /// Property name of the group; empty for top-level fields.
    pub key: String,
    /// Display title.
    pub title: String,
    /// Controls in declaration order.
    pub fields: Vec<ParameterField>,
}

// ── PanelSpec ────────────────────────────────────────────────────────────

/// Parameter declarations of one sample: groups, controls and defaults.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PanelSpec {
    groups: Vec<ParameterGroup>,
    defaults: Value,
}

impl PanelSpec {
    /// Declarations for a sample without parameters.
    #[must_use]
    pub fn none() -> Self {
        Self {
            groups: Vec::new(),
            defaults: Value::Object(Map::new()),
        }
    }

    /// Build declarations from a parameter struct's schema and defaults.
    #[must_use]
    pub fn of<P>() -> Self
    where
        P: JsonSchema + Serialize + Default,
    {
        let schema = serde_json::to_value(schemars::schema_for!(P));
        let defaults = serde_json::to_value(P::default());
        match (schema, defaults) {
            (Ok(schema), Ok(defaults)) => Self::from_schema(&schema, defaults),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("parameter schema unavailable: {e}");
                Self::none()
            }
        }
    }

    /// Build declarations from an already serialized schema and defaults.
    #[must_use]
    pub fn from_schema(schema: &Value, defaults: Value) -> Self {
        let mut groups = Vec::new();
        let mut loose = Vec::new();
        let Some(props) = schema.get("properties").and_then(Value::as_object)
        else {
            return Self { groups, defaults };
        };
        for (key, prop) in props {
            let prop = resolve_ref(prop, schema);
            if let Some(fields) =
                prop.get("properties").and_then(Value::as_object)
            {
                let group_defaults = defaults.get(key);
                groups.push(ParameterGroup {
                    key: key.clone(),
                    title: title_of(prop, key),
                    fields: fields
                        .iter()
                        .filter_map(|(name, field)| {
                            parse_field(
                                name,
                                resolve_ref(field, schema),
                                group_defaults.and_then(|d| d.get(name)),
                            )
                        })
                        .collect(),
                });
            } else if let Some(field) =
                parse_field(key, prop, defaults.get(key))
            {
                loose.push(field);
            }
        }
        if !loose.is_empty() {
            groups.insert(
                0,
                ParameterGroup {
                    key: String::new(),
                    title: "Parameters".to_owned(),
                    fields: loose,
                },
            );
        }
        Self { groups, defaults }
    }

    /// Control groups in declaration order.
    #[must_use]
    pub fn groups(&self) -> &[ParameterGroup] {
        &self.groups
    }

    /// Default values as a JSON object shaped like the parameter struct.
    #[must_use]
    pub fn defaults(&self) -> &Value {
        &self.defaults
    }

    /// Total number of controls across all groups.
    #[must_use]
    pub fn parameter_count(&self) -> usize {
        self.groups.iter().map(|g| g.fields.len()).sum()
    }

    /// `true` if there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameter_count() == 0
    }

    fn field(&self, group: &str, key: &str) -> Option<&ParameterField> {
        self.groups
            .iter()
            .find(|g| g.key == group)?
            .fields
            .iter()
            .find(|f| f.key == key)
    }
}

fn resolve_ref<'a>(schema: &'a Value, root: &'a Value) -> &'a Value {
    schema
        .get("$ref")
        .and_then(Value::as_str)
        .and_then(|r| r.strip_prefix("#/$defs/"))
        .and_then(|name| root.get("$defs")?.get(name))
        .unwrap_or(schema)
}

fn title_of(schema: &Value, key: &str) -> String {
    schema
        .get("title")
        .and_then(Value::as_str)
        .map_or_else(|| display_name(key), str::to_owned)
}

/// `"metal_roughness"` → `"Metal Roughness"`.
fn display_name(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                format!("{}{}", first.to_uppercase(), chars.as_str())
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn choice_options(schema: &Value) -> Option<Vec<String>> {
    if let Some(values) = schema.get("enum").and_then(Value::as_array) {
        return Some(
            values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect(),
        );
    }
    let variants = schema.get("oneOf").and_then(Value::as_array)?;
    Some(
        variants
            .iter()
            .filter_map(|v| {
                v.get("const")
                    .or_else(|| v.get("enum").and_then(|e| e.get(0)))
                    .and_then(Value::as_str)
                    .map(str::to_owned)
            })
            .collect(),
    )
}

fn parse_field(
    key: &str,
    schema: &Value,
    default: Option<&Value>,
) -> Option<ParameterField> {
    let ty = schema.get("type").and_then(Value::as_str);
    let kind = match ty {
        Some("number" | "integer") => {
            let min = schema.get("minimum").and_then(Value::as_f64);
            let max = schema.get("maximum").and_then(Value::as_f64);
            let integer = ty == Some("integer");
            let (min, max) = match (min, max) {
                (Some(min), Some(max)) => (min, max),
                _ => {
                    log::debug!("parameter '{key}' has no range, using 0..1");
                    (0.0, 1.0)
                }
            };
            let step = schema
                .get("step")
                .and_then(Value::as_f64)
                .unwrap_or(if integer { 1.0 } else { (max - min) / 100.0 });
            ControlKind::Slider {
                min,
                max,
                step,
                integer,
            }
        }
        Some("boolean") => ControlKind::Toggle,
        Some("string") | None => {
            if let Some(options) = choice_options(schema) {
                ControlKind::Choice { options }
            } else if ty.is_none() {
                log::warn!("parameter '{key}' has an unsupported schema");
                return None;
            } else if schema.get("format").and_then(Value::as_str)
                == Some("color")
            {
                ControlKind::Color
            } else {
                ControlKind::Text
            }
        }
        Some(other) => {
            log::warn!("parameter '{key}' has unsupported type '{other}'");
            return None;
        }
    };
    Some(ParameterField {
        key: key.to_owned(),
        label: title_of(schema, key),
        kind,
        default: default.cloned().unwrap_or(Value::Null),
    })
}

// ── ParameterPanel ───────────────────────────────────────────────────────

/// Live parameter values of one mounted sample.
#[derive(Debug, Clone)]
pub struct ParameterPanel {
    spec: PanelSpec,
    values: Value,
    revision: u64,
}

impl ParameterPanel {
    /// Panel initialized to the declared defaults.
    #[must_use]
    pub fn new(spec: PanelSpec) -> Self {
        let values = spec.defaults.clone();
        Self {
            spec,
            values,
            revision: 0,
        }
    }

    /// Declarations this panel was built from.
    #[must_use]
    pub fn spec(&self) -> &PanelSpec {
        &self.spec
    }

    /// Current values, shaped like the parameter struct.
    #[must_use]
    pub fn values(&self) -> &Value {
        &self.values
    }

    /// Incremented on every accepted edit or reset.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Current value of one control.
    #[must_use]
    pub fn get(&self, group: &str, key: &str) -> Option<&Value> {
        if group.is_empty() {
            self.values.get(key)
        } else {
            self.values.get(group)?.get(key)
        }
    }

    /// Apply an edit from the UI.
    ///
    /// Slider values are clamped to their range (and rounded for integer
    /// sliders). Values of the wrong type, unknown choices, malformed
    /// colors and unknown controls are rejected and leave the panel
    /// unchanged.
    pub fn set(
        &mut self,
        group: &str,
        key: &str,
        value: Value,
    ) -> Result<(), VistaError> {
        let field = self.spec.field(group, key).ok_or_else(|| {
            VistaError::Parameter(format!("unknown control '{group}.{key}'"))
        })?;
        let accepted = coerce(field, value)?;
        let slot = if group.is_empty() {
            self.values.as_object_mut()
        } else {
            self.values
                .get_mut(group)
                .and_then(Value::as_object_mut)
        };
        let Some(slot) = slot else {
            return Err(VistaError::Parameter(format!(
                "group '{group}' has no values"
            )));
        };
        let _ = slot.insert(key.to_owned(), accepted);
        self.revision += 1;
        Ok(())
    }

    /// Restore every control to its default.
    pub fn reset(&mut self) {
        self.values = self.spec.defaults.clone();
        self.revision += 1;
    }

    /// Deserialize the current values into the sample's parameter struct.
    ///
    /// Falls back to `P::default()` if the values do not fit `P`.
    #[must_use]
    pub fn read<P>(&self) -> P
    where
        P: DeserializeOwned + Default,
    {
        P::deserialize(&self.values).unwrap_or_else(|e| {
            log::warn!("parameter values do not deserialize: {e}");
            P::default()
        })
    }
}

fn rejection(field: &ParameterField, what: &str, value: &Value) -> VistaError {
    VistaError::Parameter(format!(
        "'{}' expects {what}, got {value}",
        field.key
    ))
}

fn coerce(field: &ParameterField, value: Value) -> Result<Value, VistaError> {
    match &field.kind {
        ControlKind::Slider {
            min,
            max,
            integer,
            ..
        } => {
            let Some(n) = value.as_f64() else {
                return Err(rejection(field, "a number", &value));
            };
            let clamped = n.clamp(*min, *max);
            if *integer {
                Ok(Value::from(clamped.round() as i64))
            } else {
                Ok(serde_json::Number::from_f64(clamped)
                    .map_or(Value::Null, Value::Number))
            }
        }
        ControlKind::Toggle if value.is_boolean() => Ok(value),
        ControlKind::Toggle => Err(rejection(field, "a boolean", &value)),
        ControlKind::Choice { options }
            if value.as_str().is_some_and(|s| options.iter().any(|o| o == s)) =>
        {
            Ok(value)
        }
        ControlKind::Choice { .. } => {
            Err(rejection(field, "one of the listed options", &value))
        }
        ControlKind::Color
            if value.as_str().and_then(parse_hex_color).is_some() =>
        {
            Ok(value)
        }
        ControlKind::Color => Err(rejection(field, "a #rrggbb color", &value)),
        ControlKind::Text if value.is_string() => Ok(value),
        ControlKind::Text => Err(rejection(field, "text", &value)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
    #[serde(rename_all = "snake_case")]
    enum Shape {
        /// A cube.
        #[default]
        Cube,
        /// A sphere.
        Sphere,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
    #[schemars(title = "Object", inline)]
    #[serde(default)]
    struct ObjectParams {
        #[schemars(title = "Size", range(min = 0.5, max = 3.0), extend("step" = 0.1))]
        size: f32,
        #[schemars(range(min = 1, max = 64))]
        segments: u32,
        #[schemars(extend("format" = "color"))]
        color: String,
        wireframe: bool,
        shape: Shape,
    }

    impl Default for ObjectParams {
        fn default() -> Self {
            Self {
                size: 1.0,
                segments: 16,
                color: "#00ff88".to_owned(),
                wireframe: false,
                shape: Shape::Cube,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
    #[serde(default)]
    struct Params {
        object: ObjectParams,
    }

    fn panel() -> ParameterPanel {
        ParameterPanel::new(PanelSpec::of::<Params>())
    }

    #[test]
    fn groups_and_kinds_follow_the_schema() {
        let spec = PanelSpec::of::<Params>();
        assert_eq!(spec.groups().len(), 1);
        let group = &spec.groups()[0];
        assert_eq!(group.key, "object");
        assert_eq!(group.title, "Object");
        let keys: Vec<_> = group.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, ["size", "segments", "color", "wireframe", "shape"]);

        assert!(matches!(
            group.fields[0].kind,
            ControlKind::Slider { min, max, integer: false, .. } if min == 0.5 && max == 3.0
        ));
        assert!(matches!(
            group.fields[1].kind,
            ControlKind::Slider { integer: true, step, .. } if step == 1.0
        ));
        assert_eq!(group.fields[2].kind, ControlKind::Color);
        assert_eq!(group.fields[3].kind, ControlKind::Toggle);
        assert_eq!(
            group.fields[4].kind,
            ControlKind::Choice {
                options: vec!["cube".to_owned(), "sphere".to_owned()]
            }
        );
        assert_eq!(group.fields[3].label, "Wireframe");
        assert_eq!(group.fields[0].default, json!(1.0));
        assert_eq!(spec.parameter_count(), 5);
    }

    #[test]
    fn edits_are_read_back() {
        let mut panel = panel();
        panel.set("object", "size", json!(2.5)).unwrap();
        panel.set("object", "shape", json!("sphere")).unwrap();
        panel.set("object", "wireframe", json!(true)).unwrap();
        let params: Params = panel.read();
        assert_eq!(params.object.size, 2.5);
        assert_eq!(params.object.shape, Shape::Sphere);
        assert!(params.object.wireframe);
        assert_eq!(panel.revision(), 3);
    }

    #[test]
    fn sliders_clamp_and_round() {
        let mut panel = panel();
        panel.set("object", "size", json!(99.0)).unwrap();
        panel.set("object", "segments", json!(7.6)).unwrap();
        assert_eq!(panel.get("object", "size"), Some(&json!(3.0)));
        assert_eq!(panel.get("object", "segments"), Some(&json!(8)));
    }

    #[test]
    fn invalid_edits_are_rejected() {
        let mut panel = panel();
        assert!(panel.set("object", "size", json!("big")).is_err());
        assert!(panel.set("object", "shape", json!("torus")).is_err());
        assert!(panel.set("object", "color", json!("green")).is_err());
        assert!(panel.set("object", "color", json!("#+1+2+3")).is_err());
        assert!(panel.set("object", "missing", json!(1)).is_err());
        assert!(panel.set("nope", "size", json!(1)).is_err());
        assert_eq!(panel.read::<Params>(), Params::default());
        assert_eq!(panel.revision(), 0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut panel = panel();
        panel.set("object", "color", json!("#ff0000")).unwrap();
        panel.reset();
        assert_eq!(panel.read::<Params>(), Params::default());
    }

    #[test]
    fn panels_are_independent() {
        let mut a = panel();
        let b = panel();
        a.set("object", "size", json!(2.0)).unwrap();
        assert_eq!(b.read::<Params>().object.size, 1.0);
    }

    #[test]
    fn display_names_are_title_cased() {
        assert_eq!(display_name("metal_roughness"), "Metal Roughness");
        assert_eq!(display_name("x"), "X");
    }

    #[test]
    fn empty_spec_has_no_controls() {
        let spec = PanelSpec::none();
        assert!(spec.is_empty());
        assert_eq!(ParameterPanel::new(spec).read::<Params>(), Params::default());
    }
}
