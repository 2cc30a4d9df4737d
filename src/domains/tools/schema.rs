//! Declarative parameter schemas.
//!
//! A [`Schema`] is pure data: an ordered map from parameter name to
//! [`ParamSpec`]. Order is the declaration order and drives help output.
//! The serde shape matches the plugin description contract:
//!
//! ```json
//! {"name": "...", "description": "...",
//!  "parameters": {"folder": {"type": "string", "description": "...", "required": true}}}
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// The value types a parameter can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    #[serde(alias = "integer")]
    Int,
    #[serde(alias = "number")]
    Float,
    #[serde(alias = "boolean")]
    Bool,
}

impl ParamType {
    /// The name used in help text and in `tools/list` schemas.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One schema entry.
///
/// `default` is informational only: validation never injects it, and it is
/// ignored entirely when `required` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    #[serde(rename = "type", default)]
    pub param_type: ParamType,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParamSpec {
    /// Create a required parameter.
    pub fn required(param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            param_type,
            description: description.into(),
            required: true,
            default: None,
        }
    }

    /// Create an optional parameter without a documented default.
    pub fn optional(param_type: ParamType, description: impl Into<String>) -> Self {
        Self {
            param_type,
            description: description.into(),
            required: false,
            default: None,
        }
    }

    /// Document the default the tool falls back to.
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The default, unless the parameter is required.
    pub fn effective_default(&self) -> Option<&Value> {
        if self.required {
            None
        } else {
            self.default.as_ref()
        }
    }
}

/// Ordered parameter declarations of a tool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schema {
    params: IndexMap<String, ParamSpec>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter. Re-declaring a name replaces the earlier spec.
    pub fn param(mut self, name: impl Into<String>, spec: ParamSpec) -> Self {
        self.params.insert(name.into(), spec);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.params.contains_key(name)
    }

    /// Parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
        self.params.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Names of required parameters, in declaration order.
    pub fn required_names(&self) -> Vec<&str> {
        self.iter()
            .filter(|(_, spec)| spec.required)
            .map(|(name, _)| name)
            .collect()
    }

    /// The documented default of an optional parameter.
    pub fn default_for(&self, name: &str) -> Option<&Value> {
        self.get(name).and_then(ParamSpec::effective_default)
    }

    /// Render as the generic object schema used by `tools/list`.
    pub fn to_input_schema(&self) -> Value {
        let properties: serde_json::Map<String, Value> = self
            .iter()
            .map(|(name, spec)| {
                (
                    name.to_string(),
                    json!({
                        "type": spec.param_type.as_str(),
                        "description": spec.description,
                    }),
                )
            })
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": self.required_names(),
        })
    }
}

/// What a tool says about itself: the plugin "describe" capability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescription {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub parameters: Schema,
}

impl ToolDescription {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Schema::new(),
        }
    }

    /// Set the parameter schema.
    pub fn with_parameters(mut self, parameters: Schema) -> Self {
        self.parameters = parameters;
        self
    }
}
