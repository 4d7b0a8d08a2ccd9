//! Widget state for the draw control.
//!
//! `DrawModel` mirrors the synchronized widget attributes: per-kind tool
//! options, the `edit`/`remove` toolbar flags, the control `position`, and
//! `data`, the drawn features. Values are passed through uninterpreted, so a
//! malformed attribute never fails deserialization of the others.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Value, json};

/// Options for one drawing tool, as given by the host.
///
/// The tool is enabled iff the value has at least one key, the way
/// `Object.keys(..).length` reads it: non-empty objects, arrays and strings
/// count, every other value is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolOptions(pub Value);

impl Default for ToolOptions {
    fn default() -> Self {
        ToolOptions(json!({}))
    }
}

impl ToolOptions {
    /// Default for the path tools.
    pub fn with_shape_options() -> Self {
        ToolOptions(json!({ "shapeOptions": {} }))
    }

    pub fn is_enabled(&self) -> bool {
        match &self.0 {
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.is_empty(),
            _ => false,
        }
    }

    /// `Some(self)` when enabled.
    pub fn enabled(&self) -> Option<ToolOptions> {
        self.is_enabled().then(|| self.clone())
    }
}

fn default_true() -> bool {
    true
}

fn default_position() -> String {
    "topleft".to_string()
}

/// Synchronized draw-control attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawModel {
    #[serde(default = "ToolOptions::with_shape_options")]
    pub polyline: ToolOptions,
    #[serde(default = "ToolOptions::with_shape_options")]
    pub polygon: ToolOptions,
    #[serde(default)]
    pub circle: ToolOptions,
    #[serde(default)]
    pub circlemarker: ToolOptions,
    #[serde(default)]
    pub rectangle: ToolOptions,
    #[serde(default)]
    pub marker: ToolOptions,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default = "default_true")]
    pub edit: bool,
    #[serde(default = "default_true")]
    pub remove: bool,
    #[serde(default = "default_position")]
    pub position: String,
}

impl Default for DrawModel {
    fn default() -> Self {
        Self {
            polyline: ToolOptions::with_shape_options(),
            polygon: ToolOptions::with_shape_options(),
            circle: ToolOptions::default(),
            circlemarker: ToolOptions::default(),
            rectangle: ToolOptions::default(),
            marker: ToolOptions::default(),
            data: Vec::new(),
            edit: true,
            remove: true,
            position: default_position(),
        }
    }
}

impl DrawModel {
    /// Parse widget state; missing attributes take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// Replace `data`. Returns `true` when the value actually changed.
    pub fn set_data(&mut self, data: Vec<Value>) -> bool {
        if self.data == data {
            return false;
        }
        self.data = data;
        true
    }

    /// Options for the draw control. Polyline, polygon and circle-marker
    /// drawing are never offered regardless of their options.
    pub fn toolbar_options(&self) -> DrawControlOptions {
        DrawControlOptions {
            position: self.position.clone(),
            edit: EditToolbarOptions {
                edit: self.edit,
                remove: self.remove,
            },
            draw: DrawToolbarOptions {
                polyline: None,
                polygon: None,
                circle: self.circle.enabled(),
                circlemarker: None,
                rectangle: self.rectangle.enabled(),
                marker: self.marker.enabled(),
            },
        }
    }
}

// ─── Draw control options ────────────────────────────────────────────────

/// Construction options for the map engine's draw control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawControlOptions {
    pub position: String,
    pub edit: EditToolbarOptions,
    pub draw: DrawToolbarOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditToolbarOptions {
    pub edit: bool,
    pub remove: bool,
}

/// Per-kind tool options; `None` disables the tool and serializes as `false`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawToolbarOptions {
    #[serde(serialize_with = "tool_or_false")]
    pub polyline: Option<ToolOptions>,
    #[serde(serialize_with = "tool_or_false")]
    pub polygon: Option<ToolOptions>,
    #[serde(serialize_with = "tool_or_false")]
    pub circle: Option<ToolOptions>,
    #[serde(serialize_with = "tool_or_false")]
    pub circlemarker: Option<ToolOptions>,
    #[serde(serialize_with = "tool_or_false")]
    pub rectangle: Option<ToolOptions>,
    #[serde(serialize_with = "tool_or_false")]
    pub marker: Option<ToolOptions>,
}

fn tool_or_false<S: Serializer>(tool: &Option<ToolOptions>, s: S) -> Result<S::Ok, S::Error> {
    match tool {
        Some(options) => options.serialize(s),
        None => s.serialize_bool(false),
    }
}

impl DrawToolbarOptions {
    /// Names of the tools the control will offer.
    pub fn enabled_kinds(&self) -> Vec<&'static str> {
        [
            ("polyline", &self.polyline),
            ("polygon", &self.polygon),
            ("circle", &self.circle),
            ("circlemarker", &self.circlemarker),
            ("rectangle", &self.rectangle),
            ("marker", &self.marker),
        ]
        .into_iter()
        .filter_map(|(name, tool)| tool.as_ref().map(|_| name))
        .collect()
    }
}
