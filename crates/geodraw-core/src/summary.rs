//! Compact shape description sent with `draw:created` and `draw:deleted`.
//!
//! Only circles, rectangles and markers are described; every other kind is
//! sent as an empty object. This is deliberately less than the full feature
//! sent with `draw:edited`.

use crate::model::{LatLng, LatLngBounds, Shape};
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeSummary {
    Circle { center: LatLng, radius: f64 },
    Rectangle { bounds: LatLngBounds },
    Marker { position: LatLng },
    /// Any other kind. Serialized as `{}`.
    Empty,
}

impl ShapeSummary {
    pub fn of(shape: &Shape) -> Self {
        match shape {
            Shape::Circle { center, radius } => ShapeSummary::Circle {
                center: *center,
                radius: *radius,
            },
            Shape::Rectangle { bounds } => ShapeSummary::Rectangle { bounds: *bounds },
            Shape::Marker { position } => ShapeSummary::Marker {
                position: *position,
            },
            Shape::CircleMarker { .. } | Shape::Polyline { .. } | Shape::Polygon { .. } => {
                ShapeSummary::Empty
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ShapeSummary::Empty)
    }
}

impl From<&Shape> for ShapeSummary {
    fn from(shape: &Shape) -> Self {
        ShapeSummary::of(shape)
    }
}

impl Serialize for ShapeSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ShapeSummary::Circle { center, radius } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("type", "Circle")?;
                map.serialize_entry("center", center)?;
                map.serialize_entry("radius", radius)?;
                map.end()
            }
            ShapeSummary::Rectangle { bounds } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "Rectangle")?;
                map.serialize_entry("bounds", bounds)?;
                map.end()
            }
            ShapeSummary::Marker { position } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("type", "Marker")?;
                map.serialize_entry("position", position)?;
                map.end()
            }
            ShapeSummary::Empty => serializer.serialize_map(Some(0))?.end(),
        }
    }
}
