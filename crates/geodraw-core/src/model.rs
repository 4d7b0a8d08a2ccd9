//! Core shape model for drawn map layers.
//!
//! A drawn shape is a `Layer`: a stamped `Shape` plus the style options it was
//! drawn with and any GeoJSON properties it carried in. Shapes form a small
//! is-a taxonomy inherited from the map engine (a rectangle is a polygon, a
//! polygon is a polyline, a circle is a circle marker). Here that taxonomy is
//! a closed enum with explicit lineage tag sets, so every subtype test is a
//! plain membership check.

use crate::id::LayerId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form layer options (colour, weight, opacity, ...). Carried verbatim.
pub type Style = Map<String, Value>;

/// GeoJSON properties other than the ones this crate owns (`style`, `shape`).
pub type Properties = Map<String, Value>;

// ─── Coordinates ─────────────────────────────────────────────────────────

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Axis-aligned box in lat/lng space. Uses the engine's wire field names.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    #[serde(rename = "_southWest")]
    pub south_west: LatLng,
    #[serde(rename = "_northEast")]
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub const fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Smallest bounds containing every point, or `None` when empty.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a LatLng>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        let mut sw = first;
        let mut ne = first;
        for p in iter {
            sw.lat = sw.lat.min(p.lat);
            sw.lng = sw.lng.min(p.lng);
            ne.lat = ne.lat.max(p.lat);
            ne.lng = ne.lng.max(p.lng);
        }
        Some(Self::new(sw, ne))
    }

    pub fn north_west(&self) -> LatLng {
        LatLng::new(self.north_east.lat, self.south_west.lng)
    }

    pub fn south_east(&self) -> LatLng {
        LatLng::new(self.south_west.lat, self.north_east.lng)
    }

    /// Corner ring in engine order: SW, NW, NE, SE (unclosed).
    pub fn corners(&self) -> [LatLng; 4] {
        [
            self.south_west,
            self.north_west(),
            self.north_east,
            self.south_east(),
        ]
    }
}

// ─── Shape taxonomy ──────────────────────────────────────────────────────

/// Closed set of shape tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Polyline,
    Polygon,
    Rectangle,
    Circle,
    CircleMarker,
    Marker,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 6] = [
        ShapeKind::Polyline,
        ShapeKind::Polygon,
        ShapeKind::Rectangle,
        ShapeKind::Circle,
        ShapeKind::CircleMarker,
        ShapeKind::Marker,
    ];

    /// Every tag this kind is-a, most specific first.
    pub fn lineage(self) -> &'static [ShapeKind] {
        match self {
            ShapeKind::Polyline => &[ShapeKind::Polyline],
            ShapeKind::Polygon => &[ShapeKind::Polygon, ShapeKind::Polyline],
            ShapeKind::Rectangle => &[
                ShapeKind::Rectangle,
                ShapeKind::Polygon,
                ShapeKind::Polyline,
            ],
            ShapeKind::Circle => &[ShapeKind::Circle, ShapeKind::CircleMarker],
            ShapeKind::CircleMarker => &[ShapeKind::CircleMarker],
            ShapeKind::Marker => &[ShapeKind::Marker],
        }
    }

    pub fn is_a(self, ancestor: ShapeKind) -> bool {
        self.lineage().contains(&ancestor)
    }

    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Polyline => "Polyline",
            ShapeKind::Polygon => "Polygon",
            ShapeKind::Rectangle => "Rectangle",
            ShapeKind::Circle => "Circle",
            ShapeKind::CircleMarker => "CircleMarker",
            ShapeKind::Marker => "Marker",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }
}

/// Geometry of a drawn layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Shape {
    Marker {
        position: LatLng,
    },
    /// Radius in screen pixels.
    CircleMarker {
        center: LatLng,
        radius: f64,
    },
    /// Radius in metres.
    Circle {
        center: LatLng,
        radius: f64,
    },
    Polyline {
        latlngs: Vec<LatLng>,
    },
    /// Unclosed rings; the first is the outer boundary, the rest are holes.
    Polygon {
        rings: Vec<Vec<LatLng>>,
    },
    Rectangle {
        bounds: LatLngBounds,
    },
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Marker { .. } => ShapeKind::Marker,
            Shape::CircleMarker { .. } => ShapeKind::CircleMarker,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Polyline { .. } => ShapeKind::Polyline,
            Shape::Polygon { .. } => ShapeKind::Polygon,
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
        }
    }

    /// Radius for the circle family, which the engine also keeps in options.
    pub fn radius(&self) -> Option<f64> {
        match self {
            Shape::Circle { radius, .. } | Shape::CircleMarker { radius, .. } => Some(*radius),
            _ => None,
        }
    }
}

// ─── Layers ──────────────────────────────────────────────────────────────

/// A shape living on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: LayerId,
    pub shape: Shape,
    pub style: Style,
    pub properties: Properties,
    /// `id` member of the feature this layer was loaded from, if any.
    pub feature_id: Option<Value>,
}

impl Layer {
    /// Stamp a new layer.
    pub fn new(shape: Shape, style: Style) -> Self {
        Self {
            id: LayerId::next(),
            shape,
            style,
            properties: Properties::new(),
            feature_id: None,
        }
    }

    pub fn with_properties(mut self, properties: Properties) -> Self {
        self.properties = properties;
        self
    }

    pub fn kind(&self) -> ShapeKind {
        self.shape.kind()
    }
}

/// A freshly drawn shape as reported by the map engine, before it is stamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub shape: Shape,
    #[serde(default)]
    pub style: Style,
}

impl LayerSpec {
    pub fn into_layer(self) -> Layer {
        Layer::new(self.shape, self.style)
    }
}

/// New geometry (and optionally style) for an existing layer after an edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerEdit {
    pub id: LayerId,
    pub shape: Shape,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Style>,
}
