//! GeoJSON features and the layer ↔ feature conversion.
//!
//! Output follows the map engine's `toGeoJSON` conventions: coordinates are
//! `[lng, lat]` rounded to six decimals, polygon rings are closed, and the
//! layer's options are copied into `properties.style`. On top of that the
//! shape tag is written to `properties.shape`, because a plain GeoJSON point
//! cannot tell a marker from a circle and a polygon cannot tell a rectangle
//! from any other quadrilateral.

use crate::model::*;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Key under `properties` holding the layer options.
pub const STYLE_KEY: &str = "style";
/// Key under `properties` holding the shape tag.
pub const SHAPE_KEY: &str = "shape";
/// Engine default for circle markers loaded without a radius.
pub const DEFAULT_CIRCLE_MARKER_RADIUS: f64 = 10.0;

const PRECISION: f64 = 1e6;

/// `[lng, lat]`. Altitude and any further members are dropped on read.
pub type Position = [f64; 2];

#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("invalid GeoJSON feature: {0}")]
    Json(#[from] serde_json::Error),
    #[error("a {kind:?} cannot be built from a {geometry} geometry")]
    KindMismatch {
        kind: ShapeKind,
        geometry: &'static str,
    },
    #[error("circle feature has no numeric `properties.style.radius`")]
    MissingRadius,
    #[error("{0} geometry has no coordinates")]
    EmptyGeometry(&'static str),
    #[error("expected a Feature, a FeatureCollection or an array of features")]
    NotFeatures,
}

// ─── Wire types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        #[serde(deserialize_with = "de_position")]
        coordinates: Position,
    },
    LineString {
        #[serde(deserialize_with = "de_line")]
        coordinates: Vec<Position>,
    },
    Polygon {
        #[serde(deserialize_with = "de_rings")]
        coordinates: Vec<Vec<Position>>,
    },
}

impl Geometry {
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::LineString { .. } => "LineString",
            Geometry::Polygon { .. } => "Polygon",
        }
    }
}

/// A position as read from the wire: at least `[lng, lat]`.
struct LoosePosition(Position);

impl<'de> Deserialize<'de> for LoosePosition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let coords = Vec::<f64>::deserialize(deserializer)?;
        match coords.as_slice() {
            [lng, lat, ..] => Ok(LoosePosition([*lng, *lat])),
            _ => Err(serde::de::Error::invalid_length(
                coords.len(),
                &"a position with at least two members",
            )),
        }
    }
}

fn de_position<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Position, D::Error> {
    LoosePosition::deserialize(deserializer).map(|p| p.0)
}

fn de_line<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Position>, D::Error> {
    let line = Vec::<LoosePosition>::deserialize(deserializer)?;
    Ok(line.into_iter().map(|p| p.0).collect())
}

fn de_rings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Vec<Position>>, D::Error> {
    let rings = Vec::<Vec<LoosePosition>>::deserialize(deserializer)?;
    Ok(rings
        .into_iter()
        .map(|ring| ring.into_iter().map(|p| p.0).collect())
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum FeatureTag {
    Feature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum CollectionTag {
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: Map<String, Value>,
}

fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<Map<String, Value>, D::Error> {
    Ok(Option::<Map<String, Value>>::deserialize(d)?.unwrap_or_default())
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Map<String, Value>) -> Self {
        Self {
            tag: FeatureTag::Feature,
            id: None,
            geometry,
            properties,
        }
    }

    pub fn from_value(value: &Value) -> Result<Self, FeatureError> {
        Ok(Feature::deserialize(value)?)
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            log::error!("feature serialization failed: {e}");
            Value::Null
        })
    }

    /// The `properties.style` object, if present.
    pub fn style(&self) -> Option<&Map<String, Value>> {
        self.properties.get(STYLE_KEY).and_then(Value::as_object)
    }

    /// The shape tag from `properties.shape`, if present and known.
    pub fn shape_kind(&self) -> Option<ShapeKind> {
        self.properties
            .get(SHAPE_KEY)
            .and_then(Value::as_str)
            .and_then(ShapeKind::from_name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    tag: CollectionTag,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            tag: CollectionTag::FeatureCollection,
            features,
        }
    }

    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Self {
        Self::new(layers.into_iter().map(Layer::to_feature).collect())
    }

    pub fn to_json(&self) -> Result<String, FeatureError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, FeatureError> {
        let value: Value = serde_json::from_str(json)?;
        let features = feature_values(&value)?
            .into_iter()
            .map(Feature::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(features))
    }
}

/// Split an incoming `data` value into its feature members.
///
/// Accepts a bare array, a FeatureCollection object, a single Feature, or
/// `null` (no features). Members are returned unparsed so callers can skip
/// individual bad features.
pub fn feature_values(data: &Value) -> Result<Vec<&Value>, FeatureError> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.iter().collect()),
        Value::Object(obj) => match obj.get("type").and_then(Value::as_str) {
            Some("FeatureCollection") => match obj.get("features") {
                Some(Value::Array(items)) => Ok(items.iter().collect()),
                _ => Err(FeatureError::NotFeatures),
            },
            Some("Feature") => Ok(vec![data]),
            _ => Err(FeatureError::NotFeatures),
        },
        _ => Err(FeatureError::NotFeatures),
    }
}

// ─── Coordinate helpers ──────────────────────────────────────────────────

fn format_num(x: f64) -> f64 {
    (x * PRECISION).round() / PRECISION
}

fn to_position(p: &LatLng) -> Position {
    [format_num(p.lng), format_num(p.lat)]
}

fn to_latlng(p: &Position) -> LatLng {
    LatLng::new(p[1], p[0])
}

fn closed_ring(points: &[LatLng]) -> Vec<Position> {
    let mut ring: Vec<Position> = points.iter().map(to_position).collect();
    if let Some(first) = ring.first().copied()
        && ring.last() != Some(&first)
    {
        ring.push(first);
    }
    ring
}

fn open_ring(coords: &[Position]) -> Vec<LatLng> {
    let mut ring: Vec<LatLng> = coords.iter().map(to_latlng).collect();
    if ring.len() > 2 && ring.first() == ring.last() {
        ring.pop();
    }
    ring
}

// ─── Layer ↔ Feature ─────────────────────────────────────────────────────

impl Layer {
    /// Serialize the layer the way the map engine does, with its options in
    /// `properties.style` and its tag in `properties.shape`.
    pub fn to_feature(&self) -> Feature {
        let geometry = match &self.shape {
            Shape::Marker { position } => Geometry::Point {
                coordinates: to_position(position),
            },
            Shape::Circle { center, .. } | Shape::CircleMarker { center, .. } => Geometry::Point {
                coordinates: to_position(center),
            },
            Shape::Polyline { latlngs } => Geometry::LineString {
                coordinates: latlngs.iter().map(to_position).collect(),
            },
            Shape::Polygon { rings } => Geometry::Polygon {
                coordinates: rings.iter().map(|r| closed_ring(r)).collect(),
            },
            Shape::Rectangle { bounds } => Geometry::Polygon {
                coordinates: vec![closed_ring(&bounds.corners())],
            },
        };

        let mut style = self.style.clone();
        if let Some(radius) = self.shape.radius() {
            style.insert("radius".into(), serde_json::json!(radius));
        }

        let mut properties = self.properties.clone();
        properties.insert(STYLE_KEY.into(), Value::Object(style));
        properties.insert(SHAPE_KEY.into(), Value::String(self.kind().name().into()));

        let mut feature = Feature::new(geometry, properties);
        feature.id = self.feature_id.clone();
        feature
    }

    /// Rebuild a layer from a feature, stamping it with a fresh id.
    ///
    /// Without a `properties.shape` tag the kind is inferred from the
    /// geometry: points become markers (circles when the style carries a
    /// radius), line strings polylines and polygons polygons.
    pub fn from_feature(feature: &Feature) -> Result<Self, FeatureError> {
        let mut properties = feature.properties.clone();
        let style = match properties.remove(STYLE_KEY) {
            Some(Value::Object(style)) => style,
            _ => Style::new(),
        };
        let declared = properties.remove(SHAPE_KEY);
        let kind = match declared.as_ref().and_then(Value::as_str) {
            Some(name) => ShapeKind::from_name(name).unwrap_or_else(|| {
                log::warn!("unknown shape tag {name:?}, inferring from geometry");
                infer_kind(&feature.geometry, &style)
            }),
            None => infer_kind(&feature.geometry, &style),
        };

        let shape = shape_from_geometry(kind, &feature.geometry, &style)?;
        let mut layer = Layer::new(shape, style).with_properties(properties);
        layer.feature_id = feature.id.clone();
        Ok(layer)
    }
}

fn style_radius(style: &Style) -> Option<f64> {
    style.get("radius").and_then(Value::as_f64)
}

fn infer_kind(geometry: &Geometry, style: &Style) -> ShapeKind {
    match geometry {
        Geometry::Point { .. } if style_radius(style).is_some() => ShapeKind::Circle,
        Geometry::Point { .. } => ShapeKind::Marker,
        Geometry::LineString { .. } => ShapeKind::Polyline,
        Geometry::Polygon { .. } => ShapeKind::Polygon,
    }
}

fn shape_from_geometry(
    kind: ShapeKind,
    geometry: &Geometry,
    style: &Style,
) -> Result<Shape, FeatureError> {
    let shape = match (kind, geometry) {
        (ShapeKind::Marker, Geometry::Point { coordinates }) => Shape::Marker {
            position: to_latlng(coordinates),
        },
        (ShapeKind::Circle, Geometry::Point { coordinates }) => Shape::Circle {
            center: to_latlng(coordinates),
            radius: style_radius(style).ok_or(FeatureError::MissingRadius)?,
        },
        (ShapeKind::CircleMarker, Geometry::Point { coordinates }) => Shape::CircleMarker {
            center: to_latlng(coordinates),
            radius: style_radius(style).unwrap_or(DEFAULT_CIRCLE_MARKER_RADIUS),
        },
        (ShapeKind::Polyline, Geometry::LineString { coordinates }) => {
            if coordinates.is_empty() {
                return Err(FeatureError::EmptyGeometry(geometry.type_name()));
            }
            Shape::Polyline {
                latlngs: coordinates.iter().map(to_latlng).collect(),
            }
        }
        (ShapeKind::Polygon, Geometry::Polygon { coordinates }) => {
            let rings: Vec<Vec<LatLng>> = coordinates.iter().map(|r| open_ring(r)).collect();
            if rings.first().is_none_or(|outer| outer.is_empty()) {
                return Err(FeatureError::EmptyGeometry(geometry.type_name()));
            }
            Shape::Polygon { rings }
        }
        (ShapeKind::Rectangle, Geometry::Polygon { coordinates }) => {
            let outer = coordinates
                .first()
                .map(|r| open_ring(r))
                .unwrap_or_default();
            let bounds = LatLngBounds::from_points(&outer)
                .ok_or(FeatureError::EmptyGeometry(geometry.type_name()))?;
            Shape::Rectangle { bounds }
        }
        (kind, geometry) => {
            return Err(FeatureError::KindMismatch {
                kind,
                geometry: geometry.type_name(),
            });
        }
    };
    Ok(shape)
}
