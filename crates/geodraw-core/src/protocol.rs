//! Messages exchanged with the host process.
//!
//! Inbound: `{"msg": "<command>"}` custom messages asking the control to
//! clear shapes. Outbound: `{"event": "draw:*", "geo_json": ...}`
//! notifications about user interactions.

use crate::geojson::Feature;
use crate::model::ShapeKind;
use crate::summary::ShapeSummary;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inbound clear command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum Command {
    Clear,
    ClearPolylines,
    ClearPolygons,
    /// Clears the whole circle-marker family, plain circle markers included.
    ClearCircles,
    /// Clears circle markers that are not circles.
    ClearCircleMarkers,
    ClearRectangles,
    ClearMarkers,
    /// Anything else. Removes nothing.
    #[serde(other)]
    Unknown,
}

impl Command {
    /// Read a custom message. Messages without a recognizable `msg` are
    /// `Unknown` rather than errors.
    pub fn parse(content: &Value) -> Self {
        match Command::deserialize(content) {
            Ok(cmd) => cmd,
            Err(e) => {
                log::debug!("ignoring custom message {content}: {e}");
                Command::Unknown
            }
        }
    }

    /// Whether this command removes a layer of the given kind.
    pub fn selects(self, kind: ShapeKind) -> bool {
        match self {
            Command::Clear => true,
            Command::ClearPolylines => {
                kind.is_a(ShapeKind::Polyline) && !kind.is_a(ShapeKind::Polygon)
            }
            Command::ClearPolygons => {
                kind.is_a(ShapeKind::Polygon) && !kind.is_a(ShapeKind::Rectangle)
            }
            Command::ClearCircles => kind.is_a(ShapeKind::CircleMarker),
            Command::ClearCircleMarkers => {
                kind.is_a(ShapeKind::CircleMarker) && !kind.is_a(ShapeKind::Circle)
            }
            Command::ClearRectangles => kind.is_a(ShapeKind::Rectangle),
            Command::ClearMarkers => kind.is_a(ShapeKind::Marker),
            Command::Unknown => false,
        }
    }
}

/// Outbound interaction notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event")]
pub enum Notification {
    #[serde(rename = "draw:created")]
    Created { geo_json: ShapeSummary },
    #[serde(rename = "draw:edited")]
    Edited { geo_json: Feature },
    #[serde(rename = "draw:deleted")]
    Deleted { geo_json: ShapeSummary },
}

impl Notification {
    pub fn event(&self) -> &'static str {
        match self {
            Notification::Created { .. } => "draw:created",
            Notification::Edited { .. } => "draw:edited",
            Notification::Deleted { .. } => "draw:deleted",
        }
    }

    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            log::error!("notification serialization failed: {e}");
            Value::Null
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LatLng;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_every_command() {
        let cases = [
            ("clear", Command::Clear),
            ("clear_polylines", Command::ClearPolylines),
            ("clear_polygons", Command::ClearPolygons),
            ("clear_circles", Command::ClearCircles),
            ("clear_circle_markers", Command::ClearCircleMarkers),
            ("clear_rectangles", Command::ClearRectangles),
            ("clear_markers", Command::ClearMarkers),
        ];
        for (msg, expected) in cases {
            assert_eq!(Command::parse(&json!({ "msg": msg })), expected);
        }
    }

    #[test]
    fn unrecognized_messages_are_unknown() {
        assert_eq!(Command::parse(&json!({ "msg": "explode" })), Command::Unknown);
        assert_eq!(Command::parse(&json!({ "other": 1 })), Command::Unknown);
        assert_eq!(Command::parse(&json!("clear")), Command::Unknown);
    }

    #[test]
    fn predicates_follow_taxonomy() {
        use ShapeKind::*;
        let removed = |cmd: Command| -> Vec<ShapeKind> {
            ShapeKind::ALL
                .into_iter()
                .filter(|k| cmd.selects(*k))
                .collect()
        };
        assert_eq!(removed(Command::Clear), ShapeKind::ALL.to_vec());
        assert_eq!(removed(Command::ClearPolylines), vec![Polyline]);
        assert_eq!(removed(Command::ClearPolygons), vec![Polygon]);
        assert_eq!(removed(Command::ClearCircles), vec![Circle, CircleMarker]);
        assert_eq!(removed(Command::ClearCircleMarkers), vec![CircleMarker]);
        assert_eq!(removed(Command::ClearRectangles), vec![Rectangle]);
        assert_eq!(removed(Command::ClearMarkers), vec![Marker]);
        assert!(removed(Command::Unknown).is_empty());
    }

    #[test]
    fn created_notification_shape() {
        let n = Notification::Created {
            geo_json: ShapeSummary::Marker {
                position: LatLng::new(51.5, -0.09),
            },
        };
        assert_eq!(n.event(), "draw:created");
        assert_eq!(
            n.to_value(),
            json!({
                "event": "draw:created",
                "geo_json": { "type": "Marker", "position": { "lat": 51.5, "lng": -0.09 } }
            })
        );
    }

    #[test]
    fn deleted_notification_with_empty_summary() {
        let n = Notification::Deleted {
            geo_json: ShapeSummary::Empty,
        };
        assert_eq!(n.to_value(), json!({ "event": "draw:deleted", "geo_json": {} }));
    }
}
