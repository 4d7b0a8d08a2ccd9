//! Recording host shared by the integration tests.

#![allow(dead_code)]

use geodraw_core::config::DrawControlOptions;
use geodraw_core::id::LayerId;
use geodraw_core::model::*;
use geodraw_core::protocol::Notification;
use geodraw_editor::host::{Channel, DrawHost};
use geodraw_editor::surface::{DrawSurface, SyncPolicy};
use geodraw_core::config::DrawModel;
use serde_json::{Value, json};

#[derive(Debug, Default)]
pub struct RecordingHost {
    pub group_attached: bool,
    pub installed: Option<DrawControlOptions>,
    pub subscribed: Vec<Channel>,
    pub rendered: Vec<LayerId>,
    pub sent: Vec<Notification>,
    /// Every synchronize-back, in order.
    pub saves: Vec<Vec<Value>>,
}

impl RecordingHost {
    pub fn last_save(&self) -> Option<&Vec<Value>> {
        self.saves.last()
    }

    pub fn sent_json(&self) -> Vec<Value> {
        self.sent.iter().map(Notification::to_value).collect()
    }
}

impl DrawHost for RecordingHost {
    fn add_feature_group(&mut self) {
        self.group_attached = true;
    }

    fn remove_feature_group(&mut self) {
        self.group_attached = false;
        self.rendered.clear();
    }

    fn install_control(&mut self, options: &DrawControlOptions) {
        self.installed = Some(options.clone());
    }

    fn subscribe(&mut self, channel: Channel) {
        self.subscribed.push(channel);
    }

    fn unsubscribe(&mut self, channel: Channel) {
        self.subscribed.retain(|c| *c != channel);
    }

    fn layer_added(&mut self, layer: &Layer) {
        self.rendered.push(layer.id);
    }

    fn layer_removed(&mut self, id: LayerId) {
        self.rendered.retain(|r| *r != id);
    }

    fn send(&mut self, notification: Notification) {
        self.sent.push(notification);
    }

    fn save_data(&mut self, data: Vec<Value>) {
        self.saves.push(data);
    }
}

pub fn active_surface() -> DrawSurface<RecordingHost> {
    active_surface_with(SyncPolicy::CommandsOnly)
}

pub fn active_surface_with(policy: SyncPolicy) -> DrawSurface<RecordingHost> {
    let mut surface = DrawSurface::new(RecordingHost::default()).with_sync_policy(policy);
    surface.initialize(&DrawModel::default()).unwrap();
    surface
}

pub fn style(color: &str) -> Style {
    json!({ "color": color, "fillOpacity": 0.2 })
        .as_object()
        .cloned()
        .unwrap()
}

pub fn circle_spec() -> LayerSpec {
    LayerSpec {
        shape: Shape::Circle {
            center: LatLng::new(51.505, -0.09),
            radius: 500.0,
        },
        style: style("#f03"),
    }
}

pub fn rectangle_spec() -> LayerSpec {
    LayerSpec {
        shape: Shape::Rectangle {
            bounds: LatLngBounds::new(LatLng::new(51.49, -0.08), LatLng::new(51.5, -0.06)),
        },
        style: style("#3388ff"),
    }
}

pub fn marker_spec(lat: f64, lng: f64) -> LayerSpec {
    LayerSpec {
        shape: Shape::Marker {
            position: LatLng::new(lat, lng),
        },
        style: Style::new(),
    }
}
