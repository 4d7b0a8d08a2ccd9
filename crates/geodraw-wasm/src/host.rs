//! Host implementation that buffers every effect for JavaScript to drain.
//!
//! Calling back into JS from inside a `&mut self` method would let the page
//! re-enter the control while it is borrowed, so nothing here calls out.
//! The JS glue drains the queues after each call instead.

use geodraw_core::config::DrawControlOptions;
use geodraw_core::id::LayerId;
use geodraw_core::model::Layer;
use geodraw_core::protocol::Notification;
use geodraw_editor::host::{Channel, DrawHost};
use serde::Serialize;
use serde_json::Value;

/// A change the page must make to the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum MapOp {
    AttachGroup,
    DetachGroup,
    InstallControl { options: DrawControlOptions },
    Subscribe { channel: &'static str },
    Unsubscribe { channel: &'static str },
    Add { id: LayerId, feature: Value },
    Remove { id: LayerId },
}

#[derive(Debug, Default)]
pub struct BufferedHost {
    map_ops: Vec<MapOp>,
    messages: Vec<Value>,
    pending_data: Option<Vec<Value>>,
}

impl BufferedHost {
    pub fn take_map_ops(&mut self) -> Vec<MapOp> {
        std::mem::take(&mut self.map_ops)
    }

    pub fn take_messages(&mut self) -> Vec<Value> {
        std::mem::take(&mut self.messages)
    }

    /// Latest synchronized `data`; earlier unsent saves are superseded.
    pub fn take_data(&mut self) -> Option<Vec<Value>> {
        self.pending_data.take()
    }
}

impl DrawHost for BufferedHost {
    fn add_feature_group(&mut self) {
        self.map_ops.push(MapOp::AttachGroup);
    }

    fn remove_feature_group(&mut self) {
        self.map_ops.push(MapOp::DetachGroup);
    }

    fn install_control(&mut self, options: &DrawControlOptions) {
        self.map_ops.push(MapOp::InstallControl {
            options: options.clone(),
        });
    }

    fn subscribe(&mut self, channel: Channel) {
        self.map_ops.push(MapOp::Subscribe {
            channel: channel.name(),
        });
    }

    fn unsubscribe(&mut self, channel: Channel) {
        self.map_ops.push(MapOp::Unsubscribe {
            channel: channel.name(),
        });
    }

    fn layer_added(&mut self, layer: &Layer) {
        self.map_ops.push(MapOp::Add {
            id: layer.id,
            feature: layer.to_feature().to_value(),
        });
    }

    fn layer_removed(&mut self, id: LayerId) {
        self.map_ops.push(MapOp::Remove { id });
    }

    fn send(&mut self, notification: Notification) {
        log::debug!("sending {}", notification.event());
        self.messages.push(notification.to_value());
    }

    fn save_data(&mut self, data: Vec<Value>) {
        self.pending_data = Some(data);
    }
}
