//! The seam between the draw surface and its environment.
//!
//! A `DrawHost` stands in for two external collaborators: the map engine
//! that renders layers and runs the drawing toolbar, and the widget transport
//! that carries notifications and `data` back to the host process.

use geodraw_core::config::DrawControlOptions;
use geodraw_core::id::LayerId;
use geodraw_core::model::Layer;
use geodraw_core::protocol::Notification;
use serde_json::Value;

/// Event sources the surface listens to while active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// `draw:created` from the map.
    Created,
    /// `draw:edited` from the map.
    Edited,
    /// `draw:deleted` from the map.
    Deleted,
    /// Custom messages from the host process.
    CustomMessage,
    /// Changes of the `data` attribute.
    DataChange,
}

impl Channel {
    pub const ALL: [Channel; 5] = [
        Channel::Created,
        Channel::Edited,
        Channel::Deleted,
        Channel::CustomMessage,
        Channel::DataChange,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Created => "draw:created",
            Channel::Edited => "draw:edited",
            Channel::Deleted => "draw:deleted",
            Channel::CustomMessage => "msg:custom",
            Channel::DataChange => "change:data",
        }
    }
}

pub trait DrawHost {
    /// Attach the (empty) feature group to the map.
    fn add_feature_group(&mut self);

    /// Detach the feature group and everything in it from the map.
    fn remove_feature_group(&mut self);

    /// Create the drawing toolbar.
    fn install_control(&mut self, options: &DrawControlOptions);

    fn subscribe(&mut self, channel: Channel);

    fn unsubscribe(&mut self, channel: Channel);

    /// A layer joined the feature group and should be drawn.
    fn layer_added(&mut self, _layer: &Layer) {}

    /// A layer left the feature group and should be erased.
    fn layer_removed(&mut self, _id: LayerId) {}

    /// Deliver a notification to the host process.
    fn send(&mut self, notification: Notification);

    /// Store `data` on the model and push it to the host process.
    fn save_data(&mut self, data: Vec<Value>);
}
