pub mod config;
pub mod geojson;
pub mod id;
pub mod model;
pub mod protocol;
pub mod summary;

pub use config::{DrawControlOptions, DrawModel, ToolOptions};
pub use geojson::{Feature, FeatureCollection, FeatureError, Geometry};
pub use id::LayerId;
pub use model::*;
pub use protocol::{Command, Notification};
pub use summary::ShapeSummary;
