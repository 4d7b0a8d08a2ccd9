pub mod commands;
pub mod error;
pub mod host;
pub mod layers;
pub mod surface;

pub use error::SurfaceError;
pub use host::{Channel, DrawHost};
pub use layers::FeatureGroup;
pub use surface::{DrawSurface, Phase, SyncPolicy};
