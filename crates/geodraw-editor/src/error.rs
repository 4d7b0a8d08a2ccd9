use crate::surface::Phase;
use thiserror::Error;

/// Lifecycle violations on a `DrawSurface`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("draw surface is not initialized")]
    NotInitialized,
    #[error("draw surface is already {0:?}")]
    AlreadyInitialized(Phase),
    #[error("draw surface has been torn down")]
    Detached,
}
