use thiserror::Error;

use crate::layer::LayerId;
use crate::shape::ShapeId;

/// Errors surfaced by editor operations that a caller can act on.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("shape {0} does not exist")]
    UnknownShape(ShapeId),

    #[error("layer {0} does not exist")]
    UnknownLayer(LayerId),

    #[error("shape {0} is locked")]
    Locked(ShapeId),

    #[error("shape {0} is not a group")]
    NotAGroup(ShapeId),

    #[error("nothing to undo")]
    UndoStackEmpty,

    #[error("nothing to redo")]
    RedoStackEmpty,

    #[error("failed to capture or restore a scene snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("invalid editor options: {0}")]
    Options(String),
}

pub type Result<T> = std::result::Result<T, EditorError>;
