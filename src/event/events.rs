use crate::layer::LayerId;
use crate::shape::ShapeId;

#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    ToolChanged {
        old: Option<&'static str>,
        new: &'static str,
    },
    ShapeCommitted {
        layer_id: LayerId,
        shape: ShapeId,
    },
    SelectionChanged(SelectionEvent),
    LayerInvalidated {
        layer_id: LayerId,
    },
    HistoryChanged(HistoryEvent),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionEvent {
    Modified(Vec<ShapeId>),
    Cleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    Recorded,
    Undone,
    Redone,
}
