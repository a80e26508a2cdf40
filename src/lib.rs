#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod context;
pub mod document;
pub mod editor;
pub mod error;
pub mod event;
pub mod geometry;
pub mod input;
pub mod layer;
pub mod options;
pub mod panels;
pub mod path;
pub mod renderer;
pub mod selection;
pub mod shape;
pub mod state;
pub mod tools;

pub use app::DrawApp;
pub use command::{Command, CommandHistory};
pub use context::EditorContext;
pub use document::Document;
pub use editor::Editor;
pub use error::{EditorError, Result};
pub use event::{EditorEvent, EventHandler, EventLog};
pub use input::{InputEvent, InputHandler, PointerButton};
pub use layer::{Layer, LayerId};
pub use options::EditorOptions;
pub use renderer::{EguiRenderer, Renderer};
pub use selection::{MoveMode, Selection};
pub use shape::{Shape, ShapeId, ShapeKind, ShapeState};
pub use state::EditorState;
pub use tools::{PathSubTool, Tool, ToolState, ToolType, new_tool};
