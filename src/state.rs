use crate::context::EditorContext;
use crate::event::EditorEvent;
use crate::tools::{Tool, ToolType};

#[derive(Debug, Default)]
pub enum EditorState {
    #[default]
    Idle,
    UsingTool {
        active_tool: ToolType,
    },
}

impl EditorState {
    /// Makes `tool` the active tool. The previous tool is deactivated first,
    /// which aborts any gesture it was in the middle of.
    pub fn set_active_tool(&mut self, mut tool: ToolType, ctx: &mut EditorContext) {
        let old = match self {
            Self::UsingTool { active_tool } => {
                active_tool.deactivate(ctx);
                Some(active_tool.name())
            }
            Self::Idle => None,
        };

        tool.activate(ctx);
        let new = tool.name();
        *self = Self::UsingTool { active_tool: tool };
        ctx.events.emit(EditorEvent::ToolChanged { old, new });
    }

    pub fn active_tool(&self) -> Option<&ToolType> {
        match self {
            Self::UsingTool { active_tool } => Some(active_tool),
            _ => None,
        }
    }

    pub fn active_tool_mut(&mut self) -> Option<&mut ToolType> {
        match self {
            Self::UsingTool { active_tool } => Some(active_tool),
            _ => None,
        }
    }

    pub fn is_using_tool(&self) -> bool {
        matches!(self, Self::UsingTool { .. })
    }
}
