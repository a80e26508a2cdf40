use egui::{Key, KeyboardShortcut, Modifiers};
use log::{info, warn};

use crate::editor::Editor;
use crate::error::Result;
use crate::event::LoggingEventHandler;
use crate::input::InputHandler;
use crate::options::EditorOptions;
use crate::panels::{central_panel, tools_panel};
use crate::renderer::EguiRenderer;

/// Storage key for the persisted [`EditorOptions`].
pub const OPTIONS_KEY: &str = "editor_options";

const UNDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Z);
const REDO: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::Y);
const GROUP: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::G);
const UNGROUP: KeyboardShortcut = KeyboardShortcut::new(Modifiers::COMMAND, Key::U);

/// Desktop shell around the [`Editor`]. Only the options survive a restart.
pub struct DrawApp {
    pub(crate) editor: Editor,
    pub(crate) input: InputHandler,
    pub(crate) renderer: EguiRenderer,
    pub(crate) status: Option<String>,
}

impl Default for DrawApp {
    fn default() -> Self {
        Self::with_options(EditorOptions::default())
    }
}

impl DrawApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let options = cc
            .storage
            .and_then(|storage| eframe::get_value::<EditorOptions>(storage, OPTIONS_KEY))
            .filter(|options| match options.validate() {
                Ok(()) => true,
                Err(err) => {
                    warn!("ignoring stored options: {err}");
                    false
                }
            })
            .unwrap_or_default();
        Self::with_options(options)
    }

    pub fn with_options(options: EditorOptions) -> Self {
        let mut editor = Editor::new(options);
        editor.subscribe(Box::new(LoggingEventHandler));
        editor.set_tool("selection");
        Self {
            editor,
            input: InputHandler::new(egui::Rect::NOTHING),
            renderer: EguiRenderer::default(),
            status: None,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Shows a failed command in the status line instead of dropping it.
    pub(crate) fn report<T>(&mut self, result: Result<T>) -> Option<T> {
        match result {
            Ok(value) => {
                self.status = None;
                Some(value)
            }
            Err(err) => {
                warn!("{err}");
                self.status = Some(err.to_string());
                None
            }
        }
    }

    pub(crate) fn undo(&mut self) {
        let result = self.editor.undo();
        self.report(result);
    }

    pub(crate) fn redo(&mut self) {
        let result = self.editor.redo();
        self.report(result);
    }

    pub(crate) fn group(&mut self) {
        let name = format!("Group {}", self.editor.context.document.shape_count());
        let result = self.editor.group_selection(&name);
        self.report(result);
    }

    pub(crate) fn ungroup(&mut self) {
        let result = self.editor.ungroup_selection();
        self.report(result);
    }

    pub(crate) fn delete(&mut self) {
        let count = self.editor.delete_selection();
        info!("removed {count} shapes");
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo, group, ungroup, delete, escape) = ctx.input_mut(|input| {
            (
                input.consume_shortcut(&UNDO),
                input.consume_shortcut(&REDO),
                input.consume_shortcut(&GROUP),
                input.consume_shortcut(&UNGROUP),
                input.consume_key(Modifiers::NONE, Key::Delete),
                input.consume_key(Modifiers::NONE, Key::Escape),
            )
        });
        if undo {
            self.undo();
        }
        if redo {
            self.redo();
        }
        if group {
            self.group();
        }
        if ungroup {
            self.ungroup();
        }
        if delete {
            self.delete();
        }
        if escape {
            self.editor.abort_tool();
        }
    }
}

impl eframe::App for DrawApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, OPTIONS_KEY, self.editor.options());
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_shortcuts(ctx);
        tools_panel(self, ctx);
        central_panel(self, ctx);
    }
}
