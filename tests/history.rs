use eframe_draw::editor::Editor;
use eframe_draw::error::EditorError;
use eframe_draw::event::{EditorEvent, EventLog, HistoryEvent};
use eframe_draw::options::EditorOptions;
use eframe_draw::shape::{ShapeDefaults, ShapeId, ShapeState, factory};

fn free_editor() -> Editor {
    Editor::new(EditorOptions {
        snap_to_grid: false,
        ..EditorOptions::default()
    })
}

fn draw_line(editor: &mut Editor, from: (f64, f64), to: (f64, f64)) -> ShapeId {
    editor.set_tool("line");
    editor.left_down(from.0, from.1);
    editor.left_down(to.0, to.1);
    *editor.context.document.current_layer().shapes().last().unwrap()
}

#[test]
fn test_undo_and_redo_creation() {
    let mut editor = free_editor();
    let line = draw_line(&mut editor, (0.0, 0.0), (40.0, 0.0));

    editor.undo().unwrap();
    assert!(editor.context.document.current_layer().is_empty());
    assert!(editor.context.history.can_redo());

    editor.redo().unwrap();
    assert_eq!(editor.context.document.current_layer().shapes(), &[line]);
    assert!(!editor.context.history.can_redo());
}

#[test]
fn test_undo_move_restores_positions() {
    let mut editor = free_editor();
    let line = draw_line(&mut editor, (0.0, 0.0), (40.0, 0.0));
    editor.set_tool("selection");
    editor.left_down(20.0, 0.0);
    editor.pointer_move(20.0, 10.0);
    editor.left_up(20.0, 10.0);

    let doc = &editor.context.document;
    let points = doc.get_points(line);
    assert_eq!(doc.position(points[0]), Some((0.0, 10.0)));

    editor.undo().unwrap();
    let doc = &editor.context.document;
    assert_eq!(doc.position(points[0]), Some((0.0, 0.0)));
    assert_eq!(doc.position(points[1]), Some((40.0, 0.0)));

    editor.redo().unwrap();
    let doc = &editor.context.document;
    assert_eq!(doc.position(points[1]), Some((40.0, 10.0)));
}

#[test]
fn test_undo_past_start_fails_without_changes() {
    let mut editor = free_editor();
    let line = draw_line(&mut editor, (0.0, 0.0), (40.0, 0.0));

    editor.undo().unwrap();
    assert!(matches!(editor.undo(), Err(EditorError::UndoStackEmpty)));
    editor.redo().unwrap();
    assert!(matches!(editor.redo(), Err(EditorError::RedoStackEmpty)));
    assert_eq!(editor.context.document.current_layer().shapes(), &[line]);
}

#[test]
fn test_new_record_clears_redo() {
    let mut editor = free_editor();
    draw_line(&mut editor, (0.0, 0.0), (40.0, 0.0));
    editor.undo().unwrap();

    draw_line(&mut editor, (0.0, 20.0), (40.0, 20.0));

    assert!(!editor.context.history.can_redo());
    assert_eq!(editor.context.history.undo_len(), 1);
}

#[test]
fn test_group_undo_restores_flags_and_layer() {
    let mut editor = free_editor();
    let doc = &mut editor.context.document;
    let rect = factory::create_rectangle(doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    let pin = factory::create_point(doc, 5.0, 5.0);
    doc.current_layer_mut().add(rect);
    doc.current_layer_mut().add(pin);
    editor.context.select(rect);
    editor.context.select(pin);

    let group = editor.group_selection("g").unwrap().unwrap();
    assert_eq!(editor.context.document.current_layer().shapes(), &[group]);

    editor.undo().unwrap();
    let doc = &editor.context.document;
    assert_eq!(doc.current_layer().shapes(), &[rect, pin]);
    assert!(doc.get(pin).unwrap().state.is_standalone());
    assert!(!doc.get(pin).unwrap().state.intersects(ShapeState::CONNECTOR_FLAGS));
    assert_eq!(doc.get(rect).unwrap().owner, None);
    assert!(editor.context.selection.is_empty());

    editor.redo().unwrap();
    let doc = &editor.context.document;
    assert_eq!(doc.current_layer().shapes(), &[group]);
    assert!(doc.get(pin).unwrap().state.is_connector());
}

#[test]
fn test_ungroup_is_one_history_entry() {
    let mut editor = free_editor();
    let doc = &mut editor.context.document;
    let a = factory::create_rectangle(doc, 0.0, 0.0, 10.0, 10.0, &ShapeDefaults::default());
    let b = factory::create_ellipse(doc, 20.0, 0.0, 30.0, 10.0, &ShapeDefaults::default());
    doc.current_layer_mut().add(a);
    doc.current_layer_mut().add(b);
    editor.context.select(a);
    editor.context.select(b);
    let group = editor.group_selection("g").unwrap().unwrap();

    assert_eq!(editor.ungroup_selection().unwrap(), 1);
    assert_eq!(editor.context.history.undo_len(), 2);

    editor.undo().unwrap();
    assert_eq!(editor.context.document.current_layer().shapes(), &[group]);
}

#[test]
fn test_undo_mid_gesture_aborts_tool_first() {
    let mut editor = free_editor();
    let first = draw_line(&mut editor, (0.0, 0.0), (40.0, 0.0));
    editor.left_down(0.0, 50.0);
    let pending = editor.context.document.working_layer().shapes()[0];

    editor.undo().unwrap();

    let doc = &editor.context.document;
    assert!(doc.working_layer().is_empty());
    assert!(!doc.contains(pending));
    assert!(doc.current_layer().is_empty());
    assert!(doc.contains(first));
}

#[test]
fn test_history_limit_drops_oldest() {
    let mut editor = Editor::new(EditorOptions {
        snap_to_grid: false,
        history_limit: 2,
        ..EditorOptions::default()
    });
    for i in 0..3 {
        let y = f64::from(i) * 20.0;
        draw_line(&mut editor, (0.0, y), (40.0, y));
    }

    assert_eq!(editor.context.history.undo_len(), 2);
    editor.undo().unwrap();
    editor.undo().unwrap();
    assert_eq!(editor.context.document.current_layer().len(), 1);
}

#[test]
fn test_history_events_are_published() {
    let mut editor = free_editor();
    let log = EventLog::new();
    editor.subscribe(Box::new(log.clone()));
    draw_line(&mut editor, (0.0, 0.0), (40.0, 0.0));
    editor.undo().unwrap();
    editor.redo().unwrap();

    let history: Vec<HistoryEvent> = log
        .take()
        .into_iter()
        .filter_map(|event| match event {
            EditorEvent::HistoryChanged(change) => Some(change),
            _ => None,
        })
        .collect();
    assert_eq!(history, vec![HistoryEvent::Recorded, HistoryEvent::Undone, HistoryEvent::Redone]);
}
